//! Wire codec for the signaling protocol.
//!
//! - [`opcode`]: the fixed numeric opcode table (wire contract).
//! - [`frame`]: the `Frame` envelope all messages travel in.
//! - [`payloads`]: typed payload structs for opcodes that carry structured data.
//! - [`validation`]: ULID/field validation shared by the opcode handlers.

pub mod frame;
pub mod opcode;
pub mod payloads;
pub mod validation;

pub use frame::Frame;
pub use opcode::Opcode;
