//! Layered configuration for the signaling binary. The
//! signaling core itself (`server`, `protocol`, `session_store`) never reads
//! this module; only `main.rs` and the `websocket` router wiring do.
//!
//! - [`types::Config`]: the root struct
//! - [`server`]: listen address / frame-size settings
//! - [`security`]: CORS, message-size limits, scrypt cost parameters
//! - [`logging`]: level/format/rotation
//! - [`loader::load`]: the precedence-chain loader
//! - [`validation::validate_config_security`]: hard-fail validation

pub mod defaults;
pub mod loader;
pub mod logging;
pub mod security;
pub mod server;
pub mod types;
pub mod validation;

pub use loader::load;
pub use logging::{LogFormat, LogLevel, LoggingConfig};
pub use security::{ScryptParams, SecurityConfig};
pub use server::ServerConfig;
pub use types::Config;
pub use validation::validate_config_security;
