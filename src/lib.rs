#![cfg_attr(not(test), deny(clippy::panic))]
#![allow(clippy::too_many_arguments)]

//! A WebRTC signaling server: a websocket-fronted rendezvous service that lets
//! authenticated game clients form lobbies and exchange SDP/ICE payloads.
//!
//! The crate is split into the signaling core (`protocol`, `session_store`,
//! `server`, `websocket`) and the ambient stack a deployable binary needs
//! around it (`config`, `logging`, `security`).

pub mod config;
pub mod logging;
pub mod protocol;
pub mod security;
pub mod server;
pub mod session_store;
pub mod websocket;
