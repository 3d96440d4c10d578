//! The signaling core: client/lobby registries, opcode handlers, and the
//! disconnect/cleanup protocol.

pub mod cleanup;
pub mod client;
pub mod client_registry;
pub mod handlers;
pub mod lobby;
pub mod lobby_registry;
pub mod metrics;

use std::sync::Arc;

use crate::session_store::SessionStore;
use client_registry::ClientRegistry;
use lobby_registry::LobbyRegistry;
use metrics::ServerMetrics;

/// Shared, process-wide signaling state: the two registries, the external
/// SessionStore, and the metrics counters. One instance is constructed per
/// process and shared (via `Arc`) across all connection tasks.
pub struct SignalingCore {
    pub clients: ClientRegistry,
    pub lobbies: LobbyRegistry,
    pub session_store: Arc<dyn SessionStore>,
    pub metrics: ServerMetrics,
    /// Cost factor used for lobby password hashing (`SecurityConfig::scrypt`).
    /// Defaults to scrypt's recommended params when constructed with
    /// [`SignalingCore::new`].
    pub scrypt_params: scrypt::Params,
    /// Largest inbound text frame the connection loop accepts before
    /// closing with 1009.
    pub max_frame_bytes: usize,
    /// Whether `GET /metrics` requires a bearer token.
    pub require_metrics_auth: bool,
    pub metrics_auth_token: Option<String>,
}

impl SignalingCore {
    pub fn new(session_store: Arc<dyn SessionStore>) -> Self {
        Self::with_scrypt_params(session_store, scrypt::Params::default())
    }

    pub fn with_scrypt_params(session_store: Arc<dyn SessionStore>, scrypt_params: scrypt::Params) -> Self {
        Self {
            clients: ClientRegistry::new(),
            lobbies: LobbyRegistry::new(),
            session_store,
            metrics: ServerMetrics::new(),
            scrypt_params,
            max_frame_bytes: 64 * 1024,
            require_metrics_auth: false,
            metrics_auth_token: None,
        }
    }
}
