//! The external `SessionStore` interface and an in-memory
//! reference implementation for local development, demos, and tests.
//!
//! Real deployments back this with the account service's SQL schema; that
//! store is out of scope here — only the trait and a seedable
//! in-memory stand-in ship with this crate.

mod in_memory;

pub use in_memory::InMemorySessionStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use ulid::Ulid;

/// A resolved game identity, returned by [`SessionStore::verify_ugi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameIdentity {
    pub game_name: String,
    pub developer_name: String,
}

/// A resolved session identity, returned by [`SessionStore::verify_session_token`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub username: String,
    pub ulid: Ulid,
    pub origin: String,
    pub expiry: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("not found")]
    NotFound,
    #[error("session store error: {0}")]
    Store(String),
}

/// The two pure, idempotent lookups the signaling core consumes.
/// Implementations must never be called while a Client or Lobby lock is
/// held, and may assume the caller tolerates latency.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn verify_ugi(&self, ugi: Ulid) -> Result<GameIdentity, SessionStoreError>;

    async fn verify_session_token(
        &self,
        token: Ulid,
    ) -> Result<SessionIdentity, SessionStoreError>;
}
