use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use ulid::Ulid;

use super::{GameIdentity, SessionIdentity, SessionStore, SessionStoreError};

/// A seedable, process-local [`SessionStore`]. Intended for local
/// development, the demo binary, and integration tests — never for
/// production, where an external SQL-backed store (out of scope here)
/// implements the same trait.
#[derive(Default)]
pub struct InMemorySessionStore {
    games: RwLock<HashMap<Ulid, GameIdentity>>,
    sessions: RwLock<HashMap<Ulid, SessionIdentity>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_game(&self, ugi: Ulid, identity: GameIdentity) {
        self.games.write().expect("games lock poisoned").insert(ugi, identity);
    }

    pub fn seed_session(&self, token: Ulid, identity: SessionIdentity) {
        self.sessions
            .write()
            .expect("sessions lock poisoned")
            .insert(token, identity);
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn verify_ugi(&self, ugi: Ulid) -> Result<GameIdentity, SessionStoreError> {
        self.games
            .read()
            .expect("games lock poisoned")
            .get(&ugi)
            .cloned()
            .ok_or(SessionStoreError::NotFound)
    }

    async fn verify_session_token(
        &self,
        token: Ulid,
    ) -> Result<SessionIdentity, SessionStoreError> {
        self.sessions
            .read()
            .expect("sessions lock poisoned")
            .get(&token)
            .cloned()
            .ok_or(SessionStoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn sample_ulid(seed: u128) -> Ulid {
        Ulid::from(seed)
    }

    #[tokio::test]
    async fn verify_ugi_returns_seeded_identity() {
        let store = InMemorySessionStore::new();
        let ugi = sample_ulid(1);
        store.seed_game(
            ugi,
            GameIdentity {
                game_name: "G".into(),
                developer_name: "D".into(),
            },
        );

        let identity = store.verify_ugi(ugi).await.unwrap();
        assert_eq!(identity.game_name, "G");
        assert_eq!(identity.developer_name, "D");
    }

    #[tokio::test]
    async fn verify_ugi_not_found() {
        let store = InMemorySessionStore::new();
        let err = store.verify_ugi(sample_ulid(2)).await.unwrap_err();
        assert!(matches!(err, SessionStoreError::NotFound));
    }

    #[tokio::test]
    async fn verify_session_token_returns_seeded_identity() {
        let store = InMemorySessionStore::new();
        let token = sample_ulid(3);
        let ulid = sample_ulid(4);
        store.seed_session(
            token,
            SessionIdentity {
                username: "alice".into(),
                ulid,
                origin: "example.test".into(),
                expiry: Utc::now() + Duration::hours(1),
            },
        );

        let identity = store.verify_session_token(token).await.unwrap();
        assert_eq!(identity.username, "alice");
        assert_eq!(identity.ulid, ulid);
    }
}
