use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use ulid::Ulid;

use super::lobby::Lobby;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LobbyError {
    #[error("lobby already exists")]
    AlreadyExists,
}

/// Nested map UGI → lobby-name → Lobby. A Lobby's mutable
/// fields (`host`, `peers`, `locked`) are guarded by the `RwLock` wrapping
/// each record; this registry's own lock (the outer `DashMap`) never nests
/// with [`super::client_registry::ClientRegistry`]'s lock.
#[derive(Default)]
pub struct LobbyRegistry {
    ugis: DashMap<Ulid, DashMap<String, Arc<RwLock<Lobby>>>>,
}

impl LobbyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails if a lobby with this name already exists in the UGI.
    pub fn create_lobby(
        &self,
        ugi: Ulid,
        name: &str,
        lobby: Lobby,
    ) -> Result<Arc<RwLock<Lobby>>, LobbyError> {
        let lobbies = self.ugis.entry(ugi).or_default();
        if lobbies.contains_key(name) {
            return Err(LobbyError::AlreadyExists);
        }
        let handle = Arc::new(RwLock::new(lobby));
        lobbies.insert(name.to_string(), handle.clone());
        Ok(handle)
    }

    pub fn get_lobby(&self, ugi: Ulid, name: &str) -> Option<Arc<RwLock<Lobby>>> {
        self.ugis.get(&ugi)?.get(name).map(|entry| entry.value().clone())
    }

    /// All lobbies currently open in a UGI, used to replay NEW_HOST to a
    /// client that INITs after those lobbies were created.
    pub fn list_lobbies(&self, ugi: Ulid) -> Vec<Arc<RwLock<Lobby>>> {
        match self.ugis.get(&ugi) {
            Some(lobbies) => lobbies.iter().map(|entry| entry.value().clone()).collect(),
            None => Vec::new(),
        }
    }

    /// Removes the lobby and garbage-collects the UGI entry once it has no
    /// lobbies left.
    pub fn delete_lobby(&self, ugi: Ulid, name: &str) {
        let Some(lobbies) = self.ugis.get(&ugi) else {
            return;
        };
        lobbies.remove(name);
        let is_empty = lobbies.is_empty();
        drop(lobbies);
        if is_empty {
            self.ugis.remove(&ugi);
        }
    }

    #[cfg(test)]
    pub fn ugi_count(&self) -> usize {
        self.ugis.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::client::Client;
    use tokio::sync::mpsc;

    fn host_client(ugi: Ulid) -> Arc<Client> {
        let (tx, _rx) = mpsc::channel(8);
        Arc::new(Client::new(1, ugi, "G".into(), "D".into(), tx))
    }

    #[test]
    fn create_lobby_fails_when_already_present() {
        let registry = LobbyRegistry::new();
        let ugi = Ulid::new();
        let host = host_client(ugi);
        let lobby = Lobby::new("L1".into(), ugi, host.clone(), 4, "hash".into(), false, true, false);
        registry.create_lobby(ugi, "L1", lobby).unwrap();

        let dup = Lobby::new("L1".into(), ugi, host, 4, "hash".into(), false, true, false);
        assert_eq!(
            registry.create_lobby(ugi, "L1", dup).unwrap_err(),
            LobbyError::AlreadyExists
        );
    }

    #[test]
    fn delete_lobby_garbage_collects_empty_ugi_entry() {
        let registry = LobbyRegistry::new();
        let ugi = Ulid::new();
        let host = host_client(ugi);
        let lobby = Lobby::new("L1".into(), ugi, host, 4, "hash".into(), false, true, false);
        registry.create_lobby(ugi, "L1", lobby).unwrap();
        assert_eq!(registry.ugi_count(), 1);

        registry.delete_lobby(ugi, "L1");
        assert_eq!(registry.ugi_count(), 0);
        assert!(registry.get_lobby(ugi, "L1").is_none());
    }

    #[test]
    fn delete_lobby_keeps_ugi_entry_when_siblings_remain() {
        let registry = LobbyRegistry::new();
        let ugi = Ulid::new();
        let host = host_client(ugi);
        registry
            .create_lobby(ugi, "L1", Lobby::new("L1".into(), ugi, host.clone(), 4, "h".into(), false, true, false))
            .unwrap();
        registry
            .create_lobby(ugi, "L2", Lobby::new("L2".into(), ugi, host, 4, "h".into(), false, true, false))
            .unwrap();

        registry.delete_lobby(ugi, "L1");
        assert_eq!(registry.ugi_count(), 1);
        assert!(registry.get_lobby(ugi, "L2").is_some());
    }
}
