use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use ulid::Ulid;

use super::client::{Client, Role};
use crate::protocol::Frame;

/// In-memory index of live clients. Backed by [`DashMap`] rather
/// than an outer `Mutex<HashMap>`: this registry's lock must never nest
/// with the Lobby registry's lock, and DashMap's per-shard locking
/// means `Add`/`Delete` never hold a single process-wide lock across a
/// lookup in another registry.
#[derive(Default)]
pub struct ClientRegistry {
    clients: DashMap<u64, Arc<Client>>,
    next_id: AtomicU64,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns the next monotonic id and inserts. Once this returns,
    /// concurrent callers can find the client via any scan below.
    pub fn add(
        &self,
        ugi: Ulid,
        game_name: String,
        developer_name: String,
        outbound: mpsc::Sender<Frame>,
    ) -> Arc<Client> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let client = Arc::new(Client::new(id, ugi, game_name, developer_name, outbound));
        self.clients.insert(id, client.clone());
        client
    }

    /// Removes by id. Once this returns, no caller sees the client again.
    pub fn delete(&self, id: u64) -> Option<Arc<Client>> {
        self.clients.remove(&id).map(|(_, client)| client)
    }

    pub fn find_by_ulid(&self, ulid: Ulid) -> Option<Arc<Client>> {
        self.clients
            .iter()
            .find(|entry| entry.value().ulid() == Some(ulid))
            .map(|entry| entry.value().clone())
    }

    /// Used to validate relay targets (MAKE_OFFER/MAKE_ANSWER/ICE): the
    /// recipient must share the sender's UGI and lobby.
    pub fn find_by_ulid_in_ugi_and_lobby(
        &self,
        ulid: Ulid,
        ugi: Ulid,
        lobby: &str,
    ) -> Option<Arc<Client>> {
        self.clients
            .iter()
            .find(|entry| {
                let c = entry.value();
                c.ugi == ugi && c.ulid() == Some(ulid) && c.lobby().as_deref() == Some(lobby)
            })
            .map(|entry| entry.value().clone())
    }

    pub fn peers_in_lobby(&self, ugi: Ulid, lobby: &str) -> Vec<Arc<Client>> {
        self.clients_with(|c| c.ugi == ugi && c.role() == Role::Peer && c.lobby().as_deref() == Some(lobby))
    }

    pub fn hosts_in_lobby(&self, ugi: Ulid, lobby: &str) -> Vec<Arc<Client>> {
        self.clients_with(|c| c.ugi == ugi && c.role() == Role::Host && c.lobby().as_deref() == Some(lobby))
    }

    /// For NEW_HOST broadcasting: every client in the UGI currently without
    /// a lobby (role=None).
    pub fn clients_without_lobby_in_ugi(&self, ugi: Ulid) -> Vec<Arc<Client>> {
        self.clients_with(|c| c.ugi == ugi && c.role() == Role::None)
    }

    fn clients_with(&self, predicate: impl Fn(&Client) -> bool) -> Vec<Arc<Client>> {
        self.clients
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.clients.len()
    }
}
