use std::sync::Arc;

use ulid::Ulid;

use super::client::Client;

/// One active game rendezvous. Owned by the
/// [`super::lobby_registry::LobbyRegistry`]; holds non-owning references
/// (`Arc<Client>`) to its host and peers.
pub struct Lobby {
    pub name: String,
    pub ugi: Ulid,
    pub host: Option<Arc<Client>>,
    /// FIFO order, used as the reclaim tie-break.
    pub peers: Vec<Arc<Client>>,
    /// 0 means unlimited, else 1-100.
    pub max_peers: u32,
    /// scrypt hash; empty-password lobbies still carry a real hash of the
    /// empty string.
    pub password_hash: String,
    /// Whether the host's original CONFIG_HOST password was non-empty.
    /// Carried separately from `password_hash` since the plaintext itself
    /// is never kept — needed to fill NEW_HOST's `password_required` field
    /// when replaying existing lobbies to a client that INITs after the
    /// lobby was created.
    pub password_required: bool,
    pub allow_host_reclaim: bool,
    pub allow_peers_to_claim_host: bool,
    pub locked: bool,
}

impl Lobby {
    pub fn new(
        name: String,
        ugi: Ulid,
        host: Arc<Client>,
        max_peers: u32,
        password_hash: String,
        password_required: bool,
        allow_host_reclaim: bool,
        allow_peers_to_claim_host: bool,
    ) -> Self {
        Self {
            name,
            ugi,
            host: Some(host),
            peers: Vec::new(),
            max_peers,
            password_hash,
            password_required,
            allow_host_reclaim,
            allow_peers_to_claim_host,
            locked: false,
        }
    }

    pub fn is_full(&self) -> bool {
        self.max_peers != 0 && self.peers.len() as u32 >= self.max_peers
    }

    pub fn is_empty(&self) -> bool {
        self.host.is_none() && self.peers.is_empty()
    }
}
