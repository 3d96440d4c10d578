use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use ulid::Ulid;

use crate::protocol::Frame;

/// A Client's lobby membership. A Client is in at most one lobby
/// at a time and never transitions Host↔Peer without passing through
/// `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    None,
    Host,
    Peer,
}

/// The mutable identity/role fields guarded by `stateLock`.
struct ClientState {
    ulid: Option<Ulid>,
    username: String,
    expiry: Option<DateTime<Utc>>,
    origin: String,
    role: Role,
    lobby: Option<String>,
}

/// A cheap, consistent snapshot of a Client's identity/role fields, taken
/// under `stateLock` and then released — used to build broadcast frames
/// without holding the lock across a write.
#[derive(Debug, Clone)]
pub struct ClientSnapshot {
    pub ulid: Option<Ulid>,
    pub username: String,
    pub role: Role,
    pub lobby: Option<String>,
}

/// One live signaling session. `id` is a monotonic per-process
/// integer assigned by the [`super::client_registry::ClientRegistry`];
/// `ugi`/`game_name`/`developer_name` are fixed at upgrade.
pub struct Client {
    pub id: u64,
    pub ugi: Ulid,
    pub game_name: String,
    pub developer_name: String,
    /// Monotonic: false until INIT succeeds, never flips back.
    valid_session: AtomicBool,
    state: Mutex<ClientState>,
    /// The connection's `writeLock`, realized as the sole-owner sending
    /// half of an mpsc channel: only the connection's own send task ever
    /// touches the websocket, so cross-task sends (broadcasts, relays,
    /// cleanup notifications) just enqueue here and can never interleave
    /// or tear a write.
    outbound: mpsc::Sender<Frame>,
}

impl Client {
    pub fn new(
        id: u64,
        ugi: Ulid,
        game_name: String,
        developer_name: String,
        outbound: mpsc::Sender<Frame>,
    ) -> Self {
        Self {
            id,
            ugi,
            game_name,
            developer_name,
            valid_session: AtomicBool::new(false),
            state: Mutex::new(ClientState {
                ulid: None,
                username: String::new(),
                expiry: None,
                origin: String::new(),
                role: Role::None,
                lobby: None,
            }),
            outbound,
        }
    }

    pub fn valid_session(&self) -> bool {
        self.valid_session.load(Ordering::Acquire)
    }

    /// Commits the INIT result under `stateLock`. Never clears
    /// `valid_session` once set.
    pub fn complete_init(&self, ulid: Ulid, username: String, expiry: DateTime<Utc>, origin: String) {
        let mut state = self.state.lock().expect("client state lock poisoned");
        state.ulid = Some(ulid);
        state.username = username;
        state.expiry = Some(expiry);
        state.origin = origin;
        self.valid_session.store(true, Ordering::Release);
    }

    pub fn snapshot(&self) -> ClientSnapshot {
        let state = self.state.lock().expect("client state lock poisoned");
        ClientSnapshot {
            ulid: state.ulid,
            username: state.username.clone(),
            role: state.role,
            lobby: state.lobby.clone(),
        }
    }

    pub fn ulid(&self) -> Option<Ulid> {
        self.state.lock().expect("client state lock poisoned").ulid
    }

    pub fn role(&self) -> Role {
        self.state.lock().expect("client state lock poisoned").role
    }

    pub fn lobby(&self) -> Option<String> {
        self.state.lock().expect("client state lock poisoned").lobby.clone()
    }

    /// Commits a Host/Peer/None role transition under `stateLock`.
    pub fn set_role(&self, role: Role, lobby: Option<String>) {
        let mut state = self.state.lock().expect("client state lock poisoned");
        state.role = role;
        state.lobby = lobby;
    }

    /// Enqueue a frame for this client. Never blocks the caller on the
    /// target's own read loop: it only waits for channel capacity, which is
    /// how broadcasts and relays stay best-effort and non-deadlocking
    /// A full/closed channel means the connection is going away;
    /// callers treat that as a best-effort failure, never a panic.
    pub async fn send(&self, frame: Frame) {
        let _ = self.outbound.send(frame).await;
    }
}
