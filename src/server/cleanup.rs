use std::sync::Arc;

use crate::protocol::payloads::{HostReclaim, LobbyIdPayload};
use crate::protocol::{Frame, Opcode};
use crate::server::client::{Client, Role};
use crate::server::SignalingCore;

/// Runs the disconnect/cleanup protocol for `client`. Must be
/// called exactly once, after the connection's read loop has exited.
///
/// Lock ordering: the lobby-registry lock is acquired, at most one
/// client `stateLock` is touched at a time, and it is always released
/// before any websocket write.
pub async fn run(core: &SignalingCore, client: &Arc<Client>) {
    match client.role() {
        Role::Host => cleanup_host(core, client).await,
        Role::Peer => cleanup_peer(core, client).await,
        Role::None => {}
    }
    core.clients.delete(client.id);
    core.metrics.record_connection_closed();
}

enum HostAction {
    NotifySelfElect(Vec<Arc<Client>>),
    DeleteEmpty,
    Promote { promoted: Arc<Client>, remaining: Vec<Arc<Client>> },
    CloseLobby(Vec<Arc<Client>>),
}

async fn cleanup_host(core: &SignalingCore, client: &Arc<Client>) {
    let Some(lobby_name) = client.lobby() else {
        return;
    };
    let Some(handle) = core.lobbies.get_lobby(client.ugi, &lobby_name) else {
        return;
    };

    let action = {
        let mut lobby = handle.write().await;
        if lobby.allow_host_reclaim && lobby.allow_peers_to_claim_host {
            lobby.host = None;
            HostAction::NotifySelfElect(lobby.peers.clone())
        } else if lobby.allow_host_reclaim {
            if lobby.peers.is_empty() {
                HostAction::DeleteEmpty
            } else {
                let promoted = lobby.peers.remove(0);
                lobby.host = Some(promoted.clone());
                HostAction::Promote {
                    promoted,
                    remaining: lobby.peers.clone(),
                }
            }
        } else {
            let peers = std::mem::take(&mut lobby.peers);
            lobby.host = None;
            HostAction::CloseLobby(peers)
        }
    };

    match action {
        HostAction::NotifySelfElect(peers) => {
            for peer in peers {
                peer.send(Frame::with_payload(
                    Opcode::HostGone,
                    LobbyIdPayload {
                        lobby_id: lobby_name.clone(),
                    },
                ))
                .await;
            }
        }
        HostAction::DeleteEmpty => {
            core.lobbies.delete_lobby(client.ugi, &lobby_name);
            core.metrics.record_lobby_closed();
        }
        HostAction::Promote { promoted, remaining } => {
            promoted.set_role(Role::Host, Some(lobby_name.clone()));
            let payload = HostReclaim {
                id: promoted.ulid().map(|u| u.to_string()).unwrap_or_default(),
                username: promoted.snapshot().username,
                lobby_id: lobby_name.clone(),
            };
            promoted
                .send(Frame::with_payload(Opcode::HostReclaim, payload.clone()))
                .await;
            for peer in remaining {
                peer.send(Frame::with_payload(Opcode::HostReclaim, payload.clone()))
                    .await;
            }
        }
        HostAction::CloseLobby(peers) => {
            for peer in &peers {
                peer.set_role(Role::None, None);
                peer.send(Frame::with_payload(
                    Opcode::LobbyClose,
                    LobbyIdPayload {
                        lobby_id: lobby_name.clone(),
                    },
                ))
                .await;
            }
            core.lobbies.delete_lobby(client.ugi, &lobby_name);
            core.metrics.record_lobby_closed();
        }
    }
}

async fn cleanup_peer(core: &SignalingCore, client: &Arc<Client>) {
    let Some(lobby_name) = client.lobby() else {
        return;
    };
    let Some(handle) = core.lobbies.get_lobby(client.ugi, &lobby_name) else {
        return;
    };

    let host = {
        let mut lobby = handle.write().await;
        lobby.peers.retain(|peer| peer.id != client.id);
        lobby.host.clone()
    };

    if let Some(host) = host {
        let ulid = client.ulid().map(|u| u.to_string()).unwrap_or_default();
        host.send(Frame::with_payload(Opcode::PeerGone, ulid)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::lobby::Lobby;
    use std::sync::Arc as StdArc;
    use tokio::sync::mpsc;
    use ulid::Ulid;

    fn new_client(core: &SignalingCore, ugi: Ulid) -> (StdArc<Client>, mpsc::Receiver<Frame>) {
        let (tx, rx) = mpsc::channel(16);
        let client = core.clients.add(ugi, "G".into(), "D".into(), tx);
        (client, rx)
    }

    async fn init(client: &Client) {
        client.complete_init(Ulid::new(), "user".into(), chrono::Utc::now() + chrono::Duration::hours(1), "h".into());
    }

    #[tokio::test]
    async fn peer_disconnect_notifies_host_and_removes_from_lobby() {
        let core = SignalingCore::new(StdArc::new(crate::session_store::InMemorySessionStore::new()));
        let ugi = Ulid::new();
        let (host, mut host_rx) = new_client(&core, ugi);
        init(&host).await;
        let (peer, _peer_rx) = new_client(&core, ugi);
        init(&peer).await;

        let lobby = Lobby::new("L1".into(), ugi, host.clone(), 0, "hash".into(), false, true, false);
        core.lobbies.create_lobby(ugi, "L1", lobby).unwrap();
        core.lobbies
            .get_lobby(ugi, "L1")
            .unwrap()
            .write()
            .await
            .peers
            .push(peer.clone());
        host.set_role(Role::Host, Some("L1".into()));
        peer.set_role(Role::Peer, Some("L1".into()));

        run(&core, &peer).await;

        let lobby_handle = core.lobbies.get_lobby(ugi, "L1").unwrap();
        assert!(lobby_handle.read().await.peers.is_empty());
        let frame = host_rx.try_recv().unwrap();
        assert_eq!(frame.opcode, Opcode::PeerGone);
    }

    #[tokio::test]
    async fn host_disconnect_without_reclaim_closes_lobby_and_resets_peers() {
        let core = SignalingCore::new(StdArc::new(crate::session_store::InMemorySessionStore::new()));
        let ugi = Ulid::new();
        let (host, _host_rx) = new_client(&core, ugi);
        init(&host).await;
        let (peer, mut peer_rx) = new_client(&core, ugi);
        init(&peer).await;

        let lobby = Lobby::new("L1".into(), ugi, host.clone(), 0, "hash".into(), false, false, false);
        core.lobbies.create_lobby(ugi, "L1", lobby).unwrap();
        core.lobbies
            .get_lobby(ugi, "L1")
            .unwrap()
            .write()
            .await
            .peers
            .push(peer.clone());
        host.set_role(Role::Host, Some("L1".into()));
        peer.set_role(Role::Peer, Some("L1".into()));

        run(&core, &host).await;

        assert!(core.lobbies.get_lobby(ugi, "L1").is_none());
        assert_eq!(peer.role(), Role::None);
        let frame = peer_rx.try_recv().unwrap();
        assert_eq!(frame.opcode, Opcode::LobbyClose);
    }

    #[tokio::test]
    async fn host_disconnect_with_reclaim_promotes_fifo_peer() {
        let core = SignalingCore::new(StdArc::new(crate::session_store::InMemorySessionStore::new()));
        let ugi = Ulid::new();
        let (host, _host_rx) = new_client(&core, ugi);
        init(&host).await;
        let (b, mut b_rx) = new_client(&core, ugi);
        init(&b).await;
        let (c, mut c_rx) = new_client(&core, ugi);
        init(&c).await;

        let lobby = Lobby::new("L1".into(), ugi, host.clone(), 0, "hash".into(), false, true, false);
        core.lobbies.create_lobby(ugi, "L1", lobby).unwrap();
        {
            let handle = core.lobbies.get_lobby(ugi, "L1").unwrap();
            let mut l = handle.write().await;
            l.peers.push(b.clone());
            l.peers.push(c.clone());
        }
        host.set_role(Role::Host, Some("L1".into()));
        b.set_role(Role::Peer, Some("L1".into()));
        c.set_role(Role::Peer, Some("L1".into()));

        run(&core, &host).await;

        assert_eq!(b.role(), Role::Host);
        let b_frame = b_rx.try_recv().unwrap();
        assert_eq!(b_frame.opcode, Opcode::HostReclaim);
        let c_frame = c_rx.try_recv().unwrap();
        assert_eq!(c_frame.opcode, Opcode::HostReclaim);

        let handle = core.lobbies.get_lobby(ugi, "L1").unwrap();
        let l = handle.read().await;
        assert_eq!(l.peers.len(), 1);
        assert_eq!(l.peers[0].id, c.id);
    }
}
