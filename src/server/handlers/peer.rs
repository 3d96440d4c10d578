use std::sync::Arc;

use super::{Outcome, CLOSE_POLICY_VIOLATION, CLOSE_UNSUPPORTED_DATA};
use crate::protocol::opcode::ReasonCode;
use crate::protocol::payloads::{ConfigPeerRequest, NewPeer};
use crate::protocol::validation::{validate_lobby_id, validate_password_len};
use crate::protocol::{Frame, Opcode};
use crate::security::password::verify_password;
use crate::server::client::{Client, Role};
use crate::server::SignalingCore;

/// CONFIG_PEER (5): joins an existing lobby by name and password.
pub async fn handle_config_peer(core: &SignalingCore, client: &Arc<Client>, frame: Frame) -> Outcome {
    if !client.valid_session() {
        client
            .send(Frame::protocol_error(ReasonCode::ConfigRequired, "INIT required"))
            .await;
        return Outcome::Continue;
    }
    if client.role() != Role::None {
        client
            .send(Frame::protocol_error(ReasonCode::AlreadyHost, "already in a lobby"))
            .await;
        return Outcome::Continue;
    }

    let req: ConfigPeerRequest = match frame.payload_as() {
        Ok(Some(req)) => req,
        _ => {
            core.metrics.record_violation();
            client.send(Frame::violation("CONFIG_PEER payload malformed")).await;
            return Outcome::Close {
                code: CLOSE_UNSUPPORTED_DATA,
                reason: "bad CONFIG_PEER payload".into(),
            };
        }
    };

    if !validate_lobby_id(&req.lobby_id) || !validate_password_len(&req.password) {
        client
            .send(Frame::protocol_error(ReasonCode::BadPayload, "invalid CONFIG_PEER fields"))
            .await;
        return Outcome::Continue;
    }

    let Some(lobby_handle) = core.lobbies.get_lobby(client.ugi, &req.lobby_id) else {
        client.send(Frame::new(Opcode::LobbyNotfound)).await;
        return Outcome::Continue;
    };

    // Snapshot the fields we need, then release the lock before the
    // (potentially slow) password verification and before any write.
    let (locked, full, password_hash, host) = {
        let lobby = lobby_handle.read().await;
        (lobby.is_full(), lobby.locked, lobby.password_hash.clone(), lobby.host.clone())
    };
    if locked {
        client.send(Frame::new(Opcode::LobbyLocked)).await;
        return Outcome::Continue;
    }
    if full {
        client.send(Frame::new(Opcode::LobbyFull)).await;
        return Outcome::Continue;
    }

    let candidate = req.password.clone();
    let verified = match tokio::task::spawn_blocking(move || verify_password(&password_hash, &candidate))
        .await
    {
        Ok(Ok(ok)) => ok,
        _ => {
            core.metrics.record_violation();
            client.send(Frame::violation("failed to verify lobby password")).await;
            return Outcome::Close {
                code: CLOSE_POLICY_VIOLATION,
                reason: "password verification failed".into(),
            };
        }
    };
    if !verified {
        client.send(Frame::new(Opcode::PasswordFail)).await;
        return Outcome::Continue;
    }

    {
        let mut lobby = lobby_handle.write().await;
        // Re-check capacity under the write lock: another peer may have
        // joined between the read snapshot above and this commit.
        if lobby.is_full() {
            drop(lobby);
            client.send(Frame::new(Opcode::LobbyFull)).await;
            return Outcome::Continue;
        }
        lobby.peers.push(client.clone());
    }
    client.set_role(Role::Peer, Some(req.lobby_id.clone()));
    client.send(Frame::new(Opcode::AckPeer)).await;

    if let Some(host) = host {
        host.send(Frame::with_payload(
            Opcode::NewPeer,
            NewPeer {
                id: client.ulid().map(|u| u.to_string()).unwrap_or_default(),
                username: client.snapshot().username,
            },
        ))
        .await;
    }

    Outcome::Continue
}
