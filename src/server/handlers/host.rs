use std::sync::Arc;

use super::{Outcome, CLOSE_POLICY_VIOLATION, CLOSE_UNSUPPORTED_DATA};
use crate::protocol::opcode::ReasonCode;
use crate::protocol::payloads::{ConfigHostRequest, NewHost};
use crate::protocol::validation::validate_config_host;
use crate::protocol::{Frame, Opcode};
use crate::security::password::hash_password_with_params;
use crate::server::client::{Client, Role};
use crate::server::lobby::Lobby;
use crate::server::lobby_registry::LobbyError;
use crate::server::SignalingCore;

/// CONFIG_HOST (4): claims a lobby name and becomes its host.
pub async fn handle_config_host(core: &SignalingCore, client: &Arc<Client>, frame: Frame) -> Outcome {
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

    let req: ConfigHostRequest = match frame.payload_as() {
        Ok(Some(req)) => req,
        _ => {
            core.metrics.record_violation();
            client.send(Frame::violation("CONFIG_HOST payload malformed")).await;
            return Outcome::Close {
                code: CLOSE_UNSUPPORTED_DATA,
                reason: "bad CONFIG_HOST payload".into(),
            };
        }
    };

    if let Err(e) = validate_config_host(&req) {
        client
            .send(Frame::protocol_error(ReasonCode::BadPayload, e.to_string()))
            .await;
        return Outcome::Continue;
    }

    if !core.clients.hosts_in_lobby(client.ugi, &req.lobby_id).is_empty() {
        client.send(Frame::new(Opcode::LobbyExists)).await;
        return Outcome::Continue;
    }

    let password_hash = match tokio::task::spawn_blocking({
        let password = req.password.clone();
        let params = core.scrypt_params;
        move || hash_password_with_params(&password, params)
    })
    .await
    {
        Ok(Ok(hash)) => hash,
        _ => {
            core.metrics.record_violation();
            client.send(Frame::violation("failed to hash lobby password")).await;
            return Outcome::Close {
                code: CLOSE_POLICY_VIOLATION,
                reason: "password hashing failed".into(),
            };
        }
    };

    let lobby = Lobby::new(
        req.lobby_id.clone(),
        client.ugi,
        client.clone(),
        req.max_peers,
        password_hash,
        !req.password.is_empty(),
        req.allow_host_reclaim,
        req.allow_peers_to_claim_host,
    );

    match core.lobbies.create_lobby(client.ugi, &req.lobby_id, lobby) {
        Ok(_) => {}
        Err(LobbyError::AlreadyExists) => {
            client.send(Frame::new(Opcode::LobbyExists)).await;
            return Outcome::Continue;
        }
    }
    core.metrics.record_lobby_created();

    client.set_role(Role::Host, Some(req.lobby_id.clone()));
    client.send(Frame::new(Opcode::AckHost)).await;

    let targets = core.clients.clients_without_lobby_in_ugi(client.ugi);
    let new_host = NewHost {
        id: client.ulid().map(|u| u.to_string()).unwrap_or_default(),
        username: client.snapshot().username,
        lobby_id: req.lobby_id,
        max_peers: req.max_peers,
        password_required: !req.password.is_empty(),
    };
    for target in targets {
        target
            .send(Frame::with_payload(Opcode::NewHost, new_host.clone()))
            .await;
    }

    Outcome::Continue
}
