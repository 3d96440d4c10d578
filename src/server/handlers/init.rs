use std::sync::Arc;

use super::{Outcome, CLOSE_POLICY_VIOLATION, CLOSE_UNSUPPORTED_DATA};
use crate::protocol::opcode::ReasonCode;
use crate::protocol::payloads::{InitOk, NewHost};
use crate::protocol::validation::parse_ulid;
use crate::protocol::{Frame, Opcode};
use crate::server::client::Client;
use crate::server::SignalingCore;
use crate::session_store::SessionStoreError;

/// INIT (2): verifies the session token and commits identity onto the client.
pub async fn handle(
    core: &SignalingCore,
    client: &Arc<Client>,
    frame: Frame,
    request_origin: &str,
) -> Outcome {
    if client.valid_session() {
        client
            .send(Frame::protocol_error(
                ReasonCode::SessionExists,
                "session already initialized",
            ))
            .await;
        return Outcome::Continue;
    }

    let Some(token_str) = frame.payload.as_ref().and_then(|v| v.as_str()) else {
        return framing_violation(core, client, "INIT payload must be a ULID string").await;
    };
    let Some(token) = parse_ulid(token_str) else {
        return framing_violation(core, client, "INIT payload is not a valid ULID").await;
    };

    let identity = match core.session_store.verify_session_token(token).await {
        Ok(identity) => identity,
        Err(SessionStoreError::NotFound) => {
            return auth_violation(core, client, "unknown session token").await;
        }
        Err(SessionStoreError::Store(msg)) => {
            return auth_violation(core, client, format!("session store error: {msg}")).await;
        }
    };

    if core.clients.find_by_ulid(identity.ulid).is_some() {
        client
            .send(Frame::protocol_error(
                ReasonCode::SessionExists,
                "this session is already connected",
            ))
            .await;
        return Outcome::Continue;
    }

    if identity.origin != request_origin {
        return auth_violation(core, client, "token origin does not match request host").await;
    }

    if identity.expiry <= chrono::Utc::now() {
        return auth_violation(core, client, "session token has expired").await;
    }

    client.complete_init(identity.ulid, identity.username.clone(), identity.expiry, identity.origin);

    client
        .send(Frame::with_payload(
            Opcode::InitOk,
            InitOk {
                id: identity.ulid.to_string(),
                username: identity.username,
                game: client.game_name.clone(),
                developer: client.developer_name.clone(),
            },
        ))
        .await;

    // Replay NEW_HOST for every lobby already open in this UGI: a client
    // that INITs after CONFIG_HOST ran missed that one-shot broadcast.
    // Snapshot each lobby's fields under its read guard, then drop the
    // guard before sending, so a slow/full outbound channel never blocks
    // other writers to that lobby.
    let mut replays = Vec::new();
    for lobby_handle in core.lobbies.list_lobbies(client.ugi) {
        let lobby = lobby_handle.read().await;
        let Some(host) = &lobby.host else { continue };
        replays.push(NewHost {
            id: host.ulid().map(|u| u.to_string()).unwrap_or_default(),
            username: host.snapshot().username,
            lobby_id: lobby.name.clone(),
            max_peers: lobby.max_peers,
            password_required: lobby.password_required,
        });
    }
    for new_host in replays {
        client.send(Frame::with_payload(Opcode::NewHost, new_host)).await;
    }

    Outcome::Continue
}

/// Malformed/undecodable INIT payload: a framing error, closed 1003.
async fn framing_violation(core: &SignalingCore, client: &Arc<Client>, reason: impl Into<String>) -> Outcome {
    core.metrics.record_violation();
    client.send(Frame::violation(reason)).await;
    Outcome::Close {
        code: CLOSE_UNSUPPORTED_DATA,
        reason: "INIT framing error".into(),
    }
}

/// Token rejected, expired, store failure, or origin mismatch: an
/// authentication error, closed 1008.
async fn auth_violation(core: &SignalingCore, client: &Arc<Client>, reason: impl Into<String>) -> Outcome {
    core.metrics.record_violation();
    client.send(Frame::violation(reason)).await;
    Outcome::Close {
        code: CLOSE_POLICY_VIOLATION,
        reason: "INIT authentication failed".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::client::Role;
    use crate::server::lobby::Lobby;
    use crate::session_store::{InMemorySessionStore, SessionIdentity};
    use tokio::sync::mpsc;
    use ulid::Ulid;

    const ORIGIN: &str = "http://example.test";

    fn core_with_session(token: Ulid, user_ulid: Ulid) -> SignalingCore {
        let store = InMemorySessionStore::new();
        store.seed_session(
            token,
            SessionIdentity {
                username: "alice".into(),
                ulid: user_ulid,
                origin: ORIGIN.into(),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            },
        );
        SignalingCore::new(Arc::new(store))
    }

    fn new_client(core: &SignalingCore, ugi: Ulid) -> (Arc<Client>, mpsc::Receiver<Frame>) {
        let (tx, rx) = mpsc::channel(16);
        let client = core.clients.add(ugi, "G".into(), "D".into(), tx);
        (client, rx)
    }

    #[tokio::test]
    async fn successful_init_sends_init_ok() {
        let ugi = Ulid::new();
        let token = Ulid::from(1u128);
        let user = Ulid::from(2u128);
        let core = core_with_session(token, user);
        let (client, mut rx) = new_client(&core, ugi);

        let outcome = handle(&core, &client, Frame::with_payload(Opcode::Init, token.to_string()), ORIGIN).await;

        assert!(matches!(outcome, Outcome::Continue));
        let frame = rx.try_recv().unwrap();
        assert_eq!(frame.opcode, Opcode::InitOk);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn init_replays_new_host_for_each_open_lobby() {
        let ugi = Ulid::new();
        let token = Ulid::from(10u128);
        let user = Ulid::from(11u128);
        let core = core_with_session(token, user);

        let (host, _host_rx) = new_client(&core, ugi);
        host.complete_init(Ulid::new(), "host-user".into(), chrono::Utc::now() + chrono::Duration::hours(1), ORIGIN.into());
        let lobby = Lobby::new("L1".into(), ugi, host.clone(), 4, "hash".into(), true, true, false);
        core.lobbies.create_lobby(ugi, "L1", lobby).unwrap();
        host.set_role(Role::Host, Some("L1".into()));

        let (client, mut rx) = new_client(&core, ugi);
        let outcome = handle(&core, &client, Frame::with_payload(Opcode::Init, token.to_string()), ORIGIN).await;

        assert!(matches!(outcome, Outcome::Continue));
        let init_ok = rx.try_recv().unwrap();
        assert_eq!(init_ok.opcode, Opcode::InitOk);
        let new_host = rx.try_recv().unwrap();
        assert_eq!(new_host.opcode, Opcode::NewHost);
        let payload = new_host.payload.unwrap();
        assert_eq!(payload["lobby_id"], "L1");
        assert_eq!(payload["max_peers"], 4);
        assert_eq!(payload["password_required"], true);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn unknown_token_closes_with_policy_violation() {
        let ugi = Ulid::new();
        let core = SignalingCore::new(Arc::new(InMemorySessionStore::new()));
        let (client, mut rx) = new_client(&core, ugi);

        let bogus_token = Ulid::new();
        let outcome = handle(&core, &client, Frame::with_payload(Opcode::Init, bogus_token.to_string()), ORIGIN).await;

        match outcome {
            Outcome::Close { code, .. } => assert_eq!(code, CLOSE_POLICY_VIOLATION),
            other => panic!("expected Close, got {other:?}"),
        }
        let frame = rx.try_recv().unwrap();
        assert_eq!(frame.opcode, Opcode::Violation);
    }

    #[tokio::test]
    async fn mismatched_origin_closes_with_policy_violation() {
        let ugi = Ulid::new();
        let token = Ulid::from(20u128);
        let user = Ulid::from(21u128);
        let core = core_with_session(token, user);
        let (client, _rx) = new_client(&core, ugi);

        let outcome = handle(
            &core,
            &client,
            Frame::with_payload(Opcode::Init, token.to_string()),
            "http://evil.test",
        )
        .await;

        match outcome {
            Outcome::Close { code, .. } => assert_eq!(code, CLOSE_POLICY_VIOLATION),
            other => panic!("expected Close, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_payload_closes_with_unsupported_data() {
        let ugi = Ulid::new();
        let core = SignalingCore::new(Arc::new(InMemorySessionStore::new()));
        let (client, _rx) = new_client(&core, ugi);

        let outcome = handle(&core, &client, Frame::with_payload(Opcode::Init, "not-a-ulid"), ORIGIN).await;

        match outcome {
            Outcome::Close { code, .. } => assert_eq!(code, CLOSE_UNSUPPORTED_DATA),
            other => panic!("expected Close, got {other:?}"),
        }
    }
}
