use std::sync::Arc;

use super::{Outcome, CLOSE_UNSUPPORTED_DATA};
use crate::protocol::opcode::ReasonCode;
use crate::protocol::validation::parse_ulid;
use crate::protocol::{Frame, Opcode};
use crate::server::client::{Client, Role};
use crate::server::SignalingCore;

/// MAKE_OFFER (10) / MAKE_ANSWER (11) / ICE (12): relay opcodes.
/// The server never inspects the opaque payload; it only routes it.
pub async fn handle_relay(core: &SignalingCore, client: &Arc<Client>, frame: Frame) -> Outcome {
    if !client.valid_session() {
        client
            .send(Frame::protocol_error(ReasonCode::ConfigRequired, "INIT required"))
            .await;
        return Outcome::Continue;
    }

    let role = client.role();
    let required_role_ok = match frame.opcode {
        Opcode::MakeOffer => role == Role::Host,
        Opcode::MakeAnswer => role == Role::Peer,
        Opcode::Ice => role != Role::None,
        _ => unreachable!("dispatch only routes relay opcodes here"),
    };
    if !required_role_ok {
        let (code, message) = match frame.opcode {
            Opcode::MakeOffer => (ReasonCode::NotHost, "MAKE_OFFER requires role=Host"),
            Opcode::MakeAnswer => (ReasonCode::NotPeer, "MAKE_ANSWER requires role=Peer"),
            _ => (ReasonCode::NotHost, "ICE requires an active lobby role"),
        };
        client.send(Frame::protocol_error(code, message)).await;
        return Outcome::Continue;
    }

    let Some(rx_raw) = frame.rx.as_deref() else {
        core.metrics.record_violation();
        client.send(Frame::violation("relay frame missing rx")).await;
        return Outcome::Close {
            code: CLOSE_UNSUPPORTED_DATA,
            reason: "missing rx".into(),
        };
    };
    let Some(rx) = parse_ulid(rx_raw) else {
        core.metrics.record_violation();
        client.send(Frame::violation("rx is not a valid ULID")).await;
        return Outcome::Close {
            code: CLOSE_UNSUPPORTED_DATA,
            reason: "malformed rx".into(),
        };
    };

    let Some(lobby) = client.lobby() else {
        client.send(Frame::new(Opcode::PeerInvalid)).await;
        return Outcome::Continue;
    };

    let Some(recipient) = core.clients.find_by_ulid_in_ugi_and_lobby(rx, client.ugi, &lobby) else {
        client.send(Frame::new(Opcode::PeerInvalid)).await;
        return Outcome::Continue;
    };

    let sender_ulid = client.ulid().map(|u| u.to_string()).unwrap_or_default();
    recipient
        .send(Frame {
            opcode: frame.opcode,
            payload: frame.payload.clone(),
            tx: Some(sender_ulid),
            rx: None,
        })
        .await;
    core.metrics.record_frame_relayed();

    // Echo the opcode back to the sender as a relay acknowledgement.
    client.send(Frame::new(frame.opcode)).await;

    Outcome::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::lobby::Lobby;
    use crate::session_store::InMemorySessionStore;
    use serde_json::json;
    use tokio::sync::mpsc;
    use ulid::Ulid;

    fn new_client(core: &SignalingCore, ugi: Ulid) -> (Arc<Client>, mpsc::Receiver<Frame>) {
        let (tx, rx) = mpsc::channel(16);
        let client = core.clients.add(ugi, "G".into(), "D".into(), tx);
        client.complete_init(Ulid::new(), "user".into(), chrono::Utc::now() + chrono::Duration::hours(1), "h".into());
        (client, rx)
    }

    async fn seated_host_and_peer(core: &SignalingCore, ugi: Ulid) -> (Arc<Client>, mpsc::Receiver<Frame>, Arc<Client>, mpsc::Receiver<Frame>) {
        let (host, host_rx) = new_client(core, ugi);
        let lobby = Lobby::new("L1".into(), ugi, host.clone(), 4, "hash".into(), false, true, false);
        core.lobbies.create_lobby(ugi, "L1", lobby).unwrap();
        host.set_role(Role::Host, Some("L1".into()));

        let (peer, peer_rx) = new_client(core, ugi);
        core.lobbies
            .get_lobby(ugi, "L1")
            .unwrap()
            .write()
            .await
            .peers
            .push(peer.clone());
        peer.set_role(Role::Peer, Some("L1".into()));

        (host, host_rx, peer, peer_rx)
    }

    #[tokio::test]
    async fn make_offer_from_non_host_is_rejected() {
        let core = SignalingCore::new(Arc::new(InMemorySessionStore::new()));
        let ugi = Ulid::new();
        let (_host, _host_rx, peer, mut peer_rx) = seated_host_and_peer(&core, ugi).await;

        let frame = Frame {
            opcode: Opcode::MakeOffer,
            payload: Some(json!({"sdp": "x"})),
            tx: None,
            rx: Some(Ulid::new().to_string()),
        };
        handle_relay(&core, &peer, frame).await;

        let result = peer_rx.try_recv().unwrap();
        assert_eq!(result.opcode, Opcode::ProtocolError);
    }

    #[tokio::test]
    async fn make_offer_mirrors_payload_to_recipient_with_rewritten_tx() {
        let core = SignalingCore::new(Arc::new(InMemorySessionStore::new()));
        let ugi = Ulid::new();
        let (host, mut host_rx, peer, mut peer_rx) = seated_host_and_peer(&core, ugi).await;

        let frame = Frame {
            opcode: Opcode::MakeOffer,
            payload: Some(json!({"sdp": "offer-blob"})),
            tx: None,
            rx: Some(peer.ulid().unwrap().to_string()),
        };
        handle_relay(&core, &host, frame).await;

        let forwarded = peer_rx.try_recv().unwrap();
        assert_eq!(forwarded.opcode, Opcode::MakeOffer);
        assert_eq!(forwarded.tx, Some(host.ulid().unwrap().to_string()));
        assert_eq!(forwarded.payload.unwrap()["sdp"], json!("offer-blob"));

        let ack = host_rx.try_recv().unwrap();
        assert_eq!(ack.opcode, Opcode::MakeOffer);
    }

    #[tokio::test]
    async fn relay_to_unknown_recipient_yields_peer_invalid() {
        let core = SignalingCore::new(Arc::new(InMemorySessionStore::new()));
        let ugi = Ulid::new();
        let (host, mut host_rx, _peer, _peer_rx) = seated_host_and_peer(&core, ugi).await;

        let frame = Frame {
            opcode: Opcode::MakeOffer,
            payload: Some(json!({"sdp": "x"})),
            tx: None,
            rx: Some(Ulid::new().to_string()),
        };
        handle_relay(&core, &host, frame).await;

        let result = host_rx.try_recv().unwrap();
        assert_eq!(result.opcode, Opcode::PeerInvalid);
    }

    #[tokio::test]
    async fn relay_without_rx_closes_with_unsupported_data() {
        let core = SignalingCore::new(Arc::new(InMemorySessionStore::new()));
        let ugi = Ulid::new();
        let (host, _host_rx, _peer, _peer_rx) = seated_host_and_peer(&core, ugi).await;

        let frame = Frame {
            opcode: Opcode::MakeOffer,
            payload: Some(json!({"sdp": "x"})),
            tx: None,
            rx: None,
        };
        let outcome = handle_relay(&core, &host, frame).await;

        match outcome {
            Outcome::Close { code, .. } => assert_eq!(code, CLOSE_UNSUPPORTED_DATA),
            other => panic!("expected Close, got {other:?}"),
        }
    }
}
