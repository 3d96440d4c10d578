//! Typed payload structs for opcodes that carry structured (non-opaque)
//! data. Relay opcodes (MAKE_OFFER/MAKE_ANSWER/ICE) deliberately have no
//! struct here: their payload travels as an untyped `serde_json::Value`
//!.

use serde::{Deserialize, Serialize};

/// INIT_OK (3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitOk {
    pub id: String,
    pub username: String,
    pub game: String,
    pub developer: String,
}

/// CONFIG_HOST (4), as sent by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigHostRequest {
    pub lobby_id: String,
    pub allow_host_reclaim: bool,
    pub allow_peers_to_claim_host: bool,
    pub max_peers: u32,
    pub password: String,
}

/// CONFIG_PEER (5), as sent by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigPeerRequest {
    pub lobby_id: String,
    pub password: String,
}

/// NEW_HOST (8), broadcast to role=None clients in the UGI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewHost {
    pub id: String,
    pub username: String,
    pub lobby_id: String,
    pub max_peers: u32,
    pub password_required: bool,
}

/// NEW_PEER (9), sent to the lobby host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPeer {
    pub id: String,
    pub username: String,
}

/// LOBBY_CLOSE (20) / HOST_GONE (21) payload: just the lobby name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LobbyIdPayload {
    pub lobby_id: String,
}

/// HOST_RECLAIM (23), broadcast to remaining peers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostReclaim {
    pub id: String,
    pub username: String,
    pub lobby_id: String,
}

/// PROTOCOL_ERROR (35): non-fatal protocol-state errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolErrorPayload {
    pub code: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_host_request_round_trips() {
        let json = r#"{"lobby_id":"L1","allow_host_reclaim":true,"allow_peers_to_claim_host":false,"max_peers":4,"password":""}"#;
        let req: ConfigHostRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.lobby_id, "L1");
        assert_eq!(req.max_peers, 4);
        assert_eq!(req.password, "");
    }
}
