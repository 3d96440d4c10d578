//! Per-opcode business logic. Each handler follows a uniform guard
//! order: session/role preconditions, payload validation, lock-free
//! lookups, a locked commit, a reply to the originator, then broadcasts.

mod host;
mod init;
mod keepalive;
mod peer;
mod relay;

use std::sync::Arc;

use crate::protocol::{Frame, Opcode};
use crate::server::client::Client;
use crate::server::SignalingCore;

/// What the connection handler should do after a frame was dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Keep reading from this connection.
    Continue,
    /// A fatal error occurred; the read loop must stop and run cleanup
    /// after the given close code.
    Close { code: u16, reason: String },
}

/// Close code for policy violations.
pub const CLOSE_POLICY_VIOLATION: u16 = 1008;
/// Close code for decode/framing errors.
pub const CLOSE_UNSUPPORTED_DATA: u16 = 1003;

/// Route one inbound frame to its opcode handler. `request_origin` is the
/// value INIT's token origin must match.
pub async fn dispatch(
    core: &SignalingCore,
    client: &Arc<Client>,
    frame: Frame,
    request_origin: &str,
) -> Outcome {
    match frame.opcode {
        Opcode::Keepalive => keepalive::handle(client).await,
        Opcode::Init => init::handle(core, client, frame, request_origin).await,
        Opcode::ConfigHost => host::handle_config_host(core, client, frame).await,
        Opcode::ConfigPeer => peer::handle_config_peer(core, client, frame).await,
        Opcode::MakeOffer | Opcode::MakeAnswer | Opcode::Ice => {
            relay::handle_relay(core, client, frame).await
        }
        Opcode::ClaimHost => {
            core.metrics.record_violation();
            client
                .send(Frame::violation(
                    crate::protocol::opcode::ReasonCode::ClaimHostUnsupported.to_string(),
                ))
                .await;
            Outcome::Close {
                code: CLOSE_UNSUPPORTED_DATA,
                reason: "CLAIM_HOST is not supported".into(),
            }
        }
        // Every other opcode in the table is server→client only; a client
 // sending one is a framing error.
        _ => {
            core.metrics.record_violation();
            client
                .send(Frame::violation("opcode is not valid from client to server"))
                .await;
            Outcome::Close {
                code: CLOSE_UNSUPPORTED_DATA,
                reason: "invalid client opcode".into(),
            }
        }
    }
}
