use std::sync::Arc;

use super::Outcome;
use crate::protocol::{Frame, Opcode};
use crate::server::client::Client;

/// KEEPALIVE (1): echo, no state change. May arrive before INIT.
pub async fn handle(client: &Arc<Client>) -> Outcome {
    client.send(Frame::new(Opcode::Keepalive)).await;
    Outcome::Continue
}
