use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::opcode::Opcode;

/// The envelope every signaling message travels in:
/// `{ "opcode": <int>, "payload": <any|null>, "tx": <string?>, "rx": <string?> }`.
///
/// `payload` is kept as an untyped [`Value`] here; opcode handlers decode it
/// into the specific payload structs in [`super::payloads`] on demand. This
/// keeps relay opcodes (MAKE_OFFER/MAKE_ANSWER/ICE) byte-faithful: the server
/// never has to round-trip through a typed struct for data it must not
/// reinterpret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frame {
    pub opcode: Opcode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rx: Option<String>,
}

impl Frame {
    pub fn new(opcode: Opcode) -> Self {
        Self {
            opcode,
            payload: None,
            tx: None,
            rx: None,
        }
    }

    pub fn with_payload(opcode: Opcode, payload: impl Serialize) -> Self {
        Self {
            opcode,
            payload: serde_json::to_value(payload).ok(),
            tx: None,
            rx: None,
        }
    }

    /// A VIOLATION frame carrying a developer-facing reason string. Always
    /// followed by a connection close.
    pub fn violation(reason: impl Into<String>) -> Self {
        Self {
            opcode: Opcode::Violation,
            payload: Some(Value::String(reason.into())),
            tx: None,
            rx: None,
        }
    }

    /// A non-fatal PROTOCOL_ERROR frame; the connection
    /// stays open after this.
    pub fn protocol_error(code: super::opcode::ReasonCode, message: impl Into<String>) -> Self {
        Self::with_payload(
            Opcode::ProtocolError,
            super::payloads::ProtocolErrorPayload {
                code: code.as_str().to_string(),
                message: message.into(),
            },
        )
    }

    /// Parse one inbound frame from raw text. Decode failures are the
    /// caller's cue to send VIOLATION + close.
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode `self.payload` into a typed struct, or `None` if absent.
    pub fn payload_as<T: for<'de> Deserialize<'de>>(&self) -> Result<Option<T>, serde_json::Error> {
        match &self.payload {
            Some(value) => serde_json::from_value(value.clone()).map(Some),
            None => Ok(None),
        }
    }
}
