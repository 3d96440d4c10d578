use serde::{Deserialize, Serialize};

/// The fixed wire-level opcode table. Numeric values are part of the wire
/// contract and must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Opcode {
    Violation = 0,
    Keepalive = 1,
    Init = 2,
    InitOk = 3,
    ConfigHost = 4,
    ConfigPeer = 5,
    AckHost = 6,
    AckPeer = 7,
    NewHost = 8,
    NewPeer = 9,
    MakeOffer = 10,
    MakeAnswer = 11,
    Ice = 12,
    LobbyExists = 16,
    LobbyNotfound = 17,
    LobbyFull = 18,
    LobbyLocked = 19,
    LobbyClose = 20,
    HostGone = 21,
    PeerGone = 22,
    HostReclaim = 23,
    /// Reserved extension point. The source drafts never clearly implement
    /// peer-side self-election; this implementation recognizes the opcode but
    /// replies VIOLATION rather than silently ignoring it.
    ClaimHost = 24,
    PasswordRequired = 31,
    PasswordAck = 32,
    PasswordFail = 33,
    PeerInvalid = 34,
    /// Non-fatal protocol-state error (SESSION_EXISTS, CONFIG_REQUIRED,
    /// ALREADY_HOST, NOT_HOST, NOT_PEER): the source drafts name these but
    /// never assign them a wire number in the otherwise-complete opcode
    /// table. Added here to close that gap without renumbering anything
    /// else.
    ProtocolError = 35,
}

impl Opcode {
    pub fn from_u8(raw: u8) -> Option<Self> {
        Self::try_from(raw).ok()
    }
}

impl TryFrom<u8> for Opcode {
    type Error = InvalidOpcode;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Opcode::Violation),
            1 => Ok(Opcode::Keepalive),
            2 => Ok(Opcode::Init),
            3 => Ok(Opcode::InitOk),
            4 => Ok(Opcode::ConfigHost),
            5 => Ok(Opcode::ConfigPeer),
            6 => Ok(Opcode::AckHost),
            7 => Ok(Opcode::AckPeer),
            8 => Ok(Opcode::NewHost),
            9 => Ok(Opcode::NewPeer),
            10 => Ok(Opcode::MakeOffer),
            11 => Ok(Opcode::MakeAnswer),
            12 => Ok(Opcode::Ice),
            16 => Ok(Opcode::LobbyExists),
            17 => Ok(Opcode::LobbyNotfound),
            18 => Ok(Opcode::LobbyFull),
            19 => Ok(Opcode::LobbyLocked),
            20 => Ok(Opcode::LobbyClose),
            21 => Ok(Opcode::HostGone),
            22 => Ok(Opcode::PeerGone),
            23 => Ok(Opcode::HostReclaim),
            24 => Ok(Opcode::ClaimHost),
            31 => Ok(Opcode::PasswordRequired),
            32 => Ok(Opcode::PasswordAck),
            33 => Ok(Opcode::PasswordFail),
            34 => Ok(Opcode::PeerInvalid),
            35 => Ok(Opcode::ProtocolError),
            other => Err(InvalidOpcode(other)),
        }
    }
}

impl From<Opcode> for u8 {
    fn from(value: Opcode) -> Self {
        value as u8
    }
}

/// Raised when a frame carries an opcode number outside the wire table.
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("unknown opcode {0}")]
pub struct InvalidOpcode(pub u8);

/// Developer-facing business-rule codes, distinct from the wire opcode
/// numbers above. These never appear as the `opcode` field of a frame; they
/// are carried as strings inside a VIOLATION or as informational `reason`
/// text in logs — these names are developer-facing only, never wire
/// opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    SessionExists,
    TokenOriginMismatch,
    TokenExpired,
    ConfigRequired,
    AlreadyHost,
    NotHost,
    NotPeer,
    BadPayload,
    StoreError,
    ClaimHostUnsupported,
}

impl ReasonCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ReasonCode::SessionExists => "SESSION_EXISTS",
            ReasonCode::TokenOriginMismatch => "TOKEN_ORIGIN_MISMATCH",
            ReasonCode::TokenExpired => "TOKEN_EXPIRED",
            ReasonCode::ConfigRequired => "CONFIG_REQUIRED",
            ReasonCode::AlreadyHost => "ALREADY_HOST",
            ReasonCode::NotHost => "NOT_HOST",
            ReasonCode::NotPeer => "NOT_PEER",
            ReasonCode::BadPayload => "BAD_PAYLOAD",
            ReasonCode::StoreError => "STORE_ERROR",
            ReasonCode::ClaimHostUnsupported => "CLAIM_HOST_UNSUPPORTED",
        }
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
