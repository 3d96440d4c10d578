//! Shared field validation for opcode handlers.

use ulid::Ulid;

use super::payloads::ConfigHostRequest;

pub const MAX_PEERS_LIMIT: u32 = 100;
pub const MAX_PASSWORD_LEN: usize = 128;
pub const MAX_LOBBY_NAME_LEN: usize = 128;

/// Parse a string as a ULID. Used for session tokens (INIT) and relay
/// targets (`rx` on MAKE_OFFER/MAKE_ANSWER/ICE).
pub fn parse_ulid(raw: &str) -> Option<Ulid> {
    Ulid::from_string(raw).ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigHostValidationError {
    #[error("lobby_id must be non-empty and at most {MAX_LOBBY_NAME_LEN} bytes")]
    LobbyId,
    #[error("max_peers must be between 0 and {MAX_PEERS_LIMIT}")]
    MaxPeers,
    #[error("password must be at most {MAX_PASSWORD_LEN} bytes")]
    Password,
}

/// Validate a CONFIG_HOST request body.
pub fn validate_config_host(req: &ConfigHostRequest) -> Result<(), ConfigHostValidationError> {
    if req.lobby_id.is_empty() || req.lobby_id.len() > MAX_LOBBY_NAME_LEN {
        return Err(ConfigHostValidationError::LobbyId);
    }
    if req.max_peers > MAX_PEERS_LIMIT {
        return Err(ConfigHostValidationError::MaxPeers);
    }
    if req.password.len() > MAX_PASSWORD_LEN {
        return Err(ConfigHostValidationError::Password);
    }
    Ok(())
}

pub fn validate_lobby_id(lobby_id: &str) -> bool {
    !lobby_id.is_empty() && lobby_id.len() <= MAX_LOBBY_NAME_LEN
}

pub fn validate_password_len(password: &str) -> bool {
    password.len() <= MAX_PASSWORD_LEN
}
