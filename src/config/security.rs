//! Security and transport-shape configuration types.

use serde::{Deserialize, Serialize};

use super::defaults::{
    default_cors_origins, default_max_connections_per_ip, default_max_message_size,
    default_require_metrics_auth, default_scrypt_log_n, default_scrypt_p, default_scrypt_r,
};

/// Security configuration.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SecurityConfig {
    /// Allowed CORS origins (comma-separated, or "*" for any).
    #[serde(default = "default_cors_origins")]
    pub cors_origins: String,
    /// Maximum inbound websocket message size in bytes.
    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,
    /// Maximum simultaneous connections from a single source IP.
    #[serde(default = "default_max_connections_per_ip")]
    pub max_connections_per_ip: usize,
    /// Require a bearer token on `GET /metrics`.
    #[serde(default = "default_require_metrics_auth")]
    pub require_metrics_auth: bool,
    #[serde(default)]
    pub metrics_auth_token: Option<String>,
    /// scrypt cost parameters for lobby password hashing.
    #[serde(default)]
    pub scrypt: ScryptParams,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            cors_origins: default_cors_origins(),
            max_message_size: default_max_message_size(),
            max_connections_per_ip: default_max_connections_per_ip(),
            require_metrics_auth: default_require_metrics_auth(),
            metrics_auth_token: None,
            scrypt: ScryptParams::default(),
        }
    }
}

/// scrypt cost parameters, in the same shape `scrypt::Params::new` expects.
#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
pub struct ScryptParams {
    #[serde(default = "default_scrypt_log_n")]
    pub log_n: u8,
    #[serde(default = "default_scrypt_r")]
    pub r: u32,
    #[serde(default = "default_scrypt_p")]
    pub p: u32,
}

impl Default for ScryptParams {
    fn default() -> Self {
        Self {
            log_n: default_scrypt_log_n(),
            r: default_scrypt_r(),
            p: default_scrypt_p(),
        }
    }
}
