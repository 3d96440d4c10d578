//! Root configuration type.

use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use super::security::SecurityConfig;
use super::server::ServerConfig;

/// Root configuration. Loaded once at process startup by
/// [`super::loader::load`]; the signaling core itself never reads this
/// directly — only the binary and the
/// websocket/router wiring do.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}
