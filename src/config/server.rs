//! Server/listener configuration types.

use serde::{Deserialize, Serialize};

use super::defaults::{
    default_host, default_keepalive_interval_secs, default_max_frame_bytes, default_port,
};

/// Listen address and connection-shape settings.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Expected client KEEPALIVE cadence. The server never enforces an
    /// inactivity timeout itself; this is advertised for clients
    /// and used only in `--print-config` / operational docs.
    #[serde(default = "default_keepalive_interval_secs")]
    pub keepalive_interval_secs: u64,
    /// Maximum inbound frame size in bytes before the connection is closed
    /// with 1009.
    #[serde(default = "default_max_frame_bytes")]
    pub max_frame_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            keepalive_interval_secs: default_keepalive_interval_secs(),
            max_frame_bytes: default_max_frame_bytes(),
        }
    }
}
