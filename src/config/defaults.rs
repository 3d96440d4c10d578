//! Default value functions for configuration fields, used by serde's
//! `#[serde(default = ...)]` attributes.

use super::logging::LogFormat;

pub const fn default_port() -> u16 {
    8080
}

pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub const fn default_max_frame_bytes() -> usize {
    64 * 1024
}

pub const fn default_keepalive_interval_secs() -> u64 {
    30
}

pub fn default_cors_origins() -> String {
    "*".to_string()
}

pub const fn default_max_message_size() -> usize {
    64 * 1024
}

pub const fn default_max_connections_per_ip() -> usize {
    64
}

pub const fn default_require_metrics_auth() -> bool {
    false
}

pub const fn default_scrypt_log_n() -> u8 {
    15
}

pub const fn default_scrypt_r() -> u32 {
    8
}

pub const fn default_scrypt_p() -> u32 {
    1
}

pub fn default_log_dir() -> String {
    "logs".to_string()
}

pub fn default_log_filename() -> String {
    "ugi-signal-server.log".to_string()
}

pub fn default_rotation() -> String {
    "daily".to_string()
}

pub const fn default_enable_file_logging() -> bool {
    false
}

pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}
