//! Configuration validation.

use super::Config;

/// Hard-fails on configuration combinations that would silently leave the
/// service insecure. `config::loader::load()` only warns on these; `main.rs`
/// calls this again and propagates the error when `--validate-config` is
/// passed, or before binding the listener in normal operation.
pub fn validate_config_security(config: &Config) -> anyhow::Result<()> {
    if config.security.require_metrics_auth {
        let token_present = config
            .security
            .metrics_auth_token
            .as_deref()
            .is_some_and(|t| !t.is_empty());
        if !token_present {
            anyhow::bail!(
                "security.require_metrics_auth is true but security.metrics_auth_token is empty; \
                 set UGI_SIGNAL__SECURITY__METRICS_AUTH_TOKEN or disable require_metrics_auth"
            );
        }
    } else if config.security.cors_origins == "*" {
        eprintln!(
            "warning: metrics auth is disabled and CORS is wide open (\"*\"); \
             fine for local development, not recommended for a public deployment"
        );
    }

    if config.server.max_frame_bytes == 0 {
        anyhow::bail!("server.max_frame_bytes must be greater than zero");
    }

    if config.security.max_message_size == 0 {
        anyhow::bail!("security.max_message_size must be greater than zero");
    }

    Ok(())
}
