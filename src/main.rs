#![cfg_attr(not(test), deny(clippy::panic))]

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;

use ugi_signal_server::config;
use ugi_signal_server::logging;
use ugi_signal_server::server::SignalingCore;
use ugi_signal_server::session_store::InMemorySessionStore;
use ugi_signal_server::websocket;

/// A lightweight, in-memory WebSocket signaling server for WebRTC game
/// lobbies identified by UGI.
#[derive(Parser, Debug)]
#[command(name = "ugi-signal-server")]
#[command(about = "A lightweight, in-memory WebSocket signaling server for WebRTC game lobbies")]
#[command(version)]
struct Cli {
    /// Validate configuration and exit without starting the server.
    #[arg(long, short = 'c', conflicts_with = "print_config")]
    validate_config: bool,

    /// Print the loaded configuration to stdout (as JSON) and exit.
    #[arg(long, conflicts_with = "validate_config")]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = config::load();

    if cli.print_config {
        let json = serde_json::to_string_pretty(&cfg)
            .map_err(|e| anyhow::anyhow!("failed to serialize config: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    let validation_result = config::validate_config_security(&cfg);

    if cli.validate_config {
        match validation_result {
            Ok(()) => {
                println!("Configuration validation passed");
                println!();
                println!("Configuration summary:");
                println!("  Host: {}", cfg.server.host);
                println!("  Port: {}", cfg.server.port);
                println!("  Max frame bytes: {}", cfg.server.max_frame_bytes);
                println!("  CORS origins: {}", cfg.security.cors_origins);
                println!("  Metrics auth required: {}", cfg.security.require_metrics_auth);
                return Ok(());
            }
            Err(e) => {
                eprintln!("Configuration validation failed:\n{e}");
                std::process::exit(1);
            }
        }
    }

    validation_result?;

    logging::init_with_config(&cfg.logging);

    let scrypt_params = scrypt::Params::new(
        cfg.security.scrypt.log_n,
        cfg.security.scrypt.r,
        cfg.security.scrypt.p,
        32,
    )
    .map_err(|e| anyhow::anyhow!("invalid scrypt parameters: {e}"))?;

    let session_store = Arc::new(InMemorySessionStore::new());
    let mut core = SignalingCore::with_scrypt_params(session_store, scrypt_params);
    core.max_frame_bytes = cfg.server.max_frame_bytes;
    core.require_metrics_auth = cfg.security.require_metrics_auth;
    core.metrics_auth_token = cfg.security.metrics_auth_token.clone();
    let core = Arc::new(core);

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid listen address {}:{}: {e}", cfg.server.host, cfg.server.port))?;

    let app = websocket::create_router(&cfg.security.cors_origins).with_state(core);

    tracing::info!(%addr, "starting signaling server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
