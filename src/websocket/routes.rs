use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::Router;

use crate::server::SignalingCore;

use super::handler::websocket_handler;
use super::metrics::metrics_handler;

/// Assemble the HTTP router: the signaling upgrade, health check, and
/// metrics endpoints, with CORS parsed from
/// `SecurityConfig::cors_origins` and request tracing layered on top.
pub fn create_router(cors_origins: &str) -> Router<Arc<SignalingCore>> {
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::trace::TraceLayer;

    let cors = if cors_origins == "*" {
        CorsLayer::permissive()
    } else {
        let origins: Vec<_> = cors_origins
            .split(',')
            .filter_map(|origin| origin.trim().parse::<axum::http::HeaderValue>().ok())
            .collect();

        if origins.is_empty() {
            tracing::warn!("no valid CORS origins configured, falling back to permissive CORS");
            CorsLayer::permissive()
        } else {
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    };

    Router::new()
        .route("/api/v0/signaling", get(websocket_handler))
        .route("/healthz", get(health_check))
        .route("/metrics", get(metrics_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn health_check(
    State(core): State<Arc<SignalingCore>>,
) -> axum::Json<serde_json::Value> {
    let snapshot = core.metrics.snapshot();
    axum::Json(serde_json::json!({
        "status": "ok",
        "connectionsOpen": snapshot.connections_open,
    }))
}
