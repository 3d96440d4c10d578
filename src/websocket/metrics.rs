use std::sync::Arc;

use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;

use crate::server::SignalingCore;

/// `GET /metrics`. Gated by an optional bearer token when
/// `SecurityConfig::require_metrics_auth` is set.
pub async fn metrics_handler(
    headers: HeaderMap,
    State(core): State<Arc<SignalingCore>>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    if core.require_metrics_auth {
        enforce_metrics_auth(&headers, &core)?;
    }
    Ok(Json(serde_json::to_value(core.metrics.snapshot()).unwrap_or_default()))
}

fn enforce_metrics_auth(headers: &HeaderMap, core: &SignalingCore) -> Result<(), StatusCode> {
    let Some(token) = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
    else {
        tracing::warn!("unauthorized metrics access attempt: missing or malformed Authorization header");
        return Err(StatusCode::UNAUTHORIZED);
    };

    if core.metrics_auth_token.as_deref() == Some(token) {
        return Ok(());
    }

    tracing::warn!("unauthorized metrics access attempt: token rejected");
    Err(StatusCode::UNAUTHORIZED)
}
