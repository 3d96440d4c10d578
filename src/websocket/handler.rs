use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Response;
use serde::Deserialize;

use crate::server::SignalingCore;

use super::connection::handle_socket;

#[derive(Debug, Deserialize)]
pub struct SignalingQuery {
    ugi: Option<String>,
}

/// `GET /api/v0/signaling?ugi=<ULID>`. The upgrade always
/// succeeds at the HTTP layer; a missing or invalid `ugi` is reported
/// *after* the upgrade, as a VIOLATION frame followed by a 1003 close.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(core): State<Arc<SignalingCore>>,
    Query(query): Query<SignalingQuery>,
    headers: HeaderMap,
) -> Response {
    let request_origin = headers
        .get(axum::http::header::ORIGIN)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let max_frame_bytes = core.max_frame_bytes;

    ws.on_upgrade(move |socket| {
        handle_socket(socket, core, query.ugi, request_origin, max_frame_bytes)
    })
}
