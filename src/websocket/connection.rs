use std::sync::Arc;

use axum::extract::ws::{CloseFrame, Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, oneshot};

use crate::protocol::validation::parse_ulid;
use crate::protocol::Frame;
use crate::server::handlers::{self, Outcome, CLOSE_UNSUPPORTED_DATA};
use crate::server::{cleanup, SignalingCore};

/// Drives one accepted websocket connection end to end: registers the
/// Client, spawns the owning send task (the realization of `writeLock` —
/// only this task ever writes to `socket`), runs the read loop, and
/// always finishes with cleanup.
pub async fn handle_socket(
    socket: WebSocket,
    core: Arc<SignalingCore>,
    ugi_raw: Option<String>,
    request_origin: String,
    max_frame_bytes: usize,
) {
    let (mut sender, mut receiver) = socket.split();

    let Some(ugi_raw) = ugi_raw else {
        reject_before_registration(&mut sender, "missing ugi query parameter").await;
        return;
    };
    let Some(ugi) = parse_ulid(&ugi_raw) else {
        reject_before_registration(&mut sender, "ugi is not a valid ULID").await;
        return;
    };
    let identity = match core.session_store.verify_ugi(ugi).await {
        Ok(identity) => identity,
        Err(_) => {
            reject_before_registration(&mut sender, "unknown ugi").await;
            return;
        }
    };

    let (frame_tx, mut frame_rx) = mpsc::channel::<Frame>(64);
    let (close_tx, close_rx) = oneshot::channel::<(u16, String)>();
    let mut close_tx = Some(close_tx);

    let client = core.clients.add(ugi, identity.game_name, identity.developer_name, frame_tx);
    core.metrics.record_connection_opened();

    let send_task = tokio::spawn(async move {
        let mut close_rx = close_rx;
        loop {
            tokio::select! {
                biased;
                frame = frame_rx.recv() => {
                    match frame {
                        Some(frame) => {
                            let Ok(text) = frame.encode() else { continue };
                            if sender.send(Message::Text(text.into())).await.is_err() {
                                break;
                            }
                        }
                        None => break,
                    }
                }
                close = &mut close_rx => {
                    if let Ok((code, reason)) = close {
                        let _ = sender
                            .send(Message::Close(Some(CloseFrame {
                                code,
                                reason: reason.into(),
                            })))
                            .await;
                    }
                    break;
                }
            }
        }
        let _ = sender.close().await;
    });

    while let Some(message) = receiver.next().await {
        let message = match message {
            Ok(message) => message,
            Err(_) => break,
        };
        let text = match message {
            Message::Text(text) => text,
            Message::Close(_) => break,
            Message::Ping(_) | Message::Pong(_) | Message::Binary(_) => continue,
        };

        if text.len() > max_frame_bytes {
            client
                .send(Frame::violation(format!("frame exceeds {max_frame_bytes} byte limit")))
                .await;
            if let Some(tx) = close_tx.take() {
                let _ = tx.send((1009, "message too big".into()));
            }
            break;
        }

        let frame = match Frame::decode(&text) {
            Ok(frame) => frame,
            Err(_) => {
                core.metrics.record_violation();
                client.send(Frame::violation("malformed frame")).await;
                if let Some(tx) = close_tx.take() {
                    let _ = tx.send((CLOSE_UNSUPPORTED_DATA, "decode error".into()));
                }
                break;
            }
        };

        match handlers::dispatch(&core, &client, frame, &request_origin).await {
            Outcome::Continue => {}
            Outcome::Close { code, reason } => {
                if let Some(tx) = close_tx.take() {
                    let _ = tx.send((code, reason));
                }
                break;
            }
        }
    }

    // Dropping `close_tx` here (plain disconnect/read error, no handler-driven
    // close) makes the send task's `close_rx` resolve to `Err` immediately;
    // the `biased` select above still drains any frames already queued first.
    drop(close_tx);
    let _ = send_task.await;
    cleanup::run(&core, &client).await;
}

async fn reject_before_registration(
    sender: &mut futures_util::stream::SplitSink<WebSocket, Message>,
    reason: &str,
) {
    let frame = Frame::violation(reason);
    if let Ok(text) = frame.encode() {
        let _ = sender.send(Message::Text(text.into())).await;
    }
    let _ = sender
        .send(Message::Close(Some(CloseFrame {
            code: CLOSE_UNSUPPORTED_DATA,
            reason: reason.to_string().into(),
        })))
        .await;
    let _ = sender.close().await;
}
