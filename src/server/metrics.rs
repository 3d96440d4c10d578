use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Process-local counters for operational visibility. Purely
/// observational: nothing here is consulted by a signaling decision, and
/// no lock used by the registries or connection handlers is ever held
/// while these are updated.
#[derive(Default)]
pub struct ServerMetrics {
    connections_opened: AtomicU64,
    connections_closed: AtomicU64,
    lobbies_created: AtomicU64,
    lobbies_closed: AtomicU64,
    frames_relayed: AtomicU64,
    violations: AtomicU64,
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub connections_open: u64,
    pub connections_opened_total: u64,
    pub connections_closed_total: u64,
    pub lobbies_created_total: u64,
    pub lobbies_closed_total: u64,
    pub frames_relayed_total: u64,
    pub violations_total: u64,
}

impl ServerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_connection_opened(&self) {
        self.connections_opened.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_connection_closed(&self) {
        self.connections_closed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_lobby_created(&self) {
        self.lobbies_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_lobby_closed(&self) {
        self.lobbies_closed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_frame_relayed(&self) {
        self.frames_relayed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_violation(&self) {
        self.violations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let opened = self.connections_opened.load(Ordering::Relaxed);
        let closed = self.connections_closed.load(Ordering::Relaxed);
        MetricsSnapshot {
            connections_open: opened.saturating_sub(closed),
            connections_opened_total: opened,
            connections_closed_total: closed,
            lobbies_created_total: self.lobbies_created.load(Ordering::Relaxed),
            lobbies_closed_total: self.lobbies_closed.load(Ordering::Relaxed),
            frames_relayed_total: self.frames_relayed.load(Ordering::Relaxed),
            violations_total: self.violations.load(Ordering::Relaxed),
        }
    }
}
