//! The HTTP/websocket surface: the upgrade handler, the per-
//! connection read/send loop, and the health/metrics endpoints.
//!
//! - [`handler`]: websocket upgrade entry point
//! - [`connection`]: the per-connection read loop and owning send task
//! - [`routes`]: router assembly (CORS, tracing, the three routes)
//! - [`metrics`]: the `/metrics` endpoint and its optional bearer auth

mod connection;
mod handler;
mod metrics;
mod routes;

pub use handler::websocket_handler;
pub use metrics::metrics_handler;
pub use routes::create_router;
