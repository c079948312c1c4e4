//! HTTP surface of the service.
//!
//! | Route | Handler |
//! |-------|---------|
//! | `POST /hash` | [`handler::submit`] |
//! | `GET /hash/{id}` | [`handler::get_hash`] |
//! | `GET /stats` | [`handler::stats`] |
//! | any `/shutdown` | [`handler::shutdown`] |

pub mod error;
pub mod handler;

use axum::{
    Router,
    routing::{any, get, post},
};
use pwdhash::HashService;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: HashService,
    /// Cancelled by `/shutdown`; the server stops accepting connections once
    /// it fires.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub const fn new(service: HashService, shutdown: CancellationToken) -> Self {
        Self { service, shutdown }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/hash", post(handler::submit))
        .route("/hash/{id}", get(handler::get_hash))
        .route("/stats", get(handler::stats))
        .route("/shutdown", any(handler::shutdown))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
