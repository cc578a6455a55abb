//! Web server module.
//!
//! ```text
//! /webhook → verify signature → classify → forward (background)
//! /send    → POST only → validate → push API
//! /health, /
//! ```
//!
//! CORS headers go on every response; `OPTIONS` never reaches a handler.

pub mod handlers;
pub mod signature;

use axum::{middleware, routing::any, Router};
use tower_http::trace::TraceLayer;

pub use handlers::{
    cors, health, not_found, root, send, webhook, AppState,
    HealthResponse, SendResponse, ServiceInfo,
};
pub use signature::{verify_line_signature, SignatureError};

/// Build the application router. Paths match exactly.
///
/// Routes accept every verb: handlers decide, so that the uninitialized
/// check on `/webhook` and `/send` always comes first.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", any(root))
        .route("/health", any(health))
        .route("/webhook", any(webhook))
        .route("/send", any(send))
        .fallback(not_found)
        .layer(middleware::from_fn(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
