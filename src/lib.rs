//! Issues short-lived signed URLs for private video assets.

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod origin;
pub mod rate_limit;
pub mod signer;
pub mod state;
pub mod validation;

use axum::{
    Router,
    routing::{any, get},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::handlers::{health_handler, metrics_handler, signed_url_handler};
use crate::state::AppState;

// `any` so that non-GET methods reach the handler's own 405 / preflight logic
pub fn app(state: Arc<AppState>, route: &str) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route(route, any(signed_url_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
