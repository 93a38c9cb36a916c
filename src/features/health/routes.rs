use axum::{routing::get, Router};

use crate::features::health::handlers;

/// Create routes for the health feature (no state, no auth)
pub fn routes() -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
}
