use std::sync::Arc;

use axum::{routing::post, Router};

use crate::features::tickets::handlers;
use crate::features::tickets::services::TicketService;

/// Create routes for the tickets feature
pub fn routes(service: Arc<TicketService>) -> Router {
    Router::new()
        .route("/process-ticket", post(handlers::process_ticket))
        .route("/analyze-text", post(handlers::analyze_text))
        .route("/create-ticket", post(handlers::create_ticket))
        .with_state(service)
}
