use utoipa::{Modify, OpenApi};

use crate::features::health::{dtos as health_dtos, handlers as health_handlers};
use crate::features::tickets::{
    dtos as tickets_dtos, handlers as tickets_handlers, models as tickets_models,
};
use crate::shared::types::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health_handlers::root,
        health_handlers::health_check,
        // Tickets
        tickets_handlers::process_ticket,
        tickets_handlers::analyze_text,
        tickets_handlers::create_ticket,
    ),
    components(
        schemas(
            ErrorResponse,
            // Health
            health_dtos::HealthResponseDto,
            health_dtos::RootResponseDto,
            // Tickets
            tickets_models::Category,
            tickets_models::Sentiment,
            tickets_models::AnalysisResult,
            tickets_dtos::ProcessTicketRequestDto,
            tickets_dtos::ProcessTicketResponseDto,
            tickets_dtos::AnalyzeTextRequestDto,
            tickets_dtos::AnalyzeTextResponseDto,
            tickets_dtos::CreateTicketRequestDto,
            tickets_dtos::CreateTicketResponseDto,
        )
    ),
    tags(
        (name = "health", description = "Liveness and service banner"),
        (name = "tickets", description = "Support ticket classification"),
    ),
    info(
        title = "Support Ticket AI API",
        version = "0.1.0",
        description = "API documentation for the support ticket classifier",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
