use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::tickets::models::{AnalysisResult, Category, Sentiment, Ticket};
use crate::features::tickets::services::ProcessedTicket;

/// Request DTO for processing a stored ticket
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ProcessTicketRequestDto {
    /// Ticket id. Any string is accepted; unknown ids yield 404.
    pub ticket_id: String,
}

/// Response DTO for a processed ticket
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProcessTicketResponseDto {
    /// The `ticket_id` exactly as sent in the request
    pub ticket_id: String,
    pub category: Category,
    pub sentiment: Sentiment,
    pub processed: bool,
    pub message: String,
}

impl ProcessTicketResponseDto {
    pub fn new(ticket_id: String, outcome: ProcessedTicket) -> Self {
        let message = if outcome.already_processed {
            "Ticket had already been processed"
        } else {
            "Ticket processed successfully"
        };

        Self {
            ticket_id,
            category: outcome.result.category,
            sentiment: outcome.result.sentiment,
            processed: true,
            message: message.to_string(),
        }
    }
}

/// Request DTO for analyzing ad-hoc text
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AnalyzeTextRequestDto {
    #[validate(length(min = 1, message = "Text must not be empty"))]
    pub text: String,
}

/// Response DTO for ad-hoc analysis
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeTextResponseDto {
    pub category: Category,
    pub sentiment: Sentiment,
}

impl From<AnalysisResult> for AnalyzeTextResponseDto {
    fn from(result: AnalysisResult) -> Self {
        Self {
            category: result.category,
            sentiment: result.sentiment,
        }
    }
}

/// Request DTO for creating a ticket
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTicketRequestDto {
    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub description: String,

    #[serde(default)]
    pub category: Option<Category>,

    #[serde(default)]
    pub sentiment: Option<Sentiment>,
}

/// Response DTO for a created ticket
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateTicketResponseDto {
    pub ticket_id: Uuid,
    pub description: String,
    pub category: Option<Category>,
    pub sentiment: Option<Sentiment>,
    pub processed: bool,
    pub message: String,
}

impl From<Ticket> for CreateTicketResponseDto {
    fn from(t: Ticket) -> Self {
        Self {
            ticket_id: t.id,
            description: t.description,
            category: t.category,
            sentiment: t.sentiment,
            processed: t.processed,
            message: "Ticket created successfully".to_string(),
        }
    }
}
