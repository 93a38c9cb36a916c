use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::tickets::models::{
    AnalysisResult, Category, NewTicket, Sentiment, Ticket, TicketUpdate,
};
use crate::features::tickets::repositories::{RepositoryError, TicketRepository};
use crate::features::tickets::services::AnalysisService;

/// Outcome of processing a stored ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessedTicket {
    pub result: AnalysisResult,
    /// The ticket was processed by an earlier call; no analysis was run
    pub already_processed: bool,
}

/// Service for ticket operations
pub struct TicketService {
    repository: Arc<dyn TicketRepository>,
    analysis: Arc<AnalysisService>,
}

impl TicketService {
    pub fn new(repository: Arc<dyn TicketRepository>, analysis: Arc<AnalysisService>) -> Self {
        Self {
            repository,
            analysis,
        }
    }

    /// Analyze a stored ticket and persist its labels.
    ///
    /// Already processed tickets are returned as stored without calling the
    /// model again.
    pub async fn process(&self, ticket_id: &str) -> Result<ProcessedTicket> {
        let ticket = self
            .repository
            .get(ticket_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Ticket not found".to_string()))?;

        if ticket.processed {
            tracing::info!("Ticket {} already processed, skipping analysis", ticket.id);
            return Ok(ProcessedTicket {
                result: ticket.stored_analysis(),
                already_processed: true,
            });
        }

        if ticket.description.is_empty() {
            return Err(AppError::BadRequest(
                "Ticket has an empty description".to_string(),
            ));
        }

        let result = self.analysis.analyze(&ticket.description).await?;

        let updated = self
            .repository
            .update(ticket.id, TicketUpdate::processed(result))
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound(id) => {
                    AppError::Persistence(format!("Update of ticket {} affected no rows", id))
                }
                other => other.into(),
            })?;

        tracing::info!(
            "Ticket {} processed: category={}, sentiment={}",
            updated.id,
            result.category,
            result.sentiment
        );

        Ok(ProcessedTicket {
            result,
            already_processed: false,
        })
    }

    /// Analyze ad-hoc text without touching the store
    pub async fn analyze_text(&self, text: &str) -> Result<AnalysisResult> {
        if text.trim().is_empty() {
            return Err(AppError::BadRequest("Text must not be empty".to_string()));
        }

        self.analysis.analyze(text).await
    }

    /// Create a new unprocessed ticket
    pub async fn create(
        &self,
        description: &str,
        category: Option<Category>,
        sentiment: Option<Sentiment>,
    ) -> Result<Ticket> {
        let description = description.trim();
        if description.is_empty() {
            return Err(AppError::BadRequest(
                "Description must not be empty".to_string(),
            ));
        }

        let ticket = self
            .repository
            .insert(NewTicket {
                description: description.to_string(),
                category,
                sentiment,
            })
            .await?;

        Ok(ticket)
    }
}
