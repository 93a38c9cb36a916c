use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::tickets::models::{AnalysisResult, Category, Sentiment};

/// Database model for ticket
///
/// `processed == true` implies both labels are set; the `tickets` table
/// enforces this with a CHECK constraint.
#[derive(Debug, Clone, FromRow)]
pub struct Ticket {
    pub id: Uuid,
    pub description: String,
    pub category: Option<Category>,
    pub sentiment: Option<Sentiment>,
    pub processed: bool,
    #[allow(dead_code)]
    pub created_at: DateTime<Utc>,
    #[allow(dead_code)]
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    /// Labels stored on the ticket, with defaults for any unset field
    pub fn stored_analysis(&self) -> AnalysisResult {
        AnalysisResult::new(
            self.category.unwrap_or_default(),
            self.sentiment.unwrap_or_default(),
        )
    }
}

/// Fields for inserting a new, unprocessed ticket
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub description: String,
    pub category: Option<Category>,
    pub sentiment: Option<Sentiment>,
}

/// Fields written back to a ticket by the analysis flow
#[derive(Debug, Clone, Copy)]
pub struct TicketUpdate {
    pub category: Category,
    pub sentiment: Sentiment,
    pub processed: bool,
}

impl TicketUpdate {
    /// Mark a ticket as processed with the given labels
    pub fn processed(result: AnalysisResult) -> Self {
        Self {
            category: result.category,
            sentiment: result.sentiment,
            processed: true,
        }
    }
}
