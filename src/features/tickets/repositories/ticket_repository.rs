use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::features::tickets::models::{NewTicket, Ticket, TicketUpdate};

const TICKET_COLUMNS: &str =
    "id, description, category, sentiment, processed, created_at, updated_at";

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Ticket '{0}' not found")]
    NotFound(Uuid),

    #[error("Write affected no rows: {0}")]
    WriteFailed(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => {
                AppError::NotFound(format!("Ticket '{}' not found", id))
            }
            RepositoryError::WriteFailed(msg) => AppError::Persistence(msg),
            RepositoryError::Database(e) => AppError::Database(e),
        }
    }
}

/// Persistent ticket storage
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Look up a ticket by its textual id. Ids that are not UUIDs never match.
    async fn get(&self, id: &str) -> Result<Option<Ticket>, RepositoryError>;

    /// Insert a new unprocessed ticket and return the stored row
    async fn insert(&self, ticket: NewTicket) -> Result<Ticket, RepositoryError>;

    /// Write labels and the processed flag back to an existing ticket
    async fn update(&self, id: Uuid, update: TicketUpdate) -> Result<Ticket, RepositoryError>;
}

/// PostgreSQL-backed ticket repository
pub struct PgTicketRepository {
    pool: PgPool,
}

impl PgTicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketRepository for PgTicketRepository {
    async fn get(&self, id: &str) -> Result<Option<Ticket>, RepositoryError> {
        let Ok(id) = Uuid::parse_str(id) else {
            tracing::debug!("Ticket id '{}' is not a UUID", id);
            return Ok(None);
        };

        let ticket = sqlx::query_as::<_, Ticket>(&format!(
            "SELECT {} FROM tickets WHERE id = $1",
            TICKET_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get ticket by ID: {:?}", e);
            e
        })?;

        Ok(ticket)
    }

    async fn insert(&self, ticket: NewTicket) -> Result<Ticket, RepositoryError> {
        let created = sqlx::query_as::<_, Ticket>(&format!(
            r#"
            INSERT INTO tickets (description, category, sentiment, processed)
            VALUES ($1, $2, $3, FALSE)
            RETURNING {}
            "#,
            TICKET_COLUMNS
        ))
        .bind(&ticket.description)
        .bind(ticket.category)
        .bind(ticket.sentiment)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create ticket: {:?}", e);
            e
        })?
        .ok_or_else(|| RepositoryError::WriteFailed("insert returned no row".to_string()))?;

        tracing::info!("Ticket created: id={}", created.id);

        Ok(created)
    }

    async fn update(&self, id: Uuid, update: TicketUpdate) -> Result<Ticket, RepositoryError> {
        let updated = sqlx::query_as::<_, Ticket>(&format!(
            r#"
            UPDATE tickets
            SET category = $2, sentiment = $3, processed = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            TICKET_COLUMNS
        ))
        .bind(id)
        .bind(update.category)
        .bind(update.sentiment)
        .bind(update.processed)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update ticket {}: {:?}", id, e);
            e
        })?
        .ok_or(RepositoryError::NotFound(id))?;

        tracing::info!(
            "Ticket updated: id={}, category={}, sentiment={}, processed={}",
            updated.id,
            update.category,
            update.sentiment,
            update.processed
        );

        Ok(updated)
    }
}
