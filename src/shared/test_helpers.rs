//! Fakes and fixtures shared by unit and handler tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use axum::Router;
use chrono::Utc;
use uuid::Uuid;

use crate::features::tickets::clients::{InferenceError, TextGenerator};
use crate::features::tickets::models::{AnalysisResult, NewTicket, Ticket, TicketUpdate};
use crate::features::tickets::repositories::{RepositoryError, TicketRepository};
use crate::shared::prompts::Prompt;

/// Serve `router` on an ephemeral local port and return its base URL
pub async fn spawn_stub_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

/// A plausible ticket description
pub fn fake_description() -> String {
    use fake::faker::lorem::en::Sentence;
    use fake::Fake;

    Sentence(4..10).fake()
}

/// In-memory ticket store that records writes
#[derive(Default)]
pub struct InMemoryTicketRepository {
    tickets: Mutex<HashMap<Uuid, Ticket>>,
    writes: AtomicUsize,
    reject_updates: bool,
}

impl InMemoryTicketRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose updates behave as if the row vanished
    pub fn rejecting_updates() -> Self {
        Self {
            reject_updates: true,
            ..Self::default()
        }
    }

    /// Seed an unprocessed ticket
    pub fn seed(&self, description: &str) -> Uuid {
        self.seed_ticket(description, None, false)
    }

    /// Seed a ticket that has already been analyzed
    pub fn seed_processed(&self, description: &str, result: AnalysisResult) -> Uuid {
        self.seed_ticket(description, Some(result), true)
    }

    fn seed_ticket(
        &self,
        description: &str,
        labels: Option<AnalysisResult>,
        processed: bool,
    ) -> Uuid {
        let now = Utc::now();
        let ticket = Ticket {
            id: Uuid::new_v4(),
            description: description.to_string(),
            category: labels.map(|l| l.category),
            sentiment: labels.map(|l| l.sentiment),
            processed,
            created_at: now,
            updated_at: now,
        };
        let id = ticket.id;
        self.tickets.lock().unwrap().insert(id, ticket);
        id
    }

    pub fn snapshot(&self, id: Uuid) -> Option<Ticket> {
        self.tickets.lock().unwrap().get(&id).cloned()
    }

    /// Number of successful inserts and updates
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TicketRepository for InMemoryTicketRepository {
    async fn get(&self, id: &str) -> Result<Option<Ticket>, RepositoryError> {
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(None);
        };
        Ok(self.snapshot(id))
    }

    async fn insert(&self, ticket: NewTicket) -> Result<Ticket, RepositoryError> {
        let now = Utc::now();
        let created = Ticket {
            id: Uuid::new_v4(),
            description: ticket.description,
            category: ticket.category,
            sentiment: ticket.sentiment,
            processed: false,
            created_at: now,
            updated_at: now,
        };

        self.tickets
            .lock()
            .unwrap()
            .insert(created.id, created.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);

        Ok(created)
    }

    async fn update(&self, id: Uuid, update: TicketUpdate) -> Result<Ticket, RepositoryError> {
        if self.reject_updates {
            return Err(RepositoryError::NotFound(id));
        }

        let mut tickets = self.tickets.lock().unwrap();
        let ticket = tickets.get_mut(&id).ok_or(RepositoryError::NotFound(id))?;

        ticket.category = Some(update.category);
        ticket.sentiment = Some(update.sentiment);
        ticket.processed = update.processed;
        ticket.updated_at = Utc::now();
        self.writes.fetch_add(1, Ordering::SeqCst);

        Ok(ticket.clone())
    }
}

/// Canned behavior for [`StubGenerator`]
#[derive(Debug, Clone)]
pub enum StubReply {
    Text(String),
    Empty,
    Unavailable,
}

/// Text generator returning a canned reply and counting calls
pub struct StubGenerator {
    reply: StubReply,
    calls: AtomicUsize,
    prompts: Mutex<Vec<Prompt>>,
}

impl StubGenerator {
    pub fn new(reply: StubReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::new(StubReply::Text(text.to_string()))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<Prompt> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, prompt: &Prompt) -> Result<Option<String>, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.clone());

        match &self.reply {
            StubReply::Text(text) => Ok(Some(text.clone())),
            StubReply::Empty => Ok(None),
            StubReply::Unavailable => Err(InferenceError::Status {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                body: "stub unavailable".to_string(),
            }),
        }
    }
}
