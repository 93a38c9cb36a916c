pub mod analysis_service;
pub mod ticket_service;

pub use analysis_service::AnalysisService;
pub use ticket_service::{ProcessedTicket, TicketService};
