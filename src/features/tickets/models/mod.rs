pub mod analysis;
pub mod ticket;

pub use analysis::{AnalysisResult, Category, Sentiment};
pub use ticket::{NewTicket, Ticket, TicketUpdate};
