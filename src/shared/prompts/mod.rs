//! Prompt template management module.
//!
//! Templates are stored in `templates/prompts/` and use Jinja2 syntax.
//!
//! # Usage
//!
//! ```ignore
//! use crate::shared::prompts::render_ticket_analysis_prompt;
//!
//! let prompt = render_ticket_analysis_prompt(
//!     "My invoice is wrong",
//!     &["billing", "other"],
//!     &["negative", "neutral"],
//! )?;
//! ```

pub mod engine;

pub use engine::{render_template, TemplateError};

use minijinja::Value;
use std::collections::HashMap;

/// A rendered prompt split into the system instruction and the user turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Render the ticket analysis prompt.
///
/// Every allowed label is listed so the model is constrained to the closed
/// vocabularies; the first entry of each list is used in the inline example.
pub fn render_ticket_analysis_prompt(
    ticket_text: &str,
    categories: &[&str],
    sentiments: &[&str],
) -> Result<Prompt, TemplateError> {
    let mut ctx: HashMap<&str, Value> = HashMap::new();
    ctx.insert("ticket_text", Value::from(ticket_text));
    ctx.insert("categories", Value::from(categories.iter().map(|s| s.to_string()).collect::<Vec<String>>()));
    ctx.insert("sentiments", Value::from(sentiments.iter().map(|s| s.to_string()).collect::<Vec<String>>()));
    ctx.insert(
        "example_category",
        Value::from(categories.first().copied().unwrap_or("")),
    );
    ctx.insert(
        "example_sentiment",
        Value::from(sentiments.first().copied().unwrap_or("")),
    );

    Ok(Prompt {
        system: render_template("ticket_analysis/system.jinja", &ctx)?,
        user: render_template("ticket_analysis/user.jinja", &ctx)?,
    })
}

/// Flatten a prompt into a single ChatML string for raw text-generation endpoints
pub fn render_chatml(prompt: &Prompt) -> Result<String, TemplateError> {
    let mut ctx: HashMap<&str, Value> = HashMap::new();
    ctx.insert("system", Value::from(prompt.system.as_str()));
    ctx.insert("user", Value::from(prompt.user.as_str()));

    render_template("chatml.jinja", &ctx)
}
