use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::tickets::clients::TextGenerator;
use crate::features::tickets::models::{AnalysisResult, Category, Sentiment};
use crate::shared::prompts::render_ticket_analysis_prompt;

/// Classifies free text into a category and sentiment using the configured model
pub struct AnalysisService {
    generator: Arc<dyn TextGenerator>,
}

impl AnalysisService {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Run one analysis round-trip.
    ///
    /// An empty result from the endpoint yields the default labels without
    /// parsing. Transport and status failures are returned as errors.
    pub async fn analyze(&self, text: &str) -> Result<AnalysisResult> {
        let categories = Category::ALL.map(|c| c.as_str());
        let sentiments = Sentiment::ALL.map(|s| s.as_str());

        let prompt = render_ticket_analysis_prompt(text, &categories, &sentiments)
            .map_err(|e| AppError::Internal(format!("Failed to render prompt: {}", e)))?;

        let Some(reply) = self.generator.generate(&prompt).await? else {
            tracing::warn!("Model returned no result, using default labels");
            return Ok(AnalysisResult::default());
        };

        tracing::debug!(
            "Model reply (first 500 chars): {}",
            reply.chars().take(500).collect::<String>()
        );

        Ok(AnalysisResult::parse_reply(&reply))
    }
}
