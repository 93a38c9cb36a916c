pub mod chat_completions_client;
pub mod text_generation_client;
pub mod text_generator;

use std::sync::Arc;

pub use text_generator::{InferenceError, TextGenerator};

use crate::core::config::{InferenceBackend, InferenceConfig};
use chat_completions_client::ChatCompletionsClient;
use text_generation_client::TextGenerationClient;

/// Build the text generator for the configured backend
pub fn build_text_generator(
    config: &InferenceConfig,
) -> Result<Arc<dyn TextGenerator>, InferenceError> {
    tracing::info!(
        "Using {} inference backend at {}",
        config.backend,
        config.endpoint_url
    );

    let generator: Arc<dyn TextGenerator> = match config.backend {
        InferenceBackend::TextGeneration => Arc::new(TextGenerationClient::new(config)?),
        InferenceBackend::ChatCompletions => Arc::new(ChatCompletionsClient::new(config)?),
    };

    Ok(generator)
}
