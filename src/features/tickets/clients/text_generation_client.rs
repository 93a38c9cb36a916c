use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::text_generator::{error_for_status, InferenceError, TextGenerator};
use crate::core::config::InferenceConfig;
use crate::shared::prompts::{render_chatml, Prompt};

#[derive(Debug, Serialize)]
struct TextGenerationRequest<'a> {
    inputs: &'a str,
    parameters: TextGenerationParameters,
}

#[derive(Debug, Serialize)]
struct TextGenerationParameters {
    max_new_tokens: u32,
    temperature: f32,
    return_full_text: bool,
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    #[serde(default)]
    generated_text: String,
}

/// Client for Hugging Face style text-generation endpoints
///
/// The prompt is flattened to ChatML and sent as `inputs`; the reply is a
/// list of `{"generated_text": ...}` items of which only the first is used.
pub struct TextGenerationClient {
    client: reqwest::Client,
    endpoint_url: String,
    api_token: String,
    max_new_tokens: u32,
    temperature: f32,
}

impl TextGenerationClient {
    pub fn new(config: &InferenceConfig) -> Result<Self, InferenceError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            endpoint_url: config.endpoint_url.clone(),
            api_token: config.api_token.clone(),
            max_new_tokens: config.max_new_tokens,
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl TextGenerator for TextGenerationClient {
    async fn generate(&self, prompt: &Prompt) -> Result<Option<String>, InferenceError> {
        let inputs = render_chatml(prompt)?;

        let request = TextGenerationRequest {
            inputs: &inputs,
            parameters: TextGenerationParameters {
                max_new_tokens: self.max_new_tokens,
                temperature: self.temperature,
                return_full_text: false,
            },
        };

        tracing::debug!("Calling text-generation endpoint: {}", self.endpoint_url);

        let response = self
            .client
            .post(&self.endpoint_url)
            .bearer_auth(&self.api_token)
            .json(&request)
            .send()
            .await?;

        let body = error_for_status(response).await?.text().await?;

        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))?;

        // Anything other than a non-empty list counts as "no result"
        let Some(first) = value.as_array().and_then(|items| items.first()) else {
            tracing::warn!("Text-generation endpoint returned no results");
            return Ok(None);
        };

        let item: GeneratedText = serde_json::from_value(first.clone())
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))?;

        Ok(Some(item.generated_text))
    }
}
