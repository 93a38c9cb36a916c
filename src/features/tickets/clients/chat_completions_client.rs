use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::text_generator::{error_for_status, InferenceError, TextGenerator};
use crate::core::config::InferenceConfig;
use crate::shared::prompts::Prompt;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for OpenAI-compatible `/v1/chat/completions` endpoints
pub struct ChatCompletionsClient {
    client: reqwest::Client,
    endpoint_url: String,
    api_token: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl ChatCompletionsClient {
    pub fn new(config: &InferenceConfig) -> Result<Self, InferenceError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            endpoint_url: config.endpoint_url.clone(),
            api_token: config.api_token.clone(),
            model: config.model.clone(),
            max_tokens: config.max_new_tokens,
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl TextGenerator for ChatCompletionsClient {
    async fn generate(&self, prompt: &Prompt) -> Result<Option<String>, InferenceError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        tracing::debug!(
            "Calling chat-completions endpoint: {} (model={})",
            self.endpoint_url,
            self.model
        );

        let response = self
            .client
            .post(&self.endpoint_url)
            .bearer_auth(&self.api_token)
            .json(&request)
            .send()
            .await?;

        let body = error_for_status(response).await?.text().await?;

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))?;

        let Some(choice) = parsed.choices.into_iter().next() else {
            tracing::warn!("Chat-completions endpoint returned no choices");
            return Ok(None);
        };

        Ok(Some(choice.message.content.unwrap_or_default()))
    }
}
