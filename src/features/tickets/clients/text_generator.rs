use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use crate::core::error::AppError;
use crate::shared::prompts::{Prompt, TemplateError};

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Inference request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Inference endpoint returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Inference endpoint returned an invalid response: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Prompt(#[from] TemplateError),
}

impl From<InferenceError> for AppError {
    fn from(err: InferenceError) -> Self {
        match err {
            InferenceError::Prompt(e) => AppError::Internal(e.to_string()),
            other => {
                tracing::error!("Inference call failed: {}", other);
                AppError::ExternalServiceError("Inference service unavailable".to_string())
            }
        }
    }
}

/// A hosted model that turns a prompt into free text
///
/// `Ok(None)` means the endpoint answered successfully but produced no result.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &Prompt) -> Result<Option<String>, InferenceError>;
}

/// Turn a non-success response into `InferenceError::Status` with a truncated body
pub(crate) async fn error_for_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, InferenceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(InferenceError::Status {
        status,
        body: body.chars().take(500).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode as HttpStatus;
    use axum::response::IntoResponse;

    #[test]
    fn test_upstream_errors_map_to_bad_gateway() {
        let err = InferenceError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: "loading".into(),
        };
        let app_err: AppError = err.into();
        assert_eq!(app_err.into_response().status(), HttpStatus::BAD_GATEWAY);

        let app_err: AppError = InferenceError::InvalidResponse("not json".into()).into();
        assert_eq!(app_err.into_response().status(), HttpStatus::BAD_GATEWAY);
    }

    #[test]
    fn test_prompt_errors_are_internal() {
        let app_err: AppError =
            InferenceError::Prompt(TemplateError::NotFound("x.jinja".into())).into();
        assert_eq!(
            app_err.into_response().status(),
            HttpStatus::INTERNAL_SERVER_ERROR
        );
    }
}
