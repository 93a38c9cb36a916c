use axum::{
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, Request},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use crate::core::error::AppError;
use crate::shared::types::ErrorResponse;

/// Custom JSON extractor that provides consistent error responses
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppJsonRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(AppJsonRejection(rejection)),
        }
    }
}

pub struct AppJsonRejection(JsonRejection);

impl IntoResponse for AppJsonRejection {
    fn into_response(self) -> Response {
        match self.0 {
            // Well-formed JSON that doesn't match the DTO (missing field, wrong type)
            JsonRejection::JsonDataError(err) => {
                AppError::UnprocessableEntity(format!("Invalid JSON data: {}", err.body_text()))
                    .into_response()
            }
            JsonRejection::JsonSyntaxError(err) => {
                AppError::BadRequest(format!("Invalid JSON syntax: {}", err.body_text()))
                    .into_response()
            }
            JsonRejection::MissingJsonContentType(err) => {
                AppError::BadRequest(format!("Missing JSON content type: {}", err.body_text()))
                    .into_response()
            }
            // Body read failures keep their own status (e.g. 413 over the body limit)
            rejection => {
                let status = rejection.status();
                tracing::warn!("Rejected request body ({}): {}", status, rejection.body_text());
                (
                    status,
                    Json(ErrorResponse::new(rejection.body_text(), None)),
                )
                    .into_response()
            }
        }
    }
}
