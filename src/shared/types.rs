use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body returned with every non-2xx response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable description of the failure
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl ErrorResponse {
    pub fn new(detail: String, errors: Option<Vec<String>>) -> Self {
        Self { detail, errors }
    }
}
