use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Liveness probe response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponseDto {
    pub status: String,
}

/// Service banner returned from the root path
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RootResponseDto {
    pub message: String,
}
