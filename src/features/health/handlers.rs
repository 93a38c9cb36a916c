use axum::Json;

use crate::features::health::dtos::{HealthResponseDto, RootResponseDto};

/// Service banner
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service banner", body = RootResponseDto)
    ),
    tag = "health"
)]
pub async fn root() -> Json<RootResponseDto> {
    Json(RootResponseDto {
        message: "Support Ticket AI API is running".to_string(),
    })
}

/// Liveness probe. Does not touch the database or the inference endpoint.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponseDto)
    ),
    tag = "health"
)]
pub async fn health_check() -> Json<HealthResponseDto> {
    Json(HealthResponseDto {
        status: "healthy".to_string(),
    })
}
