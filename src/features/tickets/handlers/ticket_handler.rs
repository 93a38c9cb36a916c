use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::tickets::dtos::{
    AnalyzeTextRequestDto, AnalyzeTextResponseDto, CreateTicketRequestDto,
    CreateTicketResponseDto, ProcessTicketRequestDto, ProcessTicketResponseDto,
};
use crate::features::tickets::services::TicketService;
use crate::shared::types::ErrorResponse;

/// Analyze a stored ticket and persist its category and sentiment
#[utoipa::path(
    post,
    path = "/process-ticket",
    request_body = ProcessTicketRequestDto,
    responses(
        (status = 200, description = "Ticket processed (or already processed)", body = ProcessTicketResponseDto),
        (status = 400, description = "Ticket has an empty description", body = ErrorResponse),
        (status = 404, description = "Ticket not found", body = ErrorResponse),
        (status = 422, description = "Malformed request body", body = ErrorResponse),
        (status = 502, description = "Inference service unavailable", body = ErrorResponse)
    ),
    tag = "tickets"
)]
pub async fn process_ticket(
    State(service): State<Arc<TicketService>>,
    AppJson(dto): AppJson<ProcessTicketRequestDto>,
) -> Result<Json<ProcessTicketResponseDto>> {
    let outcome = service.process(&dto.ticket_id).await?;
    Ok(Json(ProcessTicketResponseDto::new(dto.ticket_id, outcome)))
}

/// Classify free text without storing anything
#[utoipa::path(
    post,
    path = "/analyze-text",
    request_body = AnalyzeTextRequestDto,
    responses(
        (status = 200, description = "Analysis result", body = AnalyzeTextResponseDto),
        (status = 400, description = "Text is empty", body = ErrorResponse),
        (status = 422, description = "Malformed request body", body = ErrorResponse),
        (status = 502, description = "Inference service unavailable", body = ErrorResponse)
    ),
    tag = "tickets"
)]
pub async fn analyze_text(
    State(service): State<Arc<TicketService>>,
    AppJson(dto): AppJson<AnalyzeTextRequestDto>,
) -> Result<Json<AnalyzeTextResponseDto>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let result = service.analyze_text(&dto.text).await?;
    Ok(Json(result.into()))
}

/// Create an unprocessed ticket
#[utoipa::path(
    post,
    path = "/create-ticket",
    request_body = CreateTicketRequestDto,
    responses(
        (status = 201, description = "Ticket created", body = CreateTicketResponseDto),
        (status = 400, description = "Description is empty", body = ErrorResponse),
        (status = 422, description = "Malformed request body or unknown label", body = ErrorResponse)
    ),
    tag = "tickets"
)]
pub async fn create_ticket(
    State(service): State<Arc<TicketService>>,
    AppJson(dto): AppJson<CreateTicketRequestDto>,
) -> Result<(StatusCode, Json<CreateTicketResponseDto>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let ticket = service
        .create(&dto.description, dto.category, dto.sentiment)
        .await?;

    Ok((StatusCode::CREATED, Json(ticket.into())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::tickets::models::{AnalysisResult, Category, Sentiment};
    use crate::features::tickets::routes::routes;
    use crate::features::tickets::services::AnalysisService;
    use crate::shared::test_helpers::{
        fake_description, InMemoryTicketRepository, StubGenerator, StubReply,
    };
    use axum::http::header;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    struct Harness {
        server: TestServer,
        repository: Arc<InMemoryTicketRepository>,
        generator: Arc<StubGenerator>,
    }

    fn harness_with(repository: InMemoryTicketRepository, reply: StubReply) -> Harness {
        let repository = Arc::new(repository);
        let generator = Arc::new(StubGenerator::new(reply));
        let analysis = Arc::new(AnalysisService::new(generator.clone()));
        let service = Arc::new(TicketService::new(repository.clone(), analysis));

        Harness {
            server: TestServer::new(routes(service)).unwrap(),
            repository,
            generator,
        }
    }

    fn harness(reply: &str) -> Harness {
        harness_with(
            InMemoryTicketRepository::new(),
            StubReply::Text(reply.to_string()),
        )
    }

    const BILLING_NEGATIVE: &str =
        r#"Analysis: {"category": "BILLING", "sentiment": "Negative"}"#;

    // ==================== /process-ticket ====================

    #[tokio::test]
    async fn test_process_ticket_success() {
        let h = harness(BILLING_NEGATIVE);
        let id = h.repository.seed("Mi factura está mal");

        let response = h
            .server
            .post("/process-ticket")
            .json(&json!({ "ticket_id": id.to_string() }))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "ticket_id": id,
            "category": "billing",
            "sentiment": "negative",
            "processed": true,
            "message": "Ticket processed successfully"
        }));

        let stored = h.repository.snapshot(id).unwrap();
        assert!(stored.processed);
        assert_eq!(stored.category, Some(Category::Billing));
        assert_eq!(stored.sentiment, Some(Sentiment::Negative));
    }

    #[tokio::test]
    async fn test_process_ticket_echoes_requested_id() {
        let h = harness(BILLING_NEGATIVE);
        let id = h.repository.seed(&fake_description());

        for requested in [
            id.to_string().to_uppercase(),
            format!("{{{}}}", id),
        ] {
            let response = h
                .server
                .post("/process-ticket")
                .json(&json!({ "ticket_id": requested }))
                .await;

            response.assert_status_ok();
            let json: Value = response.json();
            assert_eq!(json["ticket_id"], requested.as_str());
        }
        assert_eq!(h.generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_process_ticket_twice_returns_stored_labels() {
        let h = harness(BILLING_NEGATIVE);
        let id = h.repository.seed(&fake_description());
        let body = json!({ "ticket_id": id.to_string() });

        h.server
            .post("/process-ticket")
            .json(&body)
            .await
            .assert_status_ok();
        let second = h.server.post("/process-ticket").json(&body).await;

        second.assert_status_ok();
        let json: Value = second.json();
        assert_eq!(json["category"], "billing");
        assert_eq!(json["sentiment"], "negative");
        assert_eq!(json["message"], "Ticket had already been processed");
        assert_eq!(h.generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_process_ticket_already_processed_skips_model() {
        let h = harness(BILLING_NEGATIVE);
        let id = h.repository.seed_processed(
            "Thanks for the quick refund",
            AnalysisResult::new(Category::Returns, Sentiment::Positive),
        );

        let response = h
            .server
            .post("/process-ticket")
            .json(&json!({ "ticket_id": id.to_string() }))
            .await;

        response.assert_status_ok();
        let json: Value = response.json();
        assert_eq!(json["category"], "returns");
        assert_eq!(json["sentiment"], "positive");
        assert_eq!(h.generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_process_ticket_unknown_id_is_404() {
        let h = harness(BILLING_NEGATIVE);

        for id in [uuid::Uuid::new_v4().to_string(), "12345".to_string(), String::new()] {
            let response = h
                .server
                .post("/process-ticket")
                .json(&json!({ "ticket_id": id }))
                .await;

            response.assert_status(StatusCode::NOT_FOUND);
            let json: Value = response.json();
            assert_eq!(json["detail"], "Ticket not found");
        }
    }

    #[tokio::test]
    async fn test_process_ticket_empty_description_is_400() {
        let h = harness(BILLING_NEGATIVE);
        let id = h.repository.seed("");

        let response = h
            .server
            .post("/process-ticket")
            .json(&json!({ "ticket_id": id.to_string() }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(h.repository.write_count(), 0);
        assert!(!h.repository.snapshot(id).unwrap().processed);
    }

    #[tokio::test]
    async fn test_process_ticket_missing_field_is_422() {
        let h = harness(BILLING_NEGATIVE);

        let response = h.server.post("/process-ticket").json(&json!({})).await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_process_ticket_upstream_failure_is_502() {
        let h = harness_with(InMemoryTicketRepository::new(), StubReply::Unavailable);
        let id = h.repository.seed(&fake_description());

        let response = h
            .server
            .post("/process-ticket")
            .json(&json!({ "ticket_id": id.to_string() }))
            .await;

        response.assert_status(StatusCode::BAD_GATEWAY);
        assert!(!h.repository.snapshot(id).unwrap().processed);
    }

    #[tokio::test]
    async fn test_process_ticket_failed_update_is_500() {
        let h = harness_with(
            InMemoryTicketRepository::rejecting_updates(),
            StubReply::Text(BILLING_NEGATIVE.to_string()),
        );
        let id = h.repository.seed(&fake_description());

        let response = h
            .server
            .post("/process-ticket")
            .json(&json!({ "ticket_id": id.to_string() }))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }

    // ==================== /analyze-text ====================

    #[tokio::test]
    async fn test_analyze_text_returns_exactly_two_fields() {
        let h = harness(BILLING_NEGATIVE);

        let response = h
            .server
            .post("/analyze-text")
            .json(&json!({ "text": "I was charged twice this month" }))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({ "category": "billing", "sentiment": "negative" }));
        assert_eq!(h.repository.write_count(), 0);
    }

    #[tokio::test]
    async fn test_analyze_text_unparseable_reply_is_default() {
        let h = harness("Sorry, I am not sure.");

        let response = h
            .server
            .post("/analyze-text")
            .json(&json!({ "text": "hmm" }))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({ "category": "other", "sentiment": "neutral" }));
    }

    #[tokio::test]
    async fn test_analyze_text_blank_is_400() {
        let h = harness(BILLING_NEGATIVE);

        for text in ["", "   "] {
            let response = h
                .server
                .post("/analyze-text")
                .json(&json!({ "text": text }))
                .await;

            response.assert_status(StatusCode::BAD_REQUEST);
        }
        assert_eq!(h.generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_analyze_text_missing_field_is_422() {
        let h = harness(BILLING_NEGATIVE);

        let response = h
            .server
            .post("/analyze-text")
            .json(&json!({ "body": "wrong key" }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_analyze_text_malformed_json_is_400() {
        let h = harness(BILLING_NEGATIVE);

        let response = h
            .server
            .post("/analyze-text")
            .content_type("application/json")
            .bytes(r#"{"text": "#.into())
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_analyze_text_without_json_content_type_is_400() {
        let h = harness(BILLING_NEGATIVE);

        let response = h.server.post("/analyze-text").text("plain text").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.header(header::CONTENT_TYPE),
            "application/json"
        );
    }

    // ==================== /create-ticket ====================

    #[tokio::test]
    async fn test_create_ticket() {
        let h = harness(BILLING_NEGATIVE);

        let response = h
            .server
            .post("/create-ticket")
            .json(&json!({ "description": "  The app crashes on login  ", "category": "tech_support" }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let json: Value = response.json();
        assert_eq!(json["description"], "The app crashes on login");
        assert_eq!(json["category"], "tech_support");
        assert_eq!(json["sentiment"], Value::Null);
        assert_eq!(json["processed"], false);
        assert_eq!(json["message"], "Ticket created successfully");

        let id: uuid::Uuid = serde_json::from_value(json["ticket_id"].clone()).unwrap();
        assert!(h.repository.snapshot(id).is_some());
        assert_eq!(h.generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_create_then_process_ticket() {
        let h = harness(BILLING_NEGATIVE);

        let created: Value = h
            .server
            .post("/create-ticket")
            .json(&json!({ "description": fake_description() }))
            .await
            .json();

        let response = h
            .server
            .post("/process-ticket")
            .json(&json!({ "ticket_id": created["ticket_id"] }))
            .await;

        response.assert_status_ok();
        let json: Value = response.json();
        assert_eq!(json["ticket_id"], created["ticket_id"]);
        assert_eq!(json["processed"], true);
    }

    #[tokio::test]
    async fn test_create_ticket_blank_description_is_400() {
        let h = harness(BILLING_NEGATIVE);

        for description in ["", "  \n "] {
            let response = h
                .server
                .post("/create-ticket")
                .json(&json!({ "description": description }))
                .await;

            response.assert_status(StatusCode::BAD_REQUEST);
        }
        assert_eq!(h.repository.write_count(), 0);
    }

    #[tokio::test]
    async fn test_create_ticket_unknown_label_is_422() {
        let h = harness(BILLING_NEGATIVE);

        let response = h
            .server
            .post("/create-ticket")
            .json(&json!({ "description": "hello", "category": "Billing" }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(h.repository.write_count(), 0);
    }
}
