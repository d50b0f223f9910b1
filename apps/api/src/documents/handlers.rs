//! Axum route handlers for the Documents API.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::documents::normalizer::FallbackReason;
use crate::documents::pipeline::generate_document;
use crate::documents::template::{AnswerField, DocumentKind};
use crate::documents::validator::BODY_FIELD;
use crate::errors::AppError;
use crate::llm_client::prompts::Locale;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DocumentSummary {
    pub kind: DocumentKind,
    pub title: &'static str,
    pub version: u32,
    pub locale: Locale,
    pub response_field: &'static str,
    pub fields: &'static [AnswerField],
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/generate-blueprint
pub async fn handle_clarity_map(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    respond(&state, DocumentKind::ClarityMap, payload).await
}

/// POST /api/generate-project-brief
pub async fn handle_project_brief(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    respond(&state, DocumentKind::ProjectBrief, payload).await
}

/// POST /api/v1/documents/:kind
pub async fn handle_generate(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let kind = kind
        .parse::<DocumentKind>()
        .map_err(|e| AppError::NotFound(e.to_string()))?;
    respond(&state, kind, payload).await
}

/// GET /api/v1/documents
///
/// Lists every document type with the fields its form must send.
pub async fn handle_list_documents() -> Json<Vec<DocumentSummary>> {
    Json(
        DocumentKind::ALL
            .into_iter()
            .map(|kind| {
                let template = kind.template();
                DocumentSummary {
                    kind,
                    title: template.title,
                    version: template.version,
                    locale: template.locale,
                    response_field: template.response_field,
                    fields: template.fields,
                }
            })
            .collect(),
    )
}

/// Any method other than POST on a generation route.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Runs the pipeline and writes `{ <response_field>: html }`.
///
/// Provider failures answer 500 with the fallback fragment; an empty
/// completion answers 200 with its own fragment.
async fn respond(
    state: &AppState,
    kind: DocumentKind,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(payload) = payload.map_err(|rejection| AppError::InvalidPayload {
        field: BODY_FIELD.to_string(),
        reason: rejection.body_text(),
    })?;

    let template = kind.template();
    let span = info_span!("generate_document", kind = %kind, request_id = %Uuid::new_v4());
    let document = generate_document(state.provider.as_ref(), template, &payload)
        .instrument(span)
        .await?;

    let status = match document.fallback {
        Some(FallbackReason::ProviderFailure) => StatusCode::INTERNAL_SERVER_ERROR,
        Some(FallbackReason::EmptyCompletion) | None => StatusCode::OK,
    };

    let mut body = Map::new();
    body.insert(
        template.response_field.to_string(),
        Value::String(document.html),
    );

    Ok((status, Json(Value::Object(body))).into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::Request,
    };
    use serde_json::json;
    use tower::ServiceExt;

    use crate::llm_client::{
        CompletionEnvelope, CompletionError, CompletionProvider, GenerationRequest,
        GenerationResult,
    };
    use crate::routes::build_router;
    use crate::state::AppState;

    use super::*;

    const SCALING_ARCHITECT_HTML: &str = "```html\n<h2>Ava's Founder Clarity Map</h2>\
        <h3>Your Founder Archetype</h3><p>You are The Scaling Architect.</p>\
        <h3>Roadmap to Your Client OS</h3><p>This clarity map is just the beginning.</p>```";

    const STUB_ERROR_BODY: &str = "{\"error\":{\"code\":500,\"message\":\"backend meltdown xyz\"}}";

    enum Reply {
        Text(&'static str),
        HttpError,
        NoCandidates,
    }

    struct StubProvider {
        reply: Reply,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CompletionProvider for StubProvider {
        async fn complete(&self, _request: &GenerationRequest) -> GenerationResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Reply::Text(text) => Ok(CompletionEnvelope::from_text(text)),
                Reply::HttpError => Err(CompletionError::Http {
                    status: 500,
                    body: STUB_ERROR_BODY.to_string(),
                }),
                Reply::NoCandidates => Ok(CompletionEnvelope::default()),
            }
        }
    }

    fn stub(reply: Reply) -> Arc<StubProvider> {
        Arc::new(StubProvider {
            reply,
            calls: AtomicUsize::new(0),
        })
    }

    fn ava() -> Value {
        json!({
            "name": "Ava",
            "mission": "Build the operating system for boutique gyms",
            "next_level": "Scale Operations & Team",
            "bottleneck": "I am still the one approving every hire and every refund",
            "mental_energy": "Team / Operations",
            "first_action": "Write the onboarding playbook for new coaches",
        })
    }

    async fn send(
        provider: Arc<StubProvider>,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let app = build_router(AppState { provider });
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(value) => Body::from(value.to_string()),
                None => Body::empty(),
            })
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_clarity_map_end_to_end() {
        let provider = stub(Reply::Text(SCALING_ARCHITECT_HTML));
        let (status, body) = send(
            provider.clone(),
            "POST",
            "/api/generate-blueprint",
            Some(ava()),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let html = body["blueprintHtml"].as_str().unwrap();
        assert!(html.starts_with("<h2>"));
        assert!(html.contains("Scaling Architect"));
        assert!(!html.contains("```"));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_provider_http_error_returns_fixed_fallback() {
        let (status, body) = send(
            stub(Reply::HttpError),
            "POST",
            "/api/generate-blueprint",
            Some(ava()),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let html = body["blueprintHtml"].as_str().unwrap();
        assert_eq!(
            html,
            DocumentKind::ClarityMap.template().fallbacks.provider_error
        );
        assert!(!html.contains("backend meltdown"));
        assert!(!body.to_string().contains("xyz"));
    }

    #[tokio::test]
    async fn test_empty_completion_returns_ok_with_fallback() {
        let (status, body) = send(
            stub(Reply::NoCandidates),
            "POST",
            "/api/generate-blueprint",
            Some(ava()),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["blueprintHtml"],
            DocumentKind::ClarityMap.template().fallbacks.empty_completion
        );
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request_without_provider_call() {
        let provider = stub(Reply::Text(SCALING_ARCHITECT_HTML));
        let mut payload = ava();
        payload.as_object_mut().unwrap().remove("mental_energy");

        let (status, body) = send(
            provider.clone(),
            "POST",
            "/api/generate-blueprint",
            Some(payload),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "mental_energy");
        assert_eq!(body["code"], "INVALID_PAYLOAD");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let provider = stub(Reply::Text(SCALING_ARCHITECT_HTML));
        let app = build_router(AppState {
            provider: provider.clone(),
        });
        let request = Request::builder()
            .method("POST")
            .uri("/api/generate-project-brief")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_get_is_method_not_allowed() {
        let (status, body) = send(
            stub(Reply::NoCandidates),
            "GET",
            "/api/generate-project-brief",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({ "message": "Method Not Allowed" }));
    }

    #[tokio::test]
    async fn test_project_brief_uses_brief_field() {
        let (status, body) = send(
            stub(Reply::Text("<h2>Simulation de Projet pour Léa</h2><p>Bienvenue.</p>")),
            "POST",
            "/api/generate-project-brief",
            Some(json!({
                "name": "Léa",
                "project_type": "Application mobile",
                "main_goal": "Fidéliser mes clients",
                "budget_range": "10k - 25k €",
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["briefHtml"],
            "<h2>Simulation de Projet pour Léa</h2><p>Bienvenue.</p>"
        );
    }

    #[tokio::test]
    async fn test_generic_route_dispatches_by_kind() {
        let (status, body) = send(
            stub(Reply::Text(SCALING_ARCHITECT_HTML)),
            "POST",
            "/api/v1/documents/clarity-map",
            Some(ava()),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["blueprintHtml"]
            .as_str()
            .unwrap()
            .contains("Scaling Architect"));
    }

    #[tokio::test]
    async fn test_generic_route_unknown_kind_is_not_found() {
        let provider = stub(Reply::NoCandidates);
        let (status, _) = send(
            provider.clone(),
            "POST",
            "/api/v1/documents/pitch-deck",
            Some(ava()),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_list_documents_describes_forms() {
        let (status, body) = send(stub(Reply::NoCandidates), "GET", "/api/v1/documents", None).await;

        assert_eq!(status, StatusCode::OK);
        let documents = body.as_array().unwrap();
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0]["kind"], "clarity-map");
        assert_eq!(documents[0]["response_field"], "blueprintHtml");
        assert_eq!(documents[0]["fields"][2]["key"], "next_level");
        assert_eq!(documents[1]["kind"], "project-brief");
        assert_eq!(documents[1]["locale"], "french");
    }
}
