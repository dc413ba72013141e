use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tokio::sync::Notify;
use tower::ServiceExt;

use arka::api::{build_router, AppState};
use arka::errors::ReportError;
use arka::llm::{GroundedProvider, ProviderResponse};
use arka::prompts::PromptLoader;

const PAYLOAD: &str = r#"{"executiveSummary":"Resumen semanal","criticalAlerts":["Alerta"],"financialSustainability":[{"title":"Giro directo","summary":"ADRES giró recursos","sentiment":"Positivo"}],"pricingRegulation":[],"newTherapiesAccess":[]}"#;

fn envelope(text: &str) -> String {
    json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }] },
            "finishReason": "STOP",
            "groundingMetadata": { "groundingChunks": [
                { "web": { "uri": "https://adres.gov.co", "title": "ADRES" } }
            ] }
        }]
    })
    .to_string()
}

/// Provider that returns a fixed body, optionally waiting on a gate first.
struct FakeProvider {
    body: Result<String, String>,
    gate: Option<Arc<Notify>>,
}

impl FakeProvider {
    fn ok(body: String) -> Self {
        Self { body: Ok(body), gate: None }
    }
}

#[async_trait]
impl GroundedProvider for FakeProvider {
    async fn generate_grounded(&self, _prompt: &str) -> Result<ProviderResponse, ReportError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match &self.body {
            Ok(body) => Ok(ProviderResponse {
                raw_envelope: body.clone(),
                model: "fake-model".into(),
                latency_ms: 3,
            }),
            Err(message) => Err(ReportError::Network(message.clone())),
        }
    }

    fn provider_name(&self) -> &str {
        "fake"
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}

fn create_test_state(provider: FakeProvider) -> AppState {
    AppState::new(Arc::new(provider), PromptLoader::new(None))
}

fn app(state: &AppState) -> axum::Router {
    build_router(state.clone())
}

fn make_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder().method(method).uri(uri).body(Body::empty()).unwrap()
}

async fn response_json(response: axum::http::Response<Body>) -> Value {
    let (parts, body) = response.into_parts();
    let bytes = body.collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        panic!("Empty response body. Status: {}, Headers: {:?}", parts.status, parts.headers);
    }
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("JSON parse error: {}. Body: {:?}", e, String::from_utf8_lossy(&bytes)))
}

#[tokio::test]
async fn test_health_endpoint() {
    let state = create_test_state(FakeProvider::ok(envelope(PAYLOAD)));
    let response = app(&state).oneshot(make_request("GET", "/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "arka");
}

#[tokio::test]
async fn test_latest_before_any_generation() {
    let state = create_test_state(FakeProvider::ok(envelope(PAYLOAD)));
    let response = app(&state).oneshot(make_request("GET", "/api/reports/latest")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app(&state)
        .oneshot(make_request("GET", "/api/reports/latest/export/pdf"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_generate_then_latest_and_exports() {
    let state = create_test_state(FakeProvider::ok(envelope(&format!("```json\n{}\n```", PAYLOAD))));

    let response = app(&state).oneshot(make_request("POST", "/api/reports")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created = response_json(response).await;
    assert_eq!(created["report"]["executiveSummary"], "Resumen semanal");
    assert_eq!(created["sources"][0]["uri"], "https://adres.gov.co");
    assert_eq!(created["model"], "fake-model");

    let response = app(&state).oneshot(make_request("GET", "/api/reports/latest")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let latest = response_json(response).await;
    assert_eq!(latest["generation_id"], created["generation_id"]);

    let response = app(&state)
        .oneshot(make_request("GET", "/api/reports/latest/export/xlsx"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"informe-estrategico-salud.xlsx\""
    );
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.starts_with(b"PK"));

    let response = app(&state)
        .oneshot(make_request("GET", "/api/reports/latest/export/pdf"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"informe-estrategico-salud.pdf\""
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_parse_failure_returns_classified_error_with_sources() {
    let state = create_test_state(FakeProvider::ok(envelope("{\"executiveSummary\": \"x\",}")));
    let response = app(&state).oneshot(make_request("POST", "/api/reports")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = response_json(response).await;
    assert_eq!(body["category"], "invalid_json");
    assert_eq!(body["error"], "La respuesta de la IA no tenía un formato JSON válido.");
    assert_eq!(body["sources"][0]["title"], "ADRES");

    let response = app(&state).oneshot(make_request("GET", "/api/reports/latest")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_network_failure_is_503() {
    let provider = FakeProvider { body: Err("error sending request: connection refused".into()), gate: None };
    let state = create_test_state(provider);
    let response = app(&state).oneshot(make_request("POST", "/api/reports")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = response_json(response).await;
    assert_eq!(body["category"], "network");
    assert_eq!(body["sources"], json!([]));
}

#[tokio::test]
async fn test_overlapping_generation_is_rejected() {
    let gate = Arc::new(Notify::new());
    let provider = FakeProvider { body: Ok(envelope(PAYLOAD)), gate: Some(Arc::clone(&gate)) };
    let state = create_test_state(provider);

    let first = tokio::spawn(app(&state).oneshot(make_request("POST", "/api/reports")));
    while !state.generation.is_busy() {
        tokio::task::yield_now().await;
    }

    let second = app(&state).oneshot(make_request("POST", "/api/reports")).await.unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);

    gate.notify_one();
    let first = first.await.unwrap().unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    assert!(!state.generation.is_busy());

    let third = app(&state).oneshot(make_request("POST", "/api/reports"));
    gate.notify_one();
    assert_eq!(third.await.unwrap().status(), StatusCode::OK);
}

#[tokio::test]
async fn test_disconnected_client_does_not_cancel_generation() {
    let gate = Arc::new(Notify::new());
    let provider = FakeProvider { body: Ok(envelope(PAYLOAD)), gate: Some(Arc::clone(&gate)) };
    let state = create_test_state(provider);

    let request = tokio::spawn(app(&state).oneshot(make_request("POST", "/api/reports")));
    while !state.generation.is_busy() {
        tokio::task::yield_now().await;
    }
    request.abort();
    assert!(request.await.unwrap_err().is_cancelled());

    gate.notify_one();
    while state.generation.is_busy() {
        tokio::task::yield_now().await;
    }
    let latest = state.generation.latest().await.expect("report should be published");
    assert_eq!(latest.report.executive_summary, "Resumen semanal");
}
