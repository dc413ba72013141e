use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::errors::ReportError;
use super::provider::GroundedProvider;
use super::types::ProviderResponse;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(api_key: &str, model: Option<&str>) -> Self {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: &str, model: Option<&str>, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

/// Request body for a single-turn generation with Google Search grounding.
pub fn grounded_request_body(prompt: &str) -> Value {
    json!({
        "contents": [{"role": "user", "parts": [{"text": prompt}]}],
        "tools": [{"googleSearch": {}}],
    })
}

/// `error.message` from a provider error body, if it has one.
fn provider_error_message(body: &str) -> Option<String> {
    let data: Value = serde_json::from_str(body).ok()?;
    data["error"]["message"].as_str().map(String::from)
}

fn map_transport_error(e: reqwest::Error) -> ReportError {
    if e.is_connect() || e.is_timeout() || e.is_request() {
        ReportError::Network(format!("Gemini request failed: {}", e))
    } else {
        ReportError::LLMApi(format!("Gemini request failed: {}", e))
    }
}

#[async_trait]
impl GroundedProvider for GeminiProvider {
    async fn generate_grounded(&self, prompt: &str) -> Result<ProviderResponse, ReportError> {
        let started = Instant::now();

        let resp = self.client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&grounded_request_body(prompt))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = resp.status();
        let body = resp.text().await.map_err(map_transport_error)?;

        match status.as_u16() {
            429 => return Err(ReportError::RateLimit("Gemini rate limit".into())),
            401 | 403 => {
                let msg = provider_error_message(&body).unwrap_or_else(|| "Invalid Gemini API key".into());
                return Err(ReportError::Authentication(msg));
            }
            _ if !status.is_success() => {
                let msg = provider_error_message(&body).unwrap_or_else(|| format!("HTTP {}", status));
                return Err(ReportError::LLMApi(msg));
            }
            _ => {}
        }

        let latency_ms = started.elapsed().as_millis() as u64;
        debug!(model = %self.model, latency_ms, bytes = body.len(), "Gemini grounded completion");

        Ok(ProviderResponse {
            raw_envelope: body,
            model: self.model.clone(),
            latency_ms,
        })
    }

    fn provider_name(&self) -> &str { "gemini" }
    fn model_name(&self) -> &str { &self.model }
}
