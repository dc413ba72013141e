use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::{ErrorClassification, ReportError};
use crate::llm::GroundedProvider;
use crate::models::{Report, ReportEnvelope, Source};
use super::dedup::sources_from_envelope;
use super::parser::parse_envelope;

/// What one envelope yields. Citations come straight from grounding metadata
/// and survive a payload that failed to parse.
#[derive(Debug)]
pub struct ReportOutcome {
    pub report: Result<Report, ReportError>,
    pub sources: Vec<Source>,
}

pub fn process_envelope(envelope: &ReportEnvelope) -> ReportOutcome {
    ReportOutcome {
        report: parse_envelope(envelope),
        sources: sources_from_envelope(envelope),
    }
}

/// A successful generation, as handed to renderers and exporters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedReport {
    pub generation_id: String,
    pub generated_at: DateTime<Utc>,
    pub model: String,
    pub report: Report,
    pub sources: Vec<Source>,
}

/// A failed generation: the classified error plus any citations recovered.
#[derive(Debug)]
pub struct GenerationFailure {
    pub error: ReportError,
    pub classification: ErrorClassification,
    pub sources: Vec<Source>,
}

impl GenerationFailure {
    pub fn new(error: ReportError, sources: Vec<Source>) -> Self {
        let classification = error.classify_logged();
        Self { error, classification, sources }
    }

    pub fn message(&self) -> &str {
        &self.classification.message
    }
}

impl std::fmt::Display for GenerationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.classification.message)
    }
}

impl std::error::Error for GenerationFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// One request/response cycle: call the provider, decode the envelope,
/// parse the report and collect citations.
pub async fn generate_report(
    provider: &dyn GroundedProvider,
    prompt: &str,
) -> Result<GeneratedReport, GenerationFailure> {
    let generation_id = uuid::Uuid::new_v4().to_string();
    info!(
        generation_id = %generation_id,
        provider = provider.provider_name(),
        model = provider.model_name(),
        "Requesting weekly report"
    );

    let response = provider
        .generate_grounded(prompt)
        .await
        .map_err(|e| GenerationFailure::new(e, Vec::new()))?;

    let envelope: ReportEnvelope = serde_json::from_str(&response.raw_envelope).map_err(|e| {
        GenerationFailure::new(
            ReportError::LLMApi(format!("Unreadable response envelope: {}", e)),
            Vec::new(),
        )
    })?;

    if let Some(usage) = &envelope.usage_metadata {
        debug!(
            prompt_tokens = usage.prompt_token_count,
            output_tokens = usage.candidates_token_count,
            total_tokens = usage.total_token_count,
            "Token usage"
        );
    }

    let outcome = process_envelope(&envelope);
    match outcome.report {
        Ok(report) => {
            info!(
                generation_id = %generation_id,
                findings = report.total_findings(),
                high_priority = report.high_priority_count(),
                alerts = report.critical_alerts.len(),
                sources = outcome.sources.len(),
                latency_ms = response.latency_ms,
                "Report generated"
            );
            Ok(GeneratedReport {
                generation_id,
                generated_at: Utc::now(),
                model: response.model,
                report,
                sources: outcome.sources,
            })
        }
        Err(e) => Err(GenerationFailure::new(e, outcome.sources)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCategory;
    use crate::llm::ProviderResponse;
    use async_trait::async_trait;
    use serde_json::json;

    struct CannedProvider(Result<String, fn() -> ReportError>);

    #[async_trait]
    impl GroundedProvider for CannedProvider {
        async fn generate_grounded(&self, _prompt: &str) -> Result<ProviderResponse, ReportError> {
            match &self.0 {
                Ok(body) => Ok(ProviderResponse {
                    raw_envelope: body.clone(),
                    model: "canned".into(),
                    latency_ms: 1,
                }),
                Err(make) => Err(make()),
            }
        }
        fn provider_name(&self) -> &str { "canned" }
        fn model_name(&self) -> &str { "canned" }
    }

    fn grounded_envelope(text: &str) -> String {
        json!({
            "candidates": [{
                "content": {"parts": [{"text": text}]},
                "finishReason": "STOP",
                "groundingMetadata": {"groundingChunks": [
                    {"web": {"uri": "https://minsalud.gov.co", "title": "MinSalud"}}
                ]}
            }]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_generate_success() {
        let provider = CannedProvider(Ok(grounded_envelope(r#"{"executiveSummary": "Resumen"}"#)));
        let generated = generate_report(&provider, "p").await.unwrap();
        assert_eq!(generated.report.executive_summary, "Resumen");
        assert_eq!(generated.sources.len(), 1);
        assert_eq!(generated.model, "canned");
        assert!(!generated.generation_id.is_empty());
    }

    #[tokio::test]
    async fn test_sources_survive_invalid_payload() {
        let provider = CannedProvider(Ok(grounded_envelope("{\"executiveSummary\": \"x\",}")));
        let failure = generate_report(&provider, "p").await.unwrap_err();
        assert_eq!(failure.classification.category, ErrorCategory::InvalidJson);
        assert_eq!(failure.sources.len(), 1);
        assert_eq!(failure.sources[0].title, "MinSalud");
    }

    #[tokio::test]
    async fn test_unreadable_envelope_is_generic() {
        let provider = CannedProvider(Ok("<html>bad gateway</html>".into()));
        let failure = generate_report(&provider, "p").await.unwrap_err();
        assert_eq!(failure.classification.category, ErrorCategory::Unavailable);
    }

    #[tokio::test]
    async fn test_provider_network_error() {
        let provider = CannedProvider(Err(|| ReportError::Network("connection refused".into())));
        let failure = generate_report(&provider, "p").await.unwrap_err();
        assert_eq!(failure.classification.category, ErrorCategory::Network);
        assert!(failure.sources.is_empty());
        assert_eq!(failure.to_string(), failure.message());
    }
}
