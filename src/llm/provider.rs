use async_trait::async_trait;
use crate::errors::ReportError;
use super::types::ProviderResponse;

#[async_trait]
pub trait GroundedProvider: Send + Sync {
    /// Generate with web-search grounding enabled and return the raw,
    /// still-serialized response envelope.
    async fn generate_grounded(&self, prompt: &str) -> Result<ProviderResponse, ReportError>;

    /// Provider name for logging
    fn provider_name(&self) -> &str;

    /// Model identifier
    fn model_name(&self) -> &str;
}
