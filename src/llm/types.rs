use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// Envelope body exactly as received.
    pub raw_envelope: String,
    pub model: String,
    pub latency_ms: u64,
}
