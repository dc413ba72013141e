pub mod provider;
pub mod gemini;
pub mod types;

pub use provider::GroundedProvider;
pub use gemini::GeminiProvider;
pub use types::ProviderResponse;
