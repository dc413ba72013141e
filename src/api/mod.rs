pub mod errors;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Settings;
use crate::llm::{GeminiProvider, GroundedProvider};
use crate::prompts::PromptLoader;

pub use state::{GenerationSlot, GenerationTicket};

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn GroundedProvider>,
    pub prompts: Arc<PromptLoader>,
    pub generation: Arc<GenerationSlot>,
}

impl AppState {
    pub fn new(provider: Arc<dyn GroundedProvider>, prompts: PromptLoader) -> Self {
        Self {
            provider,
            prompts: Arc::new(prompts),
            generation: Arc::new(GenerationSlot::new()),
        }
    }
}

pub fn create_app_state(settings: &Settings) -> AppState {
    let provider = GeminiProvider::with_base_url(
        &settings.api_key,
        Some(settings.model.as_str()),
        &settings.base_url,
    );
    AppState::new(Arc::new(provider), PromptLoader::new(settings.prompt_file.clone()))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health::health_check))
        .route("/api/reports", post(routes::reports::create_report))
        .route("/api/reports/latest", get(routes::reports::latest_report))
        .route("/api/reports/latest/export/xlsx", get(routes::reports::export_latest_xlsx))
        .route("/api/reports/latest/export/pdf", get(routes::reports::export_latest_pdf))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
