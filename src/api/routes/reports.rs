use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;
use serde_json::json;
use tracing::{info, warn};

use crate::api::AppState;
use crate::errors::ReportError;
use crate::pipeline::{generate_report, GeneratedReport};
use crate::prompts::PromptVariables;
use crate::reporting::{export_bytes, ExportFormat};

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"error": message}))).into_response()
}

pub async fn create_report(State(state): State<AppState>) -> Response {
    let Some(ticket) = state.generation.try_begin() else {
        warn!("Report requested while a generation is in flight");
        return error_body(StatusCode::CONFLICT, "Ya hay una generación de informe en curso.");
    };

    let vars = PromptVariables::for_date(Local::now().date_naive());
    let prompt = match state.prompts.render(&vars) {
        Ok(prompt) => prompt,
        Err(e) => return e.into_response(),
    };

    // The generation runs on its own task so a client disconnect cannot
    // cancel the provider call or the publish.
    let provider = Arc::clone(&state.provider);
    let task = tokio::spawn(async move {
        let result = generate_report(provider.as_ref(), &prompt).await;
        if let Ok(generated) = &result {
            let published = ticket.publish(generated.clone()).await;
            info!(
                generation_id = %generated.generation_id,
                token = ticket.token(),
                published,
                "Report generation completed"
            );
        }
        result
    });

    match task.await {
        Ok(Ok(generated)) => (StatusCode::OK, Json(generated)).into_response(),
        Ok(Err(failure)) => failure.into_response(),
        Err(e) => ReportError::Internal(format!("Generation task failed: {}", e)).into_response(),
    }
}

pub async fn latest_report(State(state): State<AppState>) -> Response {
    match state.generation.latest().await {
        Some(report) => Json(report.as_ref().clone()).into_response(),
        None => error_body(StatusCode::NOT_FOUND, "Aún no se ha generado ningún informe."),
    }
}

fn attachment(generated: &GeneratedReport, format: ExportFormat) -> Result<Response, ReportError> {
    let bytes = export_bytes(generated, format)?;
    let disposition = format!("attachment; filename=\"{}\"", format.file_name());
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

async fn export_latest(state: AppState, format: ExportFormat) -> Response {
    let Some(report) = state.generation.latest().await else {
        return error_body(StatusCode::NOT_FOUND, "Aún no se ha generado ningún informe.");
    };
    match attachment(&report, format) {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

pub async fn export_latest_xlsx(State(state): State<AppState>) -> Response {
    export_latest(state, ExportFormat::Xlsx).await
}

pub async fn export_latest_pdf(State(state): State<AppState>) -> Response {
    export_latest(state, ExportFormat::Pdf).await
}
