use crate::api;
use crate::cli::commands::ServeArgs;
use crate::cli::load_config;
use crate::config::settings::{DEFAULT_HOST, DEFAULT_PORT};
use crate::config::{Overrides, Settings};
use crate::errors::ReportError;
use tracing::info;

pub async fn handle_serve(args: ServeArgs, config_path: Option<&str>) -> Result<(), ReportError> {
    let config = load_config(config_path).await?;
    let settings = match config_path {
        Some(_) => Settings::resolve(&config, &Overrides::default())?,
        None => Settings::from_env()?,
    };

    let host = args
        .host
        .or_else(|| config.server_host().map(String::from))
        .unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = args.port.or(config.server_port()).unwrap_or(DEFAULT_PORT);
    info!(host = %host, port, model = %settings.model, "Starting API server");

    let state = api::create_app_state(&settings);
    let app = api::build_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| ReportError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}
