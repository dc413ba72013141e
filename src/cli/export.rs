use std::path::PathBuf;

use tracing::info;

use crate::cli::commands::ExportArgs;
use crate::cli::{load_config, print_written};
use crate::config::settings::DEFAULT_OUTPUT_DIR;
use crate::errors::ReportError;
use crate::pipeline::GeneratedReport;
use crate::reporting::{write_exports, ExportFormat};

/// Formats written when none are requested.
pub const DEFAULT_EXPORTS: [ExportFormat; 2] = [ExportFormat::Xlsx, ExportFormat::Pdf];

pub async fn handle_export(
    args: ExportArgs,
    config_path: Option<&str>,
    quiet: bool,
) -> Result<(), ReportError> {
    let config = load_config(config_path).await?;
    let content = tokio::fs::read_to_string(&args.input).await?;
    let generated: GeneratedReport = serde_json::from_str(&content)?;

    let mut formats = args.formats.formats();
    if formats.is_empty() {
        formats = DEFAULT_EXPORTS.to_vec();
    }
    let output_dir = args
        .output
        .clone()
        .or_else(|| config.output_directory().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    info!(input = %args.input.display(), generation_id = %generated.generation_id, "Exporting saved report");
    let written = write_exports(&generated, &formats, &output_dir).await?;
    print_written(&written, quiet);
    Ok(())
}
