pub mod render;
pub mod terminal;
pub mod xlsx;
pub mod pdf;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::info;

use crate::errors::ReportError;
use crate::pipeline::GeneratedReport;

/// Base name shared by every exported artifact.
pub const EXPORT_BASENAME: &str = "informe-estrategico-salud";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Pdf,
    Xlsx,
    Markdown,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Xlsx => "xlsx",
            Self::Markdown => "md",
            Self::Json => "json",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Xlsx => "Excel",
            Self::Markdown => "Markdown",
            Self::Json => "JSON",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Markdown => "text/markdown; charset=utf-8",
            Self::Json => "application/json",
        }
    }

    /// Static download name, e.g. `informe-estrategico-salud.pdf`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", EXPORT_BASENAME, self.extension())
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "xlsx" | "excel" => Ok(Self::Xlsx),
            "md" | "markdown" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown export format '{}' (expected pdf, xlsx, md, json)", other)),
        }
    }
}

/// Build the artifact bytes for one format.
pub fn export_bytes(generated: &GeneratedReport, format: ExportFormat) -> Result<Vec<u8>, ReportError> {
    match format {
        ExportFormat::Xlsx => xlsx::export_xlsx(&generated.report),
        ExportFormat::Pdf => {
            let document = render::render_document(&generated.report, &generated.sources);
            pdf::export_pdf(&document)
        }
        ExportFormat::Markdown => {
            let document = render::render_document(&generated.report, &generated.sources);
            Ok(document.to_markdown().into_bytes())
        }
        ExportFormat::Json => Ok(serde_json::to_vec_pretty(generated)?),
    }
}

/// Write each requested artifact into `dir`, creating it if needed.
pub async fn write_exports(
    generated: &GeneratedReport,
    formats: &[ExportFormat],
    dir: &Path,
) -> Result<Vec<PathBuf>, ReportError> {
    if formats.is_empty() {
        return Ok(Vec::new());
    }
    tokio::fs::create_dir_all(dir).await?;

    let mut written = Vec::with_capacity(formats.len());
    for format in formats {
        let bytes = export_bytes(generated, *format)?;
        let path = dir.join(format.file_name());
        tokio::fs::write(&path, &bytes).await?;
        info!(path = %path.display(), bytes = bytes.len(), format = %format, "Export written");
        written.push(path);
    }
    Ok(written)
}
