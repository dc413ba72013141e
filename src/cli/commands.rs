use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::reporting::ExportFormat;

#[derive(Parser)]
#[command(name = "arka", version, about = "Weekly strategic intelligence report on the Colombian health system")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate this week's report
    Generate(GenerateArgs),
    /// Export a saved report JSON to other formats
    Export(ExportArgs),
    /// Start the HTTP API server
    Serve(ServeArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

/// Artifact selection shared by `generate` and `export`.
#[derive(Args, Clone, Debug, Default)]
pub struct FormatFlags {
    /// Write the Excel workbook
    #[arg(long)]
    pub xlsx: bool,

    /// Write the PDF document
    #[arg(long)]
    pub pdf: bool,

    /// Write a Markdown rendition
    #[arg(long)]
    pub markdown: bool,

    /// Write the report as JSON (reusable with `arka export`)
    #[arg(long)]
    pub json: bool,
}

impl FormatFlags {
    pub fn formats(&self) -> Vec<ExportFormat> {
        [
            (self.xlsx, ExportFormat::Xlsx),
            (self.pdf, ExportFormat::Pdf),
            (self.markdown, ExportFormat::Markdown),
            (self.json, ExportFormat::Json),
        ]
        .into_iter()
        .filter_map(|(on, format)| on.then_some(format))
        .collect()
    }
}

#[derive(Args, Clone)]
pub struct GenerateArgs {
    /// Output directory for exported files
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub formats: FormatFlags,

    /// Model identifier
    #[arg(long)]
    pub model: Option<String>,

    /// API key (or use GEMINI_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,
}

#[derive(Args, Clone)]
pub struct ExportArgs {
    /// Report JSON written by `arka generate --json`
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output directory for exported files
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub formats: FormatFlags,
}

#[derive(Args, Clone)]
pub struct ServeArgs {
    /// Listen port
    #[arg(long)]
    pub port: Option<u16>,

    /// Listen address
    #[arg(long)]
    pub host: Option<String>,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Config file to validate
    pub config: String,
}
