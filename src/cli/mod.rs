pub mod commands;
pub mod export;
pub mod generate;
pub mod progress;
pub mod serve;

use std::path::{Path, PathBuf};

use console::style;

use crate::config::{parse_config, MonitorConfig};
use crate::errors::ReportError;

pub use commands::{Cli, Commands};

/// Parse the config file when one is given, otherwise use defaults.
pub async fn load_config(path: Option<&str>) -> Result<MonitorConfig, ReportError> {
    match path {
        Some(path) => parse_config(Path::new(path)).await,
        None => Ok(MonitorConfig::default()),
    }
}

pub async fn handle_validate(args: commands::ValidateArgs) -> Result<(), ReportError> {
    let path = PathBuf::from(&args.config);
    let _config = parse_config(&path).await?;
    println!("Configuration is valid: {}", args.config);
    Ok(())
}

fn print_written(paths: &[PathBuf], quiet: bool) {
    if quiet {
        return;
    }
    for path in paths {
        println!("{} {}", style("✓").green().bold(), path.display());
    }
}
