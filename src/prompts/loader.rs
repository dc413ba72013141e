use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::debug;

use crate::errors::ReportError;
use crate::utils::formatting::format_date_es;

/// Weekly report prompt compiled into the binary.
pub const WEEKLY_REPORT_TEMPLATE: &str = include_str!("../../prompts/weekly-report.txt");

/// Variables available for template interpolation.
#[derive(Debug, Clone, Default)]
pub struct PromptVariables {
    /// Report date in long Spanish form.
    pub today: String,
}

impl PromptVariables {
    pub fn for_date(date: NaiveDate) -> Self {
        Self { today: format_date_es(date) }
    }
}

/// Loads the weekly report prompt, either the embedded one or an operator
/// supplied override file.
#[derive(Debug, Clone, Default)]
pub struct PromptLoader {
    override_path: Option<PathBuf>,
}

impl PromptLoader {
    pub fn new(override_path: Option<PathBuf>) -> Self {
        if let Some(path) = &override_path {
            debug!(path = %path.display(), "Using prompt override");
        }
        Self { override_path }
    }

    pub fn load(&self) -> Result<String, ReportError> {
        let Some(path) = &self.override_path else {
            return Ok(WEEKLY_REPORT_TEMPLATE.to_string());
        };
        if !path.exists() {
            return Err(ReportError::Prompt(format!(
                "Prompt file not found: {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            ReportError::Prompt(format!("Failed to read prompt {}: {}", path.display(), e))
        })?;
        if content.trim().is_empty() {
            return Err(ReportError::Prompt(format!("Prompt file is empty: {}", path.display())));
        }
        Ok(content)
    }

    /// Replace {{VARIABLE}} placeholders with values from PromptVariables.
    pub fn interpolate(&self, template: &str, vars: &PromptVariables) -> String {
        template.replace("{{TODAY}}", &vars.today)
    }

    /// Load and interpolate in one step.
    pub fn render(&self, vars: &PromptVariables) -> Result<String, ReportError> {
        Ok(self.interpolate(&self.load()?, vars))
    }
}
