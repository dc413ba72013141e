use std::path::Path;
use crate::errors::ReportError;
use super::types::MonitorConfig;
use super::schema::CONFIG_SCHEMA;
use tracing::warn;

const MAX_CONFIG_BYTES: u64 = 1_048_576;

pub async fn parse_config(path: &Path) -> Result<MonitorConfig, ReportError> {
    if !path.exists() {
        return Err(ReportError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > MAX_CONFIG_BYTES {
        return Err(ReportError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    parse_config_str(&content)
}

pub fn parse_config_str(content: &str) -> Result<MonitorConfig, ReportError> {
    // An empty file is a valid, empty config.
    if content.trim().is_empty() {
        return Ok(MonitorConfig::default());
    }
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
    if yaml.is_null() {
        return Ok(MonitorConfig::default());
    }

    let warnings = schema_warnings(&yaml)?;
    for msg in &warnings {
        warn!(validation_error = %msg, "Config schema warning");
    }

    let config: MonitorConfig = serde_yaml::from_value(yaml)?;
    validate_conflicts(&config)?;
    Ok(config)
}

/// Structural problems found by the JSON schema. Advisory only.
pub fn schema_warnings(yaml: &serde_yaml::Value) -> Result<Vec<String>, ReportError> {
    let json_value = serde_json::to_value(yaml)
        .map_err(|e| ReportError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| ReportError::Config(format!("Schema compilation error: {}", e)))?;

    let messages = match compiled.validate(&json_value) {
        Ok(()) => Vec::new(),
        Err(errors) => errors.map(|e| format!("{} at {}", e, e.instance_path)).collect(),
    };
    Ok(messages)
}

/// Reject values that would only fail later, at request time.
fn validate_conflicts(config: &MonitorConfig) -> Result<(), ReportError> {
    if let Some(base_url) = config.llm_base_url() {
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ReportError::Config(format!(
                "llm.base_url must be an http(s) URL, got '{}'",
                base_url
            )));
        }
    }

    if let Some(model) = config.llm_model() {
        if model.trim().is_empty() || model.contains('/') {
            return Err(ReportError::Config(format!("Invalid llm.model '{}'", model)));
        }
    }

    if config.server_port() == Some(0) {
        return Err(ReportError::Config("server.port must be between 1 and 65535".into()));
    }

    if let Some(key) = config.llm_api_key() {
        if !key.is_empty() && !key.starts_with('$') {
            warn!("llm.api_key is stored in plain text; prefer a $VARIABLE reference");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LLMConfig, ServerConfig};

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
llm:
  model: gemini-2.5-flash
  api_key: $GEMINI_API_KEY
  base_url: https://generativelanguage.googleapis.com
prompt_file: prompts/custom.txt
output:
  directory: reports
server:
  host: 0.0.0.0
  port: 8080
"#;
        let config = parse_config_str(yaml).unwrap();
        assert_eq!(config.llm_model(), Some("gemini-2.5-flash"));
        assert_eq!(config.prompt_file.as_deref(), Some("prompts/custom.txt"));
        assert_eq!(config.output_directory(), Some("reports"));
        assert_eq!(config.server_port(), Some(8080));
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(parse_config_str("  \n").unwrap(), MonitorConfig::default());
    }

    #[test]
    fn test_comment_only_config_is_default() {
        assert_eq!(parse_config_str("# nothing yet\n").unwrap(), MonitorConfig::default());
    }

    #[test]
    fn test_unknown_keys_are_advisory() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("scan:\n  intensity: high\n").unwrap();
        let warnings = schema_warnings(&yaml).unwrap();
        assert!(!warnings.is_empty());
        assert!(parse_config_str("scan:\n  intensity: high\n").is_ok());
    }

    #[test]
    fn test_conflicts_bad_base_url() {
        let config = MonitorConfig {
            llm: Some(LLMConfig {
                base_url: Some("ftp://example.com".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(matches!(validate_conflicts(&config), Err(ReportError::Config(_))));
    }

    #[test]
    fn test_conflicts_port_zero() {
        let config = MonitorConfig {
            server: Some(ServerConfig { host: None, port: Some(0) }),
            ..Default::default()
        };
        assert!(validate_conflicts(&config).is_err());
    }

    #[test]
    fn test_conflicts_empty_config() {
        assert!(validate_conflicts(&MonitorConfig::default()).is_ok());
    }

    #[test]
    fn test_malformed_yaml_is_error() {
        assert!(matches!(parse_config_str("llm: [unclosed"), Err(ReportError::Yaml(_))));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = parse_config(Path::new("/nonexistent/arka.yaml")).await.unwrap_err();
        assert!(matches!(err, ReportError::Config(_)));
    }
}
