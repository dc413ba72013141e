use std::fmt;
use std::path::PathBuf;

use tracing::debug;

use super::credentials::{mask_secret, resolve_credential_with};
use super::types::MonitorConfig;
use crate::errors::ReportError;
use crate::llm::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};

pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];
pub const DEFAULT_OUTPUT_DIR: &str = "reports";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub output_dir: Option<PathBuf>,
}

/// Fully resolved runtime settings.
#[derive(Clone)]
pub struct Settings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub prompt_file: Option<PathBuf>,
    pub output_dir: PathBuf,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &mask_secret(&self.api_key))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("prompt_file", &self.prompt_file)
            .field("output_dir", &self.output_dir)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl Settings {
    /// Settings from the process environment alone.
    pub fn from_env() -> Result<Self, ReportError> {
        Self::resolve(&MonitorConfig::default(), &Overrides::default())
    }

    pub fn resolve(config: &MonitorConfig, overrides: &Overrides) -> Result<Self, ReportError> {
        Self::resolve_with(config, overrides, |name| std::env::var(name).ok())
    }

    /// Resolve settings. The API key comes from, in order: the command line,
    /// `llm.api_key` (with `$VAR` references expanded), `GEMINI_API_KEY`,
    /// `API_KEY`.
    pub fn resolve_with<F>(
        config: &MonitorConfig,
        overrides: &Overrides,
        lookup: F,
    ) -> Result<Self, ReportError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_config = config
            .llm_api_key()
            .map(|v| resolve_credential_with(v, &lookup))
            .filter(|v| !v.starts_with('$'));

        let api_key = non_empty(overrides.api_key.clone())
            .or_else(|| non_empty(from_config))
            .or_else(|| API_KEY_VARS.iter().find_map(|var| non_empty(lookup(var))))
            .ok_or_else(|| {
                ReportError::Config(format!(
                    "No API key configured; set {} (or {})",
                    API_KEY_VARS[0], API_KEY_VARS[1]
                ))
            })?;

        let model = non_empty(overrides.model.clone())
            .or_else(|| non_empty(config.llm_model().map(String::from)))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let base_url = config
            .llm_base_url()
            .map(String::from)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let output_dir = overrides
            .output_dir
            .clone()
            .or_else(|| config.output_directory().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        let settings = Settings {
            api_key,
            model,
            base_url,
            prompt_file: config.prompt_file.as_ref().map(PathBuf::from),
            output_dir,
        };
        debug!(settings = ?settings, "Settings resolved");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LLMConfig;

    fn env<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name: &str| pairs.iter().find(|(k, _)| *k == name).map(|(_, v)| v.to_string())
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let err = Settings::resolve_with(&MonitorConfig::default(), &Overrides::default(), env(&[]))
            .unwrap_err();
        assert!(matches!(err, ReportError::Config(_)));
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_gemini_key_preferred_over_alias() {
        let s = Settings::resolve_with(
            &MonitorConfig::default(),
            &Overrides::default(),
            env(&[("API_KEY", "alias"), ("GEMINI_API_KEY", "primary")]),
        )
        .unwrap();
        assert_eq!(s.api_key, "primary");
    }

    #[test]
    fn test_alias_used_when_primary_empty() {
        let s = Settings::resolve_with(
            &MonitorConfig::default(),
            &Overrides::default(),
            env(&[("GEMINI_API_KEY", "  "), ("API_KEY", "alias")]),
        )
        .unwrap();
        assert_eq!(s.api_key, "alias");
    }

    #[test]
    fn test_config_reference_and_defaults() {
        let config = MonitorConfig {
            llm: Some(LLMConfig { api_key: Some("$MY_KEY".into()), ..Default::default() }),
            ..Default::default()
        };
        let s = Settings::resolve_with(&config, &Overrides::default(), env(&[("MY_KEY", "from-ref")]))
            .unwrap();
        assert_eq!(s.api_key, "from-ref");
        assert_eq!(s.model, DEFAULT_MODEL);
        assert_eq!(s.base_url, DEFAULT_BASE_URL);
        assert_eq!(s.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
    }

    #[test]
    fn test_unresolved_reference_falls_through_to_env() {
        let config = MonitorConfig {
            llm: Some(LLMConfig { api_key: Some("$UNSET".into()), ..Default::default() }),
            ..Default::default()
        };
        let s = Settings::resolve_with(&config, &Overrides::default(), env(&[("API_KEY", "k")])).unwrap();
        assert_eq!(s.api_key, "k");
    }

    #[test]
    fn test_overrides_win() {
        let overrides = Overrides {
            api_key: Some("cli".into()),
            model: Some("gemini-2.5-pro".into()),
            output_dir: Some(PathBuf::from("/tmp/out")),
        };
        let s = Settings::resolve_with(&MonitorConfig::default(), &overrides, env(&[("GEMINI_API_KEY", "env")]))
            .unwrap();
        assert_eq!(s.api_key, "cli");
        assert_eq!(s.model, "gemini-2.5-pro");
        assert_eq!(s.output_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_debug_masks_key() {
        let s = Settings::resolve_with(
            &MonitorConfig::default(),
            &Overrides::default(),
            env(&[("GEMINI_API_KEY", "AIzaSyVerySecret9876")]),
        )
        .unwrap();
        let dbg = format!("{:?}", s);
        assert!(!dbg.contains("AIzaSyVerySecret"));
        assert!(dbg.contains("****9876"));
    }

    #[test]
    fn test_from_env_matches_default_config() {
        let direct = Settings::from_env();
        let resolved = Settings::resolve(&MonitorConfig::default(), &Overrides::default());
        match (direct, resolved) {
            (Ok(a), Ok(b)) => {
                assert_eq!(a.model, b.model);
                assert_eq!(a.output_dir, b.output_dir);
            }
            (Err(a), Err(b)) => {
                assert!(matches!(a, ReportError::Config(_)));
                assert!(matches!(b, ReportError::Config(_)));
            }
            _ => panic!("from_env and default resolve disagree"),
        }
    }
}
