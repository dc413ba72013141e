use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct MonitorConfig {
    pub llm: Option<LLMConfig>,
    /// Replaces the built-in weekly report prompt.
    pub prompt_file: Option<String>,
    pub output: Option<OutputConfig>,
    pub server: Option<ServerConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct LLMConfig {
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct OutputConfig {
    pub directory: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl MonitorConfig {
    pub fn llm_model(&self) -> Option<&str> {
        self.llm.as_ref()?.model.as_deref()
    }

    pub fn llm_api_key(&self) -> Option<&str> {
        self.llm.as_ref()?.api_key.as_deref()
    }

    pub fn llm_base_url(&self) -> Option<&str> {
        self.llm.as_ref()?.base_url.as_deref()
    }

    pub fn output_directory(&self) -> Option<&str> {
        self.output.as_ref()?.directory.as_deref()
    }

    pub fn server_host(&self) -> Option<&str> {
        self.server.as_ref()?.host.as_deref()
    }

    pub fn server_port(&self) -> Option<u16> {
        self.server.as_ref()?.port
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_config_default() {
        let config = MonitorConfig::default();
        assert!(config.llm.is_none());
        assert!(config.llm_model().is_none());
        assert!(config.server_port().is_none());
    }

    #[test]
    fn test_deserialize_partial_yaml() {
        let yaml = "llm:\n  model: gemini-2.5-pro\nserver:\n  port: 9000\n";
        let config: MonitorConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.llm_model(), Some("gemini-2.5-pro"));
        assert!(config.llm_api_key().is_none());
        assert_eq!(config.server_port(), Some(9000));
        assert!(config.server_host().is_none());
        assert!(config.output_directory().is_none());
    }
}
