//! GradPlan configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use catalog::CatalogConfig;

use crate::planning::ExtractionMode;

/// Main GradPlan configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Chat endpoint configuration
    pub llm: LlmConfig,

    /// Plan generation settings
    pub planning: PlanningConfig,

    /// HTTP boundary settings
    pub server: ServerConfig,

    /// Course catalog client settings
    pub catalog: CatalogConfig,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Call this early in startup to fail fast with clear error messages.
    pub fn validate(&self) -> Result<()> {
        if self.llm.model.trim().is_empty() {
            return Err(eyre::eyre!("llm.model must not be empty"));
        }
        if !self.llm.base_url.starts_with("http://") && !self.llm.base_url.starts_with("https://") {
            return Err(eyre::eyre!(
                "llm.base-url must start with http:// or https:// (got '{}')",
                self.llm.base_url
            ));
        }
        if self.llm.timeout_ms == 0 {
            return Err(eyre::eyre!("llm.timeout-ms must be greater than zero"));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for candidate in Self::default_paths() {
            if candidate.exists() {
                match Self::load_from_file(&candidate) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", candidate.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is initialized
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let path = match config_path {
            Some(p) => p.clone(),
            None => Self::default_paths().into_iter().find(|p| p.exists())?,
        };
        let content = fs::read_to_string(path).ok()?;
        let config: Self = serde_yaml::from_str(&content).ok()?;
        config.log_level
    }

    /// Project-local `.gradplan.yml`, then `~/.config/gradplan/gradplan.yml`
    fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".gradplan.yml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("gradplan").join("gradplan.yml"));
        }
        paths
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Chat endpoint configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Endpoint root, e.g. http://localhost:11434
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the chat API below the root
    #[serde(rename = "chat-path")]
    pub chat_path: String,

    /// Model identifier
    pub model: String,

    /// Request timeout in milliseconds, covering the whole stream
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Sampling temperature; endpoint default when unset
    pub temperature: Option<f32>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            chat_path: "/api/chat".to_string(),
            model: "llama3.3".to_string(),
            timeout_ms: 300_000,
            temperature: None,
        }
    }
}

impl LlmConfig {
    /// Full chat URL
    pub fn chat_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.chat_path.trim_start_matches('/')
        )
    }
}

/// Plan generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningConfig {
    /// Program credit total requested when a request does not name one
    #[serde(rename = "target-credits")]
    pub target_credits: u32,

    /// How the JSON object is located in the model's answer
    pub extraction: ExtractionMode,

    /// Directory holding `.pmt` overrides for `rules`, `context` and `request`
    #[serde(rename = "prompts-dir")]
    pub prompts_dir: Option<PathBuf>,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            target_credits: crate::planning::DEFAULT_TARGET_CREDITS,
            extraction: ExtractionMode::default(),
            prompts_dir: None,
        }
    }
}

/// HTTP boundary settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5000".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.llm.model, "llama3.3");
        assert_eq!(config.llm.chat_url(), "http://localhost:11434/api/chat");
        assert_eq!(config.planning.target_credits, 72);
        assert_eq!(config.planning.extraction, ExtractionMode::BraceIndex);
        assert_eq!(config.server.bind, "0.0.0.0:5000");
        assert!(config.log_level.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
llm:
  base-url: http://gpu-box:11434
  model: qwen2.5
  timeout-ms: 60000
  temperature: 0.2

planning:
  target-credits: 42
  extraction: balanced
  prompts-dir: /etc/gradplan/prompts

server:
  bind: 127.0.0.1:8080

catalog:
  catalog-id: abc

log-level: debug
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.llm.model, "qwen2.5");
        assert_eq!(config.llm.timeout_ms, 60_000);
        assert_eq!(config.llm.temperature, Some(0.2));
        assert_eq!(config.llm.chat_url(), "http://gpu-box:11434/api/chat");
        assert_eq!(config.planning.target_credits, 42);
        assert_eq!(config.planning.extraction, ExtractionMode::Balanced);
        assert_eq!(config.planning.prompts_dir, Some(PathBuf::from("/etc/gradplan/prompts")));
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.catalog.catalog_id, "abc");
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
llm:
  model: mistral
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.llm.model, "mistral");
        assert_eq!(config.llm.base_url, "http://localhost:11434");
        assert_eq!(config.planning.target_credits, 72);
        assert_eq!(config.catalog, CatalogConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.llm.model = " ".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.llm.base_url = "localhost:11434".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.llm.timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_explicit_file_and_log_level() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log-level: warn\nserver:\n  bind: 127.0.0.1:9000").unwrap();
        let path = file.path().to_path_buf();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:9000");
        assert_eq!(Config::load_log_level(Some(&path)).as_deref(), Some("warn"));
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let path = PathBuf::from("/nonexistent/gradplan.yml");
        assert!(Config::load(Some(&path)).is_err());
    }
}
