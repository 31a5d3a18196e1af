//! Configuration management for multimcp
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{MultiMcpError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure for multimcp
///
/// Holds the backend endpoint settings, chat behavior, local history
/// storage location, and registry refresh settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Orchestration backend settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Interactive chat settings
    #[serde(default)]
    pub chat: ChatConfig,
    /// Local history storage settings
    #[serde(default)]
    pub storage: StorageConfig,
    /// Server/agent registry settings
    #[serde(default)]
    pub registry: RegistryConfig,
}

/// Orchestration backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the orchestration service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Client-side timeout applied to every request (seconds)
    #[serde(default = "default_api_timeout")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_api_timeout() -> u64 {
    300
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_api_timeout(),
        }
    }
}

impl ApiConfig {
    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// A suggested query offered when the conversation is empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleQuery {
    /// Stable identifier shown next to the example
    pub id: String,
    /// Query text submitted when the example is picked
    pub text: String,
    /// Short decorative marker
    #[serde(default)]
    pub icon: String,
}

impl ExampleQuery {
    fn new(id: &str, text: &str, icon: &str) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            icon: icon.to_string(),
        }
    }
}

/// Interactive chat configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Interval between progress step rotations (milliseconds)
    #[serde(default = "default_progress_interval_ms")]
    pub progress_interval_ms: u64,

    /// Ordered status lines cycled while a query is in flight
    #[serde(default = "default_progress_steps")]
    pub progress_steps: Vec<String>,

    /// Create a backend session at startup instead of adopting one from the
    /// first query response
    #[serde(default)]
    pub eager_session: bool,

    /// Suggested queries
    #[serde(default = "default_examples")]
    pub examples: Vec<ExampleQuery>,
}

fn default_progress_interval_ms() -> u64 {
    1500
}

fn default_progress_steps() -> Vec<String> {
    vec![
        "Analyzing your query...".to_string(),
        "Selecting relevant servers...".to_string(),
        "Searching for tools...".to_string(),
        "Executing your request...".to_string(),
    ]
}

fn default_examples() -> Vec<ExampleQuery> {
    vec![
        ExampleQuery::new("1", "Post a hello message in the general channel", "💬"),
        ExampleQuery::new("2", "Fetch all HubSpot deals over $10,000", "💰"),
        ExampleQuery::new("3", "List all available Slack channels", "📋"),
        ExampleQuery::new("4", "Get contacts from HubSpot and notify in Slack", "🔔"),
    ]
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            progress_interval_ms: default_progress_interval_ms(),
            progress_steps: default_progress_steps(),
            eager_session: false,
            examples: default_examples(),
        }
    }
}

impl ChatConfig {
    /// Progress rotation interval as a `Duration`
    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms)
    }
}

/// Local history storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory of the history database; platform data dir when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the directory holding the history database
    ///
    /// # Errors
    ///
    /// Returns `MultiMcpError::Storage` if no path is configured and the
    /// platform data directory cannot be determined
    pub fn resolve_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }

        let dirs = ProjectDirs::from("dev", "multimcp", "multimcp").ok_or_else(|| {
            MultiMcpError::Storage("Could not determine data directory".to_string())
        })?;
        Ok(dirs.data_dir().join("history"))
    }
}

/// Server and agent registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Refresh interval for `servers --watch` (seconds)
    #[serde(default = "default_refresh_seconds")]
    pub refresh_seconds: u64,
}

fn default_refresh_seconds() -> u64 {
    30
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            refresh_seconds: default_refresh_seconds(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| MultiMcpError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| MultiMcpError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("MULTIMCP_API_BASE") {
            tracing::debug!(base_url = %base_url, "Env override: MULTIMCP_API_BASE");
            self.api.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("MULTIMCP_API_TIMEOUT") {
            if let Ok(value) = timeout.parse() {
                self.api.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid MULTIMCP_API_TIMEOUT: {}", timeout);
            }
        }

        if let Ok(db_path) = std::env::var("MULTIMCP_HISTORY_DB") {
            tracing::debug!(db_path = %db_path, "Env override: MULTIMCP_HISTORY_DB");
            self.storage.path = Some(PathBuf::from(db_path));
        }

        if let Ok(interval) = std::env::var("MULTIMCP_PROGRESS_INTERVAL_MS") {
            if let Ok(value) = interval.parse() {
                self.chat.progress_interval_ms = value;
            } else {
                tracing::warn!("Invalid MULTIMCP_PROGRESS_INTERVAL_MS: {}", interval);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Some(base_url) = &cli.api_base {
            self.api.base_url = base_url.clone();
        }

        if let Some(path) = &cli.storage_path {
            tracing::info!("Using storage override from CLI: {}", path.display());
            self.storage.path = Some(path.clone());
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `MultiMcpError::Config` describing the first invalid value
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.api.base_url).map_err(|e| {
            MultiMcpError::Config(format!("Invalid api.base_url {}: {}", self.api.base_url, e))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(MultiMcpError::Config(format!(
                "api.base_url must use http or https, got {}",
                url.scheme()
            ))
            .into());
        }

        if self.api.timeout_seconds == 0 {
            return Err(MultiMcpError::Config(
                "api.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.chat.progress_interval_ms == 0 {
            return Err(MultiMcpError::Config(
                "chat.progress_interval_ms must be greater than 0".to_string(),
            )
            .into());
        }

        if self.chat.progress_steps.is_empty() {
            return Err(MultiMcpError::Config(
                "chat.progress_steps must contain at least one step".to_string(),
            )
            .into());
        }

        if let Some(example) = self.chat.examples.iter().find(|e| e.text.trim().is_empty()) {
            return Err(MultiMcpError::Config(format!(
                "chat.examples entry {} has empty text",
                example.id
            ))
            .into());
        }

        if self.registry.refresh_seconds == 0 {
            return Err(MultiMcpError::Config(
                "registry.refresh_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.timeout_seconds, 300);
        assert_eq!(config.chat.progress_interval_ms, 1500);
        assert_eq!(config.chat.progress_steps.len(), 4);
        assert_eq!(config.chat.examples.len(), 4);
        assert!(!config.chat.eager_session);
        assert_eq!(config.registry.refresh_seconds, 30);
    }

    #[test]
    fn test_config_validation_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_rejects_bad_url() {
        let mut config = Config::default();
        config.api.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_rejects_non_http_scheme() {
        let mut config = Config::default();
        config.api.base_url = "ftp://example.com".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let mut config = Config::default();
        config.api.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_progress_interval() {
        let mut config = Config::default();
        config.chat.progress_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_empty_progress_steps() {
        let mut config = Config::default();
        config.chat.progress_steps.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_blank_example() {
        let mut config = Config::default();
        config.chat.examples[1].text = "   ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("chat.examples entry 2"));
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
api:
  base_url: https://orchestrator.internal:9000
  timeout_seconds: 45
chat:
  progress_interval_ms: 500
  progress_steps:
    - "Thinking..."
  eager_session: true
  examples:
    - id: "a"
      text: "Ping the ops channel"
registry:
  refresh_seconds: 10
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.api.base_url, "https://orchestrator.internal:9000");
        assert_eq!(config.api.timeout(), Duration::from_secs(45));
        assert_eq!(config.chat.progress_interval(), Duration::from_millis(500));
        assert_eq!(config.chat.progress_steps, vec!["Thinking...".to_string()]);
        assert!(config.chat.eager_session);
        assert_eq!(config.chat.examples.len(), 1);
        assert_eq!(config.chat.examples[0].icon, "");
        assert_eq!(config.registry.refresh_seconds, 10);
        assert!(config.storage.path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("api:\n  timeout_seconds: 5\n").unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.timeout_seconds, 5);
        assert_eq!(config.chat.progress_interval_ms, 1500);
    }

    #[test]
    #[serial]
    fn test_load_nonexistent_file_uses_defaults() {
        let cli = crate::cli::Cli::default();
        let config = Config::load("/nonexistent/multimcp.yaml", &cli).unwrap();
        assert_eq!(config.chat.progress_steps.len(), 4);
    }

    #[test]
    #[serial]
    fn test_load_invalid_yaml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "api: [unclosed").unwrap();

        let cli = crate::cli::Cli::default();
        let err = Config::load(path.to_str().unwrap(), &cli).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    #[serial]
    fn test_apply_env_vars_overrides_fields() {
        std::env::set_var("MULTIMCP_API_BASE", "http://env-host:1234");
        std::env::set_var("MULTIMCP_API_TIMEOUT", "12");
        std::env::set_var("MULTIMCP_HISTORY_DB", "/tmp/multimcp-env-history");
        std::env::set_var("MULTIMCP_PROGRESS_INTERVAL_MS", "not-a-number");

        let mut config = Config::default();
        config.apply_env_vars();

        std::env::remove_var("MULTIMCP_API_BASE");
        std::env::remove_var("MULTIMCP_API_TIMEOUT");
        std::env::remove_var("MULTIMCP_HISTORY_DB");
        std::env::remove_var("MULTIMCP_PROGRESS_INTERVAL_MS");

        assert_eq!(config.api.base_url, "http://env-host:1234");
        assert_eq!(config.api.timeout_seconds, 12);
        assert_eq!(
            config.storage.path,
            Some(PathBuf::from("/tmp/multimcp-env-history"))
        );
        // invalid values are ignored
        assert_eq!(config.chat.progress_interval_ms, 1500);
    }

    #[test]
    #[serial]
    fn test_cli_overrides_take_precedence() {
        let cli = crate::cli::Cli {
            api_base: Some("http://cli-host:8080".to_string()),
            storage_path: Some(PathBuf::from("/tmp/cli-history")),
            ..Default::default()
        };
        let config = Config::load("/nonexistent/multimcp.yaml", &cli).unwrap();
        assert_eq!(config.api.base_url, "http://cli-host:8080");
        assert_eq!(config.storage.path, Some(PathBuf::from("/tmp/cli-history")));
    }

    #[test]
    fn test_storage_resolve_path_prefers_configured_path() {
        let storage = StorageConfig {
            path: Some(PathBuf::from("/srv/multimcp/history")),
        };
        assert_eq!(
            storage.resolve_path().unwrap(),
            PathBuf::from("/srv/multimcp/history")
        );
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/config.yaml");
        let config = Config::from_file(path).unwrap();
        config.validate().unwrap();

        let defaults = Config::default();
        assert_eq!(config.api.base_url, defaults.api.base_url);
        assert_eq!(config.chat.progress_steps, defaults.chat.progress_steps);
        assert_eq!(config.chat.examples, defaults.chat.examples);
        assert_eq!(config.storage.path, None);
    }
}
