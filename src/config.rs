//! Runtime configuration for the agent binaries

use crate::error::{AgentError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration shared by the binaries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Directory holding `<id>.json` agent configs and the schema file
    pub config_dir: PathBuf,

    /// Redis connection URL for the config store
    pub redis_url: String,

    /// Settings for the built-in tools
    pub tools: ToolSettings,

    /// Directory for JSON log files
    pub log_dir: PathBuf,

    /// Enable verbose console logging
    pub verbose: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Environment variable holding the API key
    pub api_key_env: String,

    /// API key (read from `api_key_env` when not set)
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Base URL for the API (for OpenAI-compatible endpoints)
    pub base_url: Option<String>,

    /// Model used when an agent config does not name one
    pub default_model: String,
}

/// Endpoints used by the built-in tools
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSettings {
    /// Base URL of the remote square-root calculator service
    pub calculator_url: String,

    /// Base URL of the SearXNG instance used by `web_search`
    pub searxng_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            config_dir: PathBuf::from("configs"),
            redis_url: "redis://127.0.0.1:6379/0".to_string(),
            tools: ToolSettings::default(),
            log_dir: default_log_dir(),
            verbose: false,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            base_url: None,
            default_model: "gpt-4o-mini".to_string(),
        }
    }
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            calculator_url: "http://localhost:8000".to_string(),
            searxng_url: "http://localhost:8082".to_string(),
        }
    }
}

/// Log directory: $XDG_DATA_HOME/agent_factory or ./.agent_factory_logs
fn default_log_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("agent_factory"))
        .unwrap_or_else(|| PathBuf::from(".agent_factory_logs"))
}

impl Config {
    /// Build a config from defaults overridden by environment variables.
    ///
    /// Loads `.env` first. Recognised: `OPENAI_API_KEY`, `OPENAI_BASE_URL`,
    /// `REDIS_URL`, `CALCULATOR_URL`, `SEARXNG_URL`.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let mut config = Self::default();
        config.llm.api_key = std::env::var(&config.llm.api_key_env).ok();
        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            config.llm.base_url = Some(base_url);
        }
        if let Ok(url) = std::env::var("REDIS_URL") {
            config.redis_url = url;
        }
        if let Ok(url) = std::env::var("CALCULATOR_URL") {
            config.tools.calculator_url = url;
        }
        if let Ok(url) = std::env::var("SEARXNG_URL") {
            config.tools.searxng_url = url;
        }
        config
    }

    /// Set the agent config directory
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = dir.into();
        self
    }

    /// Set the Redis URL
    pub fn with_redis_url(mut self, url: impl Into<String>) -> Self {
        self.redis_url = url.into();
        self
    }

    /// Set verbose logging
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.llm.api_key = Some(api_key.into());
        self
    }
}

impl LlmConfig {
    /// Return the API key, or fail with `MissingApiKey`
    pub fn require_api_key(&self) -> Result<&str> {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(AgentError::MissingApiKey(self.api_key_env.clone())),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.require_api_key().is_ok()
    }
}
