//! Configuration management for browser-pilot
//!
//! Supports environment variables, a config file, and CLI overrides.
//!
//! Config file location: ~/.config/browser-pilot/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::error::{PilotError, Result};
use crate::core::types::Viewport;

/// Main configuration for browser-pilot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Gemini model configuration
    #[serde(default)]
    pub model: ModelConfig,
    /// Browser configuration
    #[serde(default)]
    pub browser: BrowserConfig,
    /// Turn loop configuration
    #[serde(default)]
    pub agent: AgentConfig,
}

/// Gemini API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Computer-use model name
    pub name: String,
    /// Base URL of the Generative Language API
    pub api_base: String,
    /// File holding the API key on its first line
    pub api_key_file: PathBuf,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Browser session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Viewport width in pixels
    pub width: u32,
    /// Viewport height in pixels
    pub height: u32,
    /// Run without a visible window
    pub headless: bool,
    /// Page loaded before the first screenshot
    pub start_url: String,
    /// Page the `search` action navigates to
    pub search_url: String,
    /// Chrome binary override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chrome_path: Option<PathBuf>,
}

/// Turn loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Maximum number of model turns
    /// Default: 10
    pub max_turns: usize,
    /// Upper bound on the post-action page load wait, in ms
    pub load_timeout_ms: u64,
    /// Fixed delay after each action, in ms
    pub settle_ms: u64,
    /// Whether to show debug output
    pub debug: bool,
}

fn env_flag(name: &str) -> Option<bool> {
    env::var(name).ok().map(|v| v == "true" || v == "1")
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: env::var("PILOT_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-computer-use-preview-10-2025".to_string()),
            api_base: env::var("PILOT_API_BASE").unwrap_or_else(|_| {
                "https://generativelanguage.googleapis.com/v1beta".to_string()
            }),
            api_key_file: PathBuf::from("gemini_api_key"),
            timeout_secs: 120,
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            width: 1440,
            height: 900,
            headless: env_flag("PILOT_HEADLESS").unwrap_or(false),
            start_url: env::var("PILOT_START_URL")
                .unwrap_or_else(|_| "https://www.google.com".to_string()),
            search_url: "https://www.google.com".to_string(),
            chrome_path: None,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_turns: env::var("PILOT_MAX_TURNS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            load_timeout_ms: 5000,
            settle_ms: 600,
            debug: env_flag("PILOT_DEBUG").unwrap_or(false),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("browser-pilot")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > env vars > config file > defaults
    ///
    /// A missing config file means defaults; an unreadable or invalid one is
    /// an error so the caller can report it.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        if !Self::config_file().exists() {
            return Ok(Self::default());
        }
        Self::load_from_file()
    }

    /// Load configuration from file only
    pub fn load_from_file() -> Result<Self> {
        let config_path = Self::config_file();

        if !config_path.exists() {
            return Err(PilotError::config("Config file not found"));
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| PilotError::config(format!("Failed to read config: {}", e)))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text. Missing sections fall back to defaults.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| PilotError::config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the turn loop cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.browser.width == 0 || self.browser.height == 0 {
            return Err(PilotError::config(format!(
                "viewport must be non-empty, got {}x{}",
                self.browser.width, self.browser.height
            )));
        }
        if self.agent.max_turns == 0 {
            return Err(PilotError::config("max_turns must be at least 1"));
        }
        Ok(())
    }

    /// Viewport fixed for the session
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.browser.width, self.browser.height)
    }

    /// Upper bound on the post-action load wait
    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.agent.load_timeout_ms)
    }

    /// Fixed delay after each action
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.agent.settle_ms)
    }

    /// Point the session at a local HTML file instead of `start_url`
    pub fn use_start_file(&mut self, path: &Path) -> Result<()> {
        self.browser.start_url = file_url(path)?;
        Ok(())
    }

    /// Generate a default config file content for display
    pub fn default_config_toml() -> String {
        toml::to_string_pretty(&Config::default())
            .unwrap_or_else(|_| String::from("# Error generating config"))
    }
}

/// `file://` URL for a local asset; the file must exist
pub fn file_url(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(PilotError::MissingAsset(path.to_path_buf()));
    }
    let absolute = fs::canonicalize(path)?;
    url::Url::from_file_path(&absolute)
        .map(String::from)
        .map_err(|_| PilotError::config(format!("cannot build a URL for {}", absolute.display())))
}
