//! Configuration file handling
//!
//! All settings are read once at startup and never mutated by the runner.

use serde::Deserialize;
use std::path::Path;

use super::paths::config_path;
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// WebDriver endpoint settings
    #[serde(default)]
    pub webdriver: WebDriverConfig,

    /// Check environment settings
    #[serde(default)]
    pub check: CheckConfig,

    /// Per-severity debug-label logging toggles
    #[serde(default)]
    pub debug: DebugConfig,

    /// Run attribute recording
    #[serde(default)]
    pub attributes: AttributeConfig,
}

/// WebDriver endpoint settings
#[derive(Debug, Deserialize, Clone)]
pub struct WebDriverConfig {
    /// URL of the WebDriver server
    #[serde(default = "default_webdriver_url")]
    pub url: String,

    /// Browser to request (chrome, firefox, edge, safari)
    #[serde(default = "default_browser")]
    pub browser: String,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            url: default_webdriver_url(),
            browser: default_browser(),
        }
    }
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_browser() -> String {
    "chrome".to_string()
}

/// Check environment settings applied before the first step
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CheckConfig {
    /// Implicit element-wait timeout in seconds; unset keeps the platform
    /// default of 10 seconds
    pub implicit_timeout_secs: Option<u64>,

    /// Desired desktop viewport width in pixels; unset keeps the current width
    pub viewport_width: Option<u32>,

    /// Desired desktop viewport height in pixels; unset keeps the current height
    pub viewport_height: Option<u32>,
}

/// Per-severity toggles for logging a step's debug label on failure
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    /// Log the debug label when a HARD step fails
    #[serde(default = "default_debug_hard")]
    pub hard: bool,

    /// Log the debug label when a SOFT step fails
    #[serde(default)]
    pub soft: bool,

    /// Log the debug label when an OPTIONAL step fails
    #[serde(default)]
    pub optional: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            hard: default_debug_hard(),
            soft: false,
            optional: false,
        }
    }
}

fn default_debug_hard() -> bool {
    true
}

/// Run attribute recording settings
#[derive(Debug, Deserialize, Default, Clone)]
pub struct AttributeConfig {
    /// Record failure summaries as key/value run attributes
    #[serde(default)]
    pub enabled: bool,
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if the file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| super::Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| super::Error::ConfigParse(e.to_string()))
    }
}
