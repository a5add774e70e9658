//! Configuration System
//!
//! Timings, element selectors and messages for the page behaviors.
//! Loaded from TOML; every field falls back to the built-in default.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(default)]
    pub selectors: SelectorConfig,

    #[serde(default)]
    pub messages: MessageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Animation and timer durations, all in milliseconds
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TimingConfig {
    #[serde(default = "default_card_stagger")]
    pub card_stagger_ms: u32,

    #[serde(default = "default_card_transition")]
    pub card_transition_ms: u32,

    #[serde(default = "default_toast_enter_delay")]
    pub toast_enter_delay_ms: u32,

    #[serde(default = "default_toast_lifetime")]
    pub toast_lifetime_ms: u32,

    #[serde(default = "default_toast_exit")]
    pub toast_exit_ms: u32,

    #[serde(default = "default_field_flag")]
    pub field_flag_ms: u32,

    #[serde(default = "default_ripple")]
    pub ripple_ms: u32,

    #[serde(default = "default_welcome_delay")]
    pub welcome_delay_ms: u32,
}

fn default_card_stagger() -> u32 {
    100
}

fn default_card_transition() -> u32 {
    300
}

fn default_toast_enter_delay() -> u32 {
    10
}

fn default_toast_lifetime() -> u32 {
    5000
}

fn default_toast_exit() -> u32 {
    300
}

fn default_field_flag() -> u32 {
    1000
}

fn default_ripple() -> u32 {
    600
}

fn default_welcome_delay() -> u32 {
    1000
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            card_stagger_ms: default_card_stagger(),
            card_transition_ms: default_card_transition(),
            toast_enter_delay_ms: default_toast_enter_delay(),
            toast_lifetime_ms: default_toast_lifetime(),
            toast_exit_ms: default_toast_exit(),
            field_flag_ms: default_field_flag(),
            ripple_ms: default_ripple(),
            welcome_delay_ms: default_welcome_delay(),
        }
    }
}

/// Page markup contract: which elements each behavior attaches to
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SelectorConfig {
    #[serde(default = "default_card")]
    pub card: String,

    /// Element id of the doughnut chart mount point
    #[serde(default = "default_waste_chart")]
    pub waste_chart: String,

    /// Element id of the trend chart mount point
    #[serde(default = "default_trend_chart")]
    pub trend_chart: String,

    #[serde(default = "default_form")]
    pub form: String,

    #[serde(default = "default_required_field")]
    pub required_field: String,

    /// Element id of the table search box
    #[serde(default = "default_search_input")]
    pub search_input: String,

    #[serde(default = "default_table_rows")]
    pub table_rows: String,

    #[serde(default = "default_button")]
    pub button: String,
}

fn default_card() -> String {
    ".card".to_string()
}

fn default_waste_chart() -> String {
    "wasteChart".to_string()
}

fn default_trend_chart() -> String {
    "trendChart".to_string()
}

fn default_form() -> String {
    "form".to_string()
}

fn default_required_field() -> String {
    "input[required]".to_string()
}

fn default_search_input() -> String {
    "searchInput".to_string()
}

fn default_table_rows() -> String {
    "tbody tr".to_string()
}

fn default_button() -> String {
    ".btn".to_string()
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            card: default_card(),
            waste_chart: default_waste_chart(),
            trend_chart: default_trend_chart(),
            form: default_form(),
            required_field: default_required_field(),
            search_input: default_search_input(),
            table_rows: default_table_rows(),
            button: default_button(),
        }
    }
}

/// User-facing notification texts
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MessageConfig {
    #[serde(default = "default_welcome")]
    pub welcome: String,

    #[serde(default = "default_welcome_enabled")]
    pub welcome_enabled: bool,

    #[serde(default = "default_missing_fields")]
    pub missing_fields: String,
}

fn default_welcome() -> String {
    "Welcome to Smart Waste Tracker! 🚀".to_string()
}

fn default_welcome_enabled() -> bool {
    true
}

fn default_missing_fields() -> String {
    "Please fill in all required fields".to_string()
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            welcome: default_welcome(),
            welcome_enabled: default_welcome_enabled(),
            missing_fields: default_missing_fields(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `wastetrack=debug`
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: None,
            error: e.to_string(),
        })
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: Some(path.to_path_buf()),
            error: e.to_string(),
        })
    }

    /// Parse embedded config text, falling back to defaults on error
    pub fn from_toml_or_default(content: Option<&str>) -> Self {
        let Some(content) = content.filter(|c| !c.trim().is_empty()) else {
            return Self::default();
        };

        match Self::from_toml_str(content) {
            Ok(config) => {
                tracing::debug!("Loaded page behavior config");
                config
            }
            Err(e) => {
                tracing::warn!("Ignoring page behavior config: {}", e);
                Self::default()
            }
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config {path:?}: {error}")]
    Parse {
        path: Option<PathBuf>,
        error: String,
    },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Smart Waste Tracker page behavior configuration
#
# Embed in a page as:
# <script type="application/toml" id="page-behavior-config"> ... </script>

[timing]
# Delay between successive card fade-ins (ms)
card_stagger_ms = 100
card_transition_ms = 300

# Toast lifecycle (ms)
toast_enter_delay_ms = 10
toast_lifetime_ms = 5000
toast_exit_ms = 300

# How long an empty required field stays highlighted (ms)
field_flag_ms = 1000
ripple_ms = 600
welcome_delay_ms = 1000

[selectors]
card = ".card"
waste_chart = "wasteChart"
trend_chart = "trendChart"
form = "form"
required_field = "input[required]"
search_input = "searchInput"
table_rows = "tbody tr"
button = ".btn"

[messages]
welcome = "Welcome to Smart Waste Tracker! 🚀"
welcome_enabled = true
missing_fields = "Please fill in all required fields"

[logging]
# Filter directive: trace, debug, info, warn, error
level = "info"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_text_matches_defaults() {
        let parsed = Config::from_toml_str(&generate_default_config()).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [timing]
            toast_lifetime_ms = 8000

            [selectors]
            search_input = "itemSearch"
            "#,
        )
        .unwrap();

        assert_eq!(config.timing.toast_lifetime_ms, 8000);
        assert_eq!(config.timing.toast_exit_ms, 300);
        assert_eq!(config.selectors.search_input, "itemSearch");
        assert_eq!(config.selectors.card, ".card");
        assert_eq!(config.messages, MessageConfig::default());
    }

    #[test]
    fn test_invalid_config_falls_back() {
        let config = Config::from_toml_or_default(Some("[timing]\ncard_stagger_ms = \"fast\""));
        assert_eq!(config, Config::default());

        assert_eq!(Config::from_toml_or_default(None), Config::default());
        assert_eq!(Config::from_toml_or_default(Some("   ")), Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[messages]\nwelcome_enabled = false").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert!(!config.messages.welcome_enabled);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
