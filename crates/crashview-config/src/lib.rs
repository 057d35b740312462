#![deny(unsafe_code)]

//! Configuration loading and validation for crashview.
//!
//! Loads TOML configuration files and validates them against expected schemas.
//! Provides the [`AppConfig`] type as the central configuration structure
//! consumed when composing the error handler pipeline.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Largest accepted `extractor.radius`.
pub const MAX_RADIUS: usize = 500;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Which page flavour the error handler renders.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Full diagnostic page with source window and stack.
    #[default]
    Development,
    /// Generic page that leaks nothing about the failure.
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Development or production rendering.
    #[serde(default)]
    pub environment: Environment,

    /// Source window extraction.
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Remote source fetching.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Syntax highlighting.
    #[serde(default)]
    pub highlight: HighlightConfig,

    /// Page template selection.
    #[serde(default)]
    pub template: TemplateConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Source window extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Lines of context kept on each side of the failing line.
    #[serde(default = "default_radius")]
    pub radius: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            radius: default_radius(),
        }
    }
}

fn default_radius() -> usize {
    10
}

/// Remote source fetching settings.
///
/// Stack frames that reference `http://` or `https://` URLs are fetched
/// over the network. Without a bound a hung fetch would hang the whole
/// error page, so every request carries a timeout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Whether remote references are fetched at all.
    #[serde(default = "default_fetch_enabled")]
    pub enabled: bool,

    /// Per-request timeout in seconds.
    #[serde(default = "default_fetch_timeout_secs")]
    pub timeout_secs: u64,

    /// `User-Agent` header sent with fetches.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl FetchConfig {
    /// The timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            enabled: default_fetch_enabled(),
            timeout_secs: default_fetch_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_fetch_enabled() -> bool {
    true
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("crashview/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Syntax highlighting settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightConfig {
    /// Language hint handed to the highlighter (e.g. "ts", "js").
    #[serde(default = "default_language")]
    pub language: String,

    /// Color theme: "raptor" or "plain".
    #[serde(default = "default_theme")]
    pub theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            theme: default_theme(),
        }
    }
}

fn default_language() -> String {
    "ts".to_string()
}

fn default_theme() -> String {
    "raptor".to_string()
}

/// Page template settings.
///
/// ## TOML Example
///
/// ```toml
/// [template]
/// path = "templates/development.html"
/// ```
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Local path or URL of a custom development template.
    /// The built-in page is used when unset.
    #[serde(default)]
    pub path: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "trace").
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from a TOML file at the given path using async I/O.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        let config = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extractor.radius > MAX_RADIUS {
            return Err(ConfigError::Validation(format!(
                "extractor.radius must be at most {MAX_RADIUS}, got {}",
                self.extractor.radius
            )));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "fetch.timeout_secs must be non-zero".to_string(),
            ));
        }
        if self.fetch.user_agent.trim().is_empty() {
            return Err(ConfigError::Validation(
                "fetch.user_agent must not be empty".to_string(),
            ));
        }
        if self.highlight.language.trim().is_empty() {
            return Err(ConfigError::Validation(
                "highlight.language must not be empty".to_string(),
            ));
        }
        let valid_themes = ["raptor", "plain"];
        if !valid_themes.contains(&self.highlight.theme.as_str()) {
            return Err(ConfigError::Validation(format!(
                "highlight.theme must be one of {:?}, got {:?}",
                valid_themes, self.highlight.theme
            )));
        }
        if let Some(path) = &self.template.path
            && path.trim().is_empty()
        {
            return Err(ConfigError::Validation(
                "template.path must not be empty when set".to_string(),
            ));
        }
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.level must be one of {:?}, got {:?}",
                valid_levels, self.logging.level
            )));
        }

        Ok(())
    }
}
