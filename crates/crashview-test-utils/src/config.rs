//! Configuration builders for tests.
//!
//! Use [`TestConfigBuilder`] to create customised [`AppConfig`] values without
//! repeating boilerplate across crate boundaries.

use crashview_config::{AppConfig, Environment};

/// Fluent builder for [`AppConfig`] in tests.
///
/// # Example
///
/// ```ignore
/// let config = TestConfigBuilder::new()
///     .radius(2)
///     .fetch_timeout_secs(1)
///     .build();
/// ```
pub struct TestConfigBuilder {
    config: AppConfig,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    pub fn production(mut self) -> Self {
        self.config.environment = Environment::Production;
        self
    }

    pub fn radius(mut self, radius: usize) -> Self {
        self.config.extractor.radius = radius;
        self
    }

    pub fn fetch_enabled(mut self, enabled: bool) -> Self {
        self.config.fetch.enabled = enabled;
        self
    }

    pub fn fetch_timeout_secs(mut self, secs: u64) -> Self {
        self.config.fetch.timeout_secs = secs;
        self
    }

    pub fn theme(mut self, theme: &str) -> Self {
        self.config.highlight.theme = theme.to_string();
        self
    }

    pub fn template_path(mut self, path: &str) -> Self {
        self.config.template.path = Some(path.to_string());
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
