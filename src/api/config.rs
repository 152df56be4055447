//! Configuration for the layout API client

use serde::Deserialize;

/// Base URL used when neither the config file nor the environment sets one
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Connection settings for the layout API
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Scheme, host and port of the API server
    pub base_url: String,

    /// Seconds to wait for a connection
    pub connect_timeout_secs: u64,

    /// Seconds to wait for a whole request
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            connect_timeout_secs: 2,
            timeout_secs: 10,
        }
    }
}

impl ApiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.connect_timeout_secs, 2);
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_builder_pattern() {
        let config = ApiConfig::new()
            .with_base_url("https://farm.example")
            .with_timeout_secs(30);
        assert_eq!(config.base_url, "https://farm.example");
        assert_eq!(config.timeout_secs, 30);
    }
}
