//! Tool configuration loaded from TOML and the environment
//!
//! ```toml
//! [api]
//! base_url = "http://barns.local:8080"
//! timeout_secs = 5
//!
//! [grid]
//! cell_size = 80
//!
//! [svg]
//! gap = 4
//!
//! [palette]
//! status-good-fill = "#d1fae5"
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::api::ApiConfig;
use crate::layout::GridConfig;
use crate::renderer::SvgConfig;
use crate::stylesheet::Stylesheet;

/// Environment variable overriding `api.base_url`
pub const API_URL_ENV: &str = "BARN_API_URL";

/// Errors that can occur when loading the configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Complete configuration for the layout tool
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub grid: GridConfig,
    pub svg: SvgConfig,
    /// Colour overrides on top of the built-in palette
    pub palette: HashMap<String, String>,
}

impl Config {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(API_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
        self
    }

    /// Set the API configuration
    pub fn with_api(mut self, api: ApiConfig) -> Self {
        self.api = api;
        self
    }

    /// Set the grid configuration
    pub fn with_grid(mut self, grid: GridConfig) -> Self {
        self.grid = grid;
        self
    }

    /// Set the SVG configuration
    pub fn with_svg(mut self, svg: SvgConfig) -> Self {
        self.svg = svg;
        self
    }

    /// Palette overrides as a stylesheet
    pub fn stylesheet(&self) -> Stylesheet {
        Stylesheet::from_colors(self.palette.clone())
    }
}
