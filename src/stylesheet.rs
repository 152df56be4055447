//! Colour palette for barn maps
//!
//! Maps symbolic colour tokens (`status-good-fill`, `grid-line`, ...) to
//! concrete values. A palette file only needs the tokens it overrides; the
//! rest fall back to the built-in palette.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading or parsing stylesheets
#[derive(Error, Debug)]
pub enum StylesheetError {
    #[error("Failed to read stylesheet file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse stylesheet TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// A stylesheet mapping symbolic colours to concrete values
#[derive(Debug, Clone, PartialEq)]
pub struct Stylesheet {
    /// Colour mappings: token name -> colour
    pub colors: HashMap<String, String>,
}

#[derive(Deserialize)]
struct TomlStylesheet {
    #[serde(default)]
    colors: HashMap<String, String>,
}

/// Built-in palette: green for pens with room, amber when crowded, red when full
const DEFAULT_PALETTE: &str = r##"
[colors]
background = "#ffffff"
grid-line = "#e5e7eb"
text = "#1f2937"
text-muted = "#4b5563"

status-good-fill = "#dcfce7"
status-good-stroke = "#4ade80"
status-crowded-fill = "#fef9c3"
status-crowded-stroke = "#eab308"
status-overcrowded-fill = "#fecaca"
status-overcrowded-stroke = "#ef4444"
"##;

impl Stylesheet {
    /// Load stylesheet from TOML file
    pub fn from_file(path: &Path) -> Result<Self, StylesheetError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load stylesheet from TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, StylesheetError> {
        let parsed: TomlStylesheet = toml::from_str(content)?;
        Ok(Stylesheet {
            colors: parsed.colors,
        })
    }

    /// Stylesheet made of explicit overrides
    pub fn from_colors(colors: HashMap<String, String>) -> Self {
        Self { colors }
    }

    /// Resolve a token defined in this stylesheet
    pub fn resolve(&self, token: &str) -> Option<&str> {
        self.colors.get(token).map(|s| s.as_str())
    }

    /// Resolve a token, falling back to the built-in palette and then to a
    /// neutral grey
    pub fn resolve_or_default(&self, token: &str) -> String {
        if let Some(color) = self.resolve(token) {
            return color.to_string();
        }
        let default = Self::default();
        if let Some(color) = default.resolve(token) {
            return color.to_string();
        }
        if token.ends_with("-fill") {
            return "#f3f4f6".to_string();
        }
        "#6b7280".to_string()
    }
}

impl Default for Stylesheet {
    fn default() -> Self {
        let parsed: TomlStylesheet =
            toml::from_str(DEFAULT_PALETTE).expect("Default palette should be valid TOML");
        Stylesheet {
            colors: parsed.colors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stylesheet() {
        let stylesheet = Stylesheet::default();
        assert_eq!(stylesheet.resolve("status-good-fill"), Some("#dcfce7"));
        assert_eq!(stylesheet.resolve("status-overcrowded-stroke"), Some("#ef4444"));
    }

    #[test]
    fn test_resolve_or_default_fallback() {
        let empty = Stylesheet::from_colors(HashMap::new());
        assert_eq!(empty.resolve_or_default("grid-line"), "#e5e7eb");
        assert_eq!(empty.resolve_or_default("unknown-fill"), "#f3f4f6");
        assert_eq!(empty.resolve_or_default("unknown"), "#6b7280");
    }

    #[test]
    fn test_parse_partial_palette() {
        let toml_str = r##"
[colors]
status-good-fill = "#00ff00"
"##;
        let stylesheet = Stylesheet::from_str(toml_str).expect("Should parse");
        assert_eq!(stylesheet.colors.len(), 1);
        assert_eq!(stylesheet.resolve_or_default("status-good-fill"), "#00ff00");
        assert_eq!(stylesheet.resolve_or_default("status-crowded-fill"), "#fef9c3");
    }

    #[test]
    fn test_invalid_toml_error() {
        assert!(Stylesheet::from_str("this is not valid toml {{{{").is_err());
    }
}
