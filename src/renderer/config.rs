//! Configuration for SVG rendering

use serde::Deserialize;

/// Configuration options for SVG output
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SvgConfig {
    /// Size of one grid cell in pixels
    pub cell_size: f64,

    /// Space between neighbouring cells
    pub gap: f64,

    /// Padding around the grid
    pub padding: f64,

    /// Whether to include XML declaration and standalone attributes
    pub standalone: bool,

    /// Whether to format output with indentation
    pub pretty_print: bool,

    /// Prefix for CSS class names (e.g., "barn-" for "barn-pen")
    pub class_prefix: Option<String>,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            cell_size: 100.0,
            gap: 2.0,
            padding: 12.0,
            standalone: true,
            pretty_print: true,
            class_prefix: Some("barn-".to_string()),
        }
    }
}

impl SvgConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cell size
    pub fn with_cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Set the gap between cells
    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }

    /// Set whether output is standalone
    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    /// Set whether to pretty-print output
    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    /// Set the CSS class prefix
    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = Some(prefix.into());
        self
    }

    /// Remove the CSS class prefix
    pub fn without_class_prefix(mut self) -> Self {
        self.class_prefix = None;
        self
    }

    /// Pixel offset of the cell at `index` along one axis
    pub fn cell_offset(&self, index: u32) -> f64 {
        self.padding + f64::from(index) * (self.cell_size + self.gap)
    }

    /// Pixel length of `span` cells including the gaps between them
    pub fn span_length(&self, span: u32) -> f64 {
        if span == 0 {
            return 0.0;
        }
        f64::from(span) * self.cell_size + f64::from(span - 1) * self.gap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SvgConfig::default();
        assert_eq!(config.cell_size, 100.0);
        assert_eq!(config.gap, 2.0);
        assert!(config.standalone);
        assert_eq!(config.class_prefix, Some("barn-".to_string()));
    }

    #[test]
    fn test_builder_pattern() {
        let config = SvgConfig::new()
            .with_cell_size(50.0)
            .with_gap(0.0)
            .with_standalone(false)
            .without_class_prefix();
        assert_eq!(config.cell_size, 50.0);
        assert!(!config.standalone);
        assert_eq!(config.class_prefix, None);
    }

    #[test]
    fn test_cell_geometry() {
        let config = SvgConfig::default();
        assert_eq!(config.cell_offset(0), 12.0);
        assert_eq!(config.cell_offset(2), 216.0);
        assert_eq!(config.span_length(3), 304.0);
    }
}
