//! Configuration for the editor canvas grid

use serde::Deserialize;

use super::error::LayoutError;
use super::types::GridRect;

/// Canvas geometry used to snap pointer coordinates to cells
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Size of one grid cell in pixels
    pub cell_size: f64,

    /// Number of columns on the canvas
    pub columns: u32,

    /// Number of rows on the canvas
    pub rows: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: 100.0,
            columns: 20,
            rows: 20,
        }
    }
}

impl GridConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cell size in pixels
    pub fn with_cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Set the canvas dimensions in cells
    pub fn with_dimensions(mut self, columns: u32, rows: u32) -> Self {
        self.columns = columns;
        self.rows = rows;
        self
    }

    /// Reject rectangles that reach past the last column or row
    pub fn check_fits(&self, rect: &GridRect) -> Result<(), LayoutError> {
        if rect.right() > self.columns || rect.bottom() > self.rows {
            return Err(LayoutError::OutsideCanvas {
                rect: *rect,
                columns: self.columns,
                rows: self.rows,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GridConfig::default();
        assert_eq!(config.cell_size, 100.0);
        assert_eq!(config.columns, 20);
        assert_eq!(config.rows, 20);
    }

    #[test]
    fn test_builder_pattern() {
        let config = GridConfig::new().with_cell_size(40.0).with_dimensions(8, 6);
        assert_eq!(config.cell_size, 40.0);
        assert_eq!((config.columns, config.rows), (8, 6));
    }

    #[test]
    fn test_check_fits() {
        let config = GridConfig::new().with_dimensions(4, 3);
        assert!(config.check_fits(&GridRect::new(2, 1, 2, 2).unwrap()).is_ok());

        let err = config
            .check_fits(&GridRect::new(3, 0, 2, 1).unwrap())
            .unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"pen at (3, 0) 2x1 does not fit the 4x3 grid");
        assert!(config.check_fits(&GridRect::new(0, 3, 1, 1).unwrap()).is_err());
    }
}
