//! Core types for the barn grid

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::LayoutError;

/// Identity of a pen.
///
/// Persisted pens carry server-assigned non-negative ids. Pens created during an
/// editing session get negative ids until the server assigns a real one on save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PenId(pub i64);

impl PenId {
    /// True for client-only ids that the server has never seen
    pub fn is_temporary(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for PenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A pen as the layout API sends and receives it.
///
/// Geometry is 1-based (`grid_row`, `grid_col`) with spans counted in cells.
/// Unplaced pens come back from the server with row and column 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PenLayout {
    pub pen_id: PenId,
    pub pen_name: String,
    pub capacity: u32,
    pub grid_row: i32,
    pub grid_col: i32,
    pub row_span: i32,
    pub col_span: i32,
}

impl PenLayout {
    /// A freshly created pen: one cell at row 1, column 1
    pub fn new_default(pen_id: PenId, pen_name: impl Into<String>, capacity: u32) -> Self {
        Self {
            pen_id,
            pen_name: pen_name.into(),
            capacity,
            grid_row: 1,
            grid_col: 1,
            row_span: 1,
            col_span: 1,
        }
    }
}

/// Largest exclusive edge a rectangle may reach, so every cell stays
/// addressable in the signed 1-based wire form
pub const MAX_GRID_EDGE: u32 = i32::MAX as u32;

/// An axis-aligned rectangle of grid cells (0-based, top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl GridRect {
    /// Create a rectangle. Zero-sized rectangles and rectangles reaching past
    /// [`MAX_GRID_EDGE`] are rejected.
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Result<Self, LayoutError> {
        if w == 0 || h == 0 {
            return Err(LayoutError::EmptySpan { w, h });
        }
        let fits = |origin: u32, span: u32| {
            origin
                .checked_add(span)
                .is_some_and(|edge| edge <= MAX_GRID_EDGE)
        };
        if !fits(x, w) || !fits(y, h) {
            return Err(LayoutError::GridOverflow { x, y, w, h });
        }
        Ok(Self { x, y, w, h })
    }

    /// Exclusive right edge
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.w)
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }

    /// Strict overlap: rectangles that only share an edge do not overlap
    pub fn overlaps(&self, other: &GridRect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

impl fmt::Display for GridRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) {}x{}", self.x, self.y, self.w, self.h)
    }
}

/// A pen positioned on the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedPen {
    pub id: PenId,
    pub name: String,
    pub capacity: u32,
    pub rect: GridRect,
}

impl PlacedPen {
    pub fn new(id: PenId, name: impl Into<String>, capacity: u32, rect: GridRect) -> Self {
        Self {
            id,
            name: name.into(),
            capacity,
            rect,
        }
    }

    /// Same pen, different geometry
    pub fn with_rect(&self, rect: GridRect) -> Self {
        Self {
            rect,
            ..self.clone()
        }
    }

    pub fn overlaps(&self, other: &PlacedPen) -> bool {
        self.rect.overlaps(&other.rect)
    }
}

/// Live livestock counts per pen, as reported by the server snapshot.
///
/// The editor only reads these counts; pens without an entry hold no animals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Occupancy {
    counts: HashMap<PenId, u32>,
}

impl Occupancy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of animals housed in a pen
    pub fn count(&self, id: PenId) -> u32 {
        self.counts.get(&id).copied().unwrap_or(0)
    }

    pub fn is_occupied(&self, id: PenId) -> bool {
        self.count(id) > 0
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl FromIterator<(PenId, u32)> for Occupancy {
    fn from_iter<I: IntoIterator<Item = (PenId, u32)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: u32, y: u32, w: u32, h: u32) -> GridRect {
        GridRect::new(x, y, w, h).unwrap()
    }

    #[test]
    fn test_zero_span_rejected() {
        assert!(GridRect::new(0, 0, 0, 1).is_err());
        assert!(GridRect::new(0, 0, 1, 0).is_err());
    }

    #[test]
    fn test_edge_past_wire_range_rejected() {
        assert_eq!(
            GridRect::new(u32::MAX - 1, 0, 2, 1),
            Err(LayoutError::GridOverflow {
                x: u32::MAX - 1,
                y: 0,
                w: 2,
                h: 1
            })
        );
        assert!(GridRect::new(MAX_GRID_EDGE, 0, 1, 1).is_err());
        assert!(GridRect::new(0, MAX_GRID_EDGE - 1, 1, 2).is_err());

        let last = GridRect::new(MAX_GRID_EDGE - 1, 0, 1, 1).unwrap();
        assert_eq!(last.right(), MAX_GRID_EDGE);
    }

    #[test]
    fn test_overlap_basic() {
        assert!(rect(0, 0, 2, 2).overlaps(&rect(1, 1, 1, 1)));
        assert!(rect(1, 1, 1, 1).overlaps(&rect(0, 0, 2, 2)));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        assert!(!rect(0, 0, 2, 2).overlaps(&rect(2, 0, 1, 1)));
        assert!(!rect(0, 0, 2, 2).overlaps(&rect(0, 2, 3, 1)));
    }

    #[test]
    fn test_occupancy_missing_is_zero() {
        let occupancy: Occupancy = [(PenId(1), 3)].into_iter().collect();
        assert_eq!(occupancy.count(PenId(1)), 3);
        assert_eq!(occupancy.count(PenId(2)), 0);
        assert!(!occupancy.is_occupied(PenId(2)));
    }

    #[test]
    fn test_temporary_ids() {
        assert!(PenId(-1).is_temporary());
        assert!(!PenId(0).is_temporary());
    }
}
