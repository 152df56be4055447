//! Error types for the layout model

use thiserror::Error;

use super::types::{GridRect, PenId};

/// Reasons a layout operation is rejected.
///
/// A rejected operation never mutates the session; the caller reports the
/// message and carries on with the unchanged layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// A rectangle with no width or height
    #[error("pen size must be at least 1x1 (got {w}x{h})")]
    EmptySpan { w: u32, h: u32 },

    /// A rectangle whose far edge does not fit the grid's coordinate range
    #[error("pen geometry ({x}, {y}) {w}x{h} lies outside the grid")]
    GridOverflow { x: u32, y: u32, w: u32, h: u32 },

    /// A rectangle that does not fit on the editor canvas
    #[error("pen at {rect} does not fit the {columns}x{rows} grid")]
    OutsideCanvas {
        rect: GridRect,
        columns: u32,
        rows: u32,
    },

    /// Wire geometry that cannot be mapped onto the grid
    #[error("pen '{pen}' has malformed geometry: {reason}")]
    MalformedGeometry { pen: String, reason: String },

    /// The candidate overlaps pens that still house livestock
    #[error("placement blocked: {} still house livestock and cannot be overwritten", format_blockers(.blockers))]
    PlacementBlocked { blockers: Vec<(String, u32)> },

    /// Removing a pen that still houses livestock
    #[error("cannot remove pen '{name}': {count} animals are still housed there, move them first")]
    PenOccupied { name: String, count: u32 },

    /// Pen name empty after trimming
    #[error("pen name must not be empty")]
    InvalidPenName,

    /// Capacity not a positive integer
    #[error("capacity must be a positive integer (got {value})")]
    InvalidCapacity { value: i64 },

    /// No pen with that id in the relevant set
    #[error("pen {id} is not in the layout")]
    UnknownPen { id: PenId },

    /// Saving with nothing on the grid
    #[error("no pens are placed, place at least one pen before saving")]
    EmptyLayout,
}

impl LayoutError {
    /// Create a malformed geometry error
    pub fn malformed(pen: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedGeometry {
            pen: pen.into(),
            reason: reason.into(),
        }
    }

    /// Names of the pens that blocked a placement, if any
    pub fn blocking_pens(&self) -> Vec<&str> {
        match self {
            Self::PlacementBlocked { blockers } => {
                blockers.iter().map(|(name, _)| name.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}

fn format_blockers(blockers: &[(String, u32)]) -> String {
    blockers
        .iter()
        .map(|(name, count)| format!("'{}' ({} head)", name, count))
        .collect::<Vec<_>>()
        .join(", ")
}
