//! Read-only map of a barn with per-pen occupancy

use std::fmt;

use thiserror::Error;

use crate::api::BarnLayoutResponse;
use crate::editor::LayoutSession;
use crate::layout::{overlapping_pairs, to_internal, LayoutError, Occupancy, PenId, PlacedPen};

/// Errors building a map view
#[derive(Debug, Error)]
pub enum RenderError {
    /// The barn has no placed pens
    #[error("no layout has been set up for barn '{barn_name}'")]
    NoLayout { barn_name: String },

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// How full a pen is relative to its capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccupancyStatus {
    /// Below 70 % of capacity
    Good,
    /// 70 % of capacity or more
    Crowded,
    /// At or over capacity
    Overcrowded,
}

impl OccupancyStatus {
    /// Classify a head count against a capacity; zero capacity counts as empty
    pub fn classify(count: u32, capacity: u32) -> Self {
        if capacity == 0 {
            return OccupancyStatus::Good;
        }
        let ratio = f64::from(count) / f64::from(capacity);
        if ratio >= 1.0 {
            OccupancyStatus::Overcrowded
        } else if ratio >= 0.7 {
            OccupancyStatus::Crowded
        } else {
            OccupancyStatus::Good
        }
    }

    /// Token used for CSS classes and palette lookups
    pub fn token(&self) -> &'static str {
        match self {
            OccupancyStatus::Good => "good",
            OccupancyStatus::Crowded => "crowded",
            OccupancyStatus::Overcrowded => "overcrowded",
        }
    }
}

impl fmt::Display for OccupancyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OccupancyStatus::Good => write!(f, "OK"),
            OccupancyStatus::Crowded => write!(f, "Crowded"),
            OccupancyStatus::Overcrowded => write!(f, "Overcrowded"),
        }
    }
}

/// One pen on the map
#[derive(Debug, Clone, PartialEq)]
pub struct PenView {
    pub pen: PlacedPen,
    pub count: u32,
    pub status: OccupancyStatus,
}

/// Everything needed to draw a barn map
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub barn_id: i64,
    pub barn_name: String,
    /// Columns spanned by the placed pens
    pub columns: u32,
    /// Rows spanned by the placed pens
    pub rows: u32,
    pub pens: Vec<PenView>,
    /// Overlapping pairs; only non-empty for data that bypassed the editor
    pub overlaps: Vec<(PenId, PenId)>,
}

impl MapView {
    /// Map of the stored layout
    pub fn from_response(response: &BarnLayoutResponse) -> Result<Self, RenderError> {
        let placed = to_internal(&response.layouts)?;
        Self::build(
            response.barn_id,
            &response.barn_name,
            placed,
            &response.occupancy(),
        )
    }

    /// Map of an editing session's current arrangement
    pub fn from_session(session: &LayoutSession) -> Result<Self, RenderError> {
        Self::build(
            session.barn_id(),
            session.barn_name(),
            session.placed().to_vec(),
            session.occupancy(),
        )
    }

    fn build(
        barn_id: i64,
        barn_name: &str,
        placed: Vec<PlacedPen>,
        occupancy: &Occupancy,
    ) -> Result<Self, RenderError> {
        if placed.is_empty() {
            return Err(RenderError::NoLayout {
                barn_name: barn_name.to_string(),
            });
        }

        let columns = placed.iter().map(|p| p.rect.right()).max().unwrap_or(0);
        let rows = placed.iter().map(|p| p.rect.bottom()).max().unwrap_or(0);
        let overlaps = overlapping_pairs(&placed);

        let pens = placed
            .into_iter()
            .map(|pen| {
                let count = occupancy.count(pen.id);
                let status = OccupancyStatus::classify(count, pen.capacity);
                PenView { pen, count, status }
            })
            .collect();

        Ok(Self {
            barn_id,
            barn_name: barn_name.to_string(),
            columns,
            rows,
            pens,
            overlaps,
        })
    }

    /// Total animals across the mapped pens
    pub fn total_head(&self) -> u32 {
        self.pens.iter().map(|p| p.count).sum()
    }

    /// Total capacity across the mapped pens
    pub fn total_capacity(&self) -> u32 {
        self.pens.iter().map(|p| p.pen.capacity).sum()
    }
}
