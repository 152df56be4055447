//! Placement engine: collision detection and kick-out
//!
//! Everything here is pure. A placement is first planned against the current
//! placed set and occupancy, then applied in one step, so a rejected plan never
//! touches the layout.

use super::error::LayoutError;
use super::types::{Occupancy, PenId, PlacedPen};

/// Result of planning a legal placement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementPlan {
    /// The pen with its new geometry
    pub candidate: PlacedPen,
    /// Empty pens that overlap the candidate and get moved off the grid
    pub evicted: Vec<PenId>,
}

/// Every placed pen overlapping `candidate`, excluding the candidate itself.
pub fn find_collisions<'a>(candidate: &PlacedPen, placed: &'a [PlacedPen]) -> Vec<&'a PlacedPen> {
    placed
        .iter()
        .filter(|p| p.id != candidate.id && p.overlaps(candidate))
        .collect()
}

/// Decide whether `candidate` can be placed.
///
/// Overlapping pens that still house livestock block the whole placement; the
/// error lists them in placed-set order. Empty overlapping pens are evicted.
pub fn plan_placement(
    candidate: PlacedPen,
    placed: &[PlacedPen],
    occupancy: &Occupancy,
) -> Result<PlacementPlan, LayoutError> {
    let collisions = find_collisions(&candidate, placed);

    let blockers: Vec<(String, u32)> = collisions
        .iter()
        .filter(|p| occupancy.is_occupied(p.id))
        .map(|p| (p.name.clone(), occupancy.count(p.id)))
        .collect();
    if !blockers.is_empty() {
        return Err(LayoutError::PlacementBlocked { blockers });
    }

    let evicted = collisions.iter().map(|p| p.id).collect();
    Ok(PlacementPlan { candidate, evicted })
}

/// Apply a plan to the placed set and return the evicted pens.
///
/// Any earlier placement of the candidate is replaced; the candidate ends up
/// last in the placed set.
pub fn apply_plan(plan: PlacementPlan, placed: &mut Vec<PlacedPen>) -> Vec<PlacedPen> {
    let PlacementPlan { candidate, evicted } = plan;

    let (kicked, survivors): (Vec<PlacedPen>, Vec<PlacedPen>) = std::mem::take(placed)
        .into_iter()
        .filter(|p| p.id != candidate.id)
        .partition(|p| evicted.contains(&p.id));

    *placed = survivors;
    placed.push(candidate);
    kicked
}

/// All pairs of placed pens that overlap each other.
///
/// An accepted sequence of placements never produces a pair; a non-empty
/// result means the data came from somewhere that bypassed the engine.
pub fn overlapping_pairs(placed: &[PlacedPen]) -> Vec<(PenId, PenId)> {
    let mut pairs = Vec::new();
    for (i, a) in placed.iter().enumerate() {
        for b in &placed[i + 1..] {
            if a.overlaps(b) {
                pairs.push((a.id, b.id));
            }
        }
    }
    pairs
}
