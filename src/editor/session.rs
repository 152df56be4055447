//! In-memory editing session for one barn's layout
//!
//! The session is seeded from a server snapshot and only changes in memory
//! until it is saved. Every operation either applies completely or returns an
//! error and leaves the session untouched.

use tracing::{debug, warn};

use crate::api::{BarnLayoutResponse, LayoutSaveRequest};
use crate::layout::engine::{apply_plan, plan_placement};
use crate::layout::transcode::{pen_to_external, to_external, to_internal};
use crate::layout::{overlapping_pairs, LayoutError, Occupancy, PenId, PenLayout, PlacedPen};

/// An accepted placement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// The pen that was placed
    pub pen: PenId,
    /// Empty pens moved off the grid to make room
    pub evicted: Vec<PenId>,
}

/// Placed pens, unplaced pens and occupancy for one barn
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSession {
    barn_id: i64,
    barn_name: String,
    placed: Vec<PlacedPen>,
    unplaced: Vec<PenLayout>,
    occupancy: Occupancy,
    next_temp_id: i64,
}

impl LayoutSession {
    /// An empty session with no pens and no livestock
    pub fn new(barn_id: i64, barn_name: impl Into<String>) -> Self {
        Self {
            barn_id,
            barn_name: barn_name.into(),
            placed: Vec::new(),
            unplaced: Vec::new(),
            occupancy: Occupancy::new(),
            next_temp_id: -1,
        }
    }

    /// Build a session from the server snapshot
    pub fn from_snapshot(snapshot: BarnLayoutResponse) -> Result<Self, LayoutError> {
        let placed = to_internal(&snapshot.layouts)?;
        let occupancy = snapshot.occupancy();

        let overlaps = overlapping_pairs(&placed);
        if !overlaps.is_empty() {
            warn!(barn_id = snapshot.barn_id, ?overlaps, "snapshot contains overlapping pens");
        }

        Ok(Self {
            barn_id: snapshot.barn_id,
            barn_name: snapshot.barn_name,
            placed,
            unplaced: snapshot.unplaced_pens,
            occupancy,
            next_temp_id: -1,
        })
    }

    /// Replace the occupancy counts
    pub fn with_occupancy(mut self, occupancy: Occupancy) -> Self {
        self.occupancy = occupancy;
        self
    }

    pub fn barn_id(&self) -> i64 {
        self.barn_id
    }

    pub fn barn_name(&self) -> &str {
        &self.barn_name
    }

    pub fn placed(&self) -> &[PlacedPen] {
        &self.placed
    }

    pub fn unplaced(&self) -> &[PenLayout] {
        &self.unplaced
    }

    pub fn occupancy(&self) -> &Occupancy {
        &self.occupancy
    }

    pub fn placed_pen(&self, id: PenId) -> Option<&PlacedPen> {
        self.placed.iter().find(|p| p.id == id)
    }

    pub fn unplaced_pen(&self, id: PenId) -> Option<&PenLayout> {
        self.unplaced.iter().find(|p| p.pen_id == id)
    }

    /// Place a pen, or move/resize one that is already placed.
    ///
    /// Overlapped empty pens are moved to the unplaced set; an overlapped pen
    /// that still houses livestock rejects the whole placement. A pen taken
    /// from the unplaced set leaves it only when the placement is accepted.
    pub fn place(&mut self, candidate: PlacedPen) -> Result<Placement, LayoutError> {
        let id = candidate.id;
        if self.placed_pen(id).is_none() && self.unplaced_pen(id).is_none() {
            return Err(LayoutError::UnknownPen { id });
        }

        let plan = plan_placement(candidate, &self.placed, &self.occupancy)?;
        let evicted = plan.evicted.clone();
        let rect = plan.candidate.rect;

        let kicked = apply_plan(plan, &mut self.placed);
        // A snapshot may already hold overlapping pens; the placed one never does
        debug_assert!(
            overlapping_pairs(&self.placed)
                .iter()
                .all(|(a, b)| *a != id && *b != id),
            "pen {} overlaps another pen after placement",
            id
        );
        self.unplaced.retain(|p| p.pen_id != id);
        self.unplaced.extend(kicked.iter().map(pen_to_external));

        debug!(pen = %id, %rect, ?evicted, "pen placed");
        Ok(Placement { pen: id, evicted })
    }

    /// Add a new, not yet persisted pen to the unplaced set.
    ///
    /// The name is trimmed. New pens get ids -1, -2, ... in creation order.
    pub fn create_pen(&mut self, name: &str, capacity: i64) -> Result<PenId, LayoutError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LayoutError::InvalidPenName);
        }
        let capacity = match u32::try_from(capacity) {
            Ok(c) if c > 0 => c,
            _ => return Err(LayoutError::InvalidCapacity { value: capacity }),
        };

        let id = PenId(self.next_temp_id);
        self.next_temp_id -= 1;
        self.unplaced.push(PenLayout::new_default(id, name, capacity));

        debug!(pen = %id, name, capacity, "pen created");
        Ok(id)
    }

    /// Drop an unplaced pen from the session.
    ///
    /// Occupancy is not consulted: unplaced pens are assumed to be empty.
    pub fn delete_unplaced_pen(&mut self, id: PenId) -> Result<PenLayout, LayoutError> {
        let index = self
            .unplaced
            .iter()
            .position(|p| p.pen_id == id)
            .ok_or(LayoutError::UnknownPen { id })?;

        let count = self.occupancy.count(id);
        if count > 0 {
            warn!(pen = %id, count, "deleting unplaced pen that the snapshot reports as occupied");
        }

        let removed = self.unplaced.remove(index);
        debug!(pen = %id, "unplaced pen deleted");
        Ok(removed)
    }

    /// Take a placed pen off the grid, unless it still houses livestock
    pub fn remove_placed_pen(&mut self, id: PenId) -> Result<(), LayoutError> {
        let index = self
            .placed
            .iter()
            .position(|p| p.id == id)
            .ok_or(LayoutError::UnknownPen { id })?;

        let count = self.occupancy.count(id);
        if count > 0 {
            return Err(LayoutError::PenOccupied {
                name: self.placed[index].name.clone(),
                count,
            });
        }

        let pen = self.placed.remove(index);
        self.unplaced.push(pen_to_external(&pen));
        debug!(pen = %id, "placed pen removed");
        Ok(())
    }

    /// The request that replaces the server's layout with this session's
    pub fn save_request(&self) -> Result<LayoutSaveRequest, LayoutError> {
        if self.placed.is_empty() {
            return Err(LayoutError::EmptyLayout);
        }
        Ok(LayoutSaveRequest {
            barn_id: self.barn_id,
            layouts: to_external(&self.placed),
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::layout::{GridRect, MAX_GRID_EDGE};

    fn pen(id: i64, name: &str, x: u32, y: u32, w: u32, h: u32) -> PlacedPen {
        PlacedPen::new(PenId(id), name, 10, GridRect::new(x, y, w, h).unwrap())
    }

    fn session_with(placed: Vec<PlacedPen>, unplaced: Vec<PenLayout>, counts: &[(i64, u32)]) -> LayoutSession {
        let snapshot = BarnLayoutResponse {
            barn_id: 1,
            barn_name: "Main".to_string(),
            layouts: to_external(&placed),
            unplaced_pens: unplaced,
            livestock_counts: counts.iter().copied().collect(),
        };
        LayoutSession::from_snapshot(snapshot).unwrap()
    }

    fn unplaced(id: i64, name: &str) -> PenLayout {
        PenLayout {
            pen_id: PenId(id),
            pen_name: name.to_string(),
            capacity: 10,
            grid_row: 0,
            grid_col: 0,
            row_span: 1,
            col_span: 1,
        }
    }

    #[test]
    fn test_place_over_empty_cell() {
        let mut session = session_with(vec![], vec![unplaced(1, "A")], &[]);
        let placement = session.place(pen(1, "A", 2, 3, 1, 1)).unwrap();

        assert!(placement.evicted.is_empty());
        assert_eq!(session.placed(), &[pen(1, "A", 2, 3, 1, 1)]);
        assert!(session.unplaced().is_empty());
    }

    #[test]
    fn test_collision_with_empty_pen_evicts() {
        let mut session = session_with(
            vec![pen(1, "A", 0, 0, 2, 2)],
            vec![unplaced(2, "B")],
            &[(1, 0)],
        );
        let placement = session.place(pen(2, "B", 1, 1, 1, 1)).unwrap();

        assert_eq!(placement.evicted, vec![PenId(1)]);
        assert_eq!(session.placed(), &[pen(2, "B", 1, 1, 1, 1)]);
        assert_eq!(session.unplaced().len(), 1);
        // Evicted pens keep their last geometry in wire form
        assert_eq!(
            session.unplaced()[0],
            pen_to_external(&pen(1, "A", 0, 0, 2, 2))
        );
    }

    #[test]
    fn test_collision_with_occupied_pen_rejected() {
        let mut session = session_with(
            vec![pen(1, "A", 0, 0, 2, 2)],
            vec![unplaced(2, "B")],
            &[(1, 3)],
        );
        let before = session.clone();

        let err = session.place(pen(2, "B", 1, 1, 1, 1)).unwrap_err();
        assert_eq!(err.blocking_pens(), vec!["A"]);
        assert_eq!(session, before);
    }

    #[test]
    fn test_remove_occupied_pen_rejected() {
        let mut session = session_with(vec![pen(1, "A", 0, 0, 1, 1)], vec![], &[(1, 5)]);
        let before = session.clone();

        let err = session.remove_placed_pen(PenId(1)).unwrap_err();
        assert_eq!(
            err,
            LayoutError::PenOccupied {
                name: "A".to_string(),
                count: 5
            }
        );
        assert_eq!(session, before);
    }

    #[test]
    fn test_remove_empty_pen_moves_to_unplaced() {
        let mut session = session_with(vec![pen(1, "A", 3, 4, 2, 1)], vec![], &[]);
        session.remove_placed_pen(PenId(1)).unwrap();

        assert!(session.placed().is_empty());
        let back = &session.unplaced()[0];
        assert_eq!((back.grid_col, back.grid_row, back.col_span, back.row_span), (4, 5, 2, 1));
    }

    #[test]
    fn test_create_then_delete() {
        let mut session = LayoutSession::new(1, "Main");
        let id = session.create_pen("East Wing", 20).unwrap();
        assert_eq!(id, PenId(-1));
        assert_eq!(
            session.unplaced_pen(id),
            Some(&PenLayout::new_default(PenId(-1), "East Wing", 20))
        );

        session.delete_unplaced_pen(id).unwrap();
        assert!(session.unplaced_pen(id).is_none());
    }

    #[test]
    fn test_create_validates_input() {
        let mut session = LayoutSession::new(1, "Main");
        assert_eq!(session.create_pen("   ", 5), Err(LayoutError::InvalidPenName));
        assert_eq!(
            session.create_pen("A", 0),
            Err(LayoutError::InvalidCapacity { value: 0 })
        );
        assert_eq!(
            session.create_pen("A", -3),
            Err(LayoutError::InvalidCapacity { value: -3 })
        );
        assert!(session.unplaced().is_empty());

        // Failed attempts do not consume ids
        assert_eq!(session.create_pen("  A  ", 1), Ok(PenId(-1)));
        assert_eq!(session.unplaced()[0].pen_name, "A");
    }

    #[test]
    fn test_unknown_pens() {
        let mut session = LayoutSession::new(1, "Main");
        assert_eq!(
            session.place(pen(9, "Z", 0, 0, 1, 1)),
            Err(LayoutError::UnknownPen { id: PenId(9) })
        );
        assert!(session.remove_placed_pen(PenId(9)).is_err());
        assert!(session.delete_unplaced_pen(PenId(9)).is_err());
    }

    #[test]
    fn test_pen_on_last_addressable_cell_saves() {
        let mut session = session_with(vec![pen(1, "A", 0, 0, 1, 1)], vec![unplaced(2, "B")], &[]);
        let edge = GridRect::new(MAX_GRID_EDGE - 1, 0, 1, 1).unwrap();
        session.place(PlacedPen::new(PenId(2), "B", 10, edge)).unwrap();

        let request = session.save_request().unwrap();
        assert_eq!(request.layouts[1].grid_col, i32::MAX);
        assert!(GridRect::new(u32::MAX - 1, 0, 2, 1).is_err());
    }

    #[test]
    fn test_placement_next_to_overlapping_snapshot_pens() {
        let mut session = session_with(
            vec![pen(1, "A", 0, 0, 2, 2), pen(2, "B", 1, 1, 1, 1)],
            vec![unplaced(3, "C")],
            &[(1, 2), (2, 1)],
        );
        session.place(pen(3, "C", 4, 0, 1, 1)).unwrap();
        assert_eq!(overlapping_pairs(session.placed()), vec![(PenId(1), PenId(2))]);
    }

    #[test]
    fn test_save_request_requires_placed_pens() {
        let session = LayoutSession::new(4, "Main");
        assert_eq!(session.save_request(), Err(LayoutError::EmptyLayout));

        let session = session_with(vec![pen(1, "A", 0, 1, 1, 1)], vec![], &[]);
        let request = session.save_request().unwrap();
        assert_eq!(request.barn_id, 1);
        assert_eq!(request.layouts[0].grid_row, 2);
        assert_eq!(request.layouts[0].grid_col, 1);
    }
}
