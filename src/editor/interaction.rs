//! Pointer interaction on the editor canvas
//!
//! Turns drag, move and resize gestures in pixel space into candidate
//! placements on the grid. Nothing here touches the session: the editor hands
//! each candidate to [`LayoutSession::place`](super::LayoutSession::place), and
//! a rejected candidate simply leaves the committed geometry in place.

use std::fmt;

use thiserror::Error;

use crate::layout::{GridConfig, GridRect, LayoutError, PenId, PenLayout, PlacedPen};

/// A position on the canvas in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A size on the canvas in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSize {
    pub width: f64,
    pub height: f64,
}

impl PixelSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// The pen being dragged out of the sidebar, carried by value for the
/// lifetime of one drag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPayload {
    pub pen: PenId,
    pub name: String,
    pub capacity: u32,
    pub col_span: u32,
    pub row_span: u32,
}

impl DragPayload {
    /// Payload for an unplaced pen; missing or zero spans become one cell
    pub fn from_unplaced(pen: &PenLayout) -> Self {
        Self {
            pen: pen.pen_id,
            name: pen.pen_name.clone(),
            capacity: pen.capacity,
            col_span: pen.col_span.max(1).unsigned_abs(),
            row_span: pen.row_span.max(1).unsigned_abs(),
        }
    }
}

/// Current gesture
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    DraggingFromSidebar(DragPayload),
    Moving { pen: PenId },
    Resizing { pen: PenId },
}

impl Interaction {
    fn name(&self) -> &'static str {
        match self {
            Interaction::Idle => "idle",
            Interaction::DraggingFromSidebar(_) => "dragging from sidebar",
            Interaction::Moving { .. } => "moving",
            Interaction::Resizing { .. } => "resizing",
        }
    }
}

impl fmt::Display for Interaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors from the interaction state machine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InteractionError {
    /// An event that does not fit the current gesture
    #[error("unexpected {event} while {state}")]
    UnexpectedEvent { event: &'static str, state: String },

    /// Snapped geometry the grid cannot hold
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Gesture state plus the grid used to snap pixel coordinates
#[derive(Debug, Clone)]
pub struct InteractionState {
    grid: GridConfig,
    current: Interaction,
}

impl InteractionState {
    pub fn new(grid: GridConfig) -> Self {
        Self {
            grid,
            current: Interaction::Idle,
        }
    }

    pub fn current(&self) -> &Interaction {
        &self.current
    }

    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    /// Start dragging an unplaced pen toward the canvas
    pub fn begin_sidebar_drag(&mut self, payload: DragPayload) -> Result<(), InteractionError> {
        self.expect_idle("sidebar drag start")?;
        self.current = Interaction::DraggingFromSidebar(payload);
        Ok(())
    }

    /// Abandon whatever gesture is in progress
    pub fn cancel(&mut self) {
        self.current = Interaction::Idle;
    }

    /// Pen the current gesture acts on
    pub fn gesture_pen(&self) -> Option<PenId> {
        match &self.current {
            Interaction::Idle => None,
            Interaction::DraggingFromSidebar(payload) => Some(payload.pen),
            Interaction::Moving { pen } | Interaction::Resizing { pen } => Some(*pen),
        }
    }

    /// Abandon the current gesture if it acts on `pen`
    pub fn cancel_for(&mut self, pen: PenId) {
        if self.gesture_pen() == Some(pen) {
            self.cancel();
        }
    }

    /// Drop the dragged pen; it lands in the cell under the pointer with its
    /// remembered span.
    pub fn drop_on_grid(&mut self, point: PixelPoint) -> Result<PlacedPen, InteractionError> {
        let payload = match std::mem::take(&mut self.current) {
            Interaction::DraggingFromSidebar(payload) => payload,
            other => {
                let err = unexpected("drop", &other);
                self.current = other;
                return Err(err);
            }
        };

        let (w, h) = self.clamp_span(payload.col_span, payload.row_span);
        let (x, y) = self.clamp_origin(
            cell_at(point.x, self.grid.cell_size),
            cell_at(point.y, self.grid.cell_size),
            w,
            h,
        );
        let rect = GridRect::new(x, y, w, h)?;
        Ok(PlacedPen::new(payload.pen, payload.name, payload.capacity, rect))
    }

    /// Start moving a placed pen
    pub fn begin_move(&mut self, pen: PenId) -> Result<(), InteractionError> {
        self.expect_idle("move start")?;
        self.current = Interaction::Moving { pen };
        Ok(())
    }

    /// Finish a move at the pen's new top-left pixel position.
    ///
    /// Returns `None` when the snapped position equals the committed one.
    pub fn end_move(
        &mut self,
        committed: &PlacedPen,
        position: PixelPoint,
    ) -> Result<Option<PlacedPen>, InteractionError> {
        self.expect_gesture("move stop", |i| matches!(i, Interaction::Moving { pen } if *pen == committed.id))?;
        self.current = Interaction::Idle;

        let rect = committed.rect;
        let (x, y) = self.clamp_origin(
            snap(position.x, self.grid.cell_size),
            snap(position.y, self.grid.cell_size),
            rect.w,
            rect.h,
        );
        if x == rect.x && y == rect.y {
            return Ok(None);
        }
        Ok(Some(committed.with_rect(GridRect::new(x, y, rect.w, rect.h)?)))
    }

    /// Start resizing a placed pen
    pub fn begin_resize(&mut self, pen: PenId) -> Result<(), InteractionError> {
        self.expect_idle("resize start")?;
        self.current = Interaction::Resizing { pen };
        Ok(())
    }

    /// Finish a resize with the pen's new pixel origin and size.
    ///
    /// Sizes never snap below one cell.
    pub fn end_resize(
        &mut self,
        committed: &PlacedPen,
        origin: PixelPoint,
        size: PixelSize,
    ) -> Result<PlacedPen, InteractionError> {
        self.expect_gesture("resize stop", |i| matches!(i, Interaction::Resizing { pen } if *pen == committed.id))?;
        self.current = Interaction::Idle;

        let (w, h) = self.clamp_span(
            snap_span(size.width, self.grid.cell_size),
            snap_span(size.height, self.grid.cell_size),
        );
        let (x, y) = self.clamp_origin(
            snap(origin.x, self.grid.cell_size),
            snap(origin.y, self.grid.cell_size),
            w,
            h,
        );
        Ok(committed.with_rect(GridRect::new(x, y, w, h)?))
    }

    fn expect_idle(&self, event: &'static str) -> Result<(), InteractionError> {
        self.expect_gesture(event, |i| matches!(i, Interaction::Idle))
    }

    fn expect_gesture(
        &self,
        event: &'static str,
        accept: impl Fn(&Interaction) -> bool,
    ) -> Result<(), InteractionError> {
        if accept(&self.current) {
            Ok(())
        } else {
            Err(unexpected(event, &self.current))
        }
    }

    fn clamp_span(&self, w: u32, h: u32) -> (u32, u32) {
        (
            w.clamp(1, self.grid.columns.max(1)),
            h.clamp(1, self.grid.rows.max(1)),
        )
    }

    /// Keep a `w` x `h` rectangle inside the canvas
    fn clamp_origin(&self, x: i64, y: i64, w: u32, h: u32) -> (u32, u32) {
        let max_x = i64::from(self.grid.columns.saturating_sub(w));
        let max_y = i64::from(self.grid.rows.saturating_sub(h));
        (to_cell(x.clamp(0, max_x)), to_cell(y.clamp(0, max_y)))
    }
}

fn unexpected(event: &'static str, state: &Interaction) -> InteractionError {
    InteractionError::UnexpectedEvent {
        event,
        state: state.to_string(),
    }
}

/// Cell containing a pixel coordinate
pub fn cell_at(px: f64, cell_size: f64) -> i64 {
    (px / cell_size).floor() as i64
}

/// Nearest cell boundary to a pixel coordinate
pub fn snap(px: f64, cell_size: f64) -> i64 {
    (px / cell_size).round() as i64
}

/// Span in cells for a pixel length, at least one
pub fn snap_span(px: f64, cell_size: f64) -> u32 {
    to_cell(snap(px, cell_size).max(1))
}

fn to_cell(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}
