//! The barn layout editor
//!
//! Owns one [`LayoutSession`] from load until save or close. Every handler
//! converts failures into a notice for the user and returns them as
//! [`EditorError`]; nothing reaches the host as a panic.

use tracing::{debug, info, warn};

use crate::api::{ApiError, LayoutApi};
use crate::layout::{GridConfig, GridRect, LayoutError, PenId, PlacedPen};

use super::interaction::{DragPayload, InteractionError, InteractionState, PixelPoint, PixelSize};
use super::prompt::{Notice, Prompter};
use super::session::{LayoutSession, Placement};

/// Lifecycle of the editor
#[derive(Debug, Clone, PartialEq)]
pub enum EditorState {
    /// Created, snapshot not fetched yet
    Loading,
    /// The snapshot could not be loaded; the editor can only be closed
    Failed(String),
    /// Editing
    Ready(LayoutSession),
    /// Saved or discarded
    Closed,
}

/// Errors reported by editor handlers
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// The editor has no session to act on
    #[error("the layout is not available ({state})")]
    NotReady { state: &'static str },

    /// Loading the snapshot failed
    #[error("failed to load the barn layout: {0}")]
    Load(#[source] ApiError),

    /// The snapshot could not be turned into a session
    #[error("failed to load the barn layout: {0}")]
    Snapshot(#[source] LayoutError),

    /// Saving the layout failed; the session is kept for a retry
    #[error("failed to save the barn layout: {0}")]
    Save(#[source] ApiError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Interaction(#[from] InteractionError),
}

impl EditorError {
    /// Gesture-ordering problems are not shown to the user
    fn is_user_facing(&self) -> bool {
        !matches!(
            self,
            EditorError::Interaction(InteractionError::UnexpectedEvent { .. })
        )
    }
}

type Callback = Box<dyn FnMut()>;
type SavedCallback = Box<dyn FnOnce()>;

/// Layout editor for one barn
pub struct BarnLayoutEditor<A: LayoutApi, P: Prompter> {
    barn_id: i64,
    api: A,
    prompter: P,
    interaction: InteractionState,
    state: EditorState,
    on_close: Callback,
    on_layout_saved: Option<SavedCallback>,
}

impl<A: LayoutApi, P: Prompter> BarnLayoutEditor<A, P> {
    /// Create an editor for `barn_id`.
    ///
    /// `on_close` runs whenever the editor closes; `on_layout_saved` runs once,
    /// only after the server confirmed a save, so the host can refresh.
    pub fn new(
        barn_id: i64,
        api: A,
        prompter: P,
        on_close: impl FnMut() + 'static,
        on_layout_saved: impl FnOnce() + 'static,
    ) -> Self {
        Self {
            barn_id,
            api,
            prompter,
            interaction: InteractionState::new(GridConfig::default()),
            state: EditorState::Loading,
            on_close: Box::new(on_close),
            on_layout_saved: Some(Box::new(on_layout_saved)),
        }
    }

    /// Use a different canvas grid
    pub fn with_grid(mut self, grid: GridConfig) -> Self {
        self.interaction = InteractionState::new(grid);
        self
    }

    pub fn barn_id(&self) -> i64 {
        self.barn_id
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    /// The session, while editing
    pub fn session(&self) -> Option<&LayoutSession> {
        match &self.state {
            EditorState::Ready(session) => Some(session),
            _ => None,
        }
    }

    /// Fetch the snapshot and start the session
    pub fn load(&mut self) -> Result<(), EditorError> {
        if self.state != EditorState::Loading {
            return Err(not_ready(&self.state));
        }

        let result = self
            .api
            .fetch_layout(self.barn_id)
            .map_err(EditorError::Load)
            .and_then(|snapshot| LayoutSession::from_snapshot(snapshot).map_err(EditorError::Snapshot));

        match result {
            Ok(session) => {
                info!(
                    barn_id = self.barn_id,
                    placed = session.placed().len(),
                    unplaced = session.unplaced().len(),
                    "layout editor ready"
                );
                self.state = EditorState::Ready(session);
                Ok(())
            }
            Err(err) => {
                warn!(barn_id = self.barn_id, error = %err, "layout load failed");
                self.state = EditorState::Failed(err.to_string());
                Err(err)
            }
        }
    }

    /// Add a new pen to the sidebar
    pub fn create_pen(&mut self, name: &str, capacity: i64) -> Result<PenId, EditorError> {
        let result = ready(&mut self.state)
            .and_then(|session| session.create_pen(name, capacity).map_err(EditorError::from));
        self.report(result)
    }

    /// Remove an unplaced pen after the user confirms.
    ///
    /// Returns `Ok(false)` when the user declines.
    pub fn delete_unplaced_pen(&mut self, id: PenId) -> Result<bool, EditorError> {
        let name = ready(&mut self.state).and_then(|session| {
            session
                .unplaced_pen(id)
                .map(|pen| pen.pen_name.clone())
                .ok_or_else(|| LayoutError::UnknownPen { id }.into())
        });
        let name = self.report(name)?;

        let question = format!(
            "Remove \"{}\" from this editing session? The pen will not be saved.",
            name
        );
        if !self.prompter.confirm(&question) {
            debug!(pen = %id, "unplaced pen deletion declined");
            return Ok(false);
        }

        let result = ready(&mut self.state)
            .and_then(|session| session.delete_unplaced_pen(id).map_err(EditorError::from))
            .map(|_| true);
        if result.is_ok() {
            self.interaction.cancel_for(id);
        }
        self.report(result)
    }

    /// Take a placed pen off the grid
    pub fn remove_placed_pen(&mut self, id: PenId) -> Result<(), EditorError> {
        let result = ready(&mut self.state)
            .and_then(|session| session.remove_placed_pen(id).map_err(EditorError::from));
        if result.is_ok() {
            self.interaction.cancel_for(id);
        }
        self.report(result)
    }

    /// Place a pen directly at a grid rectangle inside the canvas
    pub fn place_at(&mut self, id: PenId, rect: GridRect) -> Result<Placement, EditorError> {
        let result = ready(&mut self.state).and_then(|session| {
            self.interaction.grid().check_fits(&rect)?;
            let candidate = match (session.placed_pen(id), session.unplaced_pen(id)) {
                (Some(pen), _) => pen.with_rect(rect),
                (None, Some(pen)) => {
                    PlacedPen::new(pen.pen_id, pen.pen_name.clone(), pen.capacity, rect)
                }
                (None, None) => return Err(LayoutError::UnknownPen { id }.into()),
            };
            Ok(session.place(candidate)?)
        });
        self.report(result)
    }

    /// Start dragging an unplaced pen out of the sidebar
    pub fn begin_sidebar_drag(&mut self, id: PenId) -> Result<(), EditorError> {
        let result = ready(&mut self.state).and_then(|session| {
            let pen = session
                .unplaced_pen(id)
                .ok_or(LayoutError::UnknownPen { id })?;
            let payload = DragPayload::from_unplaced(pen);
            Ok(self.interaction.begin_sidebar_drag(payload)?)
        });
        self.report(result)
    }

    /// Abandon the current gesture without changing the layout
    pub fn cancel_gesture(&mut self) {
        self.interaction.cancel();
    }

    /// Drop the dragged pen onto the canvas
    pub fn drop_on_grid(&mut self, point: PixelPoint) -> Result<Placement, EditorError> {
        let result = ready(&mut self.state).and_then(|session| {
            let candidate = self.interaction.drop_on_grid(point)?;
            Ok(session.place(candidate)?)
        });
        self.report(result)
    }

    /// Start moving a placed pen
    pub fn begin_move(&mut self, id: PenId) -> Result<(), EditorError> {
        let result = ready(&mut self.state).and_then(|session| {
            session.placed_pen(id).ok_or(LayoutError::UnknownPen { id })?;
            Ok(self.interaction.begin_move(id)?)
        });
        self.report(result)
    }

    /// Finish a move; `Ok(None)` when the pen stayed in its cell
    pub fn end_move(&mut self, id: PenId, position: PixelPoint) -> Result<Option<Placement>, EditorError> {
        let result = ready(&mut self.state).and_then(|session| {
            let Some(committed) = session.placed_pen(id).cloned() else {
                // The pen left the grid mid-gesture
                self.interaction.cancel_for(id);
                return Err(LayoutError::UnknownPen { id }.into());
            };
            match self.interaction.end_move(&committed, position)? {
                Some(candidate) => Ok(Some(session.place(candidate)?)),
                None => Ok(None),
            }
        });
        self.report(result)
    }

    /// Start resizing a placed pen
    pub fn begin_resize(&mut self, id: PenId) -> Result<(), EditorError> {
        let result = ready(&mut self.state).and_then(|session| {
            session.placed_pen(id).ok_or(LayoutError::UnknownPen { id })?;
            Ok(self.interaction.begin_resize(id)?)
        });
        self.report(result)
    }

    /// Finish a resize with the pen's new pixel origin and size
    pub fn end_resize(
        &mut self,
        id: PenId,
        origin: PixelPoint,
        size: PixelSize,
    ) -> Result<Placement, EditorError> {
        let result = ready(&mut self.state).and_then(|session| {
            let Some(committed) = session.placed_pen(id).cloned() else {
                // The pen left the grid mid-gesture
                self.interaction.cancel_for(id);
                return Err(LayoutError::UnknownPen { id }.into());
            };
            let candidate = self.interaction.end_resize(&committed, origin, size)?;
            Ok(session.place(candidate)?)
        });
        self.report(result)
    }

    /// Submit the placed set as the barn's complete layout.
    ///
    /// On success the session is discarded, `on_layout_saved` runs, then the
    /// editor closes. On failure the session stays so the user can retry.
    pub fn save(&mut self) -> Result<(), EditorError> {
        let request = ready(&mut self.state)
            .and_then(|session| session.save_request().map_err(EditorError::from));
        let request = self.report(request)?;

        if let Err(err) = self.api.save_layout(self.barn_id, &request) {
            warn!(barn_id = self.barn_id, error = %err, "layout save failed");
            return self.report(Err(EditorError::Save(err)));
        }

        self.prompter.notify(Notice::info("Layout saved."));
        self.interaction.cancel();
        self.state = EditorState::Closed;
        if let Some(on_saved) = self.on_layout_saved.take() {
            on_saved();
        }
        (self.on_close)();
        Ok(())
    }

    /// Discard the session without saving
    pub fn close(&mut self) {
        if self.state == EditorState::Closed {
            return;
        }
        debug!(barn_id = self.barn_id, "layout editor closed");
        self.interaction.cancel();
        self.state = EditorState::Closed;
        (self.on_close)();
    }

    fn report<T>(&mut self, result: Result<T, EditorError>) -> Result<T, EditorError> {
        if let Err(err) = &result {
            if err.is_user_facing() {
                self.prompter.notify(Notice::error(err.to_string()));
            } else {
                debug!(error = %err, "ignored out-of-order gesture event");
            }
        }
        result
    }
}

fn ready(state: &mut EditorState) -> Result<&mut LayoutSession, EditorError> {
    match state {
        EditorState::Ready(session) => Ok(session),
        other => Err(not_ready(other)),
    }
}

fn not_ready(state: &EditorState) -> EditorError {
    let state = match state {
        EditorState::Loading => "still loading",
        EditorState::Failed(_) => "loading failed",
        EditorState::Ready(_) => "ready",
        EditorState::Closed => "editor closed",
    };
    EditorError::NotReady { state }
}
