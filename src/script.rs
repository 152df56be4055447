//! Replayable editing scripts
//!
//! A script is a TOML list of editor actions. Pens can be referenced by id or
//! by name, so pens created earlier in the same script are reachable without
//! knowing their temporary ids.
//!
//! ```toml
//! [[action]]
//! kind = "create"
//! name = "Calves"
//! capacity = 12
//!
//! [[action]]
//! kind = "place"
//! pen = "Calves"
//! row = 1
//! col = 3
//! col_span = 2
//! ```

use std::fmt;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::api::LayoutApi;
use crate::editor::{BarnLayoutEditor, EditorError, PixelPoint, PixelSize, Prompter};
use crate::layout::{GridRect, LayoutError, PenId};

/// Errors loading or replaying a script
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read script file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse script TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// No pen in the session matches the reference
    #[error("action {index}: no pen matches {reference}")]
    UnknownPen { index: usize, reference: PenRef },

    /// The editor rejected an action
    #[error("action {index} ({kind}) failed: {source}")]
    Action {
        index: usize,
        kind: &'static str,
        #[source]
        source: EditorError,
    },
}

/// A pen by id or by name
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PenRef {
    Id(i64),
    Name(String),
}

impl fmt::Display for PenRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PenRef::Id(id) => write!(f, "pen id {}", id),
            PenRef::Name(name) => write!(f, "pen '{}'", name),
        }
    }
}

fn one() -> u32 {
    1
}

/// One editor action. Grid positions are 1-based, pixel positions are canvas
/// coordinates.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    /// Add a pen to the sidebar
    Create { name: String, capacity: i64 },
    /// Delete an unplaced pen (asks for confirmation)
    Delete { pen: PenRef },
    /// Place a pen at a grid cell
    Place {
        pen: PenRef,
        row: u32,
        col: u32,
        #[serde(default = "one")]
        row_span: u32,
        #[serde(default = "one")]
        col_span: u32,
    },
    /// Drag an unplaced pen from the sidebar and drop it at a canvas point
    Drop { pen: PenRef, x: f64, y: f64 },
    /// Drag a placed pen to a new canvas position
    Move { pen: PenRef, x: f64, y: f64 },
    /// Resize a placed pen to a pixel rectangle
    Resize {
        pen: PenRef,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Take a placed pen off the grid
    Remove { pen: PenRef },
}

impl Action {
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Create { .. } => "create",
            Action::Delete { .. } => "delete",
            Action::Place { .. } => "place",
            Action::Drop { .. } => "drop",
            Action::Move { .. } => "move",
            Action::Resize { .. } => "resize",
            Action::Remove { .. } => "remove",
        }
    }

    fn pen(&self) -> Option<&PenRef> {
        match self {
            Action::Create { .. } => None,
            Action::Delete { pen }
            | Action::Place { pen, .. }
            | Action::Drop { pen, .. }
            | Action::Move { pen, .. }
            | Action::Resize { pen, .. }
            | Action::Remove { pen } => Some(pen),
        }
    }
}

/// A list of actions replayed in order
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Script {
    #[serde(rename = "action", default)]
    pub actions: Vec<Action>,
}

/// What a replay changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptReport {
    /// Actions that took effect
    pub applied: usize,
    /// Deletions the user declined
    pub declined: usize,
    /// Moves that left the pen where it was
    pub unchanged: usize,
    /// Pens pushed back to the sidebar by placements
    pub evicted: Vec<PenId>,
}

impl Script {
    /// Load a script from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a script from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ScriptError> {
        Ok(toml::from_str(content)?)
    }

    /// Replay every action against a loaded editor, stopping at the first
    /// failure. Actions before the failure stay applied to the session.
    pub fn replay<A: LayoutApi, P: Prompter>(
        &self,
        editor: &mut BarnLayoutEditor<A, P>,
    ) -> Result<ScriptReport, ScriptError> {
        let mut report = ScriptReport::default();

        for (index, action) in self.actions.iter().enumerate() {
            let index = index + 1;
            let pen = match action.pen() {
                Some(reference) => Some(resolve(editor, reference).ok_or_else(|| {
                    ScriptError::UnknownPen {
                        index,
                        reference: reference.clone(),
                    }
                })?),
                None => None,
            };
            debug!(index, kind = action.kind(), ?pen, "replaying action");

            apply(editor, action, pen, &mut report).map_err(|source| ScriptError::Action {
                index,
                kind: action.kind(),
                source,
            })?;
        }

        Ok(report)
    }
}

fn apply<A: LayoutApi, P: Prompter>(
    editor: &mut BarnLayoutEditor<A, P>,
    action: &Action,
    pen: Option<PenId>,
    report: &mut ScriptReport,
) -> Result<(), EditorError> {
    // Every action except `create` resolved its pen before getting here.
    let id = pen.unwrap_or(PenId(0));

    match action {
        Action::Create { name, capacity } => {
            editor.create_pen(name, *capacity)?;
        }
        Action::Delete { .. } => {
            if !editor.delete_unplaced_pen(id)? {
                report.declined += 1;
                return Ok(());
            }
        }
        Action::Place {
            row,
            col,
            row_span,
            col_span,
            ..
        } => {
            if *row == 0 || *col == 0 {
                return Err(LayoutError::malformed(
                    id.to_string(),
                    "grid row and column start at 1",
                )
                .into());
            }
            let rect = GridRect::new(col - 1, row - 1, *col_span, *row_span)?;
            let placement = editor.place_at(id, rect)?;
            report.evicted.extend(placement.evicted);
        }
        Action::Drop { x, y, .. } => {
            editor.begin_sidebar_drag(id)?;
            let placement = editor.drop_on_grid(PixelPoint::new(*x, *y))?;
            report.evicted.extend(placement.evicted);
        }
        Action::Move { x, y, .. } => {
            editor.begin_move(id)?;
            match editor.end_move(id, PixelPoint::new(*x, *y))? {
                Some(placement) => report.evicted.extend(placement.evicted),
                None => {
                    report.unchanged += 1;
                    return Ok(());
                }
            }
        }
        Action::Resize {
            x,
            y,
            width,
            height,
            ..
        } => {
            editor.begin_resize(id)?;
            let placement =
                editor.end_resize(id, PixelPoint::new(*x, *y), PixelSize::new(*width, *height))?;
            report.evicted.extend(placement.evicted);
        }
        Action::Remove { .. } => {
            editor.remove_placed_pen(id)?;
        }
    }

    report.applied += 1;
    Ok(())
}

/// Find a pen in the editor's session, placed pens first
fn resolve<A: LayoutApi, P: Prompter>(
    editor: &BarnLayoutEditor<A, P>,
    reference: &PenRef,
) -> Option<PenId> {
    let session = editor.session()?;
    match reference {
        PenRef::Id(id) => {
            let id = PenId(*id);
            (session.placed_pen(id).is_some() || session.unplaced_pen(id).is_some()).then_some(id)
        }
        PenRef::Name(name) => session
            .placed()
            .iter()
            .find(|p| &p.name == name)
            .map(|p| p.id)
            .or_else(|| {
                session
                    .unplaced()
                    .iter()
                    .find(|p| &p.pen_name == name)
                    .map(|p| p.pen_id)
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_actions() {
        let script = Script::from_str(
            r#"
[[action]]
kind = "create"
name = "Calves"
capacity = 12

[[action]]
kind = "place"
pen = "Calves"
row = 2
col = 3
col_span = 2

[[action]]
kind = "move"
pen = 7
x = 250.0
y = 40.0
"#,
        )
        .unwrap();

        assert_eq!(
            script.actions,
            vec![
                Action::Create {
                    name: "Calves".to_string(),
                    capacity: 12
                },
                Action::Place {
                    pen: PenRef::Name("Calves".to_string()),
                    row: 2,
                    col: 3,
                    row_span: 1,
                    col_span: 2
                },
                Action::Move {
                    pen: PenRef::Id(7),
                    x: 250.0,
                    y: 40.0
                },
            ]
        );
    }

    #[test]
    fn test_empty_script() {
        assert!(Script::from_str("").unwrap().actions.is_empty());
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let err = Script::from_str("[[action]]\nkind = \"rotate\"\npen = 1\n").unwrap_err();
        assert!(matches!(err, ScriptError::Parse(_)));
    }

    #[test]
    fn test_pen_ref_display() {
        assert_eq!(PenRef::Id(-2).to_string(), "pen id -2");
        assert_eq!(PenRef::Name("North".into()).to_string(), "pen 'North'");
    }
}
