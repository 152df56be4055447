//! Interactive barn layout editing
//!
//! [`LayoutSession`] holds the working copy of a barn's layout,
//! [`InteractionState`] turns pointer gestures into candidate placements, and
//! [`BarnLayoutEditor`] ties both to the layout API and to the host's prompts
//! and callbacks.

pub mod barn_editor;
pub mod interaction;
pub mod prompt;
pub mod session;

pub use barn_editor::{BarnLayoutEditor, EditorError, EditorState};
pub use interaction::{
    DragPayload, Interaction, InteractionError, InteractionState, PixelPoint, PixelSize,
};
pub use prompt::{Notice, NoticeKind, Prompter, ScriptedPrompter};
pub use session::{LayoutSession, Placement};
