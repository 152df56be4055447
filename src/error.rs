//! Top-level error for the layout tool

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::editor::EditorError;
use crate::renderer::RenderError;
use crate::script::ScriptError;
use crate::stylesheet::StylesheetError;

/// Any failure of a command-line operation
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("stylesheet error: {0}")]
    Stylesheet(#[from] StylesheetError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error("cannot render map: {0}")]
    Render(#[from] RenderError),

    #[error("script error: {0}")]
    Script(#[from] ScriptError),
}

/// Result alias for command-line operations
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutError;

    #[test]
    fn test_render_error_message() {
        let err: Error = RenderError::NoLayout {
            barn_name: "Main".to_string(),
        }
        .into();
        insta::assert_snapshot!(err.to_string(), @"cannot render map: no layout has been set up for barn 'Main'");
    }

    #[test]
    fn test_editor_error_is_transparent() {
        let err: Error = EditorError::Layout(LayoutError::EmptyLayout).into();
        assert_eq!(
            err.to_string(),
            EditorError::Layout(LayoutError::EmptyLayout).to_string()
        );
    }
}
