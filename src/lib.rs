//! Barn Layout - grid layout editing for livestock barns
//!
//! This library provides the grid placement engine, an in-memory editing
//! session, the drag/drop state machine, the layout API client and an SVG
//! map renderer.
//!
//! # Example
//!
//! ```rust
//! use barn_layout::{GridRect, LayoutSession, PlacedPen};
//!
//! let mut session = LayoutSession::new(1, "Main barn");
//! let pen = session.create_pen("Calves", 12).unwrap();
//! let rect = GridRect::new(0, 0, 2, 1).unwrap();
//! session.place(PlacedPen::new(pen, "Calves", 12, rect)).unwrap();
//!
//! let request = session.save_request().unwrap();
//! assert_eq!(request.layouts[0].col_span, 2);
//! ```

pub mod api;
pub mod config;
pub mod editor;
pub mod error;
pub mod layout;
pub mod renderer;
pub mod script;
pub mod stylesheet;

pub use api::{ApiConfig, ApiError, BarnLayoutResponse, HttpLayoutApi, LayoutApi, LayoutSaveRequest};
pub use config::{Config, ConfigError};
pub use editor::{
    BarnLayoutEditor, EditorError, EditorState, LayoutSession, Notice, Prompter, ScriptedPrompter,
};
pub use error::Error;
pub use layout::{GridConfig, GridRect, LayoutError, Occupancy, PenId, PenLayout, PlacedPen};
pub use renderer::{render_svg, render_svg_with_stylesheet, MapView, RenderError, SvgConfig};
pub use script::{Script, ScriptError};

// Re-export Stylesheet for public API
pub use stylesheet::Stylesheet;

/// Render the stored layout of a barn to SVG
///
/// # Example
///
/// ```rust
/// use barn_layout::{render_map, BarnLayoutResponse, Config, PenId, PenLayout};
///
/// let response = BarnLayoutResponse {
///     barn_id: 1,
///     barn_name: "Main".to_string(),
///     layouts: vec![PenLayout::new_default(PenId(4), "North", 10)],
///     unplaced_pens: vec![],
///     livestock_counts: [(4, 8)].into_iter().collect(),
/// };
///
/// let svg = render_map(&response, &Config::default()).unwrap();
/// assert!(svg.contains("8 / 10"));
/// ```
pub fn render_map(response: &BarnLayoutResponse, config: &Config) -> Result<String, RenderError> {
    let view = MapView::from_response(response)?;
    Ok(render_svg_with_stylesheet(
        &view,
        &config.svg,
        &config.stylesheet(),
    ))
}

/// Render an editing session's current arrangement to SVG
pub fn render_session(session: &LayoutSession, config: &Config) -> Result<String, RenderError> {
    let view = MapView::from_session(session)?;
    Ok(render_svg_with_stylesheet(
        &view,
        &config.svg,
        &config.stylesheet(),
    ))
}

/// Fetch a barn's layout and render it
pub fn show_barn(api: &impl LayoutApi, barn_id: i64, config: &Config) -> Result<String, Error> {
    let response = api.fetch_layout(barn_id)?;
    Ok(render_map(&response, config)?)
}
