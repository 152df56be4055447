//! SVG renderer for barn maps
//!
//! This module turns a stored layout or an editing session into a
//! [`MapView`] and produces an SVG string with CSS classes for styling.

pub mod config;
pub mod map;
pub mod svg;

pub use config::SvgConfig;
pub use map::{MapView, OccupancyStatus, PenView, RenderError};
pub use svg::{render_svg, render_svg_with_stylesheet};
