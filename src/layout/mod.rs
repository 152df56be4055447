//! Grid model for barn layouts
//!
//! Pens live on a grid of cells. This module holds the geometry types, the
//! conversion to and from the layout API's 1-based representation, and the
//! placement engine that keeps placed pens from overlapping.

pub mod config;
pub mod engine;
pub mod error;
pub mod transcode;
pub mod types;

pub use config::GridConfig;
pub use engine::{apply_plan, find_collisions, overlapping_pairs, plan_placement, PlacementPlan};
pub use error::LayoutError;
pub use transcode::{to_external, to_internal};
pub use types::*;
