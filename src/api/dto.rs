//! Wire types for the layout endpoints

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::layout::{Occupancy, PenId, PenLayout};

/// Snapshot of a barn's layout as returned by `GET .../layout`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarnLayoutResponse {
    pub barn_id: i64,
    pub barn_name: String,
    /// Placed pens, 1-based geometry
    pub layouts: Vec<PenLayout>,
    /// Pens of this barn with no placement
    #[serde(default)]
    pub unplaced_pens: Vec<PenLayout>,
    /// Animals per pen id. JSON object keys are strings on the wire.
    #[serde(default)]
    pub livestock_counts: HashMap<i64, u32>,
}

impl BarnLayoutResponse {
    /// Livestock counts keyed by pen id
    pub fn occupancy(&self) -> Occupancy {
        self.livestock_counts
            .iter()
            .map(|(id, count)| (PenId(*id), *count))
            .collect()
    }
}

/// Body of `POST .../layout`: the complete desired set of placed pens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSaveRequest {
    pub barn_id: i64,
    pub layouts: Vec<PenLayout>,
}
