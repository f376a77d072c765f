use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Options recognised by the proximity tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProximitySettings {
    /// Start tracking as soon as the tracker is created.
    pub enabled: bool,
    /// Maximum on-screen distance, in pixels, at which a shape counts as "almost over".
    pub tolerance_distance: f64,
    /// Pointer-move sampling period.
    pub sampling_period_ms: u64,
    pub track_pointer_move: bool,
    /// Pre-filter pointer queries with the R-tree and the tolerance buffer.
    pub use_spatial_index: bool,
}

impl Default for ProximitySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            tolerance_distance: 25.0,
            sampling_period_ms: 50,
            track_pointer_move: true,
            use_spatial_index: false,
        }
    }
}

impl ProximitySettings {
    /// Parses settings from JSON; missing fields keep their defaults.
    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn sampling_period(&self) -> Duration {
        Duration::from_millis(self.sampling_period_ms)
    }
}
