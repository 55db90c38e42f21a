//! Configuration options for World transitions.

use serde::{Deserialize, Serialize};

/// Options controlling World transitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldOptions {
    /// Label assigned to observations whose label was deleted.
    pub unassigned_label: String,

    /// Observation field that identifies rows and never becomes a dimension.
    pub name_field: String,

    /// Layout column holding X coordinates.
    pub layout_x: String,

    /// Layout column holding Y coordinates.
    pub layout_y: String,

    /// Value written in place of clipped values.
    #[serde(skip, default = "default_sentinel")]
    pub clip_sentinel: f64,
}

fn default_sentinel() -> f64 {
    f64::NAN
}

impl Default for WorldOptions {
    fn default() -> Self {
        Self {
            unassigned_label: "unassigned".to_string(),
            name_field: "name".to_string(),
            layout_x: "X".to_string(),
            layout_y: "Y".to_string(),
            clip_sentinel: default_sentinel(),
        }
    }
}

impl WorldOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_unassigned_label(mut self, label: impl Into<String>) -> Self {
        self.unassigned_label = label.into();
        self
    }

    #[must_use]
    pub fn with_name_field(mut self, field: impl Into<String>) -> Self {
        self.name_field = field.into();
        self
    }

    #[must_use]
    pub fn with_layout_columns(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.layout_x = x.into();
        self.layout_y = y.into();
        self
    }

    #[must_use]
    pub fn with_clip_sentinel(mut self, sentinel: f64) -> Self {
        self.clip_sentinel = sentinel;
        self
    }
}
