//! The complete, immutable dataset.

use std::sync::Arc;

use polars::prelude::{DataFrame, Series};

use cellview_frame::{Frame, RowIndex};
use cellview_model::{Result, Schema};

/// The authoritative dataset every World is derived from.
///
/// Observation tables share one row index over global ids `0..n_obs`. The
/// `with_*` methods return a new Universe; they exist for the upstream owner
/// of the dataset (which adds user categories and fetched expression
/// columns) and never alter a Universe other code holds.
#[derive(Debug, Clone)]
pub struct Universe {
    pub schema: Arc<Schema>,
    pub n_obs: usize,
    pub n_var: usize,
    pub obs_annotations: Frame,
    pub var_annotations: Frame,
    pub obs_layout: Frame,
    pub var_data: Frame,
}

impl Universe {
    /// Assemble a Universe from loaded tables.
    ///
    /// # Errors
    ///
    /// Returns [`cellview_model::WorldError::LengthMismatch`] when the layout does not have
    /// one row per observation.
    pub fn new(
        schema: Schema,
        obs_annotations: DataFrame,
        obs_layout: DataFrame,
        var_annotations: DataFrame,
    ) -> Result<Self> {
        let n_obs = obs_annotations.height();
        let n_var = schema.n_var.max(var_annotations.height());
        let row_index = RowIndex::identity(n_obs);
        let obs_annotations = Frame::new(obs_annotations, row_index.clone())?;
        let obs_layout = Frame::new(obs_layout, row_index.clone())?;
        Ok(Self {
            schema: Arc::new(schema),
            n_obs,
            n_var,
            obs_annotations,
            var_annotations: Frame::from_data(var_annotations),
            obs_layout,
            var_data: Frame::empty(row_index),
        })
    }

    /// Universe with an additional observation annotation column.
    pub fn with_obs_column(&self, name: &str, data: Series, schema: Schema) -> Result<Self> {
        let obs_annotations = self.obs_annotations.with_col(name, data)?;
        Ok(Self {
            schema: Arc::new(schema),
            obs_annotations,
            ..self.clone()
        })
    }

    /// Universe with an additional expression column.
    pub fn with_var_column(&self, name: &str, data: Series) -> Result<Self> {
        let var_data = self.var_data.with_col(name, data)?;
        Ok(Self {
            var_data,
            ..self.clone()
        })
    }
}
