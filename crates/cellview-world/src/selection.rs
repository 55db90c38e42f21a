//! Interface to the multi-dimensional selection engine.

use polars::prelude::Series;

use cellview_frame::RowIndex;
use cellview_model::Result;

/// Scalar dimension bit width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Int32,
    Float32,
}

/// Data backing a new selection dimension.
#[derive(Debug, Clone)]
pub enum DimensionSpec {
    /// Discrete labels.
    Enum(Series),
    /// Continuous values.
    Scalar { values: Series, kind: ScalarKind },
    /// 2-D coordinates.
    Spatial { x: Series, y: Series },
}

/// Multi-dimensional filter index over the rows of a World.
///
/// Engines are values: [`SelectionEngine::add_dimension`] consumes the
/// engine and returns the extended one, so registering dimensions is a
/// fold.
pub trait SelectionEngine {
    /// One entry per row; `true` when the row passes every dimension filter.
    fn all_selected_mask(&self) -> Vec<bool>;

    /// Value at quantile `q` of a dimension's data, if it has numeric data.
    fn quantile(&self, dimension: &str, q: f64) -> Option<f64>;

    /// True when the dimension is registered.
    fn has_dimension(&self, dimension: &str) -> bool;

    /// Register a dimension.
    fn add_dimension(self, name: &str, spec: DimensionSpec) -> Result<Self>
    where
        Self: Sized;

    /// Global row ids of the engine's rows.
    fn row_index(&self) -> &RowIndex;
}
