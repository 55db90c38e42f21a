//! Reference selection engine.
//!
//! [`Crossfilter`] keeps each dimension's data in memory and evaluates
//! filters with linear scans. It implements [`SelectionEngine`] so Worlds
//! can be driven without an external index; production deployments are
//! expected to plug in their own engine.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::{DataType, Series};

use cellview_frame::{Frame, RowIndex, quantile_sorted, sorted_values};
use cellview_model::{Result, WorldError};

use crate::selection::{DimensionSpec, ScalarKind, SelectionEngine};

/// Filter applied to one dimension.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// Every row passes.
    All,
    /// Scalar values within `[min, max]`.
    Range { min: f64, max: f64 },
    /// Enum values in the given label set.
    Labels(BTreeSet<String>),
    /// Points inside the rectangle, bounds inclusive.
    Rect {
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
    },
    /// Explicit per-row mask.
    Mask(Vec<bool>),
}

#[derive(Debug, Clone)]
enum DimensionData {
    Enum(Vec<Option<String>>),
    Scalar {
        values: Vec<Option<f64>>,
        sorted: Vec<f64>,
        kind: ScalarKind,
    },
    Spatial {
        x: Vec<Option<f64>>,
        y: Vec<Option<f64>>,
    },
}

#[derive(Debug, Clone)]
struct Dimension {
    data: DimensionData,
    selection: Selection,
}

impl Dimension {
    fn passes(&self, row: usize) -> bool {
        match (&self.selection, &self.data) {
            (Selection::All, _) => true,
            (Selection::Mask(mask), _) => mask[row],
            (Selection::Range { min, max }, DimensionData::Scalar { values, .. }) => {
                values[row].is_some_and(|v| v >= *min && v <= *max)
            }
            (Selection::Labels(labels), DimensionData::Enum(values)) => values[row]
                .as_ref()
                .is_some_and(|value| labels.contains(value)),
            (
                Selection::Rect {
                    min_x,
                    min_y,
                    max_x,
                    max_y,
                },
                DimensionData::Spatial { x, y },
            ) => match (x[row], y[row]) {
                (Some(px), Some(py)) => {
                    px >= *min_x && px <= *max_x && py >= *min_y && py <= *max_y
                }
                _ => false,
            },
            // Rejected by `select`.
            _ => false,
        }
    }
}

/// In-memory selection engine over the rows of one World.
#[derive(Debug, Clone)]
pub struct Crossfilter {
    row_index: RowIndex,
    dimensions: BTreeMap<String, Dimension>,
}

impl Crossfilter {
    pub fn new(row_index: RowIndex) -> Self {
        Self {
            row_index,
            dimensions: BTreeMap::new(),
        }
    }

    /// Engine over the rows of `frame`.
    pub fn for_frame(frame: &Frame) -> Self {
        Self::new(frame.row_index().clone())
    }

    pub fn dimension_names(&self) -> Vec<&str> {
        self.dimensions.keys().map(String::as_str).collect()
    }

    /// Scalar bit width of a dimension, if it is scalar.
    pub fn scalar_kind(&self, dimension: &str) -> Option<ScalarKind> {
        match self.dimensions.get(dimension).map(|d| &d.data) {
            Some(DimensionData::Scalar { kind, .. }) => Some(*kind),
            _ => None,
        }
    }

    /// Replace a dimension's filter.
    ///
    /// # Errors
    ///
    /// Fails for unknown dimensions, for filters that do not apply to the
    /// dimension kind, and for masks of the wrong length.
    pub fn select(mut self, dimension: &str, selection: Selection) -> Result<Self> {
        let rows = self.row_index.len();
        let entry = self
            .dimensions
            .get_mut(dimension)
            .ok_or_else(|| WorldError::UnknownDimension {
                dimension: dimension.to_string(),
            })?;
        let applies = match (&selection, &entry.data) {
            (Selection::All, _)
            | (Selection::Range { .. }, DimensionData::Scalar { .. })
            | (Selection::Labels(_), DimensionData::Enum(_))
            | (Selection::Rect { .. }, DimensionData::Spatial { .. }) => true,
            (Selection::Mask(mask), _) => {
                if mask.len() != rows {
                    return Err(WorldError::MaskLength {
                        expected: rows,
                        actual: mask.len(),
                    });
                }
                true
            }
            _ => false,
        };
        if !applies {
            return Err(WorldError::InvalidSelection {
                dimension: dimension.to_string(),
                reason: format!("{} filter does not apply", selection_name(&selection)),
            });
        }
        tracing::debug!(dimension, filter = selection_name(&selection), "selection changed");
        entry.selection = selection;
        Ok(self)
    }

    /// Clear a dimension's filter.
    pub fn select_all(self, dimension: &str) -> Result<Self> {
        self.select(dimension, Selection::All)
    }
}

impl SelectionEngine for Crossfilter {
    fn all_selected_mask(&self) -> Vec<bool> {
        (0..self.row_index.len())
            .map(|row| self.dimensions.values().all(|d| d.passes(row)))
            .collect()
    }

    fn quantile(&self, dimension: &str, q: f64) -> Option<f64> {
        match &self.dimensions.get(dimension)?.data {
            DimensionData::Scalar { sorted, .. } => quantile_sorted(sorted, q),
            DimensionData::Enum(_) | DimensionData::Spatial { .. } => None,
        }
    }

    fn has_dimension(&self, dimension: &str) -> bool {
        self.dimensions.contains_key(dimension)
    }

    fn add_dimension(mut self, name: &str, spec: DimensionSpec) -> Result<Self> {
        let rows = self.row_index.len();
        let data = match spec {
            DimensionSpec::Enum(values) => {
                check_len(&values, rows)?;
                let labels = values.cast(&DataType::String)?;
                DimensionData::Enum(
                    labels
                        .str()?
                        .into_iter()
                        .map(|v| v.map(str::to_string))
                        .collect(),
                )
            }
            DimensionSpec::Scalar { values, kind } => {
                check_len(&values, rows)?;
                DimensionData::Scalar {
                    sorted: sorted_values(&values)?,
                    values: float_values(&values)?,
                    kind,
                }
            }
            DimensionSpec::Spatial { x, y } => {
                check_len(&x, rows)?;
                check_len(&y, rows)?;
                DimensionData::Spatial {
                    x: float_values(&x)?,
                    y: float_values(&y)?,
                }
            }
        };
        self.dimensions.insert(
            name.to_string(),
            Dimension {
                data,
                selection: Selection::All,
            },
        );
        Ok(self)
    }

    fn row_index(&self) -> &RowIndex {
        &self.row_index
    }
}

fn float_values(series: &Series) -> Result<Vec<Option<f64>>> {
    let values = series.cast(&DataType::Float64)?;
    Ok(values.f64()?.into_iter().collect())
}

fn check_len(series: &Series, rows: usize) -> Result<()> {
    if series.len() != rows {
        return Err(WorldError::LengthMismatch {
            column: series.name().to_string(),
            expected: rows,
            actual: series.len(),
        });
    }
    Ok(())
}

fn selection_name(selection: &Selection) -> &'static str {
    match selection {
        Selection::All => "all",
        Selection::Range { .. } => "range",
        Selection::Labels(_) => "labels",
        Selection::Rect { .. } => "rect",
        Selection::Mask(_) => "mask",
    }
}
