//! Error types for World transitions and table operations.

use thiserror::Error;

/// Errors raised by table operations and World transitions.
///
/// Every transition validates its inputs before building output, so an error
/// never leaves a partially constructed World behind.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WorldError {
    /// Column does not exist in the table.
    #[error("unknown column '{column}'")]
    UnknownColumn { column: String },

    /// Column already exists in the table.
    #[error("column '{column}' already exists")]
    DuplicateColumn { column: String },

    /// Clip bounds are empty or not numbers after clamping to `[0, 1]`.
    #[error("invalid clip range: lower {lower} exceeds upper {upper}")]
    InvalidClipRange { lower: f64, upper: f64 },

    /// Column data length differs from the table's row count.
    #[error("column '{column}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Selection mask length differs from the table's row count.
    #[error("selection mask has {actual} entries, expected {expected}")]
    MaskLength { expected: usize, actual: usize },

    /// Global row id not present in the row index.
    #[error("row {row} is not in the row index")]
    UnknownRow { row: u32 },

    /// Row index keys are not strictly ascending.
    #[error("row index keys must be strictly ascending (offset {offset})")]
    UnorderedRowIndex { offset: usize },

    /// Selection dimension is not registered with the engine.
    #[error("unknown selection dimension '{dimension}'")]
    UnknownDimension { dimension: String },

    /// Selection does not apply to the dimension's kind.
    #[error("invalid selection on '{dimension}': {reason}")]
    InvalidSelection { dimension: String, reason: String },

    /// Operation needs a column type the column does not have.
    #[error("column '{column}' has unsupported type {dtype}")]
    UnsupportedColumnType { column: String, dtype: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl WorldError {
    pub fn unknown_column(column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            column: column.into(),
        }
    }
}

impl From<polars::prelude::PolarsError> for WorldError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for cellview operations.
pub type Result<T> = std::result::Result<T, WorldError>;
