//! Row-indexed tables for cellview.
//!
//! This crate wraps Polars DataFrames with the row identity every World
//! table shares:
//!
//! - **row_index**: ordered global row ids with a generation stamp
//! - **frame**: [`Frame`], an immutable DataFrame plus its row index
//! - **clip**: quantile clipping of numeric columns
//! - **stats**: quantiles over column data

pub mod clip;
pub mod frame;
pub mod row_index;
pub mod stats;

pub use clip::{clip_frame, clip_series};
pub use frame::{Frame, FrameId, subset_series};
pub use row_index::RowIndex;
pub use stats::{quantile, quantile_sorted, sorted_values};
