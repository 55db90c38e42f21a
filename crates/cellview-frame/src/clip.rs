//! Quantile clipping of numeric columns.
//!
//! Clipping replaces every value outside `[quantile(lower), quantile(upper)]`
//! with a sentinel. The quantile function is consulted for each element, not
//! once per column, so impure quantile sources see every lookup.

use polars::prelude::*;

use cellview_model::Result;
use cellview_model::clip::clamp_bounds;

use crate::frame::Frame;

/// Clip every column accepted by `predicate`.
///
/// `quantile(label, q)` resolves a quantile to a value for column `label`;
/// `predicate(frame, index, label)` selects the clip-sensitive columns.
/// Rejected and non-numeric columns are shared with the input unchanged.
///
/// With bounds `(0, 1)` (after clamping) the input frame is returned as is,
/// keeping its identity.
///
/// # Errors
///
/// Returns [`cellview_model::WorldError::InvalidClipRange`] when the clamped
/// lower bound exceeds the upper bound.
pub fn clip_frame<Q, P>(
    frame: &Frame,
    lower: f64,
    upper: f64,
    mut quantile: Q,
    predicate: P,
    sentinel: f64,
) -> Result<Frame>
where
    Q: FnMut(&str, f64) -> f64,
    P: Fn(&Frame, usize, &str) -> bool,
{
    let (lower, upper) = clamp_bounds(lower, upper)?;
    if lower == 0.0 && upper == 1.0 {
        return Ok(frame.clone());
    }
    frame.map_columns(|index, label, series| {
        if !predicate(frame, index, label) || !is_numeric(series.dtype()) {
            return Ok(series.clone());
        }
        clip_series(series, lower, upper, &mut quantile, sentinel)
    })
}

/// Clip a single numeric column named by its series name.
///
/// `Float32` input stays `Float32`; integer and `Float64` input is returned
/// as `Float64`, which holds every in-range value exactly and can carry the
/// sentinel. Nulls stay null.
pub fn clip_series<Q>(
    series: &Series,
    lower: f64,
    upper: f64,
    quantile: &mut Q,
    sentinel: f64,
) -> Result<Series>
where
    Q: FnMut(&str, f64) -> f64,
{
    let label = series.name().to_string();
    let values = series.cast(&DataType::Float64)?;
    let clipped: Float64Chunked = values
        .f64()?
        .into_iter()
        .map(|value| {
            let col_min = quantile(&label, lower);
            let col_max = quantile(&label, upper);
            value.map(|v| {
                if v < col_min || v > col_max {
                    sentinel
                } else {
                    v
                }
            })
        })
        .collect();
    let clipped = clipped.with_name(label.as_str().into()).into_series();
    if series.dtype() == &DataType::Float32 {
        Ok(clipped.cast(&DataType::Float32)?)
    } else {
        Ok(clipped)
    }
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}
