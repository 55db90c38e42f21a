//! Quantiles over column data.

use polars::prelude::*;

use cellview_model::Result;

/// Quantile of ascending, NaN-free values by linear interpolation.
///
/// Returns `None` for empty input. `q` is clamped to `[0, 1]`.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 || q.is_nan() {
        return None;
    }
    let q = q.clamp(0.0, 1.0);
    if n == 1 || q == 0.0 {
        return Some(sorted[0]);
    }
    if q == 1.0 {
        return Some(sorted[n - 1]);
    }
    let position = (n - 1) as f64 * q;
    let lower = (position.floor() as usize).min(n - 1);
    let lower_value = sorted[lower];
    let upper_value = sorted[(lower + 1).min(n - 1)];
    Some(lower_value + (upper_value - lower_value) * (position - lower as f64))
}

/// Non-null, non-NaN values of a numeric column in ascending order.
pub fn sorted_values(series: &Series) -> Result<Vec<f64>> {
    let values = series.cast(&DataType::Float64)?;
    let mut sorted: Vec<f64> = values
        .f64()?
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .collect();
    sorted.sort_by(f64::total_cmp);
    Ok(sorted)
}

/// Quantile of a numeric column, ignoring nulls and NaN.
pub fn quantile(series: &Series, q: f64) -> Result<Option<f64>> {
    Ok(quantile_sorted(&sorted_values(series)?, q))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantile_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(quantile_sorted(&values, 0.0), Some(1.0));
        assert_eq!(quantile_sorted(&values, 0.5), Some(3.0));
        assert_eq!(quantile_sorted(&values, 1.0), Some(5.0));
        assert_eq!(quantile_sorted(&values, 0.125), Some(1.5));
        assert_eq!(quantile_sorted(&[], 0.5), None);
    }

    #[test]
    fn quantile_skips_missing() {
        let series = Series::new("x".into(), vec![Some(3.0), None, Some(f64::NAN), Some(1.0)]);
        assert_eq!(quantile(&series, 0.0).unwrap(), Some(1.0));
        assert_eq!(quantile(&series, 1.0).unwrap(), Some(3.0));
    }
}
