//! Clip quantile pairs.

use serde::{Deserialize, Serialize};

use crate::error::{Result, WorldError};

/// Lower and upper quantile used to clip every clip-sensitive column.
///
/// Always within `[0, 1]` with `min <= max`. `(0, 1)` means no clipping.
/// Deserialized pairs are clamped and validated like [`ClipQuantiles::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawClipQuantiles")]
pub struct ClipQuantiles {
    min: f64,
    max: f64,
}

#[derive(Deserialize)]
struct RawClipQuantiles {
    min: f64,
    max: f64,
}

impl TryFrom<RawClipQuantiles> for ClipQuantiles {
    type Error = WorldError;

    fn try_from(raw: RawClipQuantiles) -> Result<Self> {
        Self::new(raw.min, raw.max)
    }
}

impl Default for ClipQuantiles {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

impl ClipQuantiles {
    /// Build a clip pair, clamping to `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidClipRange`] when either bound is NaN or
    /// the clamped lower bound exceeds the clamped upper bound.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        let (min, max) = clamp_bounds(min, max)?;
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// True when clipping with these quantiles leaves data unchanged.
    pub fn is_noop(&self) -> bool {
        self.min == 0.0 && self.max == 1.0
    }
}

/// Clamp `lower` to at least 0 and `upper` to at most 1.
///
/// # Errors
///
/// Returns [`WorldError::InvalidClipRange`] for NaN bounds or when
/// `lower > upper` after clamping.
pub fn clamp_bounds(lower: f64, upper: f64) -> Result<(f64, f64)> {
    let lower = if lower < 0.0 { 0.0 } else { lower };
    let upper = if upper > 1.0 { 1.0 } else { upper };
    if lower.is_nan() || upper.is_nan() || lower > upper {
        return Err(WorldError::InvalidClipRange { lower, upper });
    }
    Ok((lower, upper))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_noop() {
        assert!(ClipQuantiles::default().is_noop());
        assert!(!ClipQuantiles::new(0.01, 0.99).unwrap().is_noop());
    }

    #[test]
    fn bounds_are_clamped() {
        let clip = ClipQuantiles::new(-0.5, 1.5).unwrap();
        assert_eq!(clip, ClipQuantiles::default());
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        assert!(matches!(
            ClipQuantiles::new(0.8, 0.2),
            Err(WorldError::InvalidClipRange { .. })
        ));
        assert!(ClipQuantiles::new(f64::NAN, 1.0).is_err());
        // Clamping can invert an otherwise ordered pair.
        assert!(ClipQuantiles::new(1.2, 1.5).is_err());
    }

    #[test]
    fn deserialized_bounds_are_validated() {
        let clip: ClipQuantiles = serde_json::from_str(r#"{"min":-0.5,"max":0.9}"#).unwrap();
        assert_eq!((clip.min(), clip.max()), (0.0, 0.9));
        assert!(serde_json::from_str::<ClipQuantiles>(r#"{"min":0.9,"max":0.1}"#).is_err());
    }
}
