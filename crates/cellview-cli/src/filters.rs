//! Selection filters given on the command line.

use std::collections::BTreeSet;
use std::str::FromStr;

use cellview_model::ClipQuantiles;
use cellview_model::names::obs_annotation_dimension;
use cellview_world::{Crossfilter, Selection};

/// `FIELD=LABEL[,LABEL...]`: keep rows whose label is listed.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelFilter {
    pub field: String,
    pub labels: BTreeSet<String>,
}

/// `FIELD=MIN:MAX`: keep rows whose value is within the closed range.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeFilter {
    pub field: String,
    pub min: f64,
    pub max: f64,
}

/// `MIN:MAX` clip quantiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipArg(pub ClipQuantiles);

impl FromStr for LabelFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, labels) = split_assignment(s)?;
        let labels: BTreeSet<String> = labels
            .split(',')
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_string)
            .collect();
        if labels.is_empty() {
            return Err(format!("no labels given for '{field}'"));
        }
        Ok(Self {
            field: field.to_string(),
            labels,
        })
    }
}

impl FromStr for RangeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, range) = split_assignment(s)?;
        let (min, max) = parse_pair(range)?;
        if min > max {
            return Err(format!("range for '{field}' is empty ({min} > {max})"));
        }
        Ok(Self {
            field: field.to_string(),
            min,
            max,
        })
    }
}

impl FromStr for ClipArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (min, max) = parse_pair(s)?;
        ClipQuantiles::new(min, max)
            .map(ClipArg)
            .map_err(|error| error.to_string())
    }
}

/// Apply label and range filters to the engine's `obs/<field>` dimensions.
///
/// # Errors
///
/// Fails when a field has no dimension or the filter does not fit it.
pub fn apply_filters(
    engine: Crossfilter,
    labels: &[LabelFilter],
    ranges: &[RangeFilter],
) -> cellview_model::Result<Crossfilter> {
    let engine = labels.iter().try_fold(engine, |engine, filter| {
        engine.select(
            &obs_annotation_dimension(&filter.field),
            Selection::Labels(filter.labels.clone()),
        )
    })?;
    ranges.iter().try_fold(engine, |engine, filter| {
        engine.select(
            &obs_annotation_dimension(&filter.field),
            Selection::Range {
                min: filter.min,
                max: filter.max,
            },
        )
    })
}

fn split_assignment(s: &str) -> Result<(&str, &str), String> {
    match s.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => Ok((field.trim(), value.trim())),
        _ => Err(format!("expected FIELD=VALUE, got '{s}'")),
    }
}

fn parse_pair(s: &str) -> Result<(f64, f64), String> {
    let (min, max) = s
        .split_once(':')
        .ok_or_else(|| format!("expected MIN:MAX, got '{s}'"))?;
    let parse = |value: &str| {
        value
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("'{value}' is not a number"))
    };
    Ok((parse(min)?, parse(max)?))
}
