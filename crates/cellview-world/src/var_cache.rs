//! Expression column cache.
//!
//! Expression columns are fetched lazily and kept in the World's
//! `unclipped.var_data`. Each arrival adds the new columns, evicts every
//! column nobody needs any more, and brings the clipped `var_data` back in
//! step by touching only the columns that changed.

use std::collections::BTreeSet;

use polars::prelude::Series;

use cellview_frame::{Frame, clip_series, subset_series};
use cellview_model::{Result, WorldError, WorldOptions};

use crate::quantiles::QuantileSource;
use crate::selection::SelectionEngine;
use crate::universe::Universe;
use crate::world::{Unclipped, World, world_eq_universe};

/// Names of the expression columns that must stay cached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeepSet {
    names: BTreeSet<String>,
}

impl KeepSet {
    /// Union of displayed, differential-expression and just-arrived columns.
    pub fn new<S: AsRef<str>>(displayed: &[S], diffexp: &[S], arrived: &[S]) -> Self {
        displayed
            .iter()
            .chain(diffexp)
            .chain(arrived)
            .map(|name| name.as_ref().to_string())
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<String> for KeepSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

/// Result of merging fetched expression columns.
#[derive(Debug, Clone)]
pub struct VarCacheUpdate {
    pub world: World,
    /// Columns evicted from the cache, in table order.
    pub evicted: Vec<String>,
}

/// Drop every column not in `keep`.
///
/// Returns the pruned frame and the names of the dropped columns.
pub fn prune_var_data(frame: &Frame, keep: &KeepSet) -> Result<(Frame, Vec<String>)> {
    let evicted: Vec<String> = frame
        .column_names()
        .into_iter()
        .filter(|name| !keep.contains(name))
        .collect();
    let mut pruned = frame.clone();
    for name in &evicted {
        pruned = pruned.drop_col(name)?;
    }
    Ok((pruned, evicted))
}

/// Merge newly fetched expression columns into the World's cache.
///
/// `arrived` columns span the whole Universe; they are cut down to the
/// World's rows unless the World is the Universe. `displayed` and `diffexp`
/// name the other columns that must survive pruning.
///
/// # Errors
///
/// Fails with [`WorldError::LengthMismatch`] if an arrived column does not
/// have one value per Universe observation.
pub fn merge_expression<E: SelectionEngine>(
    world: &World,
    universe: &Universe,
    engine: &E,
    arrived: &[(String, Series)],
    displayed: &[String],
    diffexp: &[String],
    options: &WorldOptions,
) -> Result<VarCacheUpdate> {
    for (name, data) in arrived {
        if data.len() != universe.n_obs {
            return Err(WorldError::LengthMismatch {
                column: name.clone(),
                expected: universe.n_obs,
                actual: data.len(),
            });
        }
    }

    let is_universe = world_eq_universe(world, universe);
    let mut unclipped = world.unclipped.var_data.clone();
    for (name, data) in arrived {
        if unclipped.has_col(name) {
            continue;
        }
        let slice = if is_universe {
            data.clone()
        } else {
            subset_series(
                data,
                universe.obs_annotations.row_index(),
                world.obs_annotations.row_index(),
            )?
        };
        unclipped = unclipped.with_col(name, slice)?;
    }

    let arrived_names: Vec<&str> = arrived.iter().map(|(name, _)| name.as_str()).collect();
    let displayed: Vec<&str> = displayed.iter().map(String::as_str).collect();
    let diffexp: Vec<&str> = diffexp.iter().map(String::as_str).collect();
    let keep = KeepSet::new(displayed.as_slice(), diffexp.as_slice(), arrived_names.as_slice());
    let (unclipped, evicted) = prune_var_data(&unclipped, &keep)?;

    let mut clipped = world.var_data.clone();
    for name in clipped.column_names() {
        if !unclipped.has_col(&name) {
            clipped = clipped.drop_col(&name)?;
        }
    }
    let clip = world.clip_quantiles;
    let added: Vec<String> = unclipped
        .column_names()
        .into_iter()
        .filter(|name| !clipped.has_col(name))
        .collect();
    {
        let mut quantiles = QuantileSource::var(engine, &unclipped);
        for name in &added {
            let data = unclipped.col(name)?;
            let column = if clip.is_noop() {
                data.clone()
            } else {
                clip_series(
                    data,
                    clip.min(),
                    clip.max(),
                    &mut |label: &str, q: f64| quantiles.quantile(label, q),
                    options.clip_sentinel,
                )?
            };
            clipped = clipped.with_col(name, column)?;
        }
    }

    tracing::debug!(
        arrived = arrived.len(),
        cached = unclipped.width(),
        evicted = evicted.len(),
        "expression cache updated"
    );

    let world = World {
        var_data: clipped,
        unclipped: Unclipped {
            obs_annotations: world.unclipped.obs_annotations.clone(),
            var_data: unclipped,
        },
        ..world.clone()
    };
    Ok(VarCacheUpdate { world, evicted })
}
