//! World construction and derivation.
//!
//! A World is the active view of the Universe. Its `unclipped` tables hold
//! the real values; the top-level `obs_annotations` and `var_data` are
//! always those tables clipped at `clip_quantiles`. Within one World the
//! observation tables share a single row index.

use std::sync::Arc;

use cellview_frame::{Frame, clip_frame};
use cellview_model::{ClipQuantiles, DimensionType, Result, Schema, WorldOptions};

use crate::quantiles::QuantileSource;
use crate::selection::SelectionEngine;
use crate::universe::Universe;

/// Unclipped source-of-truth tables.
#[derive(Debug, Clone)]
pub struct Unclipped {
    pub obs_annotations: Frame,
    pub var_data: Frame,
}

/// The currently active, possibly filtered and clipped view.
#[derive(Debug, Clone)]
pub struct World {
    pub schema: Arc<Schema>,
    pub n_obs: usize,
    pub n_var: usize,
    pub clip_quantiles: ClipQuantiles,
    pub obs_annotations: Frame,
    pub var_annotations: Frame,
    pub obs_layout: Frame,
    pub var_data: Frame,
    pub unclipped: Unclipped,
}

impl World {
    /// True when every observation table has the same row sequence and
    /// `n_obs` matches it.
    pub fn is_row_aligned(&self) -> bool {
        let rows = self.obs_annotations.row_index();
        rows.len() == self.n_obs
            && rows == self.obs_layout.row_index()
            && rows == self.unclipped.obs_annotations.row_index()
            && rows == self.unclipped.var_data.row_index()
            && rows == self.var_data.row_index()
    }
}

/// World equal to the entire Universe, unclipped.
pub fn create_from_universe(universe: &Universe) -> World {
    let obs_annotations = universe.obs_annotations.clone();
    let var_data = universe.var_data.clone();
    World {
        schema: Arc::clone(&universe.schema),
        n_obs: universe.n_obs,
        n_var: universe.n_var,
        clip_quantiles: ClipQuantiles::default(),
        obs_annotations: obs_annotations.clone(),
        var_annotations: universe.var_annotations.clone(),
        obs_layout: universe.obs_layout.clone(),
        var_data: var_data.clone(),
        unclipped: Unclipped {
            obs_annotations,
            var_data,
        },
    }
}

/// Subset the World to the engine's current selection, then re-clip.
///
/// The three observation tables are filtered by the same mask and adopt
/// one shared row index.
///
/// # Errors
///
/// Fails with [`cellview_model::WorldError::MaskLength`] when the engine
/// does not cover the World's rows.
pub fn create_by_selection<E: SelectionEngine>(
    world: &World,
    engine: &E,
    options: &WorldOptions,
) -> Result<World> {
    let mask = engine.all_selected_mask();
    let row_index = world
        .unclipped
        .obs_annotations
        .row_index()
        .isubset_mask(&mask)?;
    let obs_layout = world.obs_layout.isubset_mask_onto(&mask, &row_index)?;
    let obs_annotations = world
        .unclipped
        .obs_annotations
        .isubset_mask_onto(&mask, &row_index)?;
    // A zero-column table has nothing to filter; keep it and move it onto
    // the new rows.
    let var_data = if world.unclipped.var_data.is_empty() {
        world.unclipped.var_data.with_row_index(row_index.clone())?
    } else {
        world
            .unclipped
            .var_data
            .isubset_mask_onto(&mask, &row_index)?
    };
    let n_obs = obs_annotations.height();
    tracing::debug!(
        before = world.n_obs,
        after = n_obs,
        "world subset to selection"
    );
    let subset = World {
        n_obs,
        obs_layout,
        obs_annotations: obs_annotations.clone(),
        var_data: var_data.clone(),
        unclipped: Unclipped {
            obs_annotations,
            var_data,
        },
        ..world.clone()
    };
    set_clipped_frames(subset, engine, options)
}

/// Same rows with new clip quantiles.
pub fn create_with_new_clip<E: SelectionEngine>(
    world: &World,
    engine: &E,
    clip_quantiles: ClipQuantiles,
    options: &WorldOptions,
) -> Result<World> {
    tracing::debug!(
        min = clip_quantiles.min(),
        max = clip_quantiles.max(),
        "world clip changed"
    );
    let reclipped = World {
        clip_quantiles,
        ..world.clone()
    };
    set_clipped_frames(reclipped, engine, options)
}

/// True when the World's observation table is the Universe's (O(1)).
pub fn world_eq_universe(world: &World, universe: &Universe) -> bool {
    world.obs_annotations.identity() == universe.obs_annotations.identity()
        || world
            .obs_annotations
            .row_index()
            .same_as(universe.obs_annotations.row_index())
}

/// Global row ids of every selected row, ascending.
pub fn get_selected_by_index<E: SelectionEngine>(engine: &E) -> Vec<u32> {
    let mask = engine.all_selected_mask();
    engine
        .row_index()
        .keys()
        .iter()
        .zip(&mask)
        .filter_map(|(&key, &selected)| selected.then_some(key))
        .collect()
}

/// Rebuild the clipped tables from the unclipped ones.
///
/// Observation columns are clipped only when their schema type is scalar;
/// expression columns are always clipped.
pub(crate) fn set_clipped_frames<E: SelectionEngine>(
    mut world: World,
    engine: &E,
    options: &WorldOptions,
) -> Result<World> {
    let (min, max) = (world.clip_quantiles.min(), world.clip_quantiles.max());
    let schema = Arc::clone(&world.schema);
    let is_continuous = |_: &Frame, _: usize, label: &str| {
        schema
            .obs_field(label)
            .is_some_and(|field| DimensionType::of(&field.field_type).is_scalar())
    };

    let obs_annotations = {
        let mut quantiles = QuantileSource::obs(engine, &world.unclipped.obs_annotations);
        clip_frame(
            &world.unclipped.obs_annotations,
            min,
            max,
            |label, q| quantiles.quantile(label, q),
            is_continuous,
            options.clip_sentinel,
        )?
    };
    let var_data = {
        let mut quantiles = QuantileSource::var(engine, &world.unclipped.var_data);
        clip_frame(
            &world.unclipped.var_data,
            min,
            max,
            |label, q| quantiles.quantile(label, q),
            |_, _, _| true,
            options.clip_sentinel,
        )?
    };

    world.obs_annotations = obs_annotations;
    world.var_data = var_data;
    Ok(world)
}
