//! Category and label edits on observation annotations.
//!
//! User-editable annotations hold labels, never scalars, so they are never
//! clip sensitive: after every edit the clipped column is replaced with the
//! unclipped one verbatim. Each handler returns a new World whose schema is
//! the one the caller supplied for the edit.

use std::sync::Arc;

use polars::prelude::*;

use cellview_frame::{Frame, subset_series};
use cellview_model::{DimensionType, Result, Schema, WorldError};

use crate::selection::SelectionEngine;
use crate::universe::Universe;
use crate::world::{Unclipped, World, world_eq_universe};

/// Copy a Universe annotation column into the World.
///
/// The column is cut down to the World's rows unless the World is the
/// whole Universe. Categories hold labels, so a field the schema types as
/// `int32` or `float32` is rejected: its clipped copy would otherwise skip
/// clipping.
pub fn create_category(
    world: &World,
    universe: &Universe,
    name: &str,
    schema: Arc<Schema>,
) -> Result<World> {
    let scalar = schema
        .obs_field(name)
        .filter(|field| DimensionType::of(&field.field_type).is_scalar());
    if let Some(field) = scalar {
        return Err(WorldError::UnsupportedColumnType {
            column: name.to_string(),
            dtype: field.field_type.as_str().to_string(),
        });
    }
    let source = universe.obs_annotations.col(name)?;
    let data = if world_eq_universe(world, universe) {
        source.clone()
    } else {
        subset_series(
            source,
            universe.obs_annotations.row_index(),
            world.obs_annotations.row_index(),
        )?
    };
    let obs_annotations = world.obs_annotations.with_col(name, data.clone())?;
    let unclipped = world.unclipped.obs_annotations.with_col(name, data)?;
    Ok(with_obs(world, schema, obs_annotations, unclipped))
}

/// Rename a category column.
pub fn rename_category(world: &World, from: &str, to: &str, schema: Arc<Schema>) -> Result<World> {
    let obs_annotations = world.obs_annotations.rename_col(from, to)?;
    let unclipped = world.unclipped.obs_annotations.rename_col(from, to)?;
    Ok(with_obs(world, schema, obs_annotations, unclipped))
}

/// Remove a category column.
pub fn delete_category(world: &World, name: &str, schema: Arc<Schema>) -> Result<World> {
    let obs_annotations = world.obs_annotations.drop_col(name)?;
    let unclipped = world.unclipped.obs_annotations.drop_col(name)?;
    Ok(with_obs(world, schema, obs_annotations, unclipped))
}

/// Note a schema-only label addition.
pub fn add_label_to_category(world: &World, schema: Arc<Schema>) -> World {
    World {
        schema,
        ..world.clone()
    }
}

/// Replace every `from` label of `field` with `to`.
pub fn edit_label(
    world: &World,
    field: &str,
    from: &str,
    to: &str,
    schema: Arc<Schema>,
) -> Result<World> {
    let unclipped = set_label_by_value(&world.unclipped.obs_annotations, field, from, to)?;
    let obs_annotations = resync_clipped(&world.obs_annotations, &unclipped, field)?;
    Ok(with_obs(world, schema, obs_annotations, unclipped))
}

/// Move every row labelled `label` to the unassigned label.
pub fn delete_label(
    world: &World,
    field: &str,
    label: &str,
    unassigned: &str,
    schema: Arc<Schema>,
) -> Result<World> {
    edit_label(world, field, label, unassigned, schema)
}

/// Label every currently selected row of `field` with `label`.
pub fn label_current_selection<E: SelectionEngine>(
    world: &World,
    engine: &E,
    field: &str,
    label: &str,
) -> Result<World> {
    let mask = engine.all_selected_mask();
    let unclipped = set_label_by_mask(&world.unclipped.obs_annotations, field, &mask, label)?;
    let obs_annotations = resync_clipped(&world.obs_annotations, &unclipped, field)?;
    let schema = Arc::clone(&world.schema);
    Ok(with_obs(world, schema, obs_annotations, unclipped))
}

fn with_obs(world: &World, schema: Arc<Schema>, obs_annotations: Frame, unclipped: Frame) -> World {
    World {
        schema,
        obs_annotations,
        unclipped: Unclipped {
            obs_annotations: unclipped,
            var_data: world.unclipped.var_data.clone(),
        },
        ..world.clone()
    }
}

fn resync_clipped(clipped: &Frame, unclipped: &Frame, field: &str) -> Result<Frame> {
    clipped.replace_col_data(field, unclipped.col(field)?.clone())
}

fn label_column<'a>(frame: &'a Frame, field: &str) -> Result<&'a StringChunked> {
    let series = frame.col(field)?;
    series
        .str()
        .map_err(|_| WorldError::UnsupportedColumnType {
            column: field.to_string(),
            dtype: series.dtype().to_string(),
        })
}

fn set_label_by_value(frame: &Frame, field: &str, from: &str, to: &str) -> Result<Frame> {
    let labels = label_column(frame, field)?;
    let relabelled: StringChunked = labels
        .into_iter()
        .map(|value| value.map(|v| if v == from { to } else { v }))
        .collect();
    tracing::debug!(field, from, to, "label edited");
    frame.replace_col_data(field, relabelled.into_series())
}

fn set_label_by_mask(frame: &Frame, field: &str, mask: &[bool], label: &str) -> Result<Frame> {
    if mask.len() != frame.height() {
        return Err(WorldError::MaskLength {
            expected: frame.height(),
            actual: mask.len(),
        });
    }
    let labels = label_column(frame, field)?;
    let relabelled: StringChunked = labels
        .into_iter()
        .zip(mask)
        .map(|(value, &selected)| if selected { Some(label) } else { value })
        .collect();
    tracing::debug!(
        field,
        label,
        rows = mask.iter().filter(|&&s| s).count(),
        "selection labelled"
    );
    frame.replace_col_data(field, relabelled.into_series())
}
