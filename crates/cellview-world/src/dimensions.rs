//! Selection dimensions derived from the observation schema.

use cellview_model::names::{layout_dimension, obs_annotation_dimension};
use cellview_model::{DimensionType, Result, WorldOptions, deduce_dimension_type};

use crate::selection::{DimensionSpec, ScalarKind, SelectionEngine};
use crate::world::World;

/// Register one dimension per schema observation field, plus the layout.
///
/// Every declared field except the name field is folded into the engine in
/// schema order: enum fields as label dimensions, int32/float32 fields as
/// scalar dimensions, unsupported fields skipped with a warning. A spatial
/// `layout/XY` dimension over the layout columns is always added last.
/// Dimension data is taken from the unclipped annotations.
pub fn create_obs_dimensions<E: SelectionEngine>(
    engine: E,
    world: &World,
    options: &WorldOptions,
) -> Result<E> {
    let annotations = &world.unclipped.obs_annotations;
    let engine = world
        .schema
        .obs
        .iter()
        .filter(|field| field.name != options.name_field)
        .try_fold(engine, |engine, field| {
            let name = obs_annotation_dimension(&field.name);
            let kind = match deduce_dimension_type(field, &field.name) {
                DimensionType::Enum => {
                    let values = annotations.col(&field.name)?.clone();
                    return engine.add_dimension(&name, DimensionSpec::Enum(values));
                }
                DimensionType::Int32Scalar => ScalarKind::Int32,
                DimensionType::Float32Scalar => ScalarKind::Float32,
                DimensionType::Unsupported => return Ok(engine),
            };
            let values = annotations.col(&field.name)?.clone();
            engine.add_dimension(&name, DimensionSpec::Scalar { values, kind })
        })?;

    engine.add_dimension(
        &layout_dimension("XY"),
        DimensionSpec::Spatial {
            x: world.obs_layout.col(&options.layout_x)?.clone(),
            y: world.obs_layout.col(&options.layout_y)?.clone(),
        },
    )
}
