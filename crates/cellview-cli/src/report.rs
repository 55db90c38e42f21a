//! Tabular summaries of a World.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use polars::prelude::{DataType, Series};

use cellview_frame::{Frame, sorted_values};
use cellview_model::{DimensionType, Schema};
use cellview_world::World;

/// Which World table a column belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Annotation,
    Expression,
}

/// One row of the column summary.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub kind: ColumnKind,
    pub dtype: String,
    /// Selection dimension kind, for annotations.
    pub dimension: Option<DimensionType>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Values hidden by clipping.
    pub clipped: usize,
}

/// Summaries of every annotation and expression column, in table order.
pub fn summarize_columns(world: &World) -> Vec<ColumnSummary> {
    let annotations = summarize_frame(
        &world.obs_annotations,
        &world.unclipped.obs_annotations,
        ColumnKind::Annotation,
        &world.schema,
    );
    let expression = summarize_frame(
        &world.var_data,
        &world.unclipped.var_data,
        ColumnKind::Expression,
        &world.schema,
    );
    annotations.into_iter().chain(expression).collect()
}

fn summarize_frame(
    clipped: &Frame,
    unclipped: &Frame,
    kind: ColumnKind,
    schema: &Schema,
) -> Vec<ColumnSummary> {
    clipped
        .column_names()
        .into_iter()
        .filter_map(|name| {
            let shown = clipped.col(&name).ok()?;
            let dimension = match kind {
                ColumnKind::Annotation => schema
                    .obs_field(&name)
                    .map(|field| DimensionType::of(&field.field_type)),
                ColumnKind::Expression => None,
            };
            let (min, max) = value_range(shown);
            let clipped = unclipped
                .col(&name)
                .map_or(0, |source| nan_count(shown).saturating_sub(nan_count(source)));
            Some(ColumnSummary {
                dtype: shown.dtype().to_string(),
                name,
                kind,
                dimension,
                min,
                max,
                clipped,
            })
        })
        .collect()
}

fn value_range(series: &Series) -> (Option<f64>, Option<f64>) {
    if !series.dtype().is_primitive_numeric() {
        return (None, None);
    }
    match sorted_values(series) {
        Ok(sorted) => (sorted.first().copied(), sorted.last().copied()),
        Err(_) => (None, None),
    }
}

fn nan_count(series: &Series) -> usize {
    if !series.dtype().is_float() {
        return 0;
    }
    series
        .cast(&DataType::Float64)
        .ok()
        .and_then(|values| {
            values
                .f64()
                .ok()
                .map(|values| values.into_iter().flatten().filter(|v| v.is_nan()).count())
        })
        .unwrap_or(0)
}

/// World header lines: row counts and clip.
pub fn world_overview(world: &World) -> Vec<String> {
    vec![
        format!("Observations: {}", world.n_obs),
        format!("Variables: {}", world.n_var),
        format!(
            "Clip quantiles: {}:{}",
            world.clip_quantiles.min(),
            world.clip_quantiles.max()
        ),
        format!("Cached expression columns: {}", world.var_data.width()),
    ]
}

/// Column summary table.
pub fn column_table(summaries: &[ColumnSummary]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Table"),
        header_cell("Type"),
        header_cell("Dimension"),
        header_cell("Min"),
        header_cell("Max"),
        header_cell("Clipped"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    align_column(&mut table, 6, CellAlignment::Right);
    for summary in summaries {
        table.add_row(vec![
            Cell::new(&summary.name).add_attribute(Attribute::Bold),
            Cell::new(match summary.kind {
                ColumnKind::Annotation => "obs",
                ColumnKind::Expression => "var",
            }),
            Cell::new(&summary.dtype),
            dimension_cell(summary.dimension),
            number_cell(summary.min),
            number_cell(summary.max),
            clipped_cell(summary.clipped),
        ]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dimension_cell(dimension: Option<DimensionType>) -> Cell {
    match dimension {
        Some(DimensionType::Enum) => Cell::new("enum"),
        Some(DimensionType::Int32Scalar) => Cell::new("int32"),
        Some(DimensionType::Float32Scalar) => Cell::new("float32"),
        Some(DimensionType::Unsupported) => Cell::new("unsupported").fg(Color::Yellow),
        None => dim_cell("-"),
    }
}

fn number_cell(value: Option<f64>) -> Cell {
    match value {
        Some(value) => Cell::new(format!("{value:.4}")),
        None => dim_cell("-"),
    }
}

fn clipped_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count)
            .fg(Color::Yellow)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
