//! Dataset loading from a directory of CSV files.
//!
//! Layout of a dataset directory:
//!
//! - `obs.csv`: one row per observation, one column per annotation
//! - `layout.csv`: one row per observation with the layout coordinates
//! - `var.csv` (optional): one row per observation, one column per gene
//! - `schema.json` (optional): declared field types; inferred from
//!   `obs.csv` when absent

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use polars::prelude::*;

use cellview_model::{AnnotationField, FieldType, Schema};
use cellview_world::Universe;

pub const OBS_FILE: &str = "obs.csv";
pub const LAYOUT_FILE: &str = "layout.csv";
pub const VAR_FILE: &str = "var.csv";
pub const SCHEMA_FILE: &str = "schema.json";

/// A loaded dataset: the Universe plus expression columns not yet fetched
/// into any World.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub universe: Universe,
    pub expression: Option<DataFrame>,
}

impl Dataset {
    /// Expression columns by name, in the requested order.
    pub fn expression_columns(&self, genes: &[String]) -> Result<Vec<(String, Series)>> {
        let Some(expression) = &self.expression else {
            bail!("dataset has no {VAR_FILE}");
        };
        genes
            .iter()
            .map(|gene| {
                let column = expression
                    .column(gene)
                    .with_context(|| format!("gene '{gene}' not in {VAR_FILE}"))?;
                Ok((gene.clone(), column.as_materialized_series().clone()))
            })
            .collect()
    }
}

/// Load every table of a dataset directory.
pub fn load_dataset(dir: &Path) -> Result<Dataset> {
    let obs = read_csv(&dir.join(OBS_FILE))?;
    let layout = read_csv(&dir.join(LAYOUT_FILE))?;
    let var_path = dir.join(VAR_FILE);
    let expression = if var_path.exists() {
        Some(read_csv(&var_path)?)
    } else {
        None
    };
    let n_var = expression.as_ref().map_or(0, DataFrame::width);

    let schema_path = dir.join(SCHEMA_FILE);
    let schema = if schema_path.exists() {
        read_schema(&schema_path)?
    } else {
        tracing::debug!(dir = %dir.display(), "no schema file, inferring from observations");
        infer_schema(&obs, n_var)
    };
    if schema.n_obs != obs.height() {
        tracing::warn!(
            declared = schema.n_obs,
            actual = obs.height(),
            "schema observation count differs from {OBS_FILE}"
        );
    }
    let universe = Universe::new(schema, obs, layout, DataFrame::empty())
        .with_context(|| format!("assemble dataset from {}", dir.display()))?;
    if let Some(expression) = &expression
        && expression.height() != universe.n_obs
    {
        bail!(
            "{VAR_FILE} has {} rows, expected {}",
            expression.height(),
            universe.n_obs
        );
    }
    tracing::info!(
        n_obs = universe.n_obs,
        n_var = universe.n_var,
        fields = universe.schema.obs.len(),
        "dataset loaded"
    );
    Ok(Dataset {
        universe,
        expression,
    })
}

/// Read a headed CSV file.
pub fn read_csv(path: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))
        .and_then(|reader| reader.finish())
        .with_context(|| format!("read {}", path.display()))
}

fn read_schema(path: &Path) -> Result<Schema> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))
}

/// Schema with one field per observation column, typed from its dtype.
///
/// Text columns become categorical, whole numbers `int32`, other numbers
/// `float32`. Anything else keeps its dtype name and is unsupported.
pub fn infer_schema(obs: &DataFrame, n_var: usize) -> Schema {
    obs.get_columns()
        .iter()
        .fold(Schema::new(obs.height(), n_var), |schema, column| {
            let field_type = match column.dtype() {
                DataType::String => FieldType::Categorical,
                DataType::Boolean => FieldType::Boolean,
                dtype if dtype.is_integer() => FieldType::Int32,
                dtype if dtype.is_float() => FieldType::Float32,
                dtype => FieldType::Unsupported(dtype.to_string()),
            };
            schema.with_obs_field(AnnotationField::new(column.name().as_str(), field_type))
        })
}
