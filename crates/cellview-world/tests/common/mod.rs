//! Shared fixtures for the World integration tests.
#![allow(dead_code)]

use cellview_model::{AnnotationField, FieldType, Schema, WorldOptions};
use cellview_world::{Crossfilter, Universe, World, create_from_universe, create_obs_dimensions};
use polars::prelude::*;

/// Five observations with every kind of schema field.
pub fn universe() -> Universe {
    let schema = Schema::new(5, 4)
        .with_obs_field(AnnotationField::new("name", FieldType::String))
        .with_obs_field(AnnotationField::new("tissue", FieldType::Categorical))
        .with_obs_field(AnnotationField::new("n_genes", FieldType::Int32))
        .with_obs_field(AnnotationField::new("score", FieldType::Float32))
        .with_obs_field(AnnotationField::new(
            "weird",
            FieldType::Unsupported("float64".to_string()),
        ))
        .with_obs_field(AnnotationField::user_category(
            "label",
            vec!["x".to_string(), "z".to_string()],
        ));
    let obs = DataFrame::new(vec![
        Series::new("name".into(), vec!["c0", "c1", "c2", "c3", "c4"]).into(),
        Series::new("tissue".into(), vec!["lung", "liver", "lung", "gut", "lung"]).into(),
        Series::new("n_genes".into(), vec![10i32, 20, 30, 40, 50]).into(),
        Series::new("score".into(), vec![0.1f32, 0.5, 0.9, 0.3, 0.7]).into(),
        Series::new("weird".into(), vec![1.0f64, 2.0, 3.0, 4.0, 5.0]).into(),
        Series::new("label".into(), vec!["x", "z", "x", "z", "x"]).into(),
    ])
    .unwrap();
    let layout = DataFrame::new(vec![
        Series::new("X".into(), vec![0.0f32, 1.0, 2.0, 3.0, 4.0]).into(),
        Series::new("Y".into(), vec![4.0f32, 3.0, 2.0, 1.0, 0.0]).into(),
    ])
    .unwrap();
    Universe::new(schema, obs, layout, DataFrame::empty()).unwrap()
}

/// Ten observations with a single editable label column.
pub fn labelled_universe() -> Universe {
    let schema = Schema::new(10, 0).with_obs_field(AnnotationField::user_category(
        "label",
        vec!["x".to_string(), "z".to_string()],
    ));
    let labels = vec!["x", "z", "z", "x", "z", "z", "x", "z", "z", "z"];
    let obs = DataFrame::new(vec![Series::new("label".into(), labels).into()]).unwrap();
    let layout = DataFrame::new(vec![
        Series::new("X".into(), vec![0.0f32; 10]).into(),
        Series::new("Y".into(), vec![0.0f32; 10]).into(),
    ])
    .unwrap();
    Universe::new(schema, obs, layout, DataFrame::empty()).unwrap()
}

/// Engine with every schema dimension registered over `world`.
pub fn engine(world: &World) -> Crossfilter {
    create_obs_dimensions(
        Crossfilter::for_frame(&world.obs_annotations),
        world,
        &WorldOptions::default(),
    )
    .unwrap()
}

pub fn full_world(universe: &Universe) -> World {
    create_from_universe(universe)
}

pub fn strings(series: &Series) -> Vec<String> {
    series
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect()
}

pub fn floats(series: &Series) -> Vec<f64> {
    series
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect()
}
