//! Dataset loading and World reporting over CSV fixtures.

use std::fs;
use std::path::Path;

use cellview_cli::filters::{LabelFilter, apply_filters};
use cellview_cli::load::{infer_schema, load_dataset};
use cellview_cli::report::{ColumnKind, column_table, summarize_columns};
use cellview_model::{ClipQuantiles, DimensionType, WorldOptions};
use cellview_world::{
    Crossfilter, create_by_selection, create_from_universe, create_obs_dimensions,
    create_with_new_clip, get_selected_by_index,
};
use tempfile::TempDir;

const OBS: &str = "name,tissue,n_genes,score
c0,lung,10,0.1
c1,liver,20,0.5
c2,lung,30,0.9
c3,gut,40,0.3
c4,lung,50,0.7
";

const LAYOUT: &str = "X,Y
0.0,4.0
1.0,3.0
2.0,2.0
3.0,1.0
4.0,0.0
";

const VAR: &str = "g1,g2
1.0,0.0
5.0,0.5
10.0,1.0
50.0,1.5
100.0,2.0
";

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

fn dataset_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "obs.csv", OBS);
    write(dir.path(), "layout.csv", LAYOUT);
    write(dir.path(), "var.csv", VAR);
    dir
}

fn engine(world: &cellview_world::World) -> Crossfilter {
    create_obs_dimensions(
        Crossfilter::for_frame(&world.obs_annotations),
        world,
        &WorldOptions::default(),
    )
    .unwrap()
}

#[test]
fn schema_is_inferred_from_observations() {
    let dir = dataset_dir();
    let dataset = load_dataset(dir.path()).unwrap();
    let universe = &dataset.universe;
    assert_eq!(universe.n_obs, 5);
    assert_eq!(universe.n_var, 2);
    let fields: Vec<String> = universe
        .schema
        .obs
        .iter()
        .map(|field| format!("{}: {}", field.name, field.field_type))
        .collect();
    insta::assert_snapshot!(fields.join("\n"), @r"
    name: categorical
    tissue: categorical
    n_genes: int32
    score: float32
    ");
    assert_eq!(
        infer_schema(universe.obs_annotations.data(), 0).obs,
        universe.schema.obs
    );
}

#[test]
fn declared_schema_wins() {
    let dir = dataset_dir();
    write(
        dir.path(),
        "schema.json",
        r#"{
            "n_obs": 5,
            "n_var": 2,
            "obs": [
                {"name": "name", "type": "string"},
                {"name": "tissue", "type": "categorical", "categories": ["lung", "liver", "gut"]},
                {"name": "n_genes", "type": "int32"},
                {"name": "score", "type": "float64"}
            ]
        }"#,
    );
    let dataset = load_dataset(dir.path()).unwrap();
    let world = create_from_universe(&dataset.universe);
    let engine = engine(&world);
    assert_eq!(
        engine.dimension_names(),
        vec!["layout/XY", "obs/n_genes", "obs/tissue"]
    );
}

#[test]
fn missing_tables_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "layout.csv", LAYOUT);
    let err = load_dataset(dir.path()).unwrap_err();
    assert!(format!("{err:#}").contains("obs.csv"));
}

#[test]
fn expression_rows_must_match() {
    let dir = dataset_dir();
    write(dir.path(), "var.csv", "g1\n1.0\n2.0\n");
    let err = load_dataset(dir.path()).unwrap_err();
    assert_eq!(err.to_string(), "var.csv has 2 rows, expected 5");
}

#[test]
fn select_by_label_then_load_genes() {
    let dir = dataset_dir();
    let dataset = load_dataset(dir.path()).unwrap();
    let world = create_from_universe(&dataset.universe);
    let filter: LabelFilter = "tissue=lung".parse().unwrap();
    let selection = apply_filters(engine(&world), &[filter], &[]).unwrap();
    assert_eq!(get_selected_by_index(&selection), vec![0, 2, 4]);

    let subset = create_by_selection(&world, &selection, &WorldOptions::default()).unwrap();
    assert_eq!(subset.n_obs, 3);
    let columns = dataset.expression_columns(&["g1".to_string()]).unwrap();
    assert_eq!(columns[0].1.len(), 5);
    assert!(dataset.expression_columns(&["nope".to_string()]).is_err());
}

#[test]
fn clipped_values_are_counted() {
    let dir = dataset_dir();
    let dataset = load_dataset(dir.path()).unwrap();
    let world = create_from_universe(&dataset.universe);
    let clipped = create_with_new_clip(
        &world,
        &engine(&world),
        ClipQuantiles::new(0.25, 0.75).unwrap(),
        &WorldOptions::default(),
    )
    .unwrap();
    let summaries = summarize_columns(&clipped);
    assert!(summaries.iter().all(|s| s.kind == ColumnKind::Annotation));

    let n_genes = summaries.iter().find(|s| s.name == "n_genes").unwrap();
    assert_eq!(n_genes.dimension, Some(DimensionType::Int32Scalar));
    assert_eq!(n_genes.clipped, 2);
    assert_eq!((n_genes.min, n_genes.max), (Some(20.0), Some(40.0)));

    let name = summaries.iter().find(|s| s.name == "name").unwrap();
    assert_eq!(name.clipped, 0);
    assert_eq!(name.min, None);

    let mut table = column_table(&summaries);
    table.force_no_tty();
    let rendered = table.to_string();
    assert!(rendered.contains("n_genes"));
    assert!(rendered.contains("20.0000"));
}
