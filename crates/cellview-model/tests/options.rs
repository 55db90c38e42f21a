//! Tests for World options.

use cellview_model::WorldOptions;

#[test]
fn defaults_match_dataset_conventions() {
    let options = WorldOptions::default();
    assert_eq!(options.unassigned_label, "unassigned");
    assert_eq!(options.name_field, "name");
    assert_eq!((options.layout_x.as_str(), options.layout_y.as_str()), ("X", "Y"));
    assert!(options.clip_sentinel.is_nan());
}

#[test]
fn partial_json_keeps_defaults() {
    let options: WorldOptions =
        serde_json::from_str(r#"{"unassigned_label": "none"}"#).expect("parse options");
    assert_eq!(options.unassigned_label, "none");
    assert_eq!(options.name_field, "name");
    assert!(options.clip_sentinel.is_nan());
}

#[test]
fn builder_overrides() {
    let options = WorldOptions::new()
        .with_name_field("cell_id")
        .with_layout_columns("umap_1", "umap_2")
        .with_clip_sentinel(-1.0);
    assert_eq!(options.name_field, "cell_id");
    assert_eq!(options.layout_y, "umap_2");
    assert_eq!(options.clip_sentinel, -1.0);
}
