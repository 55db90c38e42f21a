//! Command dispatch and the undoable transition log.

mod common;

use std::sync::Arc;

use cellview_model::{AnnotationField, ClipQuantiles, WorldOptions};
use cellview_world::{
    Selection, TransitionContext, WorldCommand, WorldEffect, WorldHistory, transition,
};
use polars::prelude::*;

use common::{engine, full_world, strings, universe};

#[test]
fn reset_and_selection_ask_for_new_dimensions() {
    let universe = universe();
    let world = full_world(&universe);
    let options = WorldOptions::default();
    let selection = engine(&world)
        .select("layout/XY", Selection::Mask(vec![true, true, false, false, true]))
        .unwrap();
    let context = TransitionContext::new(&universe, &selection, &options);

    let subset = transition(&world, &WorldCommand::SetToSelection, &context).unwrap();
    assert_eq!(subset.world.n_obs, 3);
    assert_eq!(subset.effects, vec![WorldEffect::RebuildDimensions]);

    let reset = transition(&subset.world, &WorldCommand::ResetToUniverse, &context).unwrap();
    assert_eq!(reset.world.n_obs, 5);
    assert_eq!(reset.effects, vec![WorldEffect::RebuildDimensions]);

    let clip = WorldCommand::SetClipQuantiles(ClipQuantiles::new(0.1, 0.9).unwrap());
    assert!(transition(&world, &clip, &context).unwrap().effects.is_empty());
}

#[test]
fn evictions_are_reported() {
    let universe = universe();
    let world = full_world(&universe);
    let engine = engine(&world);
    let options = WorldOptions::default();
    let context = TransitionContext::new(&universe, &engine, &options);
    let load = |name: &str| WorldCommand::ExpressionLoaded {
        columns: vec![(name.to_string(), Series::new(name.into(), vec![1.0f64; 5]))],
        displayed: Vec::new(),
        diffexp: Vec::new(),
    };

    let first = transition(&world, &load("g1"), &context).unwrap();
    assert!(first.effects.is_empty());
    let second = transition(&first.world, &load("g2"), &context).unwrap();
    assert_eq!(
        second.effects,
        vec![WorldEffect::VarColumnsEvicted(vec!["g1".to_string()])]
    );
}

#[test]
fn annotation_commands_adopt_universe_schema() {
    let universe = universe();
    let world = full_world(&universe);
    let engine = engine(&world);
    let options = WorldOptions::default();

    let schema = (*universe.schema)
        .clone()
        .with_obs_field(AnnotationField::user_category("cluster", vec![]));
    let grown = universe
        .with_obs_column(
            "cluster",
            Series::new("cluster".into(), vec!["a", "b", "c", "d", "e"]),
            schema,
        )
        .unwrap();
    let context = TransitionContext::new(&grown, &engine, &options);
    let created = transition(
        &world,
        &WorldCommand::CreateCategory {
            name: "cluster".to_string(),
        },
        &context,
    )
    .unwrap();
    assert!(Arc::ptr_eq(&created.world.schema, &grown.schema));
    assert!(created.world.obs_annotations.has_col("cluster"));

    let deleted = transition(
        &created.world,
        &WorldCommand::DeleteLabel {
            field: "label".to_string(),
            label: "x".to_string(),
        },
        &context,
    )
    .unwrap();
    assert_eq!(
        strings(deleted.world.obs_annotations.col("label").unwrap()),
        vec!["unassigned", "z", "unassigned", "z", "unassigned"]
    );
}

#[test]
fn command_names() {
    let names: Vec<_> = [
        WorldCommand::ResetToUniverse,
        WorldCommand::SetToSelection,
        WorldCommand::AddLabelToCategory,
        WorldCommand::RenameCategory {
            from: "a".to_string(),
            to: "b".to_string(),
        },
    ]
    .iter()
    .map(WorldCommand::name)
    .collect();
    insta::assert_debug_snapshot!(names, @r#"
    [
        "reset-to-universe",
        "set-to-selection",
        "add-label-to-category",
        "rename-category",
    ]
    "#);
}

#[test]
fn undo_returns_the_exact_prior_world() {
    let universe = universe();
    let world = full_world(&universe);
    let engine = engine(&world);
    let options = WorldOptions::default();
    let context = TransitionContext::new(&universe, &engine, &options);
    let mut history = WorldHistory::new(world.clone());

    history
        .apply(
            WorldCommand::RenameCategory {
                from: "label".to_string(),
                to: "kind".to_string(),
            },
            &context,
        )
        .unwrap();
    history
        .apply(
            WorldCommand::SetClipQuantiles(ClipQuantiles::new(0.2, 0.8).unwrap()),
            &context,
        )
        .unwrap();
    let renamed = history.entries()[0].next.clone();
    let clipped_id = history.current().obs_annotations.identity();

    assert!(matches!(
        history.undo(),
        Some(WorldCommand::SetClipQuantiles(_))
    ));
    assert_eq!(
        history.current().obs_annotations.identity(),
        renamed.obs_annotations.identity()
    );
    history.undo();
    assert_eq!(
        history.current().obs_annotations.identity(),
        world.obs_annotations.identity()
    );
    assert!(!history.can_undo());
    assert!(history.undo().is_none());

    assert!(history.redo().is_some());
    assert!(history.redo().is_some());
    assert_eq!(history.current().obs_annotations.identity(), clipped_id);
    assert!(!history.can_redo());
    assert_eq!(history.entries().len(), 2);
}

#[test]
fn new_command_clears_redo_and_failures_are_not_recorded() {
    let universe = universe();
    let world = full_world(&universe);
    let engine = engine(&world);
    let options = WorldOptions::default();
    let context = TransitionContext::new(&universe, &engine, &options);
    let mut history = WorldHistory::new(world);

    history
        .apply(
            WorldCommand::DeleteCategory {
                name: "weird".to_string(),
            },
            &context,
        )
        .unwrap();
    history.undo();
    assert!(history.can_redo());

    let failed = history.apply(
        WorldCommand::DeleteCategory {
            name: "missing".to_string(),
        },
        &context,
    );
    assert!(failed.is_err());
    assert_eq!(history.entries().len(), 1);
    assert!(history.can_redo());

    history
        .apply(WorldCommand::AddLabelToCategory, &context)
        .unwrap();
    assert!(!history.can_redo());
    assert_eq!(history.entries().len(), 2);
    assert!(history.current().obs_annotations.has_col("weird"));
}
