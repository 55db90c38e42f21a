//! World construction, selection subsetting and clipping.

mod common;

use cellview_model::{ClipQuantiles, WorldError, WorldOptions};
use cellview_world::{
    Crossfilter, Selection, create_by_selection, create_with_new_clip, get_selected_by_index,
    world_eq_universe,
};
use proptest::prelude::*;

use common::{engine, floats, full_world, strings, universe};

fn mask_engine(world: &cellview_world::World, mask: Vec<bool>) -> Crossfilter {
    engine(world).select("layout/XY", Selection::Mask(mask)).unwrap()
}

#[test]
fn full_world_is_the_universe() {
    let universe = universe();
    let world = full_world(&universe);
    assert!(world_eq_universe(&world, &universe));
    assert_eq!(world.n_obs, 5);
    assert_eq!(world.n_var, 4);
    assert_eq!(world.clip_quantiles, ClipQuantiles::default());
    assert!(world.is_row_aligned());
    assert_eq!(
        world.obs_annotations.identity(),
        world.unclipped.obs_annotations.identity()
    );
}

#[test]
fn selecting_everything_round_trips() {
    let universe = universe();
    let world = full_world(&universe);
    let engine = engine(&world);
    let again = create_by_selection(&world, &engine, &WorldOptions::default()).unwrap();
    assert_eq!(again.n_obs, world.n_obs);
    assert_eq!(again.obs_annotations, world.obs_annotations);
    assert_eq!(again.obs_layout, world.obs_layout);
    assert_eq!(again.unclipped.obs_annotations, world.unclipped.obs_annotations);
    assert!(again.is_row_aligned());
}

#[test]
fn selection_subset_keeps_original_order() {
    let universe = universe();
    let world = full_world(&universe);
    let engine = mask_engine(&world, vec![false, true, true, false, true]);
    let subset = create_by_selection(&world, &engine, &WorldOptions::default()).unwrap();

    assert_eq!(subset.n_obs, 3);
    assert_eq!(subset.obs_annotations.row_index().keys(), &[1, 2, 4]);
    assert_eq!(
        strings(subset.obs_annotations.col("name").unwrap()),
        vec!["c1", "c2", "c4"]
    );
    assert_eq!(floats(subset.obs_layout.col("X").unwrap()), vec![1.0, 2.0, 4.0]);
    assert!(subset.is_row_aligned());
    assert!(
        subset
            .obs_layout
            .row_index()
            .same_as(subset.unclipped.obs_annotations.row_index())
    );
    assert_eq!(subset.var_data.height(), 3);
    assert!(!world_eq_universe(&subset, &universe));
}

#[test]
fn selected_ids_are_global() {
    let universe = universe();
    let world = full_world(&universe);
    let subset = create_by_selection(
        &world,
        &mask_engine(&world, vec![false, true, true, false, true]),
        &WorldOptions::default(),
    )
    .unwrap();
    let engine = mask_engine(&subset, vec![true, false, true]);
    assert_eq!(get_selected_by_index(&engine), vec![1, 4]);
    assert_eq!(get_selected_by_index(&common::engine(&world)), vec![0, 1, 2, 3, 4]);
}

#[test]
fn engine_for_other_rows_is_rejected() {
    let universe = universe();
    let world = full_world(&universe);
    let subset = create_by_selection(
        &world,
        &mask_engine(&world, vec![true, true, false, false, false]),
        &WorldOptions::default(),
    )
    .unwrap();
    let err = create_by_selection(&subset, &engine(&world), &WorldOptions::default()).unwrap_err();
    assert!(matches!(err, WorldError::MaskLength { .. }));
}

#[test]
fn clip_masks_scalar_fields_only() {
    let universe = universe();
    let world = full_world(&universe);
    let engine = engine(&world);
    let clip = ClipQuantiles::new(0.25, 0.75).unwrap();
    let clipped = create_with_new_clip(&world, &engine, clip, &WorldOptions::default()).unwrap();

    let n_genes = floats(clipped.obs_annotations.col("n_genes").unwrap());
    assert!(n_genes[0].is_nan() && n_genes[4].is_nan());
    assert_eq!(&n_genes[1..4], &[20.0, 30.0, 40.0]);

    let score = floats(clipped.obs_annotations.col("score").unwrap());
    assert!(score[0].is_nan() && score[2].is_nan());
    assert_eq!(score[1], f64::from(0.5f32));
    assert_eq!(score[3], f64::from(0.3f32));

    for label in ["name", "tissue", "weird", "label"] {
        assert!(
            clipped
                .obs_annotations
                .shares_column(&clipped.unclipped.obs_annotations, label),
            "{label} should pass through"
        );
    }
    assert_eq!(
        clipped.unclipped.obs_annotations.identity(),
        world.unclipped.obs_annotations.identity()
    );
    assert!(clipped.is_row_aligned());
}

#[test]
fn local_quantiles_match_engine_quantiles() {
    let universe = universe();
    let world = full_world(&universe);
    let clip = ClipQuantiles::new(0.25, 0.75).unwrap();
    let options = WorldOptions::default();
    let with_engine = create_with_new_clip(&world, &engine(&world), clip, &options).unwrap();
    let bare = Crossfilter::for_frame(&world.obs_annotations);
    let without = create_with_new_clip(&world, &bare, clip, &options).unwrap();
    assert_eq!(with_engine.obs_annotations, without.obs_annotations);
}

#[test]
fn clearing_clip_restores_unclipped() {
    let universe = universe();
    let world = full_world(&universe);
    let engine = engine(&world);
    let options = WorldOptions::default();
    let clipped =
        create_with_new_clip(&world, &engine, ClipQuantiles::new(0.1, 0.9).unwrap(), &options)
            .unwrap();
    let cleared = create_with_new_clip(&clipped, &engine, ClipQuantiles::default(), &options).unwrap();
    assert_eq!(
        cleared.obs_annotations.identity(),
        cleared.unclipped.obs_annotations.identity()
    );
}

#[test]
fn out_of_range_clip_is_clamped_or_rejected() {
    let universe = universe();
    let world = full_world(&universe);
    assert!(matches!(
        ClipQuantiles::new(0.9, 0.1),
        Err(WorldError::InvalidClipRange { .. })
    ));

    let wide = ClipQuantiles::new(-0.5, 1.5).unwrap();
    assert!(wide.is_noop());
    let clipped =
        create_with_new_clip(&world, &engine(&world), wide, &WorldOptions::default()).unwrap();
    assert_eq!(
        clipped.obs_annotations.identity(),
        clipped.unclipped.obs_annotations.identity()
    );
}

proptest! {
    #[test]
    fn any_selection_stays_aligned(mask in proptest::collection::vec(any::<bool>(), 5)) {
        let universe = universe();
        let world = full_world(&universe);
        let subset = create_by_selection(
            &world,
            &mask_engine(&world, mask.clone()),
            &WorldOptions::default(),
        )
        .unwrap();
        let expected: Vec<u32> = (0u32..5).filter(|&i| mask[i as usize]).collect();
        prop_assert_eq!(subset.n_obs, expected.len());
        prop_assert_eq!(subset.obs_annotations.row_index().keys(), expected.as_slice());
        prop_assert!(subset.is_row_aligned());
    }
}
