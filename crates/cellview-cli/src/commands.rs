use std::path::Path;

use anyhow::{Context, Result};
use tracing::info_span;

use cellview_cli::filters::apply_filters;
use cellview_cli::load::{Dataset, load_dataset};
use cellview_cli::report::{column_table, summarize_columns, world_overview};
use cellview_model::WorldOptions;
use cellview_world::{
    Crossfilter, TransitionContext, World, WorldCommand, WorldEffect, WorldHistory,
    create_from_universe, create_obs_dimensions, get_selected_by_index,
};

use crate::cli::{DatasetArgs, SelectArgs};

pub fn load_options(path: Option<&Path>) -> Result<WorldOptions> {
    let Some(path) = path else {
        return Ok(WorldOptions::default());
    };
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))
}

pub fn run_summary(args: &DatasetArgs, options: &WorldOptions) -> Result<()> {
    let span = info_span!("summary", dir = %args.data_dir.display());
    let _guard = span.enter();
    let dataset = load_dataset(&args.data_dir)?;
    let world = create_from_universe(&dataset.universe);
    let engine = build_engine(&world, options)?;
    print_world(&world);
    println!("Selection dimensions: {}", engine.dimension_names().join(", "));
    Ok(())
}

pub fn run_select(args: &SelectArgs, options: &WorldOptions) -> Result<()> {
    let span = info_span!("select", dir = %args.dataset.data_dir.display());
    let _guard = span.enter();
    let dataset = load_dataset(&args.dataset.data_dir)?;
    let universe = &dataset.universe;
    let mut history = WorldHistory::new(create_from_universe(universe));

    let engine = build_engine(history.current(), options)?;
    let engine = apply_filters(engine, &args.labels, &args.ranges).context("apply filters")?;
    if args.ids {
        let ids: Vec<String> = get_selected_by_index(&engine)
            .iter()
            .map(u32::to_string)
            .collect();
        println!("Selected ids: {}", ids.join(" "));
    }
    let effects = history.apply(
        WorldCommand::SetToSelection,
        &TransitionContext::new(universe, &engine, options),
    )?;
    let engine = if effects.contains(&WorldEffect::RebuildDimensions) {
        build_engine(history.current(), options)?
    } else {
        engine
    };
    let context = TransitionContext::new(universe, &engine, options);

    if let Some(clip) = args.clip {
        history.apply(WorldCommand::SetClipQuantiles(clip.0), &context)?;
    }
    if !args.genes.is_empty() {
        let command = expression_command(&dataset, &args.genes)?;
        for effect in history.apply(command, &context)? {
            if let WorldEffect::VarColumnsEvicted(names) = effect {
                tracing::info!(evicted = names.len(), "expression columns evicted");
            }
        }
    }

    print_world(history.current());
    Ok(())
}

fn build_engine(world: &World, options: &WorldOptions) -> Result<Crossfilter> {
    create_obs_dimensions(Crossfilter::for_frame(&world.obs_annotations), world, options)
        .context("build selection dimensions")
}

fn expression_command(dataset: &Dataset, genes: &[String]) -> Result<WorldCommand> {
    Ok(WorldCommand::ExpressionLoaded {
        columns: dataset.expression_columns(genes)?,
        displayed: genes.to_vec(),
        diffexp: Vec::new(),
    })
}

fn print_world(world: &World) {
    for line in world_overview(world) {
        println!("{line}");
    }
    println!("{}", column_table(&summarize_columns(world)));
}
