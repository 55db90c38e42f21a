//! Typed command dispatch.
//!
//! [`transition`] maps the current World and one [`WorldCommand`] to the
//! next World plus the side effects the caller must carry out. Annotation
//! commands expect the Universe in the context to already reflect the edit
//! (new schema, new column); the World adopts the Universe's schema.

use std::sync::Arc;

use polars::prelude::Series;

use cellview_model::{ClipQuantiles, Result, WorldOptions};

use crate::annotations;
use crate::selection::SelectionEngine;
use crate::universe::Universe;
use crate::var_cache::merge_expression;
use crate::world::{World, create_by_selection, create_from_universe, create_with_new_clip};

/// One World-changing event.
#[derive(Debug, Clone)]
pub enum WorldCommand {
    /// Initial load, or return to the entire Universe.
    ResetToUniverse,
    /// Narrow the World to the engine's current selection.
    SetToSelection,
    SetClipQuantiles(ClipQuantiles),
    /// Expression columns fetched for the whole Universe.
    ExpressionLoaded {
        columns: Vec<(String, Series)>,
        displayed: Vec<String>,
        diffexp: Vec<String>,
    },
    CreateCategory {
        name: String,
    },
    RenameCategory {
        from: String,
        to: String,
    },
    DeleteCategory {
        name: String,
    },
    AddLabelToCategory,
    EditLabel {
        field: String,
        from: String,
        to: String,
    },
    DeleteLabel {
        field: String,
        label: String,
    },
    LabelCurrentSelection {
        field: String,
        label: String,
    },
}

impl WorldCommand {
    /// Short stable name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ResetToUniverse => "reset-to-universe",
            Self::SetToSelection => "set-to-selection",
            Self::SetClipQuantiles(_) => "set-clip-quantiles",
            Self::ExpressionLoaded { .. } => "expression-loaded",
            Self::CreateCategory { .. } => "create-category",
            Self::RenameCategory { .. } => "rename-category",
            Self::DeleteCategory { .. } => "delete-category",
            Self::AddLabelToCategory => "add-label-to-category",
            Self::EditLabel { .. } => "edit-label",
            Self::DeleteLabel { .. } => "delete-label",
            Self::LabelCurrentSelection { .. } => "label-current-selection",
        }
    }
}

/// Read-only collaborators of a transition.
#[derive(Debug)]
pub struct TransitionContext<'a, E> {
    pub universe: &'a Universe,
    pub engine: &'a E,
    pub options: &'a WorldOptions,
}

impl<'a, E> TransitionContext<'a, E> {
    pub fn new(universe: &'a Universe, engine: &'a E, options: &'a WorldOptions) -> Self {
        Self {
            universe,
            engine,
            options,
        }
    }
}

impl<E> Clone for TransitionContext<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for TransitionContext<'_, E> {}

/// Work left to the caller after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldEffect {
    /// The World's rows changed; the selection engine must be rebuilt over
    /// the new World.
    RebuildDimensions,
    /// Expression columns dropped from the cache.
    VarColumnsEvicted(Vec<String>),
}

/// Next World and its effects.
#[derive(Debug, Clone)]
pub struct Transition {
    pub world: World,
    pub effects: Vec<WorldEffect>,
}

impl Transition {
    fn quiet(world: World) -> Self {
        Self {
            world,
            effects: Vec::new(),
        }
    }
}

/// Apply one command to the World.
///
/// # Errors
///
/// Propagates the failure of the underlying World operation; the input
/// World is never modified.
pub fn transition<E: SelectionEngine>(
    world: &World,
    command: &WorldCommand,
    context: &TransitionContext<'_, E>,
) -> Result<Transition> {
    let span = tracing::info_span!("transition", command = command.name(), n_obs = world.n_obs);
    let _guard = span.enter();

    let TransitionContext {
        universe,
        engine,
        options,
    } = *context;
    let schema = || Arc::clone(&universe.schema);

    let next = match command {
        WorldCommand::ResetToUniverse => Transition {
            world: create_from_universe(universe),
            effects: vec![WorldEffect::RebuildDimensions],
        },
        WorldCommand::SetToSelection => Transition {
            world: create_by_selection(world, engine, options)?,
            effects: vec![WorldEffect::RebuildDimensions],
        },
        WorldCommand::SetClipQuantiles(clip) => {
            Transition::quiet(create_with_new_clip(world, engine, *clip, options)?)
        }
        WorldCommand::ExpressionLoaded {
            columns,
            displayed,
            diffexp,
        } => {
            let update =
                merge_expression(world, universe, engine, columns, displayed, diffexp, options)?;
            let effects = if update.evicted.is_empty() {
                Vec::new()
            } else {
                vec![WorldEffect::VarColumnsEvicted(update.evicted)]
            };
            Transition {
                world: update.world,
                effects,
            }
        }
        WorldCommand::CreateCategory { name } => Transition::quiet(
            annotations::create_category(world, universe, name, schema())?,
        ),
        WorldCommand::RenameCategory { from, to } => {
            Transition::quiet(annotations::rename_category(world, from, to, schema())?)
        }
        WorldCommand::DeleteCategory { name } => {
            Transition::quiet(annotations::delete_category(world, name, schema())?)
        }
        WorldCommand::AddLabelToCategory => {
            Transition::quiet(annotations::add_label_to_category(world, schema()))
        }
        WorldCommand::EditLabel { field, from, to } => {
            Transition::quiet(annotations::edit_label(world, field, from, to, schema())?)
        }
        WorldCommand::DeleteLabel { field, label } => Transition::quiet(annotations::delete_label(
            world,
            field,
            label,
            &options.unassigned_label,
            schema(),
        )?),
        WorldCommand::LabelCurrentSelection { field, label } => Transition::quiet(
            annotations::label_current_selection(world, engine, field, label)?,
        ),
    };

    tracing::debug!(
        n_obs = next.world.n_obs,
        effects = next.effects.len(),
        "transition applied"
    );
    Ok(next)
}
