//! World transitions for cellview.
//!
//! A [`Universe`] is the complete dataset; a [`World`] is the filtered and
//! clipped view of it that consumers read. Every operation in this crate
//! takes the current World by reference and returns a new one:
//!
//! - **world**: full load, selection subset, re-clip
//! - **annotations**: category and label edits kept in step across the
//!   clipped and unclipped tables
//! - **var_cache**: expression column cache growth and pruning
//! - **dimensions**: selection dimensions derived from the schema
//! - **selection** / **crossfilter**: the selection engine interface and a
//!   reference implementation
//! - **transition** / **history**: typed command dispatch and an undoable log

pub mod annotations;
pub mod crossfilter;
pub mod dimensions;
pub mod history;
mod quantiles;
pub mod selection;
pub mod transition;
pub mod universe;
pub mod var_cache;
pub mod world;

pub use crossfilter::{Crossfilter, Selection};
pub use dimensions::create_obs_dimensions;
pub use history::{HistoryEntry, WorldHistory};
pub use selection::{DimensionSpec, ScalarKind, SelectionEngine};
pub use transition::{Transition, TransitionContext, WorldCommand, WorldEffect, transition};
pub use universe::Universe;
pub use var_cache::{KeepSet, VarCacheUpdate, merge_expression, prune_var_data};
pub use world::{
    Unclipped, World, create_by_selection, create_from_universe, create_with_new_clip,
    get_selected_by_index, world_eq_universe,
};
