//! Undoable log of World transitions.

use cellview_model::Result;

use crate::selection::SelectionEngine;
use crate::transition::{Transition, TransitionContext, WorldCommand, WorldEffect, transition};
use crate::world::World;

/// One applied command with the Worlds on either side of it.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub prior: World,
    pub command: WorldCommand,
    pub next: World,
}

/// Append-only log of transitions with an undo/redo cursor.
///
/// Entries are never removed. Undo and redo only move which entry is
/// current, so an undone World is the exact snapshot recorded earlier.
#[derive(Debug, Clone)]
pub struct WorldHistory {
    initial: World,
    entries: Vec<HistoryEntry>,
    /// Indices into `entries` of applied commands, oldest first.
    applied: Vec<usize>,
    /// Indices of undone commands; the next redo is the last one.
    undone: Vec<usize>,
}

impl WorldHistory {
    pub fn new(initial: World) -> Self {
        Self {
            initial,
            entries: Vec::new(),
            applied: Vec::new(),
            undone: Vec::new(),
        }
    }

    /// The World after every applied command.
    pub fn current(&self) -> &World {
        self.applied
            .last()
            .and_then(|&index| self.entries.get(index))
            .map_or(&self.initial, |entry| &entry.next)
    }

    /// Every recorded entry, including undone ones, in order of application.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn can_undo(&self) -> bool {
        !self.applied.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// Run `command` against the current World and record it.
    ///
    /// Applying a new command discards the redo stack. On error nothing is
    /// recorded.
    pub fn apply<E: SelectionEngine>(
        &mut self,
        command: WorldCommand,
        context: &TransitionContext<'_, E>,
    ) -> Result<Vec<WorldEffect>> {
        let Transition { world, effects } = transition(self.current(), &command, context)?;
        let entry = HistoryEntry {
            prior: self.current().clone(),
            command,
            next: world,
        };
        self.entries.push(entry);
        self.applied.push(self.entries.len() - 1);
        self.undone.clear();
        Ok(effects)
    }

    /// Step back one command. Returns the command undone, if any.
    pub fn undo(&mut self) -> Option<&WorldCommand> {
        let index = self.applied.pop()?;
        self.undone.push(index);
        tracing::debug!(index, "history undo");
        self.entries.get(index).map(|entry| &entry.command)
    }

    /// Re-apply the most recently undone command.
    pub fn redo(&mut self) -> Option<&WorldCommand> {
        let index = self.undone.pop()?;
        self.applied.push(index);
        tracing::debug!(index, "history redo");
        self.entries.get(index).map(|entry| &entry.command)
    }
}
