//! Linear undo/redo history over whole-graph snapshots.
//!
//! Snapshots are taken after each committed, post-processing state, so undo always restores a
//! schema-valid, fully reprocessed graph rather than a partially derived one.

use maquette_scene::SceneGraph;

/// Committed states retained for undo. Beyond the cap the oldest state becomes unreachable
/// rather than erroring.
pub const MAX_HISTORY: usize = 128;

#[derive(Debug, Default)]
pub struct History {
    undo: Vec<SceneGraph>,
    redo: Vec<SceneGraph>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the pre-mutation state after a successful commit. Clears the redo branch: a new
    /// edit after undo forks history.
    pub fn record(&mut self, before: SceneGraph) {
        self.undo.push(before);
        if self.undo.len() > MAX_HISTORY {
            self.undo.remove(0);
        }
        self.redo.clear();
    }

    /// Swaps `current` for the previous committed state, if any.
    pub fn undo(&mut self, current: SceneGraph) -> Option<SceneGraph> {
        let previous = self.undo.pop()?;
        self.redo.push(current);
        Some(previous)
    }

    /// Swaps `current` for the state undone last, if any.
    pub fn redo(&mut self, current: SceneGraph) -> Option<SceneGraph> {
        let next = self.redo.pop()?;
        self.undo.push(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Drops all history, e.g. after a whole-document replace.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
