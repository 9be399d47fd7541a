//! Snapshot-based undo/redo.

use crate::layers::Layer;

/// Maximum number of snapshots to keep.
pub const MAX_HISTORY: usize = 50;

/// Linear history of layer collections with a cursor.
#[derive(Debug, Clone, Default)]
pub struct History {
    snapshots: Vec<Vec<Layer>>,
    /// Index of the current state in `snapshots`.
    index: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new state. Drops any redo branch and evicts the oldest state over the cap.
    pub fn push(&mut self, layers: &[Layer]) {
        if !self.snapshots.is_empty() {
            self.snapshots.truncate(self.index + 1);
        }
        self.snapshots.push(layers.to_vec());

        if self.snapshots.len() > MAX_HISTORY {
            self.snapshots.remove(0);
        }
        self.index = self.snapshots.len() - 1;
    }

    /// Step back and return the previous state.
    pub fn undo(&mut self) -> Option<Vec<Layer>> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        self.snapshots.get(self.index).cloned()
    }

    /// Step forward and return the next state.
    pub fn redo(&mut self) -> Option<Vec<Layer>> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        self.snapshots.get(self.index).cloned()
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.index = 0;
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
