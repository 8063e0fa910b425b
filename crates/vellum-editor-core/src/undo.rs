//! Undo coordinator state.
//!
//! The coordinator itself is split across the two undo primitives in
//! [`crate::api`] (snapshot bracketing and restore) and the
//! [`crate::plugins::undo::UndoPlugin`] (redo-clearing policy and the
//! backspace auto-complete interception). This module holds the shared state
//! they coordinate through.

use crate::dom::Position;
use crate::snapshots::SnapshotStore;

/// State for the undo coordinator, one per editor.
pub struct UndoState {
    /// The snapshot stack.
    pub snapshots: SnapshotStore,
    /// True while a snapshot is being restored. Content-changed handling
    /// must not treat the restore as new input.
    pub is_restoring: bool,
    /// True when content changed since the last snapshot was taken, so the
    /// first undo must capture the unsaved state for redo to return to.
    pub has_new_content: bool,
    /// True while inside an `add_undo_snapshot` call. Inner calls run their
    /// callback but skip the before/after snapshot bracketing.
    pub is_nested: bool,
    /// Position at which the last snapshot is silently undoable by an
    /// immediate Backspace. Cleared by any other input.
    pub auto_complete_position: Option<Position>,
}

impl Default for UndoState {
    fn default() -> Self {
        Self {
            snapshots: SnapshotStore::default(),
            is_restoring: false,
            has_new_content: false,
            is_nested: false,
            auto_complete_position: None,
        }
    }
}

impl UndoState {
    pub fn can_undo(&self) -> bool {
        self.has_new_content || self.snapshots.can_move(-1)
    }

    pub fn can_redo(&self) -> bool {
        self.snapshots.can_move(1)
    }

    /// Forget the pending auto-complete marker.
    pub fn clear_auto_complete(&mut self) {
        self.auto_complete_position = None;
    }
}
