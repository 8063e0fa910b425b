//! Snapshot stack for undo/redo.
//!
//! [`SnapshotStore`] keeps an ordered run of content snapshots with a cursor
//! pointing at the current one. Adding while the cursor is mid-stack discards
//! the redo branch; a byte budget evicts the oldest entries, never the
//! current one.

use std::collections::VecDeque;

use crate::metadata::embed_metadata;
use crate::types::ContentMetadata;

/// Default byte budget for retained snapshots (10 MB).
pub const DEFAULT_SNAPSHOT_BUDGET: usize = 10_000_000;

/// A captured content + selection pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    /// Serialized content, without the metadata comment.
    pub content: String,
    /// Selection and dark-mode state at capture time, when resolvable.
    pub metadata: Option<ContentMetadata>,
    /// Whether an immediate Backspace at the capture position may silently
    /// undo past this snapshot.
    pub is_auto_complete: bool,
}

impl Snapshot {
    pub fn new(content: impl Into<String>, metadata: Option<ContentMetadata>) -> Self {
        Self {
            content: content.into(),
            metadata,
            is_auto_complete: false,
        }
    }

    /// Byte size used for budget accounting.
    pub fn size(&self) -> usize {
        self.content.len()
    }

    /// The persistable form: content plus the trailing metadata comment.
    pub fn serialize(&self) -> String {
        match &self.metadata {
            Some(metadata) => embed_metadata(&self.content, metadata),
            None => self.content.clone(),
        }
    }
}

/// Bounded snapshot stack with a current-position cursor.
#[derive(Debug)]
pub struct SnapshotStore {
    snapshots: VecDeque<Snapshot>,
    /// Index of the current snapshot. Only meaningful when non-empty.
    current_index: usize,
    total_size: usize,
    max_size: usize,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new(DEFAULT_SNAPSHOT_BUDGET)
    }
}

impl SnapshotStore {
    pub fn new(max_size: usize) -> Self {
        Self {
            snapshots: VecDeque::new(),
            current_index: 0,
            total_size: 0,
            max_size,
        }
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Cursor position, when the store is non-empty.
    pub fn current_index(&self) -> Option<usize> {
        (!self.snapshots.is_empty()).then_some(self.current_index)
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.snapshots.get(self.current_index)
    }

    pub fn total_size(&self) -> usize {
        self.total_size
    }

    /// Append a snapshot, discarding any redo branch first.
    ///
    /// A snapshot identical to the current one is skipped, except that it may
    /// still promote the current entry to auto-complete. Budget eviction then
    /// drops entries from the front while the total exceeds the budget and
    /// entries remain before the cursor; a single oversized snapshot is kept
    /// regardless.
    pub fn add_snapshot(&mut self, mut snapshot: Snapshot, is_auto_complete: bool) {
        snapshot.is_auto_complete = is_auto_complete;

        if let Some(current) = self.current() {
            if current.content == snapshot.content && current.metadata == snapshot.metadata {
                if is_auto_complete {
                    self.snapshots[self.current_index].is_auto_complete = true;
                }
                return;
            }
        }

        self.clear_redo();

        self.total_size += snapshot.size();
        self.snapshots.push_back(snapshot);
        self.current_index = self.snapshots.len() - 1;

        while self.total_size > self.max_size && self.current_index > 0 {
            if let Some(evicted) = self.snapshots.pop_front() {
                self.total_size -= evicted.size();
                self.current_index -= 1;
            }
        }

        tracing::trace!(
            target: "vellum::undo",
            len = self.snapshots.len(),
            total_size = self.total_size,
            is_auto_complete,
            "snapshot added"
        );
    }

    /// Whether the cursor can move by `delta`.
    pub fn can_move(&self, delta: isize) -> bool {
        if self.snapshots.is_empty() {
            return false;
        }
        let target = self.current_index as isize + delta;
        target >= 0 && (target as usize) < self.snapshots.len()
    }

    /// Move the cursor by `delta` and return the snapshot it lands on, or
    /// `None` without moving when the target is out of bounds.
    pub fn move_cursor(&mut self, delta: isize) -> Option<&Snapshot> {
        if !self.can_move(delta) {
            return None;
        }
        self.current_index = (self.current_index as isize + delta) as usize;
        self.snapshots.get(self.current_index)
    }

    /// Whether an undo would land on a snapshot flagged auto-complete.
    pub fn can_undo_auto_complete(&self) -> bool {
        self.snapshots.len() >= 2
            && self.current_index >= 1
            && self.snapshots[self.current_index - 1].is_auto_complete
    }

    /// Drop every snapshot after the cursor.
    pub fn clear_redo(&mut self) {
        if self.snapshots.is_empty() {
            return;
        }
        while self.snapshots.len() > self.current_index + 1 {
            if let Some(dropped) = self.snapshots.pop_back() {
                self.total_size -= dropped.size();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(content: &str) -> Snapshot {
        Snapshot::new(content, None)
    }

    fn contents(store: &SnapshotStore) -> Vec<String> {
        (0..store.len())
            .map(|i| store.snapshots[i].content.clone())
            .collect()
    }

    #[test]
    fn test_cursor_tracks_latest_add() {
        let mut store = SnapshotStore::default();
        assert!(store.current_index().is_none());

        store.add_snapshot(snap("a"), false);
        assert_eq!(store.current_index(), Some(0));

        store.add_snapshot(snap("b"), false);
        assert_eq!(store.current_index(), Some(1));
        assert_eq!(store.current().unwrap().content, "b");
    }

    #[test]
    fn test_cursor_invariant_over_random_walk() {
        let mut store = SnapshotStore::default();
        let moves: [isize; 12] = [-1, 1, -1, -1, 1, 1, 1, -1, -1, -1, 1, -1];

        for i in 0..6 {
            store.add_snapshot(snap(&format!("s{i}")), false);
        }
        for delta in moves {
            store.move_cursor(delta);
            let index = store.current_index().unwrap();
            assert!(index < store.len());
        }
    }

    #[test]
    fn test_add_clears_redo_branch() {
        let mut store = SnapshotStore::default();
        store.add_snapshot(snap("A"), false);
        store.add_snapshot(snap("B"), false);
        store.add_snapshot(snap("C"), false);

        store.move_cursor(-1);
        assert_eq!(store.current().unwrap().content, "B");
        store.move_cursor(-1);
        assert_eq!(store.current().unwrap().content, "A");

        store.add_snapshot(snap("D"), false);
        assert_eq!(contents(&store), vec!["A", "D"]);
        assert_eq!(store.current().unwrap().content, "D");
    }

    #[test]
    fn test_move_out_of_bounds_is_noop() {
        let mut store = SnapshotStore::default();
        store.add_snapshot(snap("a"), false);

        assert!(store.move_cursor(-1).is_none());
        assert_eq!(store.current_index(), Some(0));
        assert!(store.move_cursor(1).is_none());
        assert_eq!(store.current_index(), Some(0));
        assert!(store.move_cursor(0).is_some());
    }

    #[test]
    fn test_budget_eviction_keeps_current() {
        // Each snapshot is 4 bytes; budget fits three.
        let mut store = SnapshotStore::new(12);
        for i in 0..5 {
            store.add_snapshot(snap(&format!("s{i:03}")), false);
        }

        assert_eq!(store.len(), 3);
        assert!(store.total_size() <= 12);
        assert_eq!(store.current().unwrap().content, "s004");
        assert_eq!(store.current_index(), Some(store.len() - 1));
    }

    #[test]
    fn test_oversized_single_snapshot_is_kept() {
        let mut store = SnapshotStore::new(4);
        store.add_snapshot(snap("wayoverbudget"), false);
        assert_eq!(store.len(), 1);
        assert_eq!(store.current().unwrap().content, "wayoverbudget");
    }

    #[test]
    fn test_duplicate_of_current_is_skipped() {
        let mut store = SnapshotStore::default();
        store.add_snapshot(snap("a"), false);
        store.add_snapshot(snap("a"), false);
        assert_eq!(store.len(), 1);

        // A duplicate may still promote the current entry to auto-complete.
        store.add_snapshot(snap("a"), true);
        assert_eq!(store.len(), 1);
        assert!(store.current().unwrap().is_auto_complete);
    }

    #[test]
    fn test_can_undo_auto_complete() {
        let mut store = SnapshotStore::default();
        store.add_snapshot(snap("initial"), false);
        assert!(!store.can_undo_auto_complete());

        store.add_snapshot(snap("before"), true);
        store.add_snapshot(snap("after"), false);
        assert!(store.can_undo_auto_complete());

        store.move_cursor(-1);
        assert!(!store.can_undo_auto_complete());
    }

    #[test]
    fn test_clear_redo() {
        let mut store = SnapshotStore::default();
        store.add_snapshot(snap("a"), false);
        store.add_snapshot(snap("b"), false);
        store.add_snapshot(snap("c"), false);
        store.move_cursor(-2);

        store.clear_redo();
        assert_eq!(store.len(), 1);
        assert_eq!(store.current().unwrap().content, "a");
        assert!(!store.can_move(1));
    }
}
