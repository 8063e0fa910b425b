//! Undo snapshot bracketing and restore.

use smol_str::SmolStr;

use crate::core::EditorCore;
use crate::dom::{selection_to_metadata, DocumentSelection};
use crate::events::PluginEvent;
use crate::snapshots::Snapshot;
use crate::types::{ChangeSource, ContentMetadata, GetContentMode};

use super::EditCallback;

/// Capture the current content + selection into the snapshot stack.
pub(crate) fn take_snapshot(core: &mut EditorCore, is_auto_complete: bool) {
    let get_content = core.api.get_content.clone();
    let content = get_content(core, GetContentMode::RawHtmlOnly);

    let get_selection = core.api.get_selection.clone();
    let metadata = get_selection(core, true)
        .and_then(|sel| selection_to_metadata(&*core.document, &sel))
        .map(|selection| ContentMetadata {
            is_dark_mode: core.lifecycle.is_dark_mode,
            selection,
        });

    core.undo
        .snapshots
        .add_snapshot(Snapshot::new(content, metadata), is_auto_complete);
    core.undo.has_new_content = false;
}

/// Resets `is_nested` when the outermost bracket unwinds, whether the edit
/// callback returned or panicked.
struct NestedGuard<'a> {
    core: &'a mut EditorCore,
    outermost: bool,
}

impl Drop for NestedGuard<'_> {
    fn drop(&mut self) {
        if self.outermost {
            self.core.undo.is_nested = false;
        }
    }
}

/// Resets `is_restoring` when a restore unwinds.
struct RestoringGuard<'a> {
    core: &'a mut EditorCore,
}

impl<'a> RestoringGuard<'a> {
    fn new(core: &'a mut EditorCore) -> Self {
        core.undo.is_restoring = true;
        Self { core }
    }
}

impl Drop for RestoringGuard<'_> {
    fn drop(&mut self) {
        self.core.undo.is_restoring = false;
    }
}

/// Standard `add_undo_snapshot`.
///
/// Only the outermost call brackets the edit with before/after snapshots; a
/// nested call runs its callback and nothing else. The nesting flag is guard-
/// reset, so a panicking callback unwinds through an intact coordinator. The
/// before snapshot carries the auto-complete flag; after everything, a
/// collapsed selection position is recorded as the backspace-undo marker.
pub fn add_undo_snapshot(
    core: &mut EditorCore,
    callback: Option<EditCallback>,
    change_source: Option<ChangeSource>,
    can_undo_by_backspace: bool,
    additional_data: Option<SmolStr>,
) {
    let outermost = !core.undo.is_nested;
    if outermost {
        take_snapshot(core, can_undo_by_backspace);
        core.undo.is_nested = true;
    }

    let had_callback = callback.is_some();
    let mut data = additional_data;
    {
        let guard = NestedGuard {
            core: &mut *core,
            outermost,
        };
        if let Some(callback) = callback {
            let get_selection = guard.core.api.get_selection.clone();
            let (start, end) = match get_selection(&mut *guard.core, true) {
                Some(DocumentSelection::Range { start, end }) => (Some(start), Some(end)),
                _ => (None, None),
            };

            if let Some(returned) = callback(&mut *guard.core, start, end) {
                data = Some(returned);
            }

            if outermost {
                take_snapshot(&mut *guard.core, false);
            }
        }
    }

    if had_callback {
        if let Some(source) = change_source {
            let trigger = core.api.trigger_event.clone();
            let mut event = PluginEvent::ContentChanged { source, data };
            trigger(core, &mut event, true);
        }
    }

    if can_undo_by_backspace {
        // Re-read the live selection; the cache may predate the edit.
        let get_selection = core.api.get_selection.clone();
        if let Some(DocumentSelection::Range { start, end }) = get_selection(core, false) {
            if start == end {
                core.undo.has_new_content = false;
                core.undo.auto_complete_position = Some(start);
            }
        }
    }
}

/// Standard `restore_undo_snapshot`.
///
/// A negative step undoes, a positive one redoes. Unsaved content is
/// snapshotted first on undo so redo can return to it. Content, selection,
/// and dark mode all come back from the snapshot; the content-changed
/// broadcast happens while `is_restoring` is still set so the redo-clearing
/// policy ignores it.
pub fn restore_undo_snapshot(core: &mut EditorCore, step: isize) {
    if core.undo.has_new_content && step < 0 {
        let add_undo_snapshot = core.api.add_undo_snapshot.clone();
        add_undo_snapshot(core, None, None, false, None);
    }

    let Some(snapshot) = core.undo.snapshots.move_cursor(step).cloned() else {
        return;
    };

    tracing::debug!(
        target: "vellum::undo",
        step,
        "restoring snapshot"
    );

    let guard = RestoringGuard::new(core);

    let set_content = guard.core.api.set_content.clone();
    set_content(&mut *guard.core, &snapshot.content, false, snapshot.metadata);

    let source = if step < 0 {
        ChangeSource::Undo
    } else {
        ChangeSource::Redo
    };
    let trigger = guard.core.api.trigger_event.clone();
    let mut event = PluginEvent::ContentChanged { source, data: None };
    trigger(&mut *guard.core, &mut event, true);
}
