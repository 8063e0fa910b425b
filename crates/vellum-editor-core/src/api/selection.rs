//! Selection and focus primitives.

use crate::core::EditorCore;
use crate::dom::{selection_to_metadata, DocumentSelection};
use crate::events::PluginEvent;
use crate::types::CellCoord;

/// Standard `get_selection`.
///
/// With `try_cache` set and the container unfocused, the last cached
/// selection is returned; a focused editor always reads live. Live reads
/// refresh the cache.
pub fn get_selection(core: &mut EditorCore, try_cache: bool) -> Option<DocumentSelection> {
    if try_cache && !core.document.has_focus() {
        return core.dom_event.selection_cache;
    }
    let live = core.document.read_selection();
    if live.is_some() {
        core.dom_event.selection_cache = live;
    }
    live
}

/// Standard `select_range`.
pub fn select_range(core: &mut EditorCore, selection: DocumentSelection, skip_same: bool) -> bool {
    if skip_same && core.document.read_selection() == Some(selection) {
        return true;
    }
    if core.document.apply_selection(&selection) {
        core.dom_event.selection_cache = Some(selection);
        true
    } else {
        tracing::warn!(target: "vellum::selection", "selection did not apply");
        false
    }
}

/// Standard `select_table`.
pub fn select_table(
    core: &mut EditorCore,
    table_id: &str,
    first_cell: CellCoord,
    last_cell: CellCoord,
) -> bool {
    let Some(table) = core.document.find_by_id(table_id) else {
        return false;
    };
    let selection = DocumentSelection::Table {
        table,
        first_cell,
        last_cell,
    };
    apply_and_announce(core, selection)
}

/// Standard `select_image`.
pub fn select_image(core: &mut EditorCore, image_id: &str) -> bool {
    let Some(image) = core.document.find_by_id(image_id) else {
        return false;
    };
    let selection = DocumentSelection::Image { image };
    apply_and_announce(core, selection)
}

fn apply_and_announce(core: &mut EditorCore, selection: DocumentSelection) -> bool {
    let select_range = core.api.select_range.clone();
    if !select_range(core, selection, false) {
        return false;
    }
    let metadata = selection_to_metadata(&*core.document, &selection);
    let trigger = core.api.trigger_event.clone();
    let mut event = PluginEvent::SelectionChanged {
        selection: metadata,
    };
    trigger(core, &mut event, true);
    true
}

/// Standard `focus`.
///
/// Focuses the container and, when the live selection was lost, restores the
/// cached one so the caret does not jump to the container start.
pub fn focus(core: &mut EditorCore) {
    if !core.document.has_focus() {
        core.document.focus();
    }
    if core.document.read_selection().is_none() {
        if let Some(cached) = core.dom_event.selection_cache {
            core.document.apply_selection(&cached);
        }
    }
}

/// Standard `has_focus`.
pub fn has_focus(core: &EditorCore) -> bool {
    core.document.has_focus()
}
