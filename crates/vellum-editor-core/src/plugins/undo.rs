//! Undo policy plugin.
//!
//! Owns the parts of the undo coordinator that react to events: the
//! redo-clearing policy for new input, word-boundary snapshots, and the
//! backspace auto-complete interception, which it claims exclusively so no
//! other plugin (or the host default action) sees the keystroke.

use crate::core::EditorCore;
use crate::dom::DocumentSelection;
use crate::events::{EditorPlugin, Key, KeyboardEventData, PluginEvent};

pub struct UndoPlugin;

impl UndoPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UndoPlugin {
    fn default() -> Self {
        Self::new()
    }
}

/// An unmodified Backspace at the recorded auto-complete position, with an
/// auto-complete snapshot one step behind the cursor.
fn backspace_undo_eligible(core: &EditorCore, key: &KeyboardEventData) -> bool {
    if key.key != Key::Backspace || key.has_modifier() || key.shift_key {
        return false;
    }
    if !core.undo.snapshots.can_undo_auto_complete() {
        return false;
    }
    let Some(marker) = core.undo.auto_complete_position else {
        return false;
    };
    match core.document.read_selection() {
        Some(DocumentSelection::Range { start, end }) => start == end && start == marker,
        _ => false,
    }
}

fn selection_is_expanded(core: &mut EditorCore) -> bool {
    let get_selection = core.api.get_selection.clone();
    matches!(
        get_selection(core, true),
        Some(DocumentSelection::Range { start, end }) if start != end
    )
}

fn snapshot(core: &mut EditorCore) {
    let add_undo_snapshot = core.api.add_undo_snapshot.clone();
    add_undo_snapshot(core, None, None, false, None);
}

impl EditorPlugin for UndoPlugin {
    fn name(&self) -> &'static str {
        "Undo"
    }

    fn will_handle_event_exclusively(&mut self, core: &EditorCore, event: &PluginEvent) -> bool {
        match event {
            PluginEvent::KeyDown(key) => backspace_undo_eligible(core, key),
            _ => false,
        }
    }

    fn on_plugin_event(&mut self, core: &mut EditorCore, event: &mut PluginEvent) {
        match event {
            PluginEvent::EditorReady => {
                // Baseline snapshot so the first edit has something to undo
                // back to.
                snapshot(core);
            }
            PluginEvent::KeyDown(key) => {
                if backspace_undo_eligible(core, key) {
                    key.prevent_default();
                    core.undo.clear_auto_complete();
                    let restore = core.api.restore_undo_snapshot.clone();
                    restore(core, -1);
                    return;
                }

                match &key.key {
                    Key::Backspace | Key::Delete => {
                        // Deleting a range is one undoable unit; snapshot the
                        // state it destroys.
                        if selection_is_expanded(core) {
                            snapshot(core);
                        }
                    }
                    k if k.is_navigation() => {
                        if core.undo.has_new_content {
                            snapshot(core);
                        }
                    }
                    _ => {}
                }
                core.undo.clear_auto_complete();
            }
            PluginEvent::KeyPress(key) => {
                if key.ctrl_key || key.meta_key {
                    return;
                }
                core.undo.clear_auto_complete();
                match &key.key {
                    // Word boundaries get their own snapshot so undo steps
                    // back a word at a time, not a keystroke.
                    Key::Space | Key::Enter => snapshot(core),
                    _ => {
                        core.undo.snapshots.clear_redo();
                        core.undo.has_new_content = true;
                    }
                }
            }
            PluginEvent::CompositionEnd { .. } => {
                snapshot(core);
            }
            PluginEvent::ContentChanged { source, .. } => {
                if !core.undo.is_restoring && !source.is_restore() {
                    core.undo.snapshots.clear_redo();
                    core.undo.has_new_content = true;
                    core.undo.clear_auto_complete();
                }
            }
            _ => {}
        }
    }
}
