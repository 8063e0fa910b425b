//! Pending format state.
//!
//! Format toggles pressed at a collapsed selection (bold with nothing
//! selected) cannot apply to anything yet; they wait here until text is typed
//! at that exact position, and evaporate as soon as the caret moves away.

use crate::core::EditorCore;
use crate::dom::{DocumentSelection, Position};
use crate::events::{EditorPlugin, PluginEvent};

/// Format bits that can be held pending.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PendableFormatState {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub superscript: bool,
    pub subscript: bool,
}

/// Pending-format sub-state.
#[derive(Clone, Copy, Debug, Default)]
pub struct PendingFormatState {
    pub state: Option<PendableFormatState>,
    /// Where the pending state was declared; it only applies there.
    pub position: Option<Position>,
}

impl PendingFormatState {
    pub fn clear(&mut self) {
        self.state = None;
        self.position = None;
    }
}

pub struct PendingFormatPlugin;

impl PendingFormatPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PendingFormatPlugin {
    fn default() -> Self {
        Self::new()
    }
}

fn collapsed_position(core: &EditorCore) -> Option<Position> {
    match core.document.read_selection() {
        Some(DocumentSelection::Range { start, end }) if start == end => Some(start),
        _ => None,
    }
}

fn clear_if_moved(core: &mut EditorCore) {
    let Some(held) = core.pending_format.position else {
        return;
    };
    if collapsed_position(core) != Some(held) {
        core.pending_format.clear();
    }
}

impl EditorPlugin for PendingFormatPlugin {
    fn name(&self) -> &'static str {
        "PendingFormatState"
    }

    fn on_plugin_event(&mut self, core: &mut EditorCore, event: &mut PluginEvent) {
        match event {
            PluginEvent::PendingFormatStateChanged { format_state } => {
                core.pending_format.state = Some(*format_state);
                core.pending_format.position = collapsed_position(core);
            }
            PluginEvent::KeyDown(key) if key.key.is_navigation() => {
                core.pending_format.clear();
            }
            PluginEvent::MouseDown(_) => {
                core.pending_format.clear();
            }
            PluginEvent::ContentChanged { .. } => {
                clear_if_moved(core);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::DocumentModel;
    use crate::editor::{Editor, EditorOptions};
    use crate::events::{Key, KeyboardEventData};
    use crate::memory::MemoryDocument;
    use crate::types::ChangeSource;

    fn editor_at_caret() -> (Editor, Position) {
        let mut editor = Editor::new(
            Box::new(MemoryDocument::from_content("<p>hello</p>")),
            EditorOptions::default(),
        );
        editor.focus();
        let root = editor.core().document.root();
        let p = editor.core().document.children(root)[0];
        let text = editor.core().document.children(p)[0];
        let pos = Position::new(text, 2);
        editor.select_range(DocumentSelection::collapsed(pos));
        (editor, pos)
    }

    fn declare_bold(editor: &mut Editor) {
        editor.trigger_event(
            &mut PluginEvent::PendingFormatStateChanged {
                format_state: PendableFormatState {
                    bold: true,
                    ..Default::default()
                },
            },
            false,
        );
    }

    #[test]
    fn test_pending_format_is_held_at_position() {
        let (mut editor, pos) = editor_at_caret();
        declare_bold(&mut editor);

        assert_eq!(
            editor.core().pending_format.state,
            Some(PendableFormatState {
                bold: true,
                ..Default::default()
            })
        );
        assert_eq!(editor.core().pending_format.position, Some(pos));

        // A content change at the same caret keeps the pending state.
        editor.trigger_event(
            &mut PluginEvent::ContentChanged {
                source: ChangeSource::Format,
                data: None,
            },
            true,
        );
        assert!(editor.core().pending_format.state.is_some());
    }

    #[test]
    fn test_navigation_clears_pending_format() {
        let (mut editor, _) = editor_at_caret();
        declare_bold(&mut editor);

        editor.trigger_event(
            &mut PluginEvent::KeyDown(KeyboardEventData::new(Key::ArrowLeft)),
            false,
        );
        assert!(editor.core().pending_format.state.is_none());
    }

    #[test]
    fn test_moved_caret_clears_pending_format_on_change() {
        let (mut editor, pos) = editor_at_caret();
        declare_bold(&mut editor);

        let moved = Position::new(pos.node, 4);
        editor
            .core()
            .document
            .apply_selection(&DocumentSelection::collapsed(moved));
        editor.trigger_event(
            &mut PluginEvent::ContentChanged {
                source: ChangeSource::Format,
                data: None,
            },
            true,
        );
        assert!(editor.core().pending_format.state.is_none());
    }
}
