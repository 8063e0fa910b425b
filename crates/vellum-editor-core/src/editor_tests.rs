//! Editor-level tests over the in-memory document model.
//!
//! These exercise the coordination between the undo coordinator, the API
//! table, the event broadcaster, and shadow edit, end to end.

use std::cell::{Cell, RefCell};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

use smol_str::SmolStr;

use crate::api::{CoreApiOverrides, InsertOption, InsertPosition};
use crate::core::EditorCore;
use crate::dom::{DocumentModel, DocumentSelection, NodeHandle, Position};
use crate::editor::{Editor, EditorOptions};
use crate::events::{
    EditorPlugin, Key, KeyboardEventData, MouseButton, MouseEventData, PluginEvent,
    PluginEventType,
};
use crate::memory::MemoryDocument;
use crate::types::{ChangeSource, GetContentMode};

fn editor_with(content: &str) -> Editor {
    Editor::new(
        Box::new(MemoryDocument::from_content(content)),
        EditorOptions::default(),
    )
}

/// First text node under the container, depth first.
fn first_text(core: &mut EditorCore) -> NodeHandle {
    fn walk(core: &EditorCore, node: NodeHandle) -> Option<NodeHandle> {
        if core.document.is_text(node) {
            return Some(node);
        }
        for child in core.document.children(node) {
            if let Some(found) = walk(core, child) {
                return Some(found);
            }
        }
        None
    }
    let root = core.document.root();
    walk(core, root).expect("no text node in content")
}

fn mouse() -> MouseEventData {
    MouseEventData {
        x: 0,
        y: 0,
        button: MouseButton::Left,
    }
}

/// Plugin that logs which events it sees and can claim one type exclusively.
struct RecordingPlugin {
    tag: &'static str,
    log: Rc<RefCell<Vec<String>>>,
    exclusive_for: Option<PluginEventType>,
}

impl RecordingPlugin {
    fn new(tag: &'static str, log: Rc<RefCell<Vec<String>>>) -> Self {
        Self {
            tag,
            log,
            exclusive_for: None,
        }
    }

    fn exclusive_for(mut self, event_type: PluginEventType) -> Self {
        self.exclusive_for = Some(event_type);
        self
    }
}

impl EditorPlugin for RecordingPlugin {
    fn name(&self) -> &'static str {
        self.tag
    }

    fn initialize(&mut self, _core: &mut EditorCore) {
        self.log.borrow_mut().push(format!("init:{}", self.tag));
    }

    fn dispose(&mut self, _core: &mut EditorCore) {
        self.log.borrow_mut().push(format!("dispose:{}", self.tag));
    }

    fn will_handle_event_exclusively(&mut self, _core: &EditorCore, event: &PluginEvent) -> bool {
        self.exclusive_for == Some(event.event_type())
    }

    fn on_plugin_event(&mut self, _core: &mut EditorCore, event: &mut PluginEvent) {
        self.log
            .borrow_mut()
            .push(format!("{}:{:?}", self.tag, event.event_type()));
        if let PluginEvent::ContextMenu { items, .. } = event {
            items.push(SmolStr::new(self.tag));
        }
    }
}

// === Undo coordinator ===

#[test]
fn test_nested_add_undo_snapshot_takes_two_snapshots() {
    let mut editor = editor_with("<p>start</p>");
    // Push the live content past the ready-time baseline so the before
    // snapshot is not deduplicated away.
    editor.core().document.replace_content("<p>changed</p>");

    let before = editor.core().undo.snapshots.len();
    editor.add_undo_snapshot(
        Some(Box::new(|core, _, _| {
            core.document.replace_content("<p>outer</p>");
            let add = core.api.add_undo_snapshot.clone();
            add(
                core,
                Some(Box::new(|core: &mut EditorCore, _, _| {
                    core.document.replace_content("<p>inner</p>");
                    None
                })),
                Some(ChangeSource::Format),
                false,
                None,
            );
            None
        })),
        Some(ChangeSource::Format),
        false,
    );

    // One "before outer", one "after" - the nested call adds nothing.
    assert_eq!(editor.core().undo.snapshots.len(), before + 2);
    assert!(!editor.core().undo.is_nested);
    assert_eq!(
        editor.core().undo.snapshots.current().unwrap().content,
        "<p>inner</p>"
    );
}

#[test]
fn test_panicking_callback_restores_nesting_flag() {
    let mut editor = editor_with("<p>x</p>");

    let result = catch_unwind(AssertUnwindSafe(|| {
        editor.add_undo_snapshot(
            Some(Box::new(|_core, _, _| panic!("edit went wrong"))),
            Some(ChangeSource::Format),
            false,
        );
    }));

    assert!(result.is_err());
    assert!(!editor.core().undo.is_nested);

    // The coordinator still works afterwards.
    editor.core().document.replace_content("<p>y</p>");
    let before = editor.core().undo.snapshots.len();
    editor.add_undo_snapshot(
        Some(Box::new(|core, _, _| {
            core.document.replace_content("<p>z</p>");
            None
        })),
        Some(ChangeSource::Format),
        false,
    );
    assert_eq!(editor.core().undo.snapshots.len(), before + 2);
}

#[test]
fn test_unsaved_content_is_reachable_by_redo() {
    let mut editor = editor_with("<p>a</p>");
    editor.focus();

    // Simulated typing: the host mutates, the keypress marks new content.
    editor.trigger_event(
        &mut PluginEvent::KeyPress(KeyboardEventData::new(Key::Char('x'))),
        false,
    );
    editor.core().document.replace_content("<p>ax</p>");
    assert!(editor.core().undo.has_new_content);

    editor.undo();
    assert_eq!(editor.get_content(GetContentMode::RawHtmlOnly), "<p>a</p>");

    assert!(editor.can_redo());
    editor.redo();
    assert_eq!(editor.get_content(GetContentMode::RawHtmlOnly), "<p>ax</p>");
}

#[test]
fn test_auto_complete_backspace_round_trip() {
    let mut editor = editor_with("<p>www.example.com</p>");
    editor.focus();
    let text = first_text(editor.core());
    editor.select_range(DocumentSelection::collapsed(Position::new(text, 15)));

    let linked = "<p><a href=\"http://www.example.com\">www.example.com</a></p>";
    editor.add_undo_snapshot(
        Some(Box::new(move |core, _, _| {
            core.document.replace_content(linked);
            // Land the caret where typing would continue.
            let root = core.document.root();
            let p = core.document.children(root)[0];
            let a = core.document.children(p)[0];
            let text = core.document.children(a)[0];
            core.document
                .apply_selection(&DocumentSelection::collapsed(Position::new(text, 15)));
            None
        })),
        Some(ChangeSource::AutoLink),
        true,
    );
    assert_eq!(editor.get_content(GetContentMode::RawHtmlOnly), linked);
    assert!(editor.core().undo.auto_complete_position.is_some());

    // Backspace at the marked position undoes the auto-link instead of
    // deleting a character.
    let mut backspace = PluginEvent::KeyDown(KeyboardEventData::new(Key::Backspace));
    editor.trigger_event(&mut backspace, false);

    match &backspace {
        PluginEvent::KeyDown(key) => assert!(key.default_prevented),
        _ => unreachable!(),
    }
    assert_eq!(
        editor.get_content(GetContentMode::RawHtmlOnly),
        "<p>www.example.com</p>"
    );
    assert!(editor.core().undo.auto_complete_position.is_none());

    // A second Backspace gets no special handling.
    let mut again = PluginEvent::KeyDown(KeyboardEventData::new(Key::Backspace));
    editor.trigger_event(&mut again, false);
    match &again {
        PluginEvent::KeyDown(key) => assert!(!key.default_prevented),
        _ => unreachable!(),
    }
    assert_eq!(
        editor.get_content(GetContentMode::RawHtmlOnly),
        "<p>www.example.com</p>"
    );
}

#[test]
fn test_new_input_clears_redo() {
    let mut editor = editor_with("<p>a</p>");
    editor.focus();

    editor.core().document.replace_content("<p>ab</p>");
    editor.add_undo_snapshot(None, None, false);
    editor.undo();
    assert!(editor.can_redo());

    editor.trigger_event(
        &mut PluginEvent::KeyPress(KeyboardEventData::new(Key::Char('c'))),
        false,
    );
    assert!(!editor.can_redo());
}

// === Event broadcaster ===

#[test]
fn test_exclusive_claim_short_circuits() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut editor = Editor::new(
        Box::new(MemoryDocument::from_content("<p>x</p>")),
        EditorOptions {
            plugins: vec![
                Box::new(RecordingPlugin::new("first", log.clone())),
                Box::new(
                    RecordingPlugin::new("second", log.clone())
                        .exclusive_for(PluginEventType::MouseDown),
                ),
            ],
            ..Default::default()
        },
    );
    log.borrow_mut().clear();

    editor.trigger_event(&mut PluginEvent::MouseDown(mouse()), false);
    assert_eq!(*log.borrow(), vec!["second:MouseDown"]);

    // Broadcast bypasses the claim and fans out in registration order.
    log.borrow_mut().clear();
    editor.trigger_event(&mut PluginEvent::MouseDown(mouse()), true);
    assert_eq!(*log.borrow(), vec!["first:MouseDown", "second:MouseDown"]);
}

#[test]
fn test_context_menu_items_aggregate_in_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut editor = Editor::new(
        Box::new(MemoryDocument::from_content("<p>x</p>")),
        EditorOptions {
            plugins: vec![
                Box::new(RecordingPlugin::new("cut", log.clone())),
                Box::new(RecordingPlugin::new("copy", log.clone())),
            ],
            ..Default::default()
        },
    );

    let mut event = PluginEvent::ContextMenu {
        mouse: mouse(),
        items: Vec::new(),
    };
    editor.trigger_event(&mut event, false);

    match event {
        PluginEvent::ContextMenu { items, .. } => {
            assert_eq!(items, vec![SmolStr::new("cut"), SmolStr::new("copy")]);
        }
        _ => unreachable!(),
    }
}

#[test]
fn test_dispose_runs_in_reverse_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut editor = Editor::new(
        Box::new(MemoryDocument::from_content("<p>x</p>")),
        EditorOptions {
            plugins: vec![
                Box::new(RecordingPlugin::new("a", log.clone())),
                Box::new(RecordingPlugin::new("b", log.clone())),
            ],
            ..Default::default()
        },
    );

    assert!(log.borrow().iter().any(|l| l == "init:a"));
    let init_a = log.borrow().iter().position(|l| l == "init:a").unwrap();
    let init_b = log.borrow().iter().position(|l| l == "init:b").unwrap();
    assert!(init_a < init_b);

    log.borrow_mut().clear();
    editor.dispose().unwrap();

    let entries = log.borrow();
    let before_dispose_a = entries.iter().position(|l| l == "a:BeforeDispose").unwrap();
    let dispose_b = entries.iter().position(|l| l == "dispose:b").unwrap();
    let dispose_a = entries.iter().position(|l| l == "dispose:a").unwrap();
    assert!(before_dispose_a < dispose_b);
    assert!(dispose_b < dispose_a);

    drop(entries);
    assert!(editor.is_disposed());
    assert!(editor.dispose().is_err());
}

#[test]
fn test_dom_event_routing() {
    let mut editor = editor_with("<p>x</p>");

    let mut key = PluginEvent::KeyDown(KeyboardEventData::new(Key::Char('a')));
    assert!(editor.dispatch_dom_event("keydown", &mut key));

    let mut unknown = PluginEvent::KeyDown(KeyboardEventData::new(Key::Char('a')));
    assert!(!editor.dispatch_dom_event("dragstart", &mut unknown));
}

// === Shadow edit ===

#[test]
fn test_shadow_edit_discard_restores_exactly() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut editor = Editor::new(
        Box::new(MemoryDocument::from_content("<p>hello</p>")),
        EditorOptions {
            plugins: vec![Box::new(RecordingPlugin::new("spy", log.clone()))],
            ..Default::default()
        },
    );
    editor.focus();
    let original = editor.get_content(GetContentMode::RawHtmlOnly);
    let snapshots_before = editor.core().undo.snapshots.len();

    editor.start_shadow_edit();
    assert!(editor.in_shadow_edit());
    editor.core().document.replace_content("<p>preview</p>");

    // Readers still see the pre-shadow content.
    assert_eq!(editor.get_content(GetContentMode::RawHtmlOnly), original);

    // Plugin dispatch is suppressed while shadow editing.
    log.borrow_mut().clear();
    editor.trigger_event(
        &mut PluginEvent::KeyPress(KeyboardEventData::new(Key::Char('q'))),
        false,
    );
    assert!(log.borrow().is_empty());

    editor.leave_shadow_edit();
    assert!(!editor.in_shadow_edit());
    assert_eq!(editor.get_content(GetContentMode::RawHtmlOnly), original);
    assert_eq!(editor.core().undo.snapshots.len(), snapshots_before);
    assert!(log.borrow().iter().any(|l| l == "spy:LeavingShadowEdit"));
}

#[test]
fn test_shadow_edit_reset_reclones_without_events() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut editor = Editor::new(
        Box::new(MemoryDocument::from_content("<p>base</p>")),
        EditorOptions {
            plugins: vec![Box::new(RecordingPlugin::new("spy", log.clone()))],
            ..Default::default()
        },
    );

    editor.start_shadow_edit();
    editor.core().document.replace_content("<p>scribble</p>");

    log.borrow_mut().clear();
    editor.start_shadow_edit();
    assert!(log.borrow().is_empty());

    // The working copy was reset from the retained fragment.
    let live = editor.core().document.serialize();
    assert_eq!(live, "<p>base</p>");
}

#[test]
fn test_shadow_edit_commit_is_undoable() {
    let mut editor = editor_with("<p>before</p>");
    editor.focus();

    editor.start_shadow_edit();
    editor.core().document.replace_content("<p>after</p>");
    editor.commit_shadow_edit();

    assert!(!editor.in_shadow_edit());
    assert_eq!(editor.get_content(GetContentMode::RawHtmlOnly), "<p>after</p>");

    editor.undo();
    assert_eq!(editor.get_content(GetContentMode::RawHtmlOnly), "<p>before</p>");
}

#[test]
fn test_shadow_edit_restores_selection() {
    let mut editor = editor_with("<p>hello</p>");
    editor.focus();
    let text = first_text(editor.core());
    editor.select_range(DocumentSelection::Range {
        start: Position::new(text, 1),
        end: Position::new(text, 4),
    });

    editor.start_shadow_edit();
    editor.core().document.replace_content("<p>scratch</p>");
    editor.leave_shadow_edit();

    let selection = editor.get_selection(false).expect("selection restored");
    let DocumentSelection::Range { start, end } = selection else {
        panic!("expected range selection");
    };
    let doc = &editor.core().document;
    assert_eq!(doc.path_of(start).unwrap(), vec![0, 0, 1].into());
    assert_eq!(doc.path_of(end).unwrap(), vec![0, 0, 4].into());
}

// === Core API table ===

#[test]
fn test_focus_override_affects_insert_node() {
    let focus_calls = Rc::new(Cell::new(0));
    let counter = focus_calls.clone();
    let mut overrides = CoreApiOverrides::default();
    overrides.focus = Some(Rc::new(move |core: &mut EditorCore| {
        counter.set(counter.get() + 1);
        core.document.focus();
    }));

    let mut editor = Editor::new(
        Box::new(MemoryDocument::from_content("<p>one</p>")),
        EditorOptions {
            api_overrides: overrides,
            ..Default::default()
        },
    );

    let img = editor.core().document.create_element("img");
    let inserted = editor.insert_node(
        img,
        Some(InsertOption {
            position: InsertPosition::Begin,
            ..Default::default()
        }),
    );

    // insert_node reached focus through the table, so the override saw it.
    assert!(inserted);
    assert_eq!(focus_calls.get(), 1);
    assert!(editor.has_focus());
}

#[test]
fn test_insert_node_positions() {
    let mut editor = editor_with("<p>one</p><p>two</p>");

    let option = |position: InsertPosition| InsertOption {
        position,
        update_cursor: false,
        replace_selection: false,
        insert_on_new_line: false,
        insert_to_region_root: false,
    };

    let img = editor.core().document.create_element("img");
    assert!(editor.insert_node(img, Some(option(InsertPosition::Begin))));
    assert_eq!(
        editor.get_content(GetContentMode::RawHtmlOnly),
        "<p><img />one</p><p>two</p>"
    );

    let img = editor.core().document.create_element("img");
    assert!(editor.insert_node(img, Some(option(InsertPosition::End))));
    assert_eq!(
        editor.get_content(GetContentMode::RawHtmlOnly),
        "<p><img />one</p><p>two<img /></p>"
    );

    let br = editor.core().document.create_element("br");
    assert!(editor.insert_node(br, Some(option(InsertPosition::DomEnd))));
    assert_eq!(
        editor.get_content(GetContentMode::RawHtmlOnly),
        "<p><img />one</p><p>two<img /></p><br />"
    );

    // Outside leaves the editable content untouched.
    let aside = editor.core().document.create_element("aside");
    assert!(editor.insert_node(aside, Some(option(InsertPosition::Outside))));
    assert_eq!(
        editor.get_content(GetContentMode::RawHtmlOnly),
        "<p><img />one</p><p>two<img /></p><br />"
    );
    let root = editor.core().document.root();
    assert_eq!(
        editor.core().document.parent(aside),
        editor.core().document.parent(root)
    );
}

#[test]
fn test_insert_on_new_line_wraps_inline_nodes() {
    let mut editor = editor_with("<p>one</p>");

    let span = editor.core().document.create_element("span");
    assert!(editor.insert_node(
        span,
        Some(InsertOption {
            position: InsertPosition::Begin,
            update_cursor: false,
            replace_selection: false,
            insert_on_new_line: true,
            insert_to_region_root: false,
        })
    ));
    assert_eq!(
        editor.get_content(GetContentMode::RawHtmlOnly),
        "<div><span></span></div><p>one</p>"
    );
}

#[test]
fn test_insert_replaces_selection_and_updates_cursor() {
    let mut editor = editor_with("<p>hello world</p>");
    editor.focus();
    let text = first_text(editor.core());
    editor.select_range(DocumentSelection::Range {
        start: Position::new(text, 5),
        end: Position::new(text, 11),
    });

    let img = editor.core().document.create_element("img");
    assert!(editor.insert_node(img, None));
    assert_eq!(
        editor.get_content(GetContentMode::RawHtmlOnly),
        "<p>hello<img /></p>"
    );

    // Caret landed right after the inserted node.
    let selection = editor.get_selection(false).unwrap();
    assert!(selection.is_collapsed());
    let start = selection.start().unwrap();
    assert_eq!(editor.core().document.position_after(img), Some(start));
}

#[test]
fn test_insert_to_region_root_splits_up_to_cell() {
    let mut editor =
        editor_with("<table><tr><td><div><b>ab</b></div></td></tr></table>");
    editor.focus();
    let text = first_text(editor.core());
    editor.select_range(DocumentSelection::collapsed(Position::new(text, 1)));

    let img = editor.core().document.create_element("img");
    assert!(editor.insert_node(
        img,
        Some(InsertOption {
            position: InsertPosition::SelectionStart,
            update_cursor: false,
            replace_selection: false,
            insert_on_new_line: true,
            insert_to_region_root: true,
        })
    ));
    assert_eq!(
        editor.get_content(GetContentMode::RawHtmlOnly),
        "<table><tr><td><div><b>a</b></div><div><img /></div><div><b>b</b></div></td></tr></table>"
    );
}

#[test]
fn test_insert_without_selection_fails_quietly() {
    let mut editor = editor_with("<p>one</p>");
    let img = editor.core().document.create_element("img");
    // No selection anywhere; default options degrade to a no-op.
    assert!(!editor.insert_node(img, None));
    assert_eq!(editor.get_content(GetContentMode::RawHtmlOnly), "<p>one</p>");
}

// === Content and metadata ===

#[test]
fn test_selection_metadata_round_trip_through_content() {
    let mut editor = editor_with("<p>hello</p>");
    editor.focus();
    let text = first_text(editor.core());
    editor.select_range(DocumentSelection::Range {
        start: Position::new(text, 1),
        end: Position::new(text, 3),
    });

    let with_selection = editor.get_content(GetContentMode::RawHtmlWithSelection);
    assert!(with_selection.contains("<!--"));

    editor.set_content("<p>something else</p>", false);
    editor.set_content(&with_selection, false);

    let selection = editor.get_selection(false).expect("selection restored");
    let DocumentSelection::Range { start, end } = selection else {
        panic!("expected range selection");
    };
    let doc = &editor.core().document;
    assert_eq!(doc.path_of(start).unwrap(), vec![0, 0, 1].into());
    assert_eq!(doc.path_of(end).unwrap(), vec![0, 0, 3].into());
}

#[test]
fn test_selection_cache_serves_unfocused_reads() {
    let mut editor = editor_with("<p>hello</p>");
    editor.focus();
    let text = first_text(editor.core());
    let selection = DocumentSelection::Range {
        start: Position::new(text, 0),
        end: Position::new(text, 5),
    };
    editor.select_range(selection);

    editor.core().document.blur();
    assert_eq!(editor.get_selection(true), Some(selection));
}

#[test]
fn test_table_and_image_selection() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut editor = Editor::new(
        Box::new(MemoryDocument::from_content(
            "<table id=\"t1\"><tr><td>x</td></tr></table><img id=\"i1\" />",
        )),
        EditorOptions {
            plugins: vec![Box::new(RecordingPlugin::new("spy", log.clone()))],
            ..Default::default()
        },
    );

    assert!(editor.select_table(
        "t1",
        crate::types::CellCoord::new(0, 0),
        crate::types::CellCoord::new(0, 0)
    ));
    assert!(editor.select_image("i1"));
    assert!(!editor.select_image("missing"));

    let selection_events = log
        .borrow()
        .iter()
        .filter(|l| l.ends_with("SelectionChanged"))
        .count();
    assert_eq!(selection_events, 2);
}

// === Dark mode ===

#[test]
fn test_dark_mode_round_trip() {
    let mut editor = editor_with("<p color=\"#336699\">x</p>");
    let original = editor.get_content(GetContentMode::RawHtmlOnly);

    editor.set_dark_mode(true);
    let dark = editor.get_content(GetContentMode::RawHtmlOnly);
    assert_ne!(dark, original);

    // CleanHtml maps colors back to their authored light values.
    assert_eq!(editor.get_content(GetContentMode::CleanHtml), original);

    editor.set_dark_mode(false);
    assert_eq!(editor.get_content(GetContentMode::RawHtmlOnly), original);
}

#[test]
fn test_restore_reconciles_dark_mode() {
    let mut editor = editor_with("<p color=\"#336699\">x</p>");
    editor.focus();
    let text = first_text(editor.core());
    editor.select_range(DocumentSelection::collapsed(Position::new(text, 0)));

    // Snapshot captured in light mode.
    editor.add_undo_snapshot(None, None, false);

    editor.set_dark_mode(true);
    let dark = editor.get_content(GetContentMode::RawHtmlOnly);

    // Undo lands on a light-mode snapshot while the editor is dark; the
    // restore forces a transform so the content matches the current mode.
    editor.undo();
    assert!(editor.is_dark_mode());
    assert_eq!(editor.get_content(GetContentMode::RawHtmlOnly), dark);
}

// === Entities ===

#[test]
fn test_entity_hydration_assigns_ids_and_announces() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut editor = Editor::new(
        Box::new(MemoryDocument::from_content(
            "<span data-entity-type=\"widget\">w</span>",
        )),
        EditorOptions {
            plugins: vec![Box::new(RecordingPlugin::new("spy", log.clone()))],
            ..Default::default()
        },
    );

    assert!(editor.core().entity.known.contains_key("widget_1"));
    assert!(editor
        .core()
        .document
        .find_by_id("widget_1")
        .is_some());

    log.borrow_mut().clear();
    editor.flush_deferred();
    assert!(log.borrow().iter().any(|l| l == "spy:EntityOperation"));
}

// === Paste ===

#[test]
fn test_paste_fragment_is_announced_before_insertion() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut editor = Editor::new(
        Box::new(MemoryDocument::from_content("<p>start</p>")),
        EditorOptions {
            plugins: vec![Box::new(RecordingPlugin::new("spy", log.clone()))],
            ..Default::default()
        },
    );

    let create = editor.core().api.create_paste_fragment.clone();
    let fragment = create(
        editor.core(),
        crate::events::ClipboardData {
            html: Some("<b>pasted</b>".to_string()),
            text: None,
        },
    )
    .expect("fragment built");

    assert!(log.borrow().iter().any(|l| l == "spy:BeforePaste"));
    assert_eq!(
        editor.core().document.serialize_node(fragment),
        "<b>pasted</b>"
    );

    // Plain text falls back to escaped markup with explicit line breaks.
    let create = editor.core().api.create_paste_fragment.clone();
    let fragment = create(
        editor.core(),
        crate::events::ClipboardData {
            html: None,
            text: Some("a < b\nnext".to_string()),
        },
    )
    .expect("fragment built");
    assert_eq!(
        editor.core().document.serialize_node(fragment),
        "a &lt; b<br />next"
    );
}

// === Deferred work ===

#[test]
fn test_android_backspace_defers_selection_refresh() {
    let mut editor = Editor::new(
        Box::new(MemoryDocument::from_content("<p>hello</p>")),
        EditorOptions {
            user_agent: "Mozilla/5.0 (Linux; Android 14) AppleWebKit/537.36 Chrome/120.0".into(),
            ..Default::default()
        },
    );
    editor.focus();
    let text = first_text(editor.core());
    editor.select_range(DocumentSelection::collapsed(Position::new(text, 3)));

    editor.trigger_event(
        &mut PluginEvent::KeyDown(KeyboardEventData::new(Key::Backspace)),
        false,
    );

    // Host applies the deletion and moves the caret before the next turn.
    editor
        .core()
        .document
        .apply_selection(&DocumentSelection::collapsed(Position::new(text, 2)));
    editor.flush_deferred();

    editor.core().document.blur();
    assert_eq!(
        editor.get_selection(true),
        Some(DocumentSelection::collapsed(Position::new(text, 2)))
    );
}
