//! The core API table: overridable primitive operations.
//!
//! Every mutation of editor state flows through one of the primitives in
//! [`CoreApiTable`]. The table is built once per editor; callers (features,
//! plugins, and the primitives themselves) always invoke entries through
//! `core.api`, never the standard implementations directly. Overriding one
//! entry at construction therefore transparently affects everything composed
//! on top of it (e.g. `insert_node` reaches `focus` and `transform_color`
//! only through the table).
//!
//! Entries are `Rc<dyn Fn>` so tests and embedders can install capturing
//! closures. Call sites clone the entry out of the table first:
//!
//! ```ignore
//! let get_content = core.api.get_content.clone();
//! let html = get_content(core, GetContentMode::CleanHtml);
//! ```

pub mod color;
pub mod content;
pub mod events;
pub mod insert_node;
pub mod selection;
pub mod shadow;
pub mod undo;

use std::rc::Rc;

use smol_str::SmolStr;

use crate::color::ColorTransformDirection;
use crate::core::EditorCore;
use crate::dom::{DocumentSelection, NodeHandle, Position};
use crate::events::{ClipboardData, PluginEvent};
use crate::plugins::dom_event::{DomEventBinding, DomEventHandle};
use crate::types::{CellCoord, ChangeSource, ContentMetadata, GetContentMode};

pub use insert_node::{InsertOption, InsertPosition};

/// Edit callback run inside an undo snapshot bracket. Receives the collapsed
/// selection endpoints at entry (when a range selection exists) and returns
/// optional payload data for the resulting content-changed event.
pub type EditCallback =
    Box<dyn FnOnce(&mut EditorCore, Option<Position>, Option<Position>) -> Option<SmolStr>>;

/// Mutation callback wrapped by a color-transform pass.
pub type ColorCallback = Box<dyn FnOnce(&mut EditorCore)>;

/// The fixed set of primitive operations, one `Rc<dyn Fn>` per entry.
#[derive(Clone)]
pub struct CoreApiTable {
    /// Serialize editor content in the requested mode.
    pub get_content: Rc<dyn Fn(&mut EditorCore, GetContentMode) -> String>,
    /// Replace editor content. `(content, trigger_event, metadata)`; an
    /// embedded metadata comment is honored when no explicit metadata is
    /// given.
    pub set_content: Rc<dyn Fn(&mut EditorCore, &str, bool, Option<ContentMetadata>)>,
    /// Read the selection. `(try_cache)`: when true and the editor is not
    /// focused, the cached selection is returned instead of a live read.
    pub get_selection: Rc<dyn Fn(&mut EditorCore, bool) -> Option<DocumentSelection>>,
    /// Apply a selection. `(selection, skip_same)`.
    pub select_range: Rc<dyn Fn(&mut EditorCore, DocumentSelection, bool) -> bool>,
    /// Select a rectangular run of table cells by table id.
    pub select_table: Rc<dyn Fn(&mut EditorCore, &str, CellCoord, CellCoord) -> bool>,
    /// Select an image by id.
    pub select_image: Rc<dyn Fn(&mut EditorCore, &str) -> bool>,
    /// Insert a detached node. `None` options fall back to the default
    /// (selection start, replace selection, update cursor).
    pub insert_node: Rc<dyn Fn(&mut EditorCore, NodeHandle, Option<InsertOption>) -> bool>,
    /// Move focus into the container, restoring the cached selection if the
    /// live one was lost.
    pub focus: Rc<dyn Fn(&mut EditorCore)>,
    pub has_focus: Rc<dyn Fn(&EditorCore) -> bool>,
    /// Bracket an edit with before/after snapshots.
    /// `(callback, change_source, can_undo_by_backspace, additional_data)`.
    pub add_undo_snapshot: Rc<
        dyn Fn(&mut EditorCore, Option<EditCallback>, Option<ChangeSource>, bool, Option<SmolStr>),
    >,
    /// Move the snapshot cursor by `step` and restore the snapshot it lands
    /// on. Out-of-bounds steps are a no-op.
    pub restore_undo_snapshot: Rc<dyn Fn(&mut EditorCore, isize)>,
    /// Dispatch an event to plugins. `(event, broadcast)`; broadcast
    /// dispatches bypass exclusive handling.
    pub trigger_event: Rc<dyn Fn(&mut EditorCore, &mut PluginEvent, bool)>,
    /// Register host-event bindings; returns a handle for detaching.
    pub attach_dom_event: Rc<dyn Fn(&mut EditorCore, Vec<DomEventBinding>) -> DomEventHandle>,
    pub detach_dom_event: Rc<dyn Fn(&mut EditorCore, DomEventHandle)>,
    /// Run an optional mutation and transform colors over a subtree.
    /// `(root, include_self, callback, direction, force)`.
    pub transform_color: Rc<
        dyn Fn(
            &mut EditorCore,
            Option<NodeHandle>,
            bool,
            Option<ColorCallback>,
            ColorTransformDirection,
            bool,
        ),
    >,
    /// Build an insertable fragment from clipboard data.
    pub create_paste_fragment: Rc<dyn Fn(&mut EditorCore, ClipboardData) -> Option<NodeHandle>>,
    /// Enter (`true`) or leave (`false`) shadow-edit mode.
    pub switch_shadow_edit: Rc<dyn Fn(&mut EditorCore, bool)>,
}

impl CoreApiTable {
    /// The standard implementation for every entry.
    pub fn standard() -> Self {
        Self {
            get_content: Rc::new(content::get_content),
            set_content: Rc::new(content::set_content),
            get_selection: Rc::new(selection::get_selection),
            select_range: Rc::new(selection::select_range),
            select_table: Rc::new(selection::select_table),
            select_image: Rc::new(selection::select_image),
            insert_node: Rc::new(insert_node::insert_node),
            focus: Rc::new(selection::focus),
            has_focus: Rc::new(selection::has_focus),
            add_undo_snapshot: Rc::new(undo::add_undo_snapshot),
            restore_undo_snapshot: Rc::new(undo::restore_undo_snapshot),
            trigger_event: Rc::new(events::trigger_event),
            attach_dom_event: Rc::new(events::attach_dom_event),
            detach_dom_event: Rc::new(events::detach_dom_event),
            transform_color: Rc::new(color::transform_color),
            create_paste_fragment: Rc::new(content::create_paste_fragment),
            switch_shadow_edit: Rc::new(shadow::switch_shadow_edit),
        }
    }

    /// Standard table with individual entries replaced by overrides.
    pub fn with_overrides(overrides: CoreApiOverrides) -> Self {
        let mut table = Self::standard();
        macro_rules! apply {
            ($($field:ident),* $(,)?) => {
                $(if let Some(f) = overrides.$field {
                    table.$field = f;
                })*
            };
        }
        apply!(
            get_content,
            set_content,
            get_selection,
            select_range,
            select_table,
            select_image,
            insert_node,
            focus,
            has_focus,
            add_undo_snapshot,
            restore_undo_snapshot,
            trigger_event,
            attach_dom_event,
            detach_dom_event,
            transform_color,
            create_paste_fragment,
            switch_shadow_edit,
        );
        table
    }
}

impl Default for CoreApiTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Per-entry overrides supplied at editor construction.
#[derive(Clone, Default)]
pub struct CoreApiOverrides {
    pub get_content: Option<Rc<dyn Fn(&mut EditorCore, GetContentMode) -> String>>,
    pub set_content: Option<Rc<dyn Fn(&mut EditorCore, &str, bool, Option<ContentMetadata>)>>,
    pub get_selection: Option<Rc<dyn Fn(&mut EditorCore, bool) -> Option<DocumentSelection>>>,
    pub select_range: Option<Rc<dyn Fn(&mut EditorCore, DocumentSelection, bool) -> bool>>,
    pub select_table: Option<Rc<dyn Fn(&mut EditorCore, &str, CellCoord, CellCoord) -> bool>>,
    pub select_image: Option<Rc<dyn Fn(&mut EditorCore, &str) -> bool>>,
    pub insert_node: Option<Rc<dyn Fn(&mut EditorCore, NodeHandle, Option<InsertOption>) -> bool>>,
    pub focus: Option<Rc<dyn Fn(&mut EditorCore)>>,
    pub has_focus: Option<Rc<dyn Fn(&EditorCore) -> bool>>,
    pub add_undo_snapshot: Option<
        Rc<dyn Fn(&mut EditorCore, Option<EditCallback>, Option<ChangeSource>, bool, Option<SmolStr>)>,
    >,
    pub restore_undo_snapshot: Option<Rc<dyn Fn(&mut EditorCore, isize)>>,
    pub trigger_event: Option<Rc<dyn Fn(&mut EditorCore, &mut PluginEvent, bool)>>,
    pub attach_dom_event:
        Option<Rc<dyn Fn(&mut EditorCore, Vec<DomEventBinding>) -> DomEventHandle>>,
    pub detach_dom_event: Option<Rc<dyn Fn(&mut EditorCore, DomEventHandle)>>,
    pub transform_color: Option<
        Rc<
            dyn Fn(
                &mut EditorCore,
                Option<NodeHandle>,
                bool,
                Option<ColorCallback>,
                ColorTransformDirection,
                bool,
            ),
        >,
    >,
    pub create_paste_fragment:
        Option<Rc<dyn Fn(&mut EditorCore, ClipboardData) -> Option<NodeHandle>>>,
    pub switch_shadow_edit: Option<Rc<dyn Fn(&mut EditorCore, bool)>>,
}
