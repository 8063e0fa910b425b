//! The editor facade.
//!
//! [`Editor`] owns the core record and exposes the public editing surface.
//! Every method routes through the core API table, so construction-time
//! overrides apply to facade calls exactly as they do to internal
//! composition.

use std::cell::RefCell;
use std::rc::Rc;

use crate::api::{CoreApiOverrides, CoreApiTable, EditCallback, InsertOption};
use crate::capabilities::BrowserCapabilities;
use crate::color::{ColorTransformDirection, CoreDarkColorHandler, ParsedColor};
use crate::core::EditorCore;
use crate::dom::{DocumentModel, DocumentSelection, NodeHandle};
use crate::error::EditorError;
use crate::events::{EditorPlugin, PluginEvent};
use crate::plugins::dom_event::DomEventPlugin;
use crate::plugins::entity::EntityPlugin;
use crate::plugins::lifecycle::LifecyclePlugin;
use crate::plugins::pending_format::PendingFormatPlugin;
use crate::plugins::undo::UndoPlugin;
use crate::snapshots::SnapshotStore;
use crate::types::{CellCoord, ChangeSource, GetContentMode};

/// Construction options.
pub struct EditorOptions {
    /// Content to load before plugins initialize. May carry an embedded
    /// metadata comment.
    pub initial_content: Option<String>,
    /// Feature plugins, dispatched after the undo and dom-event core plugins
    /// and before the trailing core plugins.
    pub plugins: Vec<Box<dyn EditorPlugin>>,
    /// Per-primitive API overrides.
    pub api_overrides: CoreApiOverrides,
    /// Byte budget for retained undo snapshots.
    pub undo_snapshot_budget: Option<usize>,
    /// Start in dark mode.
    pub in_dark_mode: bool,
    /// Host user-agent string; empty for headless hosts.
    pub user_agent: String,
    /// Custom light-to-dark color mapping.
    pub dark_color_mapper: Option<fn(ParsedColor) -> ParsedColor>,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            initial_content: None,
            plugins: Vec::new(),
            api_overrides: CoreApiOverrides::default(),
            undo_snapshot_budget: None,
            in_dark_mode: false,
            user_agent: String::new(),
            dark_color_mapper: None,
        }
    }
}

/// A rich-content editor over a [`DocumentModel`].
pub struct Editor {
    core: EditorCore,
}

impl Editor {
    pub fn new(document: Box<dyn DocumentModel>, options: EditorOptions) -> Self {
        let capabilities = BrowserCapabilities::detect(&options.user_agent);
        let api = CoreApiTable::with_overrides(options.api_overrides);
        let mut core = EditorCore::new(document, api, capabilities);

        if let Some(budget) = options.undo_snapshot_budget {
            core.undo.snapshots = SnapshotStore::new(budget);
        }
        core.lifecycle.is_dark_mode = options.in_dark_mode;
        if let Some(mapper) = options.dark_color_mapper {
            core.lifecycle.dark_color_handler = Box::new(CoreDarkColorHandler::new(mapper));
        }

        if let Some(content) = &options.initial_content {
            let set_content = core.api.set_content.clone();
            set_content(&mut core, content, false, None);
        }

        let mut plugins: Vec<Rc<RefCell<dyn EditorPlugin>>> = vec![
            Rc::new(RefCell::new(UndoPlugin::new())),
            Rc::new(RefCell::new(DomEventPlugin::new())),
        ];
        plugins.extend(
            options
                .plugins
                .into_iter()
                .map(|p| Rc::new(RefCell::new(p)) as Rc<RefCell<dyn EditorPlugin>>),
        );
        plugins.push(Rc::new(RefCell::new(PendingFormatPlugin::new())));
        plugins.push(Rc::new(RefCell::new(EntityPlugin::new())));
        plugins.push(Rc::new(RefCell::new(LifecyclePlugin::new())));
        core.plugins = plugins;

        for plugin in core.plugins.clone() {
            plugin.borrow_mut().initialize(&mut core);
        }

        let mut editor = Self { core };
        editor.trigger_event(&mut PluginEvent::EditorReady, true);
        editor
    }

    /// Tear the editor down: notify plugins, dispose them in reverse
    /// initialize order, and clear all sub-states.
    pub fn dispose(&mut self) -> Result<(), EditorError> {
        if self.core.disposed {
            return Err(EditorError::Disposed);
        }
        let trigger = self.core.api.trigger_event.clone();
        let mut event = PluginEvent::BeforeDispose;
        trigger(&mut self.core, &mut event, true);

        for plugin in self.core.plugins.clone().into_iter().rev() {
            plugin.borrow_mut().dispose(&mut self.core);
        }
        self.core.plugins.clear();
        self.core.undo = Default::default();
        self.core.pending_format = Default::default();
        self.core.dom_event.clear();
        self.core.entity.known.clear();
        self.core.disposed = true;
        Ok(())
    }

    pub fn is_disposed(&self) -> bool {
        self.core.disposed
    }

    /// Direct core access, for advanced hosts and tests.
    pub fn core(&mut self) -> &mut EditorCore {
        &mut self.core
    }

    // === Content ===

    pub fn get_content(&mut self, mode: GetContentMode) -> String {
        let get_content = self.core.api.get_content.clone();
        get_content(&mut self.core, mode)
    }

    pub fn set_content(&mut self, content: &str, trigger_content_changed: bool) {
        if self.warn_if_disposed("set_content") {
            return;
        }
        let set_content = self.core.api.set_content.clone();
        set_content(&mut self.core, content, trigger_content_changed, None);
    }

    pub fn insert_node(&mut self, node: NodeHandle, option: Option<InsertOption>) -> bool {
        if self.warn_if_disposed("insert_node") {
            return false;
        }
        let insert_node = self.core.api.insert_node.clone();
        insert_node(&mut self.core, node, option)
    }

    // === Selection and focus ===

    pub fn get_selection(&mut self, try_cache: bool) -> Option<DocumentSelection> {
        let get_selection = self.core.api.get_selection.clone();
        get_selection(&mut self.core, try_cache)
    }

    pub fn select_range(&mut self, selection: DocumentSelection) -> bool {
        let select_range = self.core.api.select_range.clone();
        select_range(&mut self.core, selection, false)
    }

    pub fn select_table(&mut self, table_id: &str, first_cell: CellCoord, last_cell: CellCoord) -> bool {
        let select_table = self.core.api.select_table.clone();
        select_table(&mut self.core, table_id, first_cell, last_cell)
    }

    pub fn select_image(&mut self, image_id: &str) -> bool {
        let select_image = self.core.api.select_image.clone();
        select_image(&mut self.core, image_id)
    }

    pub fn focus(&mut self) {
        let focus = self.core.api.focus.clone();
        focus(&mut self.core);
    }

    pub fn has_focus(&self) -> bool {
        (self.core.api.has_focus)(&self.core)
    }

    // === Undo ===

    /// Bracket an edit with undo snapshots. See
    /// [`crate::api::undo::add_undo_snapshot`].
    pub fn add_undo_snapshot(
        &mut self,
        callback: Option<EditCallback>,
        change_source: Option<ChangeSource>,
        can_undo_by_backspace: bool,
    ) {
        if self.warn_if_disposed("add_undo_snapshot") {
            return;
        }
        let add_undo_snapshot = self.core.api.add_undo_snapshot.clone();
        add_undo_snapshot(
            &mut self.core,
            callback,
            change_source,
            can_undo_by_backspace,
            None,
        );
    }

    pub fn undo(&mut self) {
        let restore = self.core.api.restore_undo_snapshot.clone();
        restore(&mut self.core, -1);
    }

    pub fn redo(&mut self) {
        let restore = self.core.api.restore_undo_snapshot.clone();
        restore(&mut self.core, 1);
    }

    pub fn can_undo(&self) -> bool {
        self.core.undo.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.core.undo.can_redo()
    }

    // === Dark mode ===

    pub fn is_dark_mode(&self) -> bool {
        self.core.lifecycle.is_dark_mode
    }

    /// Switch modes, transforming all content colors and announcing the
    /// change.
    pub fn set_dark_mode(&mut self, dark: bool) {
        if dark == self.core.lifecycle.is_dark_mode {
            return;
        }
        self.core.lifecycle.is_dark_mode = dark;
        let direction = if dark {
            ColorTransformDirection::LightToDark
        } else {
            ColorTransformDirection::DarkToLight
        };
        let transform = self.core.api.transform_color.clone();
        transform(&mut self.core, None, false, None, direction, true);

        let source = if dark {
            ChangeSource::SwitchToDarkMode
        } else {
            ChangeSource::SwitchToLightMode
        };
        self.trigger_event(
            &mut PluginEvent::ContentChanged { source, data: None },
            true,
        );
    }

    // === Shadow edit ===

    pub fn in_shadow_edit(&self) -> bool {
        self.core.in_shadow_edit()
    }

    /// Enter shadow edit, or reset the working copy when already in it.
    pub fn start_shadow_edit(&mut self) {
        let switch = self.core.api.switch_shadow_edit.clone();
        switch(&mut self.core, true);
    }

    /// Leave shadow edit, discarding speculative mutations.
    pub fn leave_shadow_edit(&mut self) {
        let switch = self.core.api.switch_shadow_edit.clone();
        switch(&mut self.core, false);
    }

    /// Leave shadow edit keeping the speculative mutations, merged back as a
    /// normal undoable change.
    pub fn commit_shadow_edit(&mut self) {
        if !self.in_shadow_edit() {
            return;
        }
        let edited = self.core.document.serialize();
        self.leave_shadow_edit();

        let add_undo_snapshot = self.core.api.add_undo_snapshot.clone();
        add_undo_snapshot(
            &mut self.core,
            Some(Box::new(move |core: &mut EditorCore, _, _| {
                let set_content = core.api.set_content.clone();
                set_content(core, &edited, false, None);
                None
            })),
            Some(ChangeSource::SetContent),
            false,
            None,
        );
    }

    // === Events ===

    /// Dispatch an event to plugins. The event is passed by `&mut` so
    /// aggregate payloads come back to the caller.
    pub fn trigger_event(&mut self, event: &mut PluginEvent, broadcast: bool) {
        let trigger = self.core.api.trigger_event.clone();
        trigger(&mut self.core, event, broadcast);
    }

    /// Route a raw host event through the attached bindings. Returns whether
    /// any binding listens for `event_name`; hooks run before dispatch, and
    /// the event comes back with whatever handlers wrote into it.
    pub fn dispatch_dom_event(&mut self, event_name: &str, event: &mut PluginEvent) -> bool {
        if !self.core.dom_event.has_binding(event_name) {
            return false;
        }
        for hook in self.core.dom_event.hooks_for(event_name) {
            hook(event);
        }
        self.trigger_event(event, false);
        true
    }

    /// Run deferred work queued by plugins. Hosts call this once per task
    /// turn, after native default actions have settled.
    pub fn flush_deferred(&mut self) {
        self.core.drain_deferred();
    }

    fn warn_if_disposed(&self, operation: &str) -> bool {
        if self.core.disposed {
            tracing::warn!(target: "vellum::editor", operation, "called on disposed editor");
        }
        self.core.disposed
    }
}

impl Drop for Editor {
    fn drop(&mut self) {
        if !self.core.disposed {
            let _ = self.dispose();
        }
    }
}
