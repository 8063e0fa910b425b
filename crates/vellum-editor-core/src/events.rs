//! Plugin event protocol.
//!
//! Everything that happens in the editor is announced to plugins as a
//! [`PluginEvent`]. Events are dispatched in plugin registration order; a
//! plugin may claim an event exclusively (see
//! [`EditorPlugin::will_handle_event_exclusively`]), which suppresses the
//! fan-out to everyone else unless the sender asked for a broadcast.
//!
//! Handlers receive events by `&mut` reference. Variants with aggregate
//! payloads (context-menu items) are mutated in place by each handler in
//! turn; that is the sanctioned way many plugins contribute to one response.

use smol_str::SmolStr;

use crate::core::EditorCore;
use crate::dom::NodeHandle;
use crate::plugins::pending_format::PendableFormatState;
use crate::types::{ChangeSource, SelectionMetadata};

/// A key identity, decoupled from any browser event object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Backspace,
    Tab,
    Enter,
    Escape,
    Space,
    PageUp,
    PageDown,
    End,
    Home,
    ArrowLeft,
    ArrowUp,
    ArrowRight,
    ArrowDown,
    Delete,
    Char(char),
    Other(SmolStr),
}

impl Key {
    /// Cursor-movement keys: they change the selection, not the content.
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Key::PageUp
                | Key::PageDown
                | Key::End
                | Key::Home
                | Key::ArrowLeft
                | Key::ArrowUp
                | Key::ArrowRight
                | Key::ArrowDown
        )
    }

    /// Keys that produce content when unmodified.
    pub fn is_character(&self) -> bool {
        matches!(self, Key::Char(_) | Key::Space | Key::Enter | Key::Tab)
    }
}

/// Keyboard event payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyboardEventData {
    pub key: Key,
    pub ctrl_key: bool,
    pub alt_key: bool,
    pub shift_key: bool,
    pub meta_key: bool,
    /// Set by a handler to cancel the default host action.
    pub default_prevented: bool,
}

impl KeyboardEventData {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            ctrl_key: false,
            alt_key: false,
            shift_key: false,
            meta_key: false,
            default_prevented: false,
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl_key = true;
        self
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn has_modifier(&self) -> bool {
        self.ctrl_key || self.alt_key || self.meta_key
    }
}

/// Mouse event payload, coordinates relative to the container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MouseEventData {
    pub x: i32,
    pub y: i32,
    pub button: MouseButton,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MouseButton {
    #[default]
    Left,
    Middle,
    Right,
}

/// Clipboard payload for paste handling.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClipboardData {
    pub html: Option<String>,
    pub text: Option<String>,
}

/// Entity lifecycle notifications raised by the entity registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityOperation {
    NewEntity,
    RemovedEntity,
}

/// Discriminant for [`PluginEvent`], used by suppression and exclusivity
/// checks that do not care about payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PluginEventType {
    EditorReady,
    BeforeDispose,
    ContentChanged,
    BeforeSetContent,
    KeyDown,
    KeyPress,
    KeyUp,
    CompositionEnd,
    MouseDown,
    MouseUp,
    ContextMenu,
    SelectionChanged,
    BeforePaste,
    EnteredShadowEdit,
    LeavingShadowEdit,
    PendingFormatStateChanged,
    EntityOperation,
}

/// The closed set of events plugins can receive.
#[derive(Clone, Debug)]
pub enum PluginEvent {
    /// The editor finished construction and plugin initialization.
    EditorReady,
    /// The editor is about to be torn down. The only event that still reaches
    /// plugins during shadow editing.
    BeforeDispose,
    /// Content was mutated. `data` is whatever the mutating feature returned.
    ContentChanged {
        source: ChangeSource,
        data: Option<SmolStr>,
    },
    /// Content is about to be replaced wholesale.
    BeforeSetContent { new_content: String },
    KeyDown(KeyboardEventData),
    KeyPress(KeyboardEventData),
    KeyUp(KeyboardEventData),
    CompositionEnd { text: SmolStr },
    MouseDown(MouseEventData),
    MouseUp(MouseEventData),
    /// Context menu about to show; handlers append their items.
    ContextMenu {
        mouse: MouseEventData,
        items: Vec<SmolStr>,
    },
    SelectionChanged {
        selection: Option<SelectionMetadata>,
    },
    /// A paste fragment was built; handlers may rewrite it before insertion.
    BeforePaste {
        fragment: NodeHandle,
        clipboard: ClipboardData,
    },
    EnteredShadowEdit,
    LeavingShadowEdit,
    PendingFormatStateChanged { format_state: PendableFormatState },
    EntityOperation {
        operation: EntityOperation,
        id: SmolStr,
    },
}

impl PluginEvent {
    pub fn event_type(&self) -> PluginEventType {
        match self {
            PluginEvent::EditorReady => PluginEventType::EditorReady,
            PluginEvent::BeforeDispose => PluginEventType::BeforeDispose,
            PluginEvent::ContentChanged { .. } => PluginEventType::ContentChanged,
            PluginEvent::BeforeSetContent { .. } => PluginEventType::BeforeSetContent,
            PluginEvent::KeyDown(_) => PluginEventType::KeyDown,
            PluginEvent::KeyPress(_) => PluginEventType::KeyPress,
            PluginEvent::KeyUp(_) => PluginEventType::KeyUp,
            PluginEvent::CompositionEnd { .. } => PluginEventType::CompositionEnd,
            PluginEvent::MouseDown(_) => PluginEventType::MouseDown,
            PluginEvent::MouseUp(_) => PluginEventType::MouseUp,
            PluginEvent::ContextMenu { .. } => PluginEventType::ContextMenu,
            PluginEvent::SelectionChanged { .. } => PluginEventType::SelectionChanged,
            PluginEvent::BeforePaste { .. } => PluginEventType::BeforePaste,
            PluginEvent::EnteredShadowEdit => PluginEventType::EnteredShadowEdit,
            PluginEvent::LeavingShadowEdit => PluginEventType::LeavingShadowEdit,
            PluginEvent::PendingFormatStateChanged { .. } => {
                PluginEventType::PendingFormatStateChanged
            }
            PluginEvent::EntityOperation { .. } => PluginEventType::EntityOperation,
        }
    }

    /// Whether this event still reaches plugins during an active shadow-edit
    /// session. Dispose must get through, and the two transition events are
    /// the announcement of the session itself.
    pub fn allowed_in_shadow_edit(&self) -> bool {
        matches!(
            self.event_type(),
            PluginEventType::BeforeDispose
                | PluginEventType::EnteredShadowEdit
                | PluginEventType::LeavingShadowEdit
        )
    }
}

/// A plugin participating in editor event dispatch.
///
/// Plugins are registered at editor construction, initialized in order, and
/// disposed in reverse order. State a plugin needs across events lives either
/// in the plugin itself or in its named sub-state on [`EditorCore`].
pub trait EditorPlugin {
    /// Stable name, for logs.
    fn name(&self) -> &'static str;

    fn initialize(&mut self, core: &mut EditorCore) {
        let _ = core;
    }

    fn dispose(&mut self, core: &mut EditorCore) {
        let _ = core;
    }

    /// Claim sole ownership of `event`. Checked in registration order before
    /// the normal fan-out; the first claimant is the only plugin invoked.
    /// Never consulted for broadcast dispatches.
    fn will_handle_event_exclusively(&mut self, core: &EditorCore, event: &PluginEvent) -> bool {
        let _ = (core, event);
        false
    }

    fn on_plugin_event(&mut self, core: &mut EditorCore, event: &mut PluginEvent) {
        let _ = (core, event);
    }
}

impl<P: EditorPlugin + ?Sized> EditorPlugin for Box<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn initialize(&mut self, core: &mut EditorCore) {
        (**self).initialize(core)
    }

    fn dispose(&mut self, core: &mut EditorCore) {
        (**self).dispose(core)
    }

    fn will_handle_event_exclusively(&mut self, core: &EditorCore, event: &PluginEvent) -> bool {
        (**self).will_handle_event_exclusively(core, event)
    }

    fn on_plugin_event(&mut self, core: &mut EditorCore, event: &mut PluginEvent) {
        (**self).on_plugin_event(core, event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_classification() {
        assert!(Key::ArrowLeft.is_navigation());
        assert!(Key::Home.is_navigation());
        assert!(!Key::Backspace.is_navigation());
        assert!(Key::Char('a').is_character());
        assert!(Key::Space.is_character());
        assert!(!Key::Escape.is_character());
    }

    #[test]
    fn test_shadow_edit_allowlist() {
        assert!(PluginEvent::BeforeDispose.allowed_in_shadow_edit());
        assert!(PluginEvent::EnteredShadowEdit.allowed_in_shadow_edit());
        assert!(PluginEvent::LeavingShadowEdit.allowed_in_shadow_edit());
        assert!(!PluginEvent::EditorReady.allowed_in_shadow_edit());
        assert!(
            !PluginEvent::KeyDown(KeyboardEventData::new(Key::Backspace))
                .allowed_in_shadow_edit()
        );
    }
}
