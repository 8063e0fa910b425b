//! Host event routing and selection caching.
//!
//! [`DomEventState`] keeps the binding registry that
//! `Editor::dispatch_dom_event` routes raw host events through, plus the
//! last-known selection so `get_selection(try_cache)` works while the
//! container is unfocused.

use std::collections::HashMap;
use std::rc::Rc;

use smol_str::SmolStr;
use web_time::{Duration, Instant};

use crate::core::EditorCore;
use crate::dom::DocumentSelection;
use crate::events::{EditorPlugin, Key, PluginEvent};

/// Safari delivers key events racing the end of an IME composition;
/// selection reads inside this window are unreliable.
const COMPOSITION_GRACE: Duration = Duration::from_millis(100);

/// Handle for a set of attached bindings, used to detach them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DomEventHandle(pub(crate) u64);

/// One host-event binding: a raw event name plus an optional hook run before
/// the event enters plugin dispatch.
#[derive(Clone)]
pub struct DomEventBinding {
    pub event_name: SmolStr,
    pub before_dispatch: Option<Rc<dyn Fn(&mut PluginEvent)>>,
}

impl DomEventBinding {
    pub fn new(event_name: impl Into<SmolStr>) -> Self {
        Self {
            event_name: event_name.into(),
            before_dispatch: None,
        }
    }

    pub fn with_hook(mut self, hook: Rc<dyn Fn(&mut PluginEvent)>) -> Self {
        self.before_dispatch = Some(hook);
        self
    }
}

/// DOM-event sub-state.
#[derive(Default)]
pub struct DomEventState {
    /// Last known selection, kept warm for unfocused reads.
    pub selection_cache: Option<DocumentSelection>,
    /// When the last IME composition ended.
    pub composition_ended_at: Option<Instant>,
    attached: HashMap<u64, Vec<DomEventBinding>>,
    next_handle: u64,
}

impl DomEventState {
    pub(crate) fn attach(&mut self, bindings: Vec<DomEventBinding>) -> DomEventHandle {
        let handle = DomEventHandle(self.next_handle);
        self.next_handle += 1;
        self.attached.insert(handle.0, bindings);
        handle
    }

    pub(crate) fn detach(&mut self, handle: DomEventHandle) {
        self.attached.remove(&handle.0);
    }

    /// Whether any attached binding listens for `event_name`.
    pub fn has_binding(&self, event_name: &str) -> bool {
        self.attached
            .values()
            .flatten()
            .any(|b| b.event_name == event_name)
    }

    /// Hooks to run before dispatching an event with this name.
    pub fn hooks_for(&self, event_name: &str) -> Vec<Rc<dyn Fn(&mut PluginEvent)>> {
        self.attached
            .values()
            .flatten()
            .filter(|b| b.event_name == event_name)
            .filter_map(|b| b.before_dispatch.clone())
            .collect()
    }

    pub(crate) fn clear(&mut self) {
        self.attached.clear();
        self.selection_cache = None;
        self.composition_ended_at = None;
    }
}

/// Plugin keeping the selection cache in sync with host events.
pub struct DomEventPlugin {
    handle: Option<DomEventHandle>,
}

impl DomEventPlugin {
    pub fn new() -> Self {
        Self { handle: None }
    }
}

impl Default for DomEventPlugin {
    fn default() -> Self {
        Self::new()
    }
}

fn refresh_selection_cache(core: &mut EditorCore) {
    if let Some(live) = core.document.read_selection() {
        core.dom_event.selection_cache = Some(live);
    }
}

/// Selection reads right after a composition are unreliable on Safari.
fn in_composition_grace(core: &EditorCore) -> bool {
    core.capabilities.is_safari
        && core
            .dom_event
            .composition_ended_at
            .is_some_and(|at| at.elapsed() < COMPOSITION_GRACE)
}

impl EditorPlugin for DomEventPlugin {
    fn name(&self) -> &'static str {
        "DomEvent"
    }

    fn initialize(&mut self, core: &mut EditorCore) {
        let mut bindings = vec![
            DomEventBinding::new("keydown"),
            DomEventBinding::new("keyup"),
            DomEventBinding::new("mousedown"),
            DomEventBinding::new("mouseup"),
            DomEventBinding::new("compositionend"),
            DomEventBinding::new("contextmenu"),
        ];
        // Engines without beforeinput still deliver semantic input through
        // keypress.
        if !core.capabilities.supports_before_input {
            bindings.push(DomEventBinding::new("keypress"));
        }
        let attach = core.api.attach_dom_event.clone();
        self.handle = Some(attach(core, bindings));
    }

    fn dispose(&mut self, core: &mut EditorCore) {
        if let Some(handle) = self.handle.take() {
            let detach = core.api.detach_dom_event.clone();
            detach(core, handle);
        }
    }

    fn on_plugin_event(&mut self, core: &mut EditorCore, event: &mut PluginEvent) {
        match event {
            PluginEvent::MouseDown(_) | PluginEvent::MouseUp(_) => {
                refresh_selection_cache(core);
            }
            PluginEvent::KeyUp(_) => {
                if !in_composition_grace(core) {
                    refresh_selection_cache(core);
                }
            }
            PluginEvent::KeyDown(key) => {
                // Android reports Backspace before applying (or not applying)
                // the deletion; check the selection on the next turn instead.
                if core.capabilities.is_android && key.key == Key::Backspace {
                    core.schedule(refresh_selection_cache);
                }
            }
            PluginEvent::CompositionEnd { .. } => {
                core.dom_event.composition_ended_at = Some(Instant::now());
                refresh_selection_cache(core);
            }
            _ => {}
        }
    }
}
