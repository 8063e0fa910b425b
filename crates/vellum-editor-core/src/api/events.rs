//! Event dispatch and host-event binding primitives.

use crate::core::EditorCore;
use crate::events::PluginEvent;
use crate::plugins::dom_event::{DomEventBinding, DomEventHandle};

/// Standard `trigger_event`.
///
/// Plugins are visited in registration order. For a non-broadcast dispatch,
/// the first plugin whose exclusivity predicate claims the event is the only
/// one invoked; a broadcast always fans out to everyone. During shadow edit
/// only the dispose notification and the shadow transition events go
/// through.
pub fn trigger_event(core: &mut EditorCore, event: &mut PluginEvent, broadcast: bool) {
    if core.in_shadow_edit() && !event.allowed_in_shadow_edit() {
        tracing::trace!(
            target: "vellum::events",
            event_type = ?event.event_type(),
            "event suppressed during shadow edit"
        );
        return;
    }

    tracing::trace!(
        target: "vellum::events",
        event_type = ?event.event_type(),
        broadcast,
        "dispatching"
    );

    // Shared handles let dispatch run while the core is mutably borrowed. A
    // plugin re-entered from its own handler is skipped, not deadlocked.
    let plugins = core.plugins.clone();

    if !broadcast {
        for plugin in &plugins {
            let Ok(mut plugin) = plugin.try_borrow_mut() else {
                continue;
            };
            if plugin.will_handle_event_exclusively(core, event) {
                tracing::debug!(
                    target: "vellum::events",
                    plugin = plugin.name(),
                    event_type = ?event.event_type(),
                    "exclusive claim"
                );
                plugin.on_plugin_event(core, event);
                return;
            }
        }
    }

    for plugin in &plugins {
        match plugin.try_borrow_mut() {
            Ok(mut plugin) => plugin.on_plugin_event(core, event),
            Err(_) => {
                // A plugin whose handler triggered this event cannot receive
                // it again mid-handler.
                tracing::debug!(
                    target: "vellum::events",
                    event_type = ?event.event_type(),
                    "skipping reentrant dispatch"
                );
            }
        }
    }
}

/// Standard `attach_dom_event`: register bindings the host routes raw events
/// through. Returns a handle that detaches the whole set.
pub fn attach_dom_event(core: &mut EditorCore, bindings: Vec<DomEventBinding>) -> DomEventHandle {
    core.dom_event.attach(bindings)
}

/// Standard `detach_dom_event`.
pub fn detach_dom_event(core: &mut EditorCore, handle: DomEventHandle) {
    core.dom_event.detach(handle);
}
