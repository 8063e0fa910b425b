//! Shadow-edit mode switching.
//!
//! Shadow edit detaches the live content into a retained fragment and lets
//! callers mutate a clone of it for previews. While the session is active,
//! plugin dispatch is suppressed (see [`super::events::trigger_event`]) so
//! speculative mutations never reach the undo coordinator or entity
//! hydration. Leaving restores the retained fragment and the captured
//! selection as if nothing happened.

use crate::core::EditorCore;
use crate::dom::{resolve_metadata, selection_to_metadata};
use crate::events::PluginEvent;
use crate::plugins::lifecycle::ShadowEditSession;

/// Standard `switch_shadow_edit`.
///
/// `true` enters (or, when already active, resets the working copy from the
/// retained fragment with no events); `false` leaves and restores.
pub fn switch_shadow_edit(core: &mut EditorCore, is_on: bool) {
    if is_on {
        enter_or_reset(core);
    } else {
        leave(core);
    }
}

fn enter_or_reset(core: &mut EditorCore) {
    let existing = core.lifecycle.shadow_edit.as_ref().map(|s| s.fragment);
    let fragment = match existing {
        Some(fragment) => fragment,
        None => {
            let get_selection = core.api.get_selection.clone();
            let selection = get_selection(core, true)
                .and_then(|sel| selection_to_metadata(&*core.document, &sel));

            let fragment = core.document.detach_children();

            tracing::debug!(target: "vellum::shadow", "entering shadow edit");
            // The transition event fires before the session is recorded, so
            // handlers still see the editor in its normal state.
            let trigger = core.api.trigger_event.clone();
            let mut event = PluginEvent::EnteredShadowEdit;
            trigger(core, &mut event, false);

            core.lifecycle.shadow_edit = Some(ShadowEditSession {
                fragment,
                selection,
            });
            fragment
        }
    };

    core.document.mirror_fragment(fragment);
}

fn leave(core: &mut EditorCore) {
    if core.lifecycle.shadow_edit.is_none() {
        return;
    }

    tracing::debug!(target: "vellum::shadow", "leaving shadow edit");
    let trigger = core.api.trigger_event.clone();
    let mut event = PluginEvent::LeavingShadowEdit;
    trigger(core, &mut event, false);

    let Some(session) = core.lifecycle.shadow_edit.take() else {
        return;
    };
    core.document.restore_fragment(session.fragment);
    core.dom_event.selection_cache = None;

    let focus = core.api.focus.clone();
    focus(core);

    if let Some(metadata) = session.selection {
        match resolve_metadata(&*core.document, &metadata) {
            Some(selection) => {
                let select_range = core.api.select_range.clone();
                select_range(core, selection, false);
            }
            None => {
                tracing::warn!(
                    target: "vellum::shadow",
                    "captured selection no longer resolves after shadow edit"
                );
            }
        }
    }
}
