//! Content primitives: serialize, replace, and paste-fragment construction.

use crate::color::ColorTransformDirection;
use crate::core::EditorCore;
use crate::dom::{resolve_metadata, selection_to_metadata, NodeHandle};
use crate::events::{ClipboardData, PluginEvent};
use crate::metadata::{embed_metadata, extract_metadata};
use crate::types::{ChangeSource, ContentMetadata, GetContentMode};

/// Standard `get_content`.
///
/// During shadow edit the saved fragment is serialized instead of the live
/// container, so readers always see the pre-shadow content.
pub fn get_content(core: &mut EditorCore, mode: GetContentMode) -> String {
    let shadow = core.lifecycle.shadow_edit.as_ref().map(|s| s.fragment);

    match mode {
        GetContentMode::PlainText => {
            let root = shadow.unwrap_or_else(|| core.document.root());
            core.document.text_content(root)
        }
        GetContentMode::RawHtmlOnly => serialize_root(core, shadow),
        GetContentMode::RawHtmlWithSelection => {
            let content = serialize_root(core, shadow);
            match current_metadata(core) {
                Some(metadata) => embed_metadata(&content, &metadata),
                None => content,
            }
        }
        GetContentMode::CleanHtml => {
            if core.lifecycle.is_dark_mode {
                // Transform a detached clone back to light so the live
                // content keeps its dark colors.
                let source = shadow.unwrap_or_else(|| core.document.root());
                let clone = core.document.clone_subtree(source);
                let transform = core.api.transform_color.clone();
                transform(
                    core,
                    Some(clone),
                    false,
                    None,
                    ColorTransformDirection::DarkToLight,
                    true,
                );
                let html = serialize_children(core, clone);
                core.document.remove(clone);
                html
            } else {
                serialize_root(core, shadow)
            }
        }
    }
}

fn serialize_root(core: &EditorCore, shadow: Option<NodeHandle>) -> String {
    match shadow {
        Some(fragment) => serialize_children(core, fragment),
        None => core.document.serialize(),
    }
}

fn serialize_children(core: &EditorCore, node: NodeHandle) -> String {
    core.document
        .children(node)
        .into_iter()
        .map(|c| core.document.serialize_node(c))
        .collect()
}

/// Selection metadata for the current state: the shadow session's captured
/// selection while shadow editing, the live (or cached) selection otherwise.
fn current_metadata(core: &mut EditorCore) -> Option<ContentMetadata> {
    let is_dark_mode = core.lifecycle.is_dark_mode;
    if let Some(session) = &core.lifecycle.shadow_edit {
        return session.selection.clone().map(|selection| ContentMetadata {
            is_dark_mode,
            selection,
        });
    }
    let get_selection = core.api.get_selection.clone();
    let selection = get_selection(core, true)?;
    let selection = selection_to_metadata(&*core.document, &selection)?;
    Some(ContentMetadata {
        is_dark_mode,
        selection,
    })
}

/// Standard `set_content`.
///
/// Replaces the container content wholesale. Metadata (explicit, or embedded
/// as a trailing comment) restores the recorded selection and reconciles
/// dark mode with a forced color transform when the snapshot was captured in
/// the other mode.
pub fn set_content(
    core: &mut EditorCore,
    content: &str,
    trigger_content_changed: bool,
    metadata: Option<ContentMetadata>,
) {
    let (stripped, embedded) = extract_metadata(content);
    let metadata = metadata.or(embedded);
    let stripped = stripped.to_string();

    let trigger = core.api.trigger_event.clone();
    let mut before = PluginEvent::BeforeSetContent {
        new_content: stripped.clone(),
    };
    trigger(core, &mut before, true);

    core.document.replace_content(&stripped);
    core.dom_event.selection_cache = None;

    if let Some(metadata) = &metadata {
        if metadata.is_dark_mode != core.lifecycle.is_dark_mode {
            let direction = if core.lifecycle.is_dark_mode {
                ColorTransformDirection::LightToDark
            } else {
                ColorTransformDirection::DarkToLight
            };
            let transform = core.api.transform_color.clone();
            transform(core, None, false, None, direction, true);
        }

        match resolve_metadata(&*core.document, &metadata.selection) {
            Some(selection) => {
                core.document.apply_selection(&selection);
                core.dom_event.selection_cache = Some(selection);
            }
            None => {
                tracing::warn!(
                    target: "vellum::content",
                    "selection metadata did not resolve; leaving content unselected"
                );
            }
        }
    }

    if trigger_content_changed {
        let mut changed = PluginEvent::ContentChanged {
            source: ChangeSource::SetContent,
            data: None,
        };
        trigger(core, &mut changed, true);
    }
}

/// Standard `create_paste_fragment`.
///
/// Builds a detached fragment from clipboard html (or escaped text),
/// announces it so plugins can rewrite it, and transforms it to dark colors
/// when the editor is in dark mode. Sanitization itself is the host's job.
pub fn create_paste_fragment(
    core: &mut EditorCore,
    clipboard: ClipboardData,
) -> Option<NodeHandle> {
    let html = match (&clipboard.html, &clipboard.text) {
        (Some(html), _) => html.clone(),
        (None, Some(text)) => escape_text(text),
        (None, None) => return None,
    };

    let fragment = core.document.create_fragment(&html)?;

    let trigger = core.api.trigger_event.clone();
    let mut event = PluginEvent::BeforePaste {
        fragment,
        clipboard,
    };
    trigger(core, &mut event, true);

    let transform = core.api.transform_color.clone();
    transform(
        core,
        Some(fragment),
        false,
        None,
        ColorTransformDirection::LightToDark,
        false,
    );

    Some(fragment)
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\n' => out.push_str("<br />"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(escape_text("line1\nline2"), "line1<br />line2");
    }
}
