//! The color-transform primitive.

use crate::color::ColorTransformDirection;
use crate::core::EditorCore;
use crate::dom::NodeHandle;

/// Standard `transform_color`.
///
/// Collects the element set first, runs the optional mutation callback, then
/// rewrites declared colors through the dark-color registry. Collecting
/// before the callback means a callback that inserts the subtree into the
/// live tree still transforms exactly that subtree.
///
/// The transform itself only runs in dark mode or when forced; the callback
/// always runs.
pub fn transform_color(
    core: &mut EditorCore,
    root: Option<NodeHandle>,
    include_self: bool,
    callback: Option<Box<dyn FnOnce(&mut EditorCore)>>,
    direction: ColorTransformDirection,
    force: bool,
) {
    let should_transform = force || core.lifecycle.is_dark_mode;
    let root = root.unwrap_or_else(|| core.document.root());

    let elements = if should_transform {
        core.document.element_descendants(root, include_self)
    } else {
        Vec::new()
    };

    if let Some(callback) = callback {
        callback(core);
    }

    if elements.is_empty() {
        return;
    }

    tracing::trace!(
        target: "vellum::color",
        count = elements.len(),
        ?direction,
        "transforming colors"
    );

    let to_dark = direction == ColorTransformDirection::LightToDark;
    for element in elements {
        for background in [false, true] {
            let Some(color) = core.document.get_color(element, background) else {
                continue;
            };
            let mapped = core
                .lifecycle
                .dark_color_handler
                .register_color(&color, to_dark);
            if mapped != color {
                core.document.set_color(element, background, &mapped);
            }
        }
    }
}
