//! Lifecycle sub-state: dark mode, the color registry, and the shadow-edit
//! session.

use crate::color::{ColorTransformDirection, CoreDarkColorHandler, DarkColorHandler};
use crate::core::EditorCore;
use crate::dom::NodeHandle;
use crate::events::EditorPlugin;
use crate::types::SelectionMetadata;

/// Live shadow-edit session. Exists only between entering and leaving shadow
/// mode; never persisted, never visible to the undo coordinator.
pub struct ShadowEditSession {
    /// The detached original content.
    pub fragment: NodeHandle,
    /// Selection captured at entry, re-resolved on leave.
    pub selection: Option<SelectionMetadata>,
}

/// Lifecycle sub-state.
pub struct LifecycleState {
    pub is_dark_mode: bool,
    pub dark_color_handler: Box<dyn DarkColorHandler>,
    pub shadow_edit: Option<ShadowEditSession>,
}

impl Default for LifecycleState {
    fn default() -> Self {
        Self {
            is_dark_mode: false,
            dark_color_handler: Box::new(CoreDarkColorHandler::default()),
            shadow_edit: None,
        }
    }
}

pub struct LifecyclePlugin;

impl LifecyclePlugin {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LifecyclePlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorPlugin for LifecyclePlugin {
    fn name(&self) -> &'static str {
        "Lifecycle"
    }

    fn initialize(&mut self, core: &mut EditorCore) {
        // Initial content is authored in light colors; adjust it when the
        // editor starts dark.
        if core.lifecycle.is_dark_mode {
            let transform = core.api.transform_color.clone();
            transform(
                core,
                None,
                false,
                None,
                ColorTransformDirection::LightToDark,
                true,
            );
        }
    }

    fn dispose(&mut self, core: &mut EditorCore) {
        core.lifecycle.dark_color_handler.reset();
        core.lifecycle.shadow_edit = None;
    }
}
