//! Entity registry.
//!
//! Entities are host-managed elements marked with a `data-entity-type`
//! attribute. The registry keeps them uniquely identified across content
//! replacement and announces appearing/disappearing entities so features can
//! hydrate or release them.

use std::collections::HashMap;

use smol_str::{format_smolstr, SmolStr};

use crate::core::EditorCore;
use crate::dom::NodeHandle;
use crate::events::{EditorPlugin, EntityOperation, PluginEvent};

pub const ENTITY_TYPE_ATTRIBUTE: &str = "data-entity-type";

/// Entity sub-state: id to handle, rebuilt on every hydration pass.
#[derive(Default)]
pub struct EntityState {
    pub known: HashMap<SmolStr, NodeHandle>,
}

pub struct EntityPlugin;

impl EntityPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EntityPlugin {
    fn default() -> Self {
        Self::new()
    }
}

/// Rescan the tree for entity elements, repairing missing or duplicate ids,
/// and announce the diff against the previous registry.
fn hydrate(core: &mut EditorCore) {
    let root = core.document.root();
    let mut seen: HashMap<SmolStr, NodeHandle> = HashMap::new();

    for element in core.document.element_descendants(root, false) {
        let Some(entity_type) = core.document.get_attribute(element, ENTITY_TYPE_ATTRIBUTE) else {
            continue;
        };

        let existing = core.document.element_id(element);
        let id = match existing {
            Some(id) if !seen.contains_key(&id) => id,
            _ => {
                let mut n = seen.len() + 1;
                let mut candidate = format_smolstr!("{entity_type}_{n}");
                while seen.contains_key(&candidate) || core.document.find_by_id(&candidate).is_some()
                {
                    n += 1;
                    candidate = format_smolstr!("{entity_type}_{n}");
                }
                core.document.set_attribute(element, "id", Some(&candidate));
                candidate
            }
        };
        seen.insert(id, element);
    }

    let mut operations: Vec<(EntityOperation, SmolStr)> = Vec::new();
    for id in seen.keys() {
        if !core.entity.known.contains_key(id) {
            operations.push((EntityOperation::NewEntity, id.clone()));
        }
    }
    for id in core.entity.known.keys() {
        if !seen.contains_key(id) {
            operations.push((EntityOperation::RemovedEntity, id.clone()));
        }
    }

    core.entity.known = seen;

    // Announcing from inside the hydration dispatch would re-enter this
    // plugin; defer to the next host turn instead.
    for (operation, id) in operations {
        core.schedule(move |core| {
            let trigger = core.api.trigger_event.clone();
            let mut event = PluginEvent::EntityOperation { operation, id };
            trigger(core, &mut event, false);
        });
    }
}

impl EditorPlugin for EntityPlugin {
    fn name(&self) -> &'static str {
        "Entity"
    }

    fn on_plugin_event(&mut self, core: &mut EditorCore, event: &mut PluginEvent) {
        match event {
            PluginEvent::EditorReady | PluginEvent::ContentChanged { .. } => hydrate(core),
            _ => {}
        }
    }
}
