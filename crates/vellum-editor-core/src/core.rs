//! The shared editor core record.
//!
//! One [`EditorCore`] exists per editor instance and is threaded by `&mut`
//! through every core API call and plugin dispatch. There are no ambient
//! singletons: everything a primitive needs (the document seam, the API
//! table, the plugin list, and the named sub-states) hangs off this record.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::api::CoreApiTable;
use crate::capabilities::BrowserCapabilities;
use crate::dom::DocumentModel;
use crate::events::EditorPlugin;
use crate::plugins::dom_event::DomEventState;
use crate::plugins::entity::EntityState;
use crate::plugins::lifecycle::LifecycleState;
use crate::plugins::pending_format::PendingFormatState;
use crate::undo::UndoState;

/// Deferred work executed on the next [`EditorCore::drain_deferred`] turn.
///
/// Stands in for "run after the current task-queue turn": hosts drain the
/// queue once the native default action for the current event has completed.
pub type DeferredTask = Box<dyn FnOnce(&mut EditorCore)>;

/// Mutable state record threaded through all core operations.
pub struct EditorCore {
    /// The editable surface. The container itself belongs to the host; the
    /// core only mutates through this seam.
    pub document: Box<dyn DocumentModel>,
    /// The primitive operation table. Built once at construction; all
    /// callers, including other primitives, go through it.
    pub api: CoreApiTable,
    /// Plugins in registration order. Shared handles so dispatch can run
    /// while the core is borrowed mutably.
    pub plugins: Vec<Rc<RefCell<dyn EditorPlugin>>>,
    /// Undo coordinator state.
    pub undo: UndoState,
    /// Dark mode, color registry, and the shadow-edit session.
    pub lifecycle: LifecycleState,
    /// Format state waiting to apply at the next input position.
    pub pending_format: PendingFormatState,
    /// Selection cache and attached host-event bindings.
    pub dom_event: DomEventState,
    /// Known-entity registry.
    pub entity: EntityState,
    /// Host capability flags, resolved once at construction.
    pub capabilities: BrowserCapabilities,
    deferred: VecDeque<DeferredTask>,
    pub(crate) disposed: bool,
}

impl EditorCore {
    pub fn new(
        document: Box<dyn DocumentModel>,
        api: CoreApiTable,
        capabilities: BrowserCapabilities,
    ) -> Self {
        Self {
            document,
            api,
            plugins: Vec::new(),
            undo: UndoState::default(),
            lifecycle: LifecycleState::default(),
            pending_format: PendingFormatState::default(),
            dom_event: DomEventState::default(),
            entity: EntityState::default(),
            capabilities,
            deferred: VecDeque::new(),
            disposed: false,
        }
    }

    /// Whether a shadow-edit session is active.
    pub fn in_shadow_edit(&self) -> bool {
        self.lifecycle.shadow_edit.is_some()
    }

    /// Queue work for the next host turn.
    pub fn schedule(&mut self, task: impl FnOnce(&mut EditorCore) + 'static) {
        self.deferred.push_back(Box::new(task));
    }

    /// Run all queued deferred tasks, including ones queued while draining.
    pub fn drain_deferred(&mut self) {
        while let Some(task) = self.deferred.pop_front() {
            task(self);
        }
    }

    pub(crate) fn deferred_len(&self) -> usize {
        self.deferred.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CoreApiTable;
    use crate::memory::MemoryDocument;

    fn make_core() -> EditorCore {
        EditorCore::new(
            Box::new(MemoryDocument::new()),
            CoreApiTable::standard(),
            BrowserCapabilities::default(),
        )
    }

    #[test]
    fn test_deferred_runs_in_order() {
        let mut core = make_core();
        let log = Rc::new(RefCell::new(Vec::new()));

        let log1 = log.clone();
        core.schedule(move |_| log1.borrow_mut().push(1));
        let log2 = log.clone();
        core.schedule(move |core| {
            log2.borrow_mut().push(2);
            let log3 = log2.clone();
            core.schedule(move |_| log3.borrow_mut().push(3));
        });

        assert_eq!(core.deferred_len(), 2);
        core.drain_deferred();
        assert_eq!(*log.borrow(), vec![1, 2, 3]);
        assert_eq!(core.deferred_len(), 0);
    }
}
