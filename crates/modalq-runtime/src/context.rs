#![forbid(unsafe_code)]

//! Ambient modal store for the composition root.
//!
//! Libraries should take a [`ModalStore`] explicitly. Applications that want
//! one process-wide modal layer (per UI thread) use [`ModalContext::global`]
//! or the free functions in this module. Scoped overrides let a secondary
//! surface, or a test, redirect the ambient store temporarily.

use std::cell::RefCell;
use std::rc::Rc;

use modalq_core::{ActiveModalEntry, ModalId, QueueConfig};

use crate::store::ModalStore;

thread_local! {
    static GLOBAL_CONTEXT: ModalContext = ModalContext::from_env();
}

/// Ambient store with scoped overrides.
#[derive(Clone, Debug)]
pub struct ModalContext {
    base: ModalStore,
    overrides: Rc<RefCell<Vec<ModalStore>>>,
}

impl ModalContext {
    #[must_use]
    pub fn new(config: QueueConfig) -> Self {
        Self::with_store(ModalStore::from_config(config))
    }

    #[must_use]
    pub fn with_store(store: ModalStore) -> Self {
        Self {
            base: store,
            overrides: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Context configured from `MODALQ_*` environment variables.
    ///
    /// Invalid values are logged and replaced by the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let config = QueueConfig::from_env().unwrap_or_else(|err| {
            tracing::warn!(
                target: "modalq::context",
                error = %err,
                "invalid modal queue configuration, using defaults"
            );
            QueueConfig::default()
        });
        Self::new(config)
    }

    /// This thread's ambient context.
    #[must_use]
    pub fn global() -> Self {
        GLOBAL_CONTEXT.with(Clone::clone)
    }

    /// Active store, honoring the innermost override.
    #[must_use]
    pub fn store(&self) -> ModalStore {
        if let Some(store) = self.overrides.borrow().last() {
            store.clone()
        } else {
            self.base.clone()
        }
    }

    /// The store used when no override is active.
    #[must_use]
    pub fn base_store(&self) -> ModalStore {
        self.base.clone()
    }

    /// Route the ambient store to `store` until the guard drops.
    ///
    /// Dropping a guard also ends every override pushed after it, so guards
    /// dropped out of order never leave an outer store active.
    #[must_use = "dropping this guard ends the override"]
    pub fn push_override(&self, store: ModalStore) -> StoreOverride {
        let mut stack = self.overrides.borrow_mut();
        let depth = stack.len();
        stack.push(store);
        StoreOverride {
            stack: Rc::clone(&self.overrides),
            depth,
        }
    }
}

/// RAII guard for a scoped store override.
#[must_use = "dropping this guard ends the override"]
pub struct StoreOverride {
    stack: Rc<RefCell<Vec<ModalStore>>>,
    /// Stack length before this override was pushed.
    depth: usize,
}

impl Drop for StoreOverride {
    fn drop(&mut self) {
        self.stack.borrow_mut().truncate(self.depth);
    }
}

impl std::fmt::Debug for StoreOverride {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreOverride")
            .field("depth", &self.depth)
            .finish()
    }
}

/// Show on the ambient store.
pub fn show(id: impl Into<ModalId>, priority: i32, stackable: bool) -> bool {
    ModalContext::global().store().show(id, priority, stackable)
}

/// Hide on the ambient store.
pub fn hide(id: &str) -> Option<ActiveModalEntry> {
    ModalContext::global().store().hide(id)
}

/// Visible set of the ambient store.
#[must_use]
pub fn visible_modals() -> Vec<ActiveModalEntry> {
    ModalContext::global().store().visible_modals()
}
