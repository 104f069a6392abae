#![forbid(unsafe_code)]

//! Observable modal queue shared by a presentation layer.
//!
//! [`ModalStore`] wraps a [`ModalQueue`] in an [`Observable`], so every
//! effective `show`/`hide` bumps a version and notifies subscribers with a
//! fully sorted snapshot. No-op calls (duplicate show, hide of an absent id)
//! neither bump the version nor notify.
//!
//! Stores are explicit objects: each UI surface that needs its own modal
//! layer owns its own store. Clones share state.
//!
//! # Example
//!
//! ```
//! use modalq_runtime::ModalStore;
//!
//! let store = ModalStore::new();
//! let _sub = store.subscribe(|queue| {
//!     assert!(queue.check_invariants());
//! });
//!
//! store.show("update-available", 1, true);
//! store.show("crash-report", 10, false);
//!
//! let visible: Vec<String> = store
//!     .visible_modals()
//!     .iter()
//!     .map(|m| m.id().to_string())
//!     .collect();
//! assert_eq!(visible, ["crash-report"]);
//! ```

use modalq_core::{
    ActiveModalEntry, ClockSource, ModalClock, ModalId, ModalQueue, QueueConfig,
};

use crate::reactive::{Binding, Computed, Observable, Subscription, bind_mapped};

const LOG_TARGET: &str = "modalq::store";

/// Shared, observable modal queue.
pub struct ModalStore<C: ModalClock + Clone + 'static = ClockSource> {
    queue: Observable<ModalQueue<C>>,
    config: QueueConfig,
}

impl<C: ModalClock + Clone + 'static> Clone for ModalStore<C> {
    fn clone(&self) -> Self {
        Self {
            queue: self.queue.clone(),
            config: self.config,
        }
    }
}

impl<C: ModalClock + Clone + std::fmt::Debug + 'static> std::fmt::Debug for ModalStore<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalStore")
            .field("queue", &self.queue)
            .field("config", &self.config)
            .finish()
    }
}

impl ModalStore<ClockSource> {
    /// Store with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(QueueConfig::default())
    }

    /// Store whose clock and binding defaults come from `config`.
    #[must_use]
    pub fn from_config(config: QueueConfig) -> Self {
        Self::from_queue(ModalQueue::from_config(&config), config)
    }
}

impl Default for ModalStore<ClockSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ModalClock + Clone + 'static> ModalStore<C> {
    /// Store over an existing queue, for custom clocks.
    #[must_use]
    pub fn from_queue(queue: ModalQueue<C>, config: QueueConfig) -> Self {
        Self {
            queue: Observable::new(queue),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Register a modal. Returns `false` if `id` was already registered, in
    /// which case the existing entry is kept unchanged.
    pub fn show(&self, id: impl Into<ModalId>, priority: i32, stackable: bool) -> bool {
        let id = id.into();
        let inserted = self
            .queue
            .update_if(|q| {
                let inserted = q.show(id.clone(), priority, stackable);
                (inserted, inserted)
            });
        if inserted {
            tracing::debug!(
                target: LOG_TARGET,
                id = %id,
                priority,
                stackable,
                depth = self.len(),
                "modal shown"
            );
        } else {
            tracing::trace!(target: LOG_TARGET, id = %id, "show ignored: already queued");
        }
        inserted
    }

    /// Register a modal with the configured default priority and
    /// stackability.
    pub fn show_default(&self, id: impl Into<ModalId>) -> bool {
        self.show(
            id,
            self.config.default_priority,
            self.config.default_stackable,
        )
    }

    /// Remove a modal. Returns the removed entry, or `None` if absent.
    pub fn hide(&self, id: &str) -> Option<ActiveModalEntry> {
        let removed = self.queue.update_if(|q| {
            let removed = q.hide(id);
            let changed = removed.is_some();
            (removed, changed)
        });
        match &removed {
            Some(entry) => tracing::debug!(
                target: LOG_TARGET,
                id,
                priority = entry.priority(),
                depth = self.len(),
                "modal hidden"
            ),
            None => tracing::trace!(target: LOG_TARGET, id, "hide ignored: not queued"),
        }
        removed
    }

    /// Remove every modal with a single notification.
    pub fn clear(&self) -> Vec<ActiveModalEntry> {
        let removed = self.queue.update_if(|q| {
            let removed = q.clear();
            let changed = !removed.is_empty();
            (removed, changed)
        });
        if !removed.is_empty() {
            tracing::debug!(target: LOG_TARGET, count = removed.len(), "modal queue cleared");
        }
        removed
    }

    /// Resolved visible set, in queue order.
    #[must_use]
    pub fn visible_modals(&self) -> Vec<ActiveModalEntry> {
        self.queue.with(|q| q.visible().cloned().collect())
    }

    #[must_use]
    pub fn is_visible(&self, id: &str) -> bool {
        self.queue.with(|q| q.is_visible(id))
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.queue.with(|q| q.contains(id))
    }

    /// Full queue contents, in queue order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ActiveModalEntry> {
        self.queue.with(|q| q.entries().to_vec())
    }

    /// Read the queue without copying it.
    pub fn with_queue<R>(&self, f: impl FnOnce(&ModalQueue<C>) -> R) -> R {
        self.queue.with(f)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.with(ModalQueue::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.with(ModalQueue::is_empty)
    }

    /// Number of effective mutations so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.queue.version()
    }

    /// Call `callback` with the queue after every effective mutation.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&ModalQueue<C>) + 'static) -> Subscription {
        self.queue.subscribe(callback)
    }

    /// Memoized visible set, recomputed after the first read following each
    /// effective mutation.
    #[must_use]
    pub fn visible_computed(&self) -> Computed<Vec<ActiveModalEntry>> {
        Computed::from_observable(&self.queue, |q| q.visible().cloned().collect())
    }

    /// Live binding to whether `id` is currently visible.
    #[must_use]
    pub fn bind_visibility(&self, id: impl Into<ModalId>) -> Binding<bool> {
        let id = id.into();
        bind_mapped(&self.queue, move |q| q.is_visible(id.as_str()))
    }
}
