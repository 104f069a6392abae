#![forbid(unsafe_code)]

//! Deferred notification scopes.
//!
//! While a [`BatchScope`] is alive on the current thread, observables still
//! update their values and versions immediately, but their subscriber
//! notifications are queued. Each observable is queued at most once and
//! reports its final value when the outermost scope drops.

use std::cell::RefCell;
use std::marker::PhantomData;

type Pending = Box<dyn FnOnce()>;

#[derive(Default)]
struct BatchState {
    depth: usize,
    pending: Vec<(usize, Pending)>,
}

thread_local! {
    static BATCH: RefCell<BatchState> = RefCell::new(BatchState::default());
}

/// RAII guard that defers observable notifications until it drops.
///
/// Nested scopes are allowed; only the outermost one flushes.
#[must_use = "notifications flush when the scope drops"]
pub struct BatchScope {
    _not_send: PhantomData<*const ()>,
}

impl BatchScope {
    pub fn new() -> Self {
        BATCH.with(|b| b.borrow_mut().depth += 1);
        Self {
            _not_send: PhantomData,
        }
    }

    /// Whether any scope is open on this thread.
    #[must_use]
    pub fn is_active() -> bool {
        BATCH.with(|b| b.borrow().depth > 0)
    }

    /// Notifications waiting for the outermost scope to drop.
    #[must_use]
    pub fn pending_count() -> usize {
        BATCH.with(|b| b.borrow().pending.len())
    }
}

impl Default for BatchScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BatchScope {
    fn drop(&mut self) {
        let pending = BATCH.with(|b| {
            let mut state = b.borrow_mut();
            state.depth = state.depth.saturating_sub(1);
            if state.depth == 0 {
                std::mem::take(&mut state.pending)
            } else {
                Vec::new()
            }
        });
        for (_, notify) in pending {
            notify();
        }
    }
}

impl std::fmt::Debug for BatchScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchScope").finish()
    }
}

/// Queue `notify` under `key` if a scope is open.
///
/// Returns `false` when no scope is open; the caller notifies immediately.
pub(crate) fn defer(key: usize, notify: impl FnOnce() + 'static) -> bool {
    BATCH.with(|b| {
        let mut state = b.borrow_mut();
        if state.depth == 0 {
            return false;
        }
        if !state.pending.iter().any(|(k, _)| *k == key) {
            state.pending.push((key, Box::new(notify)));
        }
        true
    })
}
