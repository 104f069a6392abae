#![forbid(unsafe_code)]

//! Lazily evaluated, memoized values derived from an [`Observable`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::observable::Observable;

struct ComputedState<T> {
    compute: Box<dyn Fn() -> T>,
    source_version: Box<dyn Fn() -> u64>,
    cache: RefCell<Option<(u64, T)>>,
    recomputations: Cell<u64>,
}

/// Memoized derivation of an observable.
///
/// The cache is keyed on the source's version, so `get()` never returns a
/// stale value, including inside a [`BatchScope`](super::BatchScope) where
/// subscriber notifications are still pending. Recomputation happens on the
/// first `get()` after a change, never eagerly.
pub struct Computed<T> {
    state: Rc<ComputedState<T>>,
}

impl<T> Clone for Computed<T> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<T: Clone + 'static> Computed<T> {
    /// Derive a value from `source` with `f`.
    pub fn from_observable<S: Clone + PartialEq + 'static>(
        source: &Observable<S>,
        f: impl Fn(&S) -> T + 'static,
    ) -> Self {
        let for_value = source.clone();
        let for_version = source.clone();
        Self {
            state: Rc::new(ComputedState {
                compute: Box::new(move || for_value.with(|v| f(v))),
                source_version: Box::new(move || for_version.version()),
                cache: RefCell::new(None),
                recomputations: Cell::new(0),
            }),
        }
    }

    /// Current derived value, recomputed only if the source changed.
    #[must_use]
    pub fn get(&self) -> T {
        let version = (self.state.source_version)();
        if let Some((cached_at, value)) = self.state.cache.borrow().as_ref()
            && *cached_at == version
        {
            return value.clone();
        }
        let value = (self.state.compute)();
        *self.state.cache.borrow_mut() = Some((version, value.clone()));
        self.state
            .recomputations
            .set(self.state.recomputations.get() + 1);
        value
    }

    /// Whether the next `get()` will recompute.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        let version = (self.state.source_version)();
        !matches!(self.state.cache.borrow().as_ref(), Some((v, _)) if *v == version)
    }

    /// How many times the derivation has run.
    #[must_use]
    pub fn recomputations(&self) -> u64 {
        self.state.recomputations.get()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Computed<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Computed")
            .field("cached", &self.state.cache.borrow())
            .field("recomputations", &self.state.recomputations.get())
            .finish()
    }
}
