#![forbid(unsafe_code)]

//! Version-tracked shared values with change notification.

use std::any::Any;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::batch;

type Callback<T> = dyn Fn(&T);

struct ObservableInner<T> {
    value: T,
    version: u64,
    subscribers: Vec<Weak<Callback<T>>>,
}

/// A shared value that notifies subscribers when it changes.
///
/// Clones share the same value. Mutations that leave the value equal to what
/// it was are no-ops: no version bump, no notification.
///
/// Subscribers run after the mutation has completed and the internal borrow
/// has been released, so they may read (or mutate) the observable again.
/// The closure passed to [`Observable::update`] must not touch the same
/// observable.
pub struct Observable<T> {
    inner: Rc<RefCell<ObservableInner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObservableInner {
                value,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Read the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Replace the value. No-op when equal to the current value.
    pub fn set(&self, value: T) {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                false
            } else {
                inner.value = value;
                inner.version += 1;
                true
            }
        };
        if changed {
            self.notify();
        }
    }

    /// Mutate in place and return the closure's result.
    ///
    /// Subscribers are notified only if the value ended up different from
    /// what it was before the call.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let (result, changed) = {
            let mut inner = self.inner.borrow_mut();
            let before = inner.value.clone();
            let result = f(&mut inner.value);
            let changed = inner.value != before;
            if changed {
                inner.version += 1;
            }
            (result, changed)
        };
        if changed {
            self.notify();
        }
        result
    }

    /// Mutate in place when the closure can report its own outcome.
    ///
    /// `f` returns its result plus whether it changed the value. Only a
    /// reported change bumps the version and notifies. The value is never
    /// cloned for comparison.
    pub fn update_if<R>(&self, f: impl FnOnce(&mut T) -> (R, bool)) -> R {
        let (result, changed) = {
            let mut inner = self.inner.borrow_mut();
            let (result, changed) = f(&mut inner.value);
            if changed {
                inner.version += 1;
            }
            (result, changed)
        };
        if changed {
            self.notify();
        }
        result
    }

    /// Number of effective mutations so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Register `callback` to run after every effective mutation.
    ///
    /// The callback stays registered until the returned [`Subscription`] is
    /// dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let callback: Rc<Callback<T>> = Rc::new(callback);
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&callback));
        Subscription {
            _callback: Box::new(callback),
        }
    }

    /// Live subscriber count. Dead entries are pruned first.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        let mut inner = self.inner.borrow_mut();
        inner.subscribers.retain(|w| w.strong_count() > 0);
        inner.subscribers.len()
    }

    fn notify(&self) {
        let key = Rc::as_ptr(&self.inner) as *const () as usize;
        let this = self.clone();
        if !batch::defer(key, move || this.notify_now()) {
            self.notify_now();
        }
    }

    fn notify_now(&self) {
        let (snapshot, callbacks) = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|w| w.strong_count() > 0);
            let callbacks: Vec<Rc<Callback<T>>> =
                inner.subscribers.iter().filter_map(Weak::upgrade).collect();
            (inner.value.clone(), callbacks)
        };
        for callback in callbacks {
            callback(&snapshot);
        }
    }
}

/// RAII guard for an [`Observable`] subscription.
///
/// Dropping it removes the callback before the next notification.
pub struct Subscription {
    _callback: Box<dyn Any>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn get_set_and_version() {
        let obs = Observable::new(1);
        assert_eq!(obs.get(), 1);
        assert_eq!(obs.version(), 0);

        obs.set(2);
        assert_eq!(obs.get(), 2);
        assert_eq!(obs.version(), 1);
    }

    #[test]
    fn equal_set_is_noop() {
        let obs = Observable::new(5);
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let _sub = obs.subscribe(move |_| h.set(h.get() + 1));

        obs.set(5);
        assert_eq!(obs.version(), 0);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn update_notifies_only_on_change() {
        let obs = Observable::new(vec![1, 2]);
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let _sub = obs.subscribe(move |_| h.set(h.get() + 1));

        let len = obs.update(|v| v.len());
        assert_eq!(len, 2);
        assert_eq!(hits.get(), 0);

        obs.update(|v| v.push(3));
        assert_eq!(hits.get(), 1);
        assert_eq!(obs.version(), 1);
    }

    #[test]
    fn update_if_trusts_reported_change() {
        let obs = Observable::new(vec![1]);
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let _sub = obs.subscribe(move |_| h.set(h.get() + 1));

        let pushed = obs.update_if(|v| {
            if v.contains(&1) {
                (false, false)
            } else {
                v.push(1);
                (true, true)
            }
        });
        assert!(!pushed);
        assert_eq!(obs.version(), 0);
        assert_eq!(hits.get(), 0);

        let pushed = obs.update_if(|v| {
            v.push(2);
            (true, true)
        });
        assert!(pushed);
        assert_eq!(obs.version(), 1);
        assert_eq!(hits.get(), 1);
        assert_eq!(obs.get(), vec![1, 2]);
    }

    #[test]
    fn subscribers_run_in_registration_order() {
        let obs = Observable::new(0);
        let log = Rc::new(RefCell::new(Vec::new()));

        let l1 = Rc::clone(&log);
        let _a = obs.subscribe(move |v| l1.borrow_mut().push(("a", *v)));
        let l2 = Rc::clone(&log);
        let _b = obs.subscribe(move |v| l2.borrow_mut().push(("b", *v)));

        obs.set(9);
        assert_eq!(*log.borrow(), vec![("a", 9), ("b", 9)]);
    }

    #[test]
    fn dropped_subscription_stops_callbacks() {
        let obs = Observable::new(0);
        let seen = Rc::new(Cell::new(0));
        let s = Rc::clone(&seen);
        let sub = obs.subscribe(move |v| s.set(*v));

        obs.set(1);
        drop(sub);
        obs.set(2);
        assert_eq!(seen.get(), 1);
        assert_eq!(obs.subscriber_count(), 0);
    }

    #[test]
    fn subscriber_may_read_observable() {
        let obs = Observable::new(0);
        let reader = obs.clone();
        let seen = Rc::new(Cell::new(0));
        let s = Rc::clone(&seen);
        let _sub = obs.subscribe(move |_| s.set(reader.get()));

        obs.set(4);
        assert_eq!(seen.get(), 4);
    }

    #[test]
    fn clones_share_value() {
        let a = Observable::new(String::from("x"));
        let b = a.clone();
        b.set("y".to_string());
        assert_eq!(a.get(), "y");
        assert_eq!(a.version(), 1);
    }
}
