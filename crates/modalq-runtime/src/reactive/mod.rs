#![forbid(unsafe_code)]

//! Change-tracking primitives behind the modal store.
//!
//! - [`Observable`]: shared, version-tracked value with subscriber callbacks.
//! - [`Subscription`]: RAII guard that unsubscribes on drop.
//! - [`Computed`]: memoized value derived from an `Observable`.
//! - [`BatchScope`]: defers notifications until the scope exits, so a
//!   compound change (hide then show) reaches observers once.
//! - [`Binding`] / [`BindingScope`]: read bindings and grouped lifetimes.
//!
//! # Architecture
//!
//! Everything is `Rc<RefCell<..>>` based and single-threaded. Subscribers are
//! stored as `Weak` callbacks and pruned lazily during notification.
//!
//! # Invariants
//!
//! 1. Version increments exactly once per mutation that changes the value.
//! 2. Subscribers are notified in registration order.
//! 3. Setting a value equal to the current value is a no-op.
//! 4. Subscribers never observe a half-applied mutation: they run after the
//!    mutation completes and the borrow is released.
//! 5. `Computed::get()` never returns a stale value.
//! 6. Inside a `BatchScope`, values update immediately; notifications wait
//!    for the outermost scope to exit.

pub mod batch;
pub mod binding;
pub mod computed;
pub mod observable;

pub use batch::BatchScope;
pub use binding::{Binding, BindingScope, bind_mapped, bind_observable};
pub use computed::Computed;
pub use observable::{Observable, Subscription};
