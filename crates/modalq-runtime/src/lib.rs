#![forbid(unsafe_code)]

//! Observable modal state for modalq.
//!
//! - [`ModalStore`]: a [`ModalQueue`](modalq_core::ModalQueue) behind an
//!   observable, with subscriptions, memoized visibility and bindings.
//! - [`ModalHandle`]: headless per-dialog binding (mount, prop changes,
//!   close requests, unmount).
//! - [`ModalContext`]: thread-local ambient store for the composition root.
//! - [`reactive`]: the change-tracking primitives underneath.
//!
//! Everything here is single-threaded (`Rc`-based). Run it on the UI thread
//! that owns the modal layer.

pub mod context;
pub mod handle;
pub mod reactive;
pub mod store;

pub use context::{ModalContext, StoreOverride};
pub use handle::{ModalHandle, ModalProps, Presentation};
pub use reactive::{BatchScope, Binding, BindingScope, Computed, Observable, Subscription};
pub use store::ModalStore;
