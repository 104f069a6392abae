#![forbid(unsafe_code)]

//! modalq public facade.
//!
//! Decide which of several competing modal dialogs are on screen.
//! Dialogs ask to be shown with a priority and a stackable flag; the queue
//! orders them (priority first, then first-come-first-served) and resolves
//! the visible set: a non-stackable head takes the screen alone, a stackable
//! head lets every other stackable modal join it.
//!
//! # Quick start
//!
//! ```
//! use modalq::prelude::*;
//!
//! let store = ModalStore::new();
//! let _toast = ModalHandle::mount(
//!     &store,
//!     ModalProps::named("saved").visible(true).stackable(true),
//! );
//! let quit = ModalHandle::mount(
//!     &store,
//!     ModalProps::named("confirm-quit").visible(true).priority(10),
//! );
//!
//! assert_eq!(quit.presentation(), Presentation::Shown);
//! assert_eq!(store.visible_modals().len(), 1);
//!
//! drop(quit);
//! assert_eq!(store.visible_modals()[0].id().as_str(), "saved");
//! ```
//!
//! Use [`ModalQueue`] directly when no shared or observable state is
//! needed.

pub use modalq_core;
#[cfg(feature = "runtime")]
pub use modalq_runtime;

pub use modalq_core::{
    ActiveModalEntry, ClockKind, ConfigError, ModalClock, ModalId, ModalQueue, QueueConfig,
};
#[cfg(feature = "runtime")]
pub use modalq_runtime::{ModalContext, ModalHandle, ModalProps, ModalStore, Presentation};

pub mod prelude {
    //! Common imports.

    pub use modalq_core::{ActiveModalEntry, ModalId, ModalQueue, QueueConfig};
    #[cfg(feature = "runtime")]
    pub use modalq_runtime::{
        BatchScope, ModalContext, ModalHandle, ModalProps, ModalStore, Presentation, Subscription,
    };
}
