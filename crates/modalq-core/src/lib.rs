#![forbid(unsafe_code)]

//! Core modal queue for modalq.
//!
//! A [`ModalQueue`] holds every modal that has asked to be shown, ordered by
//! priority (highest first) with FIFO tie-breaking, and resolves on demand
//! which of them are visible. Presentation layers call `show`/`hide` as their
//! dialogs mount, unmount, or change visibility, and render whatever
//! [`ModalQueue::visible`] yields.
//!
//! This crate is synchronous, allocation-light, and free of I/O. Shared
//! observable state lives in `modalq-runtime`.

pub mod clock;
pub mod config;
pub mod entry;
pub mod id;
pub mod queue;

pub use clock::{ClockSource, LogicalClock, ManualClock, ModalClock, WallClock};
pub use config::{ClockKind, ConfigError, QueueConfig};
pub use entry::{ActiveModalEntry, DEFAULT_PRIORITY, DEFAULT_STACKABLE, queue_order};
pub use id::ModalId;
pub use queue::{ModalQueue, Visible};
