#![forbid(unsafe_code)]

//! A single modal registration and its queue ordering.

use std::cmp::Ordering;

use crate::id::ModalId;

/// Priority used when the caller does not specify one.
pub const DEFAULT_PRIORITY: i32 = 0;

/// Stackable flag used when the caller does not specify one.
pub const DEFAULT_STACKABLE: bool = false;

/// One request to show a modal.
///
/// All fields are fixed at insertion. Changing priority or stackability of a
/// logical modal means hiding it and showing it again, which also assigns a
/// fresh `opened_at`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveModalEntry {
    id: ModalId,
    priority: i32,
    opened_at: u64,
    stackable: bool,
}

impl ActiveModalEntry {
    /// Create an entry. Queues stamp `opened_at` themselves; this constructor
    /// is public for hosts that build fixtures or snapshots.
    #[must_use]
    pub fn new(id: impl Into<ModalId>, priority: i32, opened_at: u64, stackable: bool) -> Self {
        Self {
            id: id.into(),
            priority,
            opened_at,
            stackable,
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> &ModalId {
        &self.id
    }

    /// Higher is more important.
    #[inline]
    #[must_use]
    pub const fn priority(&self) -> i32 {
        self.priority
    }

    /// Clock tick at insertion. Only used to break priority ties.
    #[inline]
    #[must_use]
    pub const fn opened_at(&self) -> u64 {
        self.opened_at
    }

    /// Whether the resolver may continue scanning past this entry.
    #[inline]
    #[must_use]
    pub const fn stackable(&self) -> bool {
        self.stackable
    }
}

/// Queue order: priority descending, then `opened_at` ascending.
///
/// `Equal` means the two entries tie completely; the queue then keeps
/// insertion order.
#[must_use]
pub fn queue_order(a: &ActiveModalEntry, b: &ActiveModalEntry) -> Ordering {
    b.priority
        .cmp(&a.priority)
        .then_with(|| a.opened_at.cmp(&b.opened_at))
}
