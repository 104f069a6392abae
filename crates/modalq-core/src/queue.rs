#![forbid(unsafe_code)]

//! Priority-ordered modal queue with derived visibility.
//!
//! `ModalQueue` keeps every active modal request in display order and
//! resolves which of them are visible on demand.
//!
//! # Invariants
//!
//! - Entries are sorted by priority descending, then `opened_at` ascending,
//!   then insertion order.
//! - Ids are unique. The first registration of an id wins; later `show`
//!   calls with the same id change nothing, including `opened_at`.
//! - Visibility is never stored. [`ModalQueue::visible`] recomputes it from
//!   the current order on every call.
//!
//! # Visibility
//!
//! The head of the queue is always visible. A non-stackable head hides
//! everything behind it. A stackable head lets the resolver walk the rest of
//! the queue: non-stackable entries are skipped (they do not stop the walk)
//! and every stackable entry is visible.
//!
//! ```
//! use modalq_core::ModalQueue;
//!
//! let mut queue = ModalQueue::new();
//! queue.show("s1", 10, true);
//! queue.show("us1", 7, false);
//! queue.show("s2", 6, true);
//!
//! let visible: Vec<&str> = queue.visible().map(|m| m.id().as_str()).collect();
//! assert_eq!(visible, ["s1", "s2"]);
//! ```
//!
//! # Failure Modes
//!
//! None. `show` of a present id and `hide` of an absent id are no-ops that
//! report what happened through their return values.

use std::iter::FusedIterator;
use std::slice;

use crate::clock::{ClockSource, LogicalClock, ModalClock};
use crate::config::QueueConfig;
use crate::entry::{ActiveModalEntry, queue_order};
use crate::id::ModalId;

/// Ordered registry of active modal requests.
#[derive(Debug, Clone)]
pub struct ModalQueue<C = LogicalClock> {
    entries: Vec<ActiveModalEntry>,
    clock: C,
}

impl ModalQueue<LogicalClock> {
    /// Create an empty queue stamped by a [`LogicalClock`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(LogicalClock::new())
    }
}

impl ModalQueue<ClockSource> {
    /// Create an empty queue using the clock selected by `config`.
    #[must_use]
    pub fn from_config(config: &QueueConfig) -> Self {
        Self::with_clock(ClockSource::from_kind(config.clock))
    }
}

impl<C: ModalClock + Default> Default for ModalQueue<C> {
    fn default() -> Self {
        Self::with_clock(C::default())
    }
}

impl<C: ModalClock> ModalQueue<C> {
    /// Create an empty queue stamped by `clock`.
    #[must_use]
    pub fn with_clock(clock: C) -> Self {
        Self {
            entries: Vec::new(),
            clock,
        }
    }

    /// Register a modal.
    ///
    /// Returns `false` without touching the queue when `id` is already
    /// registered. Otherwise stamps `opened_at`, inserts the entry at its
    /// sorted position and returns `true`.
    pub fn show(&mut self, id: impl Into<ModalId>, priority: i32, stackable: bool) -> bool {
        let id = id.into();

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "modal_queue_show",
            id = %id,
            priority,
            stackable,
            depth = self.entries.len()
        )
        .entered();

        if self.contains(id.as_str()) {
            return false;
        }

        let entry = ActiveModalEntry::new(id, priority, self.clock.now(), stackable);
        // Same slot a stable sort of the appended entry would pick.
        let at = self
            .entries
            .partition_point(|e| queue_order(e, &entry).is_le());
        self.entries.insert(at, entry);

        debug_assert!(self.check_invariants());
        true
    }

    /// Remove a modal.
    ///
    /// Returns the removed entry, or `None` when `id` was not registered.
    pub fn hide(&mut self, id: &str) -> Option<ActiveModalEntry> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "modal_queue_hide",
            id,
            depth = self.entries.len()
        )
        .entered();

        let idx = self.position(id)?;
        Some(self.entries.remove(idx))
    }

    /// Remove every modal, returning them in queue order.
    pub fn clear(&mut self) -> Vec<ActiveModalEntry> {
        std::mem::take(&mut self.entries)
    }
}

impl<C> ModalQueue<C> {
    /// Entries in queue order.
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[ActiveModalEntry] {
        &self.entries
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, ActiveModalEntry> {
        self.entries.iter()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id() == id)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ActiveModalEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    /// Queue index of `id`, if registered.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id() == id)
    }

    /// Highest-priority, earliest entry. Always visible when present.
    #[inline]
    #[must_use]
    pub fn head(&self) -> Option<&ActiveModalEntry> {
        self.entries.first()
    }

    #[inline]
    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Lazily resolve the visible set in queue order.
    pub fn visible(&self) -> Visible<'_> {
        Visible::new(&self.entries)
    }

    /// Resolve the visible set in queue order.
    #[must_use]
    pub fn visible_modals(&self) -> Vec<&ActiveModalEntry> {
        self.visible().collect()
    }

    /// Whether `id` is in the resolved visible set.
    #[must_use]
    pub fn is_visible(&self, id: &str) -> bool {
        self.visible().any(|e| e.id() == id)
    }

    /// Check ordering and id uniqueness. Cheap enough for debug assertions
    /// and fuzzing; not needed in normal operation.
    #[must_use]
    pub fn check_invariants(&self) -> bool {
        let sorted = self
            .entries
            .windows(2)
            .all(|w| queue_order(&w[0], &w[1]).is_le());
        let unique = self
            .entries
            .iter()
            .enumerate()
            .all(|(i, e)| self.entries[..i].iter().all(|prev| prev.id() != e.id()));
        sorted && unique
    }
}

/// Two queues are equal when they hold the same entries in the same order.
/// Clock state is not compared.
impl<C> PartialEq for ModalQueue<C> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<C> Eq for ModalQueue<C> {}

impl<'a, C> IntoIterator for &'a ModalQueue<C> {
    type Item = &'a ActiveModalEntry;
    type IntoIter = slice::Iter<'a, ActiveModalEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Iterator over the visible set. See the module docs for the rule.
#[derive(Debug, Clone)]
pub struct Visible<'a> {
    head: Option<&'a ActiveModalEntry>,
    rest: slice::Iter<'a, ActiveModalEntry>,
}

impl<'a> Visible<'a> {
    fn new(entries: &'a [ActiveModalEntry]) -> Self {
        match entries.split_first() {
            Some((head, rest)) => {
                // A non-stackable head blocks the rest of the queue.
                let rest = if head.stackable() {
                    rest
                } else {
                    &rest[rest.len()..]
                };
                Self {
                    head: Some(head),
                    rest: rest.iter(),
                }
            }
            None => Self {
                head: None,
                rest: entries.iter(),
            },
        }
    }
}

impl<'a> Iterator for Visible<'a> {
    type Item = &'a ActiveModalEntry;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(head) = self.head.take() {
            return Some(head);
        }
        self.rest.find(|e| e.stackable())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let head = usize::from(self.head.is_some());
        (head, Some(head + self.rest.len()))
    }
}

impl FusedIterator for Visible<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn ids<C>(queue: &ModalQueue<C>) -> Vec<&str> {
        queue.iter().map(|e| e.id().as_str()).collect()
    }

    fn visible_ids<C>(queue: &ModalQueue<C>) -> Vec<&str> {
        queue.visible().map(|e| e.id().as_str()).collect()
    }

    #[test]
    fn starts_empty() {
        let queue = ModalQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);
        assert!(queue.head().is_none());
        assert!(queue.visible_modals().is_empty());
    }

    #[test]
    fn show_adds_entry_with_timestamp() {
        let mut queue = ModalQueue::new();
        assert!(queue.show("modal-1", 0, false));

        assert_eq!(queue.len(), 1);
        let entry = queue.get("modal-1").unwrap();
        assert_eq!(entry.priority(), 0);
        assert!(!entry.stackable());
        assert!(entry.opened_at() > 0);
    }

    #[test]
    fn duplicate_show_keeps_first_registration() {
        let clock = ManualClock::new(100);
        let mut queue = ModalQueue::with_clock(clock.clone());
        assert!(queue.show("modal-1", 0, false));

        clock.advance(50);
        assert!(!queue.show("modal-1", 5, true));

        assert_eq!(queue.len(), 1);
        let entry = queue.get("modal-1").unwrap();
        assert_eq!(entry.priority(), 0);
        assert!(!entry.stackable());
        assert_eq!(entry.opened_at(), 100);
    }

    #[test]
    fn sorts_by_priority_descending() {
        let mut queue = ModalQueue::new();
        queue.show("low-priority", 1, false);
        queue.show("high-priority", 10, false);
        queue.show("medium-priority", 5, false);
        assert_eq!(
            ids(&queue),
            ["high-priority", "medium-priority", "low-priority"]
        );
    }

    #[test]
    fn equal_priority_is_fifo() {
        let mut queue = ModalQueue::new();
        queue.show("first", 5, false);
        queue.show("second", 5, false);
        queue.show("third", 5, false);
        assert_eq!(ids(&queue), ["first", "second", "third"]);
    }

    #[test]
    fn priority_then_fifo() {
        let mut queue = ModalQueue::new();
        queue.show("lo1", 1, false);
        queue.show("hi1", 10, false);
        queue.show("lo2", 1, false);
        queue.show("hi2", 10, false);
        assert_eq!(ids(&queue), ["hi1", "hi2", "lo1", "lo2"]);
    }

    #[test]
    fn identical_timestamps_keep_insertion_order() {
        let clock = ManualClock::new(7);
        let mut queue = ModalQueue::with_clock(clock);
        queue.show("a", 2, false);
        queue.show("b", 2, false);
        queue.show("c", 3, false);
        queue.show("d", 2, false);
        assert_eq!(ids(&queue), ["c", "a", "b", "d"]);
    }

    #[test]
    fn earlier_timestamp_sorts_ahead_of_existing_peer() {
        let clock = ManualClock::new(50);
        let mut queue = ModalQueue::with_clock(clock.clone());
        queue.show("later", 1, false);
        clock.set(10);
        queue.show("earlier", 1, false);
        assert_eq!(ids(&queue), ["earlier", "later"]);
        assert!(queue.check_invariants());
    }

    #[test]
    fn hide_removes_by_id() {
        let mut queue = ModalQueue::new();
        queue.show("modal-1", 0, false);
        queue.show("modal-2", 0, false);

        let removed = queue.hide("modal-1").unwrap();
        assert_eq!(removed.id(), "modal-1");
        assert_eq!(ids(&queue), ["modal-2"]);
    }

    #[test]
    fn hide_absent_is_noop() {
        let mut queue = ModalQueue::new();
        queue.show("modal-1", 0, false);
        let before = queue.clone();

        assert!(queue.hide("non-existent").is_none());
        assert_eq!(queue, before);
    }

    #[test]
    fn hide_everything_empties_queue() {
        let mut queue = ModalQueue::new();
        queue.show("modal-1", 0, false);
        queue.show("modal-2", 0, false);
        queue.hide("modal-1");
        queue.hide("modal-2");
        assert!(queue.is_empty());
    }

    #[test]
    fn show_then_hide_restores_prior_state() {
        let mut queue = ModalQueue::new();
        queue.show("a", 3, true);
        queue.show("b", 1, false);
        let before = queue.clone();

        queue.show("c", 2, true);
        queue.hide("c");
        assert_eq!(queue, before);
    }

    #[test]
    fn clear_returns_entries_in_order() {
        let mut queue = ModalQueue::new();
        queue.show("lo", 1, false);
        queue.show("hi", 9, false);
        let cleared: Vec<_> = queue.clear().into_iter().map(|e| e.id().clone()).collect();
        assert_eq!(cleared, [ModalId::from("hi"), ModalId::from("lo")]);
        assert!(queue.is_empty());
    }

    #[test]
    fn reshow_after_hide_gets_new_timestamp() {
        let mut queue = ModalQueue::new();
        queue.show("x", 5, false);
        queue.show("y", 5, false);
        queue.hide("x");
        queue.show("x", 5, false);
        assert_eq!(ids(&queue), ["y", "x"]);
    }

    // --- Visibility ---

    #[test]
    fn single_entry_is_visible() {
        let mut queue = ModalQueue::new();
        queue.show("only-modal", 0, false);
        assert_eq!(visible_ids(&queue), ["only-modal"]);
    }

    #[test]
    fn non_stackable_head_is_exclusive() {
        let mut queue = ModalQueue::new();
        queue.show("a", 10, false);
        queue.show("b", 5, true);
        assert_eq!(visible_ids(&queue), ["a"]);
        assert!(queue.is_visible("a"));
        assert!(!queue.is_visible("b"));
    }

    #[test]
    fn stackable_head_shows_stackable_followers() {
        let mut queue = ModalQueue::new();
        queue.show("stackable-1", 10, true);
        queue.show("stackable-2", 5, true);
        assert_eq!(visible_ids(&queue), ["stackable-1", "stackable-2"]);
    }

    #[test]
    fn interleaved_blocker_is_skipped_not_blocking() {
        let mut queue = ModalQueue::new();
        queue.show("s1", 10, true);
        queue.show("us1", 7, false);
        queue.show("s2", 6, true);
        assert_eq!(visible_ids(&queue), ["s1", "s2"]);
    }

    #[test]
    fn mixed_stackable_sequence() {
        let mut queue = ModalQueue::new();
        queue.show("s1", 10, true);
        queue.show("s2", 9, true);
        queue.show("s3", 8, true);
        queue.show("us1", 7, false);
        queue.show("s4", 6, true);
        assert_eq!(visible_ids(&queue), ["s1", "s2", "s3", "s4"]);
    }

    #[test]
    fn hiding_exclusive_head_reveals_stack() {
        let mut queue = ModalQueue::new();
        queue.show("blocker", 10, false);
        queue.show("s1", 5, true);
        queue.show("s2", 4, true);
        assert_eq!(visible_ids(&queue), ["blocker"]);

        queue.hide("blocker");
        assert_eq!(visible_ids(&queue), ["s1", "s2"]);
    }

    #[test]
    fn visible_does_not_mutate() {
        let mut queue = ModalQueue::new();
        queue.show("s1", 10, true);
        queue.show("us1", 7, false);
        let before = queue.clone();
        let _ = queue.visible_modals();
        let _ = queue.visible_modals();
        assert_eq!(queue, before);
    }

    #[test]
    fn visible_size_hint_is_bounded() {
        let mut queue = ModalQueue::new();
        queue.show("s1", 10, true);
        queue.show("us1", 7, false);
        queue.show("s2", 6, true);
        let visible = queue.visible();
        assert_eq!(visible.size_hint(), (1, Some(3)));
        assert_eq!(visible.count(), 2);
    }

    #[test]
    fn from_config_uses_configured_clock() {
        use crate::config::ClockKind;

        let config = QueueConfig::default().with_clock(ClockKind::Wall);
        let queue = ModalQueue::from_config(&config);
        assert_eq!(queue.clock().kind(), ClockKind::Wall);
    }
}
