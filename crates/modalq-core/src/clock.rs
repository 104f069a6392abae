#![forbid(unsafe_code)]

//! Time sources for `opened_at` stamps.
//!
//! The queue only needs ticks that never go backwards between insertions.
//! Equal ticks are allowed: insertion order settles those ties.
//!
//! - [`LogicalClock`]: strictly increasing counter. Deterministic.
//! - [`WallClock`]: milliseconds since the clock was created.
//! - [`ManualClock`]: shared, externally driven value for tests and hosts
//!   that own their own notion of time.
//! - [`ClockSource`]: runtime choice between logical and wall clocks,
//!   selected through [`ClockKind`](crate::config::ClockKind).

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use web_time::Instant;

use crate::config::ClockKind;

/// Source of `opened_at` ticks.
pub trait ModalClock {
    /// Read the current tick. Called once per effective insertion.
    fn now(&mut self) -> u64;
}

/// Strictly increasing counter starting at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalClock {
    next: u64,
}

impl LogicalClock {
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    /// Tick the next call to [`ModalClock::now`] will return.
    #[must_use]
    pub const fn peek(&self) -> u64 {
        self.next
    }
}

impl Default for LogicalClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ModalClock for LogicalClock {
    fn now(&mut self) -> u64 {
        let tick = self.next;
        self.next = self.next.saturating_add(1);
        tick
    }
}

/// Milliseconds elapsed since creation, never decreasing.
///
/// Two insertions within the same millisecond share a tick.
#[derive(Debug, Clone)]
pub struct WallClock {
    origin: Instant,
    last: u64,
}

impl WallClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            last: 0,
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ModalClock for WallClock {
    fn now(&mut self) -> u64 {
        let elapsed = u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.last = self.last.max(elapsed);
        self.last
    }
}

/// Externally driven clock. Clones share the same value.
///
/// ```
/// use modalq_core::clock::{ManualClock, ModalClock};
///
/// let clock = ManualClock::new(1000);
/// let mut reader = clock.clone();
/// assert_eq!(reader.now(), 1000);
/// clock.advance(5);
/// assert_eq!(reader.now(), 1005);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    tick: Arc<AtomicU64>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start: u64) -> Self {
        Self {
            tick: Arc::new(AtomicU64::new(start)),
        }
    }

    pub fn set(&self, tick: u64) {
        self.tick.store(tick, Ordering::Relaxed);
    }

    pub fn advance(&self, by: u64) {
        self.tick.fetch_add(by, Ordering::Relaxed);
    }

    #[must_use]
    pub fn get(&self) -> u64 {
        self.tick.load(Ordering::Relaxed)
    }
}

impl ModalClock for ManualClock {
    fn now(&mut self) -> u64 {
        self.get()
    }
}

/// Clock chosen at runtime from configuration.
#[derive(Debug, Clone)]
pub enum ClockSource {
    Logical(LogicalClock),
    Wall(WallClock),
}

impl ClockSource {
    #[must_use]
    pub fn from_kind(kind: ClockKind) -> Self {
        match kind {
            ClockKind::Logical => Self::Logical(LogicalClock::new()),
            ClockKind::Wall => Self::Wall(WallClock::new()),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ClockKind {
        match self {
            Self::Logical(_) => ClockKind::Logical,
            Self::Wall(_) => ClockKind::Wall,
        }
    }
}

impl Default for ClockSource {
    fn default() -> Self {
        Self::Logical(LogicalClock::new())
    }
}

impl ModalClock for ClockSource {
    fn now(&mut self) -> u64 {
        match self {
            Self::Logical(clock) => clock.now(),
            Self::Wall(clock) => clock.now(),
        }
    }
}
