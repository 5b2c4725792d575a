//! Wrap-safe timing over a free-running millisecond counter
//!
//! All timing math in this crate runs against a monotonic 32-bit
//! millisecond counter that rolls over to zero after `u32::MAX`
//! (about 49.7 days). [`wrap_safe_elapsed`] absorbs a single rollover
//! between two observations into a correct elapsed duration, so periodic
//! work keeps firing across the wrap without any special casing at call
//! sites.
//!
//! The [`TimeSource`] trait abstracts where the counter comes from:
//! a hardware timer on the target, [`SystemClock`] on a host, or
//! [`MockClock`] in tests.

use core::cell::Cell;

/// Monotonic timestamp in milliseconds since boot.
///
/// Wraps to zero after `u32::MAX` ms. Never compare timestamps with `<`;
/// use [`wrap_safe_elapsed`] instead.
pub type Timestamp = u32;

/// Elapsed milliseconds from `earlier` to `now` on a wrapping counter.
///
/// Correct for any pair including `now < earlier` (a single rollover in
/// between). Written in the explicit two-branch form so the rollover
/// arithmetic is visible:
///
/// ```
/// use stratus_core::time::wrap_safe_elapsed;
///
/// assert_eq!(wrap_safe_elapsed(1_000, 6_000), 5_000);
/// // Counter wrapped between the two observations:
/// assert_eq!(wrap_safe_elapsed(u32::MAX - 99, 400), 500);
/// ```
pub const fn wrap_safe_elapsed(earlier: Timestamp, now: Timestamp) -> u32 {
    if now >= earlier {
        now - earlier
    } else {
        // One rollover in between: distance to the wrap point, plus the
        // step through zero, plus the new counter value.
        now + (Timestamp::MAX - earlier) + 1
    }
}

/// Source of the monotonic millisecond counter.
///
/// Implementations read a hardware timer, an RTOS tick count, or a host
/// clock. The counter must be monotonic up to the 32-bit wrap; wall-clock
/// adjustments must not leak into it.
pub trait TimeSource {
    /// Current counter value in milliseconds.
    fn now(&self) -> Timestamp;
}

/// Host clock backed by `std::time::Instant`, truncated to the 32-bit
/// counter width.
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct SystemClock {
    start: std::time::Instant,
}

#[cfg(feature = "std")]
impl SystemClock {
    /// Counter starts at zero when the clock is created.
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TimeSource for SystemClock {
    fn now(&self) -> Timestamp {
        // Truncation reproduces the hardware counter's wrap behavior.
        self.start.elapsed().as_millis() as Timestamp
    }
}

/// Controllable clock for tests and host simulations.
///
/// Interior mutability lets a test hold a shared reference while the code
/// under test reads it through `&dyn TimeSource`:
///
/// ```
/// use stratus_core::time::{MockClock, TimeSource};
///
/// let clock = MockClock::new(1_000);
/// clock.advance(250);
/// assert_eq!(clock.now(), 1_250);
/// ```
#[derive(Debug)]
pub struct MockClock {
    timestamp: Cell<Timestamp>,
}

impl MockClock {
    /// Clock frozen at `timestamp` until moved.
    pub const fn new(timestamp: Timestamp) -> Self {
        Self {
            timestamp: Cell::new(timestamp),
        }
    }

    /// Jump to an absolute counter value.
    pub fn set(&self, timestamp: Timestamp) {
        self.timestamp.set(timestamp);
    }

    /// Advance by `ms`, wrapping like the real counter.
    pub fn advance(&self, ms: u32) {
        self.timestamp.set(self.timestamp.get().wrapping_add(ms));
    }
}

impl TimeSource for MockClock {
    fn now(&self) -> Timestamp {
        self.timestamp.get()
    }
}

/// Readable names for the intervals the deployment actually uses.
///
/// Milliseconds, sized for the 32-bit counter.
pub mod intervals {
    /// One second.
    pub const SECOND: u32 = 1_000;
    /// Five seconds.
    pub const TIME_5S: u32 = 5_000;
    /// Ten seconds.
    pub const TIME_10S: u32 = 10_000;
    /// Fifteen seconds.
    pub const TIME_15S: u32 = 15_000;
    /// Thirty seconds.
    pub const TIME_30S: u32 = 30_000;
    /// One minute.
    pub const MINUTE: u32 = 60_000;
    /// Five minutes.
    pub const TIME_5M: u32 = 300_000;
    /// Ten minutes — the reference history-log roll interval.
    pub const TIME_10M: u32 = 600_000;
    /// Fifteen minutes.
    pub const TIME_15M: u32 = 900_000;
    /// Thirty minutes.
    pub const TIME_30M: u32 = 1_800_000;
    /// One hour.
    pub const HOUR: u32 = 3_600_000;
    /// Five hours.
    pub const TIME_5H: u32 = 18_000_000;
    /// Ten hours.
    pub const TIME_10H: u32 = 36_000_000;
    /// Twelve hours.
    pub const TIME_12H: u32 = 43_200_000;
    /// One day.
    pub const DAY: u32 = 86_400_000;
}
