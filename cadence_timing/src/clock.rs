// Copyright 2025 the Cadence Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The timer-primitive contract supplied by the host runtime.

use core::cell::Cell;

/// A monotonic millisecond clock supplied by the host runtime.
///
/// This is the only surface the runners in this crate require from their
/// host: a timestamp source. Scheduling and cancellation are handled by the
/// runners themselves as deadlines compared against `now()` on each poll.
///
/// Timestamps are expected to be monotonic non-decreasing. The origin is
/// arbitrary; only differences matter.
pub trait Clock {
    /// Returns the current time in milliseconds.
    fn now(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> u64 {
        (**self).now()
    }
}

/// A manually advanced [`Clock`] for tests and headless hosts.
///
/// Time only moves when the owner calls [`ManualClock::advance`] or
/// [`ManualClock::set`], which makes timer behavior fully deterministic.
/// Interior mutability lets a callback advance the same clock its runner
/// reads, so callback execution time can be simulated without sleeping.
///
/// ```
/// use cadence_timing::{Clock, ManualClock};
///
/// let clock = ManualClock::new(1_000);
/// assert_eq!(clock.now(), 1_000);
/// clock.advance(16);
/// assert_eq!(clock.now(), 1_016);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    /// Creates a clock starting at the given timestamp.
    #[must_use]
    pub fn new(now: u64) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    /// Moves the clock to an absolute timestamp.
    ///
    /// Callers are expected to keep time non-decreasing.
    pub fn set(&self, now: u64) {
        self.now.set(now);
    }

    /// Advances the clock by `ms` milliseconds, returning the new timestamp.
    pub fn advance(&self, ms: u64) -> u64 {
        let now = self.now.get() + ms;
        self.now.set(now);
        now
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.get()
    }
}
