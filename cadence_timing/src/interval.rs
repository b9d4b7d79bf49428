// Copyright 2025 the Cadence Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-period repeating timer runner.

use core::fmt;

use alloc::boxed::Box;

use crate::clock::Clock;
use crate::timeout::Callback;

/// Runs a callback repeatedly at a fixed nominal period.
///
/// The first invocation happens `period` milliseconds after scheduling, not
/// immediately. On each fire the next deadline is measured from the fire
/// timestamp, so the spacing is nominal and does not account for how long the
/// callback itself takes; use [`StableInterval`](crate::StableInterval) when
/// execution time should be subtracted from the wait.
///
/// Like [`Timeout`](crate::Timeout), an `Interval` holds at most one live
/// deadline; rescheduling cancels and re-arms with the latest callback and
/// period, a negative period never schedules, and an absent callback fires as
/// a silent no-op. At most one invocation happens per [`Interval::poll`]
/// call, so a stalled host resumes at the nominal period without a catch-up
/// burst.
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// use cadence_timing::{Interval, ManualClock};
///
/// let clock = ManualClock::new(0);
/// let fired = Rc::new(Cell::new(0));
///
/// let mut ticker = Interval::new();
/// let count = Rc::clone(&fired);
/// ticker.schedule(move || count.set(count.get() + 1), 16, &clock);
///
/// // Host frame loop.
/// for _ in 0..4 {
///     clock.advance(16);
///     ticker.poll(&clock);
/// }
/// assert_eq!(fired.get(), 4);
/// ```
#[derive(Default)]
pub struct Interval {
    callback: Option<Callback>,
    /// Nominal period in milliseconds; meaningful only while armed.
    period: u64,
    /// The single live deadline, in clock milliseconds.
    deadline: Option<u64>,
}

impl Interval {
    /// Creates an idle runner with nothing scheduled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            callback: None,
            period: 0,
            deadline: None,
        }
    }

    /// Schedules `callback` to run every `period` milliseconds.
    ///
    /// Any previously pending deadline is cancelled first. A negative
    /// `period` leaves the runner idle.
    pub fn schedule<F>(&mut self, callback: F, period: i64, clock: &impl Clock)
    where
        F: FnMut() + 'static,
    {
        self.schedule_with(Some(Box::new(callback)), period, clock);
    }

    /// Like [`Interval::schedule`], but the callback may be absent.
    pub fn schedule_with(&mut self, callback: Option<Callback>, period: i64, clock: &impl Clock) {
        self.cancel();
        self.callback = callback;
        if let Ok(period) = u64::try_from(period) {
            self.period = period;
            self.deadline = Some(clock.now() + period);
        }
    }

    /// Fires the pending deadline if it is due, invoking the callback.
    ///
    /// Returns `true` if the deadline fired. The next deadline is armed from
    /// the fire timestamp before the callback runs, keeping the nominal
    /// spacing independent of callback execution time.
    pub fn poll(&mut self, clock: &impl Clock) -> bool {
        let Some(deadline) = self.deadline else {
            return false;
        };
        let now = clock.now();
        if now < deadline {
            return false;
        }
        self.deadline = Some(now + self.period);
        if let Some(callback) = self.callback.as_mut() {
            callback();
        }
        true
    }

    /// Cancels the recurring schedule.
    ///
    /// After cancellation no further invocation can occur. Call this on
    /// unmount, or just drop the runner.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns `true` while the recurring schedule is armed.
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.deadline.is_some()
    }
}

impl fmt::Debug for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interval")
            .field("period", &self.period)
            .field("deadline", &self.deadline)
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}
