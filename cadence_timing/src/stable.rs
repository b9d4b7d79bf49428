// Copyright 2025 the Cadence Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Period-stable repeating timer runner.
//!
//! [`StableInterval`] spaces successive invocation *starts* a constant period
//! apart by subtracting the callback's own execution (and settle) time from
//! the wait before the next cycle, clamped at zero. A plain
//! [`Interval`](crate::Interval) instead waits the full period between fires
//! regardless of how long the callback ran.

use core::fmt;

use alloc::boxed::Box;

use crate::clock::Clock;

/// Completion signal returned by a [`StableInterval`] callback.
///
/// Synchronous callbacks return [`Settle::Done`] and the cycle completes
/// immediately. Callbacks that kick off asynchronous work return
/// [`Settle::Pending`]; the cycle then stays suspended until the host reports
/// settlement via [`StableInterval::settle`], and the settle timestamp counts
/// toward the elapsed time of the cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Settle {
    /// The callback finished synchronously.
    Done,
    /// The callback started asynchronous work that settles later.
    Pending,
}

/// Callback invoked by [`StableInterval`] runners.
pub type StableCallback = Box<dyn FnMut() -> Settle>;

/// Scheduling state: at most one live deadline or suspended cycle at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum State {
    /// Nothing scheduled.
    #[default]
    Idle,
    /// Waiting for the next cycle to become due.
    Scheduled {
        /// When the next cycle starts, in clock milliseconds.
        deadline: u64,
    },
    /// Callback invoked, awaiting settlement of its asynchronous work.
    Settling {
        /// When the current cycle's invocation started.
        start: u64,
    },
}

/// Runs a callback repeatedly, spacing invocation starts by a stable period.
///
/// Each cycle records the invocation start, runs the callback, and takes the
/// end timestamp once the callback has settled. The next cycle is then armed
/// after `max(0, period - elapsed)` milliseconds, so when the callback is
/// slow the wait shrinks, and when `elapsed >= period` the next cycle starts
/// on the next poll. There is no backlog catch-up beyond that one clamped
/// cycle, and cycles never overlap: while a cycle is settling, polls do
/// nothing.
///
/// Negative-period, absent-callback, rescheduling, and cancellation semantics
/// match [`Interval`](crate::Interval).
///
/// ```
/// use cadence_timing::{ManualClock, Settle, StableInterval};
///
/// let clock = ManualClock::new(0);
/// let mut stable = StableInterval::new();
/// stable.schedule(|| Settle::Done, 10, &clock);
///
/// clock.advance(10);
/// assert!(stable.poll(&clock)); // first cycle at t = 10
/// assert!(!stable.poll(&clock)); // next cycle not due until t = 20
/// ```
#[derive(Default)]
pub struct StableInterval {
    callback: Option<StableCallback>,
    /// Nominal period in milliseconds; meaningful only while armed.
    period: u64,
    state: State,
}

impl StableInterval {
    /// Creates an idle runner with nothing scheduled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            callback: None,
            period: 0,
            state: State::Idle,
        }
    }

    /// Schedules `callback` to run with starts spaced `period` milliseconds.
    ///
    /// Any in-flight schedule (pending deadline or suspended cycle) is
    /// cancelled first. A negative `period` leaves the runner idle.
    pub fn schedule<F>(&mut self, callback: F, period: i64, clock: &impl Clock)
    where
        F: FnMut() -> Settle + 'static,
    {
        self.schedule_with(Some(Box::new(callback)), period, clock);
    }

    /// Like [`StableInterval::schedule`], but the callback may be absent.
    ///
    /// An absent callback settles each cycle immediately with zero elapsed
    /// time.
    pub fn schedule_with(
        &mut self,
        callback: Option<StableCallback>,
        period: i64,
        clock: &impl Clock,
    ) {
        self.cancel();
        self.callback = callback;
        if let Ok(period) = u64::try_from(period) {
            self.period = period;
            self.state = State::Scheduled {
                deadline: clock.now() + period,
            };
        }
    }

    /// Starts the next cycle if it is due, invoking the callback.
    ///
    /// Returns `true` if a cycle started. When the callback returns
    /// [`Settle::Done`] the cycle completes within this call and the next
    /// deadline is armed; on [`Settle::Pending`] the runner suspends until
    /// [`StableInterval::settle`]. While suspended, further polls are no-ops,
    /// so invocations are strictly sequential.
    ///
    /// A callback that panics out of this call leaves the cycle suspended, so
    /// a host that catches the panic and keeps polling cannot trigger a
    /// duplicate invocation; cancel or reschedule to recover.
    pub fn poll(&mut self, clock: &impl Clock) -> bool {
        let State::Scheduled { deadline } = self.state else {
            return false;
        };
        if clock.now() < deadline {
            return false;
        }
        let start = clock.now();
        // Suspend before invoking: the past-due deadline must be consumed
        // even if the callback unwinds.
        self.state = State::Settling { start };
        let outcome = match self.callback.as_mut() {
            Some(callback) => callback(),
            None => Settle::Done,
        };
        if outcome == Settle::Done {
            self.finish_cycle(start, clock.now());
        }
        true
    }

    /// Reports that the current cycle's asynchronous work has settled.
    ///
    /// Completes a cycle suspended by a [`Settle::Pending`] callback, using
    /// the clock's current time as the cycle end. Ignored unless a cycle is
    /// actually settling, so a late settlement after [`StableInterval::cancel`]
    /// or a reschedule cannot resurrect the old cycle.
    pub fn settle(&mut self, clock: &impl Clock) {
        if let State::Settling { start } = self.state {
            self.finish_cycle(start, clock.now());
        }
    }

    /// Cancels the schedule from any state.
    ///
    /// After cancellation no further invocation can occur. Call this on
    /// unmount, or just drop the runner.
    pub fn cancel(&mut self) {
        self.state = State::Idle;
    }

    /// Returns `true` while a deadline is armed for the next cycle.
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        matches!(self.state, State::Scheduled { .. })
    }

    /// Returns `true` while a cycle is suspended awaiting settlement.
    #[must_use]
    pub fn is_settling(&self) -> bool {
        matches!(self.state, State::Settling { .. })
    }

    /// Arms the next deadline from a completed cycle's execution window.
    fn finish_cycle(&mut self, start: u64, end: u64) {
        let elapsed = end.saturating_sub(start);
        // max(0, period - elapsed): a slow cycle starts the next one as soon
        // as the host polls again.
        let delay = self.period.saturating_sub(elapsed);
        self.state = State::Scheduled {
            deadline: end + delay,
        };
    }
}

impl fmt::Debug for StableInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StableInterval")
            .field("period", &self.period)
            .field("state", &self.state)
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use core::cell::Cell;

    use super::*;
    use crate::clock::ManualClock;

    #[test]
    fn fast_callback_keeps_nominal_spacing() {
        let clock = ManualClock::new(0);
        let count = Rc::new(Cell::new(0));
        let inner = Rc::clone(&count);
        let mut stable = StableInterval::new();
        stable.schedule(
            move || {
                inner.set(inner.get() + 1);
                Settle::Done
            },
            10,
            &clock,
        );

        clock.advance(10);
        assert!(stable.poll(&clock));
        assert_eq!(count.get(), 1);

        // Zero elapsed: the next start is a full period away.
        clock.advance(9);
        assert!(!stable.poll(&clock));
        clock.advance(1);
        assert!(stable.poll(&clock));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn slow_sync_callback_clamps_next_delay_to_zero() {
        let clock = Rc::new(ManualClock::new(0));
        let count = Rc::new(Cell::new(0));
        let inner = Rc::clone(&count);
        let busy_clock = Rc::clone(&clock);
        let mut stable = StableInterval::new();
        // Callback "blocks" for 10 ms, well past the 4 ms period.
        stable.schedule(
            move || {
                inner.set(inner.get() + 1);
                busy_clock.advance(10);
                Settle::Done
            },
            4,
            &*clock,
        );

        // Drive the host loop across a 10 ms window: only the t = 4 cycle
        // fits, because its own execution consumes the rest of the window.
        while clock.now() < 10 {
            clock.advance(1);
            stable.poll(&*clock);
        }
        assert_eq!(count.get(), 1);

        // The clamped next cycle starts immediately at t = 14.
        assert!(stable.poll(&*clock));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn pending_callback_suspends_until_settle() {
        let clock = ManualClock::new(0);
        let count = Rc::new(Cell::new(0));
        let inner = Rc::clone(&count);
        let mut stable = StableInterval::new();
        stable.schedule(
            move || {
                inner.set(inner.get() + 1);
                Settle::Pending
            },
            4,
            &clock,
        );

        clock.advance(4);
        assert!(stable.poll(&clock));
        assert!(stable.is_settling());
        assert_eq!(count.get(), 1);

        // No overlap: polls during settlement do nothing.
        clock.advance(4);
        assert!(!stable.poll(&clock));
        assert_eq!(count.get(), 1);

        // Settles 8 ms after the start; elapsed exceeds the period, so the
        // next cycle is due immediately.
        clock.advance(4);
        stable.settle(&clock);
        assert!(stable.is_scheduled());
        assert!(stable.poll(&clock));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn settle_time_shorter_than_period_shrinks_the_wait() {
        let clock = ManualClock::new(0);
        let mut stable = StableInterval::new();
        stable.schedule(|| Settle::Pending, 10, &clock);

        clock.advance(10);
        assert!(stable.poll(&clock)); // start at t = 10

        clock.advance(4);
        stable.settle(&clock); // end at t = 14, elapsed 4

        // Next start at t = 20: 14 + max(0, 10 - 4).
        clock.advance(5);
        assert!(!stable.poll(&clock));
        clock.advance(1);
        assert!(stable.poll(&clock));
    }

    #[test]
    fn settle_without_suspended_cycle_is_ignored() {
        let clock = ManualClock::new(0);
        let mut stable = StableInterval::new();
        stable.schedule(|| Settle::Done, 10, &clock);

        stable.settle(&clock);
        assert!(stable.is_scheduled());

        clock.advance(9);
        assert!(!stable.poll(&clock));
    }

    #[test]
    fn cancel_while_settling_discards_the_cycle() {
        let clock = ManualClock::new(0);
        let count = Rc::new(Cell::new(0));
        let inner = Rc::clone(&count);
        let mut stable = StableInterval::new();
        stable.schedule(
            move || {
                inner.set(inner.get() + 1);
                Settle::Pending
            },
            4,
            &clock,
        );

        clock.advance(4);
        assert!(stable.poll(&clock));
        stable.cancel();

        // A late settlement must not re-arm the cancelled schedule.
        clock.advance(4);
        stable.settle(&clock);
        assert!(!stable.is_scheduled());
        clock.advance(100);
        assert!(!stable.poll(&clock));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn negative_period_never_schedules() {
        let clock = ManualClock::new(0);
        let count = Rc::new(Cell::new(0));
        let inner = Rc::clone(&count);
        let mut stable = StableInterval::new();
        stable.schedule(
            move || {
                inner.set(inner.get() + 1);
                Settle::Done
            },
            -1,
            &clock,
        );

        assert!(!stable.is_scheduled());
        clock.advance(1_000);
        assert!(!stable.poll(&clock));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn absent_callback_settles_immediately() {
        let clock = ManualClock::new(0);
        let mut stable = StableInterval::new();
        stable.schedule_with(None, 4, &clock);

        clock.advance(4);
        assert!(stable.poll(&clock));
        assert!(stable.is_scheduled());
        assert!(!stable.is_settling());
    }

    #[test]
    fn reschedule_while_settling_starts_fresh() {
        let clock = ManualClock::new(0);
        let mut stable = StableInterval::new();
        stable.schedule(|| Settle::Pending, 4, &clock);

        clock.advance(4);
        assert!(stable.poll(&clock));
        assert!(stable.is_settling());

        let count = Rc::new(Cell::new(0));
        let inner = Rc::clone(&count);
        stable.schedule(
            move || {
                inner.set(inner.get() + 1);
                Settle::Done
            },
            2,
            &clock,
        );
        assert!(stable.is_scheduled());

        clock.advance(2);
        assert!(stable.poll(&clock));
        assert_eq!(count.get(), 1);
    }
}
