// Copyright 2025 the Cadence Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One-shot timer runner.

use alloc::boxed::Box;
use core::fmt;

use crate::clock::Clock;

/// Callback invoked by [`Timeout`] and [`Interval`](crate::Interval) runners.
pub type Callback = Box<dyn FnMut()>;

/// Runs a callback once after a delay.
///
/// A `Timeout` is owned by one component instance and holds at most one
/// pending deadline at a time. Scheduling again cancels the previous deadline
/// and arms a fresh one with the latest callback and delay, so a stale
/// closure can never fire. The host drives the runner by calling
/// [`Timeout::poll`] once per frame.
///
/// A negative delay never schedules anything, and an absent callback makes
/// the fire a silent no-op; neither is an error.
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// use cadence_timing::{ManualClock, Timeout};
///
/// let clock = ManualClock::new(0);
/// let fired = Rc::new(Cell::new(false));
///
/// let mut timeout = Timeout::new();
/// let flag = Rc::clone(&fired);
/// timeout.schedule(move || flag.set(true), 250, &clock);
///
/// clock.advance(249);
/// assert!(!timeout.poll(&clock));
///
/// clock.advance(1);
/// assert!(timeout.poll(&clock));
/// assert!(fired.get());
/// assert!(!timeout.is_scheduled());
/// ```
#[derive(Default)]
pub struct Timeout {
    callback: Option<Callback>,
    /// The single live deadline, in clock milliseconds.
    deadline: Option<u64>,
}

impl Timeout {
    /// Creates an idle runner with nothing scheduled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            callback: None,
            deadline: None,
        }
    }

    /// Schedules `callback` to run once, `delay` milliseconds from now.
    ///
    /// Any previously pending deadline is cancelled first. A negative `delay`
    /// leaves the runner idle.
    pub fn schedule<F>(&mut self, callback: F, delay: i64, clock: &impl Clock)
    where
        F: FnMut() + 'static,
    {
        self.schedule_with(Some(Box::new(callback)), delay, clock);
    }

    /// Like [`Timeout::schedule`], but the callback may be absent.
    ///
    /// With an absent callback the deadline still arms and fires on time; the
    /// fire itself does nothing.
    pub fn schedule_with(&mut self, callback: Option<Callback>, delay: i64, clock: &impl Clock) {
        self.cancel();
        self.callback = callback;
        if let Ok(delay) = u64::try_from(delay) {
            self.deadline = Some(clock.now() + delay);
        }
    }

    /// Fires the pending deadline if it is due, invoking the callback.
    ///
    /// Returns `true` if the deadline fired. A `Timeout` fires at most once
    /// per schedule; the deadline is cleared before the callback runs.
    pub fn poll(&mut self, clock: &impl Clock) -> bool {
        match self.deadline {
            Some(deadline) if clock.now() >= deadline => {
                self.deadline = None;
                if let Some(callback) = self.callback.as_mut() {
                    callback();
                }
                true
            }
            _ => false,
        }
    }

    /// Cancels the pending deadline, if any.
    ///
    /// After cancellation the callback can no longer be invoked from the old
    /// schedule. Call this on unmount, or just drop the runner.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns `true` while a deadline is pending.
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.deadline.is_some()
    }
}

impl fmt::Debug for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeout")
            .field("deadline", &self.deadline)
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}
