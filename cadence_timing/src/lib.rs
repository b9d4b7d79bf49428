// Copyright 2025 the Cadence Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cadence Timing: host-agnostic timer runners for UI components.
//!
//! This crate provides small per-component-instance timer state machines for
//! hosts that own a single-threaded cooperative loop. Nothing here spawns
//! threads or sleeps; each runner keeps at most one live deadline and the
//! host drives it by polling once per frame against a [`Clock`].
//!
//! The core concepts are:
//!
//! - [`Clock`]: the timer primitive supplied by the host, a monotonic
//!   millisecond timestamp source. [`ManualClock`] is a deterministic
//!   implementation for tests and headless hosts.
//! - [`Timeout`]: runs a callback once after a delay.
//! - [`Interval`]: runs a callback repeatedly at a fixed nominal period,
//!   without accounting for the callback's own execution time.
//! - [`StableInterval`]: runs a callback repeatedly with invocation *starts*
//!   spaced a stable period apart, by subtracting the callback's observed
//!   execution (and asynchronous settle) time from the next wait, clamped at
//!   zero. Callbacks report completion through the [`Settle`] signal.
//!
//! ## Host integration
//!
//! A runner is owned by one component instance and follows the instance's
//! lifecycle: construct on mount, call `schedule(..)` whenever the callback
//! or delay/period changes (the previous deadline is cancelled and a fresh
//! one armed with the latest values), and call `cancel()` — or simply drop
//! the runner — on unmount. Once cancelled, no further invocation from the
//! old schedule can occur.
//!
//! Misuse degrades to inaction rather than erroring: a negative delay or
//! period never schedules anything, and an absent callback makes the fire a
//! silent no-op. Panics from callbacks propagate to the polling host
//! untouched.
//!
//! ## Minimal example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use cadence_timing::{Interval, ManualClock};
//!
//! let clock = ManualClock::new(0);
//! let fired = Rc::new(Cell::new(0));
//!
//! let mut ticker = Interval::new();
//! let count = Rc::clone(&fired);
//! ticker.schedule(move || count.set(count.get() + 1), 16, &clock);
//!
//! // Host frame loop.
//! for _ in 0..4 {
//!     clock.advance(16);
//!     ticker.poll(&clock);
//! }
//! assert_eq!(fired.get(), 4);
//! ```
//!
//! All timestamps live in host-chosen milliseconds and are expected to be
//! monotonic non-decreasing. This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod clock;
mod interval;
mod stable;
mod timeout;

pub use clock::{Clock, ManualClock};
pub use interval::Interval;
pub use stable::{Settle, StableCallback, StableInterval};
pub use timeout::{Callback, Timeout};
