// Copyright 2025 the Cadence Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cadence Hover: hover-state tracking for UI components.
//!
//! [`HoverTracker`] turns a native pointer-enter/pointer-leave event pair
//! into a boolean hover flag, with an optional entry delay so that brief
//! pointer passes do not count as hovering. It is a per-component-instance
//! state machine for hosts that own a single-threaded cooperative loop: the
//! host feeds it enter/leave events carrying its own millisecond timestamps
//! and, when a delay is configured, polls it once per frame to fire the
//! pending enter.
//!
//! The tracker is generic over an opaque native event type `E`, which is
//! passed through untouched to the optional enter/leave callbacks; the
//! tracker itself never inspects it.
//!
//! ## Minimal example
//!
//! ```
//! use cadence_hover::{HoverOptions, HoverTracker};
//!
//! // Only count as hovering after the pointer has rested for 100 ms.
//! let mut hover: HoverTracker<&str> =
//!     HoverTracker::with_options(HoverOptions::new().delay(100));
//!
//! hover.on_mouse_enter(&"enter-event", 1_000);
//! assert!(!hover.is_hovering());
//!
//! // Host frame loop reaches t = 1,100 with no intervening leave.
//! assert!(hover.poll(1_100));
//! assert!(hover.is_hovering());
//!
//! hover.on_mouse_leave(&"leave-event");
//! assert!(!hover.is_hovering());
//! ```
//!
//! Lifecycle: construct on mount, call [`HoverTracker::set_delay`] when the
//! configured delay changes between renders, and call [`HoverTracker::cancel`]
//! — or simply drop the tracker — on unmount to discard a pending enter.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::boxed::Box;
use core::fmt;

/// Callback invoked with the native event that triggered a handler.
pub type EventCallback<E> = Box<dyn FnMut(&E)>;

/// Configuration for a [`HoverTracker`].
///
/// Malformed fields are treated as absent: a negative delay behaves like the
/// default of zero.
///
/// ```
/// use cadence_hover::{HoverOptions, HoverTracker};
///
/// let options = HoverOptions::new()
///     .delay(50)
///     .on_enter(|event: &u32| assert_eq!(*event, 7))
///     .on_leave(|_event| {});
/// let tracker = HoverTracker::with_options(options);
/// assert!(!tracker.is_hovering());
/// ```
pub struct HoverOptions<E = ()> {
    delay: u64,
    on_enter: Option<EventCallback<E>>,
    on_leave: Option<EventCallback<E>>,
}

impl<E> HoverOptions<E> {
    /// Creates options with no delay and no callbacks.
    #[must_use]
    pub fn new() -> Self {
        Self {
            delay: 0,
            on_enter: None,
            on_leave: None,
        }
    }

    /// Sets the entry delay in milliseconds.
    ///
    /// With a delay of zero (the default) an enter event sets the hover flag
    /// synchronously. Negative values are treated as absent, meaning zero.
    #[must_use]
    pub fn delay(mut self, delay: i64) -> Self {
        self.delay = u64::try_from(delay).unwrap_or(0);
        self
    }

    /// Sets a callback invoked on every enter event, regardless of delay.
    #[must_use]
    pub fn on_enter<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&E) + 'static,
    {
        self.on_enter = Some(Box::new(callback));
        self
    }

    /// Sets a callback invoked on every leave event.
    #[must_use]
    pub fn on_leave<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&E) + 'static,
    {
        self.on_leave = Some(Box::new(callback));
        self
    }
}

impl<E> Default for HoverOptions<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for HoverOptions<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HoverOptions")
            .field("delay", &self.delay)
            .field("has_on_enter", &self.on_enter.is_some())
            .field("has_on_leave", &self.on_leave.is_some())
            .finish()
    }
}

/// Tracks whether the pointer is hovering one UI element.
///
/// The flag starts `false`, becomes `true` on an enter event (immediately,
/// or after the configured delay with no intervening leave), and returns to
/// `false` on a leave event. At most one pending enter deadline exists at a
/// time; a leave event or teardown cancels it, and a second enter replaces
/// it.
pub struct HoverTracker<E = ()> {
    hovering: bool,
    delay: u64,
    /// Deadline of the pending delayed enter, in host milliseconds.
    pending_enter: Option<u64>,
    on_enter: Option<EventCallback<E>>,
    on_leave: Option<EventCallback<E>>,
}

impl<E> HoverTracker<E> {
    /// Creates a tracker with no delay and no callbacks.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(HoverOptions::new())
    }

    /// Creates a tracker from the given options.
    #[must_use]
    pub fn with_options(options: HoverOptions<E>) -> Self {
        Self {
            hovering: false,
            delay: options.delay,
            pending_enter: None,
            on_enter: options.on_enter,
            on_leave: options.on_leave,
        }
    }

    /// Handles a native pointer-enter event at time `now`.
    ///
    /// Always invokes the `on_enter` callback with the event. With no delay
    /// configured the hover flag is set synchronously; otherwise a pending
    /// enter is armed `delay` milliseconds from `now`, replacing any previous
    /// one, and fires from a later [`HoverTracker::poll`] unless a leave
    /// event cancels it first.
    pub fn on_mouse_enter(&mut self, event: &E, now: u64) {
        if let Some(on_enter) = self.on_enter.as_mut() {
            on_enter(event);
        }
        if self.delay == 0 {
            self.pending_enter = None;
            self.hovering = true;
        } else {
            self.pending_enter = Some(now + self.delay);
        }
    }

    /// Handles a native pointer-leave event.
    ///
    /// Always invokes the `on_leave` callback with the event, cancels any
    /// pending delayed enter, and clears the hover flag synchronously.
    pub fn on_mouse_leave(&mut self, event: &E) {
        if let Some(on_leave) = self.on_leave.as_mut() {
            on_leave(event);
        }
        self.pending_enter = None;
        self.hovering = false;
    }

    /// Fires the pending delayed enter if it is due.
    ///
    /// Returns `true` if the hover flag just became set; a fire that finds
    /// the flag already set returns `false`. Hosts only need to poll when a
    /// delay is configured.
    pub fn poll(&mut self, now: u64) -> bool {
        match self.pending_enter {
            Some(deadline) if now >= deadline => {
                self.pending_enter = None;
                let changed = !self.hovering;
                self.hovering = true;
                changed
            }
            _ => false,
        }
    }

    /// Returns `true` while the element counts as hovered.
    #[must_use]
    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    /// Returns `true` while a delayed enter is pending.
    #[must_use]
    pub fn has_pending_enter(&self) -> bool {
        self.pending_enter.is_some()
    }

    /// Updates the entry delay between renders.
    ///
    /// A changed delay cancels the pending enter, matching the
    /// cancel-and-reschedule discipline for configuration changes. Negative
    /// values are treated as absent, meaning zero.
    pub fn set_delay(&mut self, delay: i64) {
        let delay = u64::try_from(delay).unwrap_or(0);
        if delay != self.delay {
            self.delay = delay;
            self.pending_enter = None;
        }
    }

    /// Cancels the pending delayed enter, if any.
    ///
    /// Call this on unmount, or just drop the tracker.
    pub fn cancel(&mut self) {
        self.pending_enter = None;
    }
}

impl<E> Default for HoverTracker<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for HoverTracker<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HoverTracker")
            .field("hovering", &self.hovering)
            .field("delay", &self.delay)
            .field("pending_enter", &self.pending_enter)
            .field("has_on_enter", &self.on_enter.is_some())
            .field("has_on_leave", &self.on_leave.is_some())
            .finish()
    }
}
