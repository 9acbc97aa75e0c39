//! View state machines, one module per screen.
//!
//! Views hold UI state only; all data flows in from the sync layer via
//! [`crate::app::App`]. State transitions that mirror a slide-out
//! animation are not applied immediately: they are scheduled as a
//! [`Pending`] transition and applied on the next tick after the delay.

pub mod add_task;
pub mod board;
pub mod contacts;
pub mod summary;

use std::time::Instant;

/// A scheduled state transition with a due time.
///
/// Scheduling a new transition while one is pending replaces it; the
/// latest request wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pending<T> {
    /// The state to transition to.
    pub next: T,
    /// When the transition becomes due.
    pub due: Instant,
}

impl<T> Pending<T> {
    /// Schedule a transition to `next` at `due`.
    pub const fn new(next: T, due: Instant) -> Self {
        Self { next, due }
    }

    /// Whether the transition should be applied at `now`.
    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.due
    }
}
