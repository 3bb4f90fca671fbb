//! Variable-latency work scheduling.
//!
//! A [`LatencyController`] models a unit of work that takes N cycles. It provides:
//! 1. **Scheduling:** Captures an effect value and a completion cycle (`now + latency`).
//! 2. **Status:** `is_busy` while the completion cycle is in the future, `is_ready` once reached.
//! 3. **Maturing:** Hands the effect back exactly once, on the cycle before completion, so
//!    that its writes to pending state become visible on the completion cycle.
//! 4. **Cancellation:** Drops an in-flight effect on flush.
//! 5. **Draining:** Hands back whatever is still in flight, regardless of the clock.
//!
//! The effect is plain data (`E` is usually a small enum) interpreted by the owning
//! unit during the apply phase; the controller never runs code itself.

use crate::sim::cell::Staged;
use crate::sim::clock::Clock;

/// Completion cycle plus the deferred effect of a multi-cycle operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LatencyController<E> {
    done: Staged<Option<u64>>,
    effect: Option<E>,
}

impl<E> Default for LatencyController<E> {
    fn default() -> Self {
        Self {
            done: Staged::default(),
            effect: None,
        }
    }
}

impl<E> LatencyController<E> {
    /// Creates an idle controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Commits the staged completion cycle (clock edge).
    #[inline]
    pub fn advance(&mut self) {
        self.done.commit();
    }

    /// True while the committed completion cycle lies in the future.
    #[inline]
    pub fn is_busy(&self, clock: &Clock) -> bool {
        matches!(*self.done.read(), Some(done) if done > clock.cycle())
    }

    /// True once the running clock has reached the committed completion cycle.
    ///
    /// An idle controller that never scheduled anything is not ready.
    #[inline]
    pub fn is_ready(&self, clock: &Clock) -> bool {
        clock.is_running() && matches!(*self.done.read(), Some(done) if clock.cycle() >= done)
    }

    /// Schedules `effect` to complete `latency` cycles from now.
    ///
    /// Silently ignored if the clock is stopped or the controller is busy;
    /// returns whether the effect was accepted.
    pub fn schedule(&mut self, clock: &Clock, effect: E, latency: u64) -> bool {
        if !clock.is_running() || self.is_busy(clock) {
            return false;
        }
        self.done.stage(Some(clock.cycle() + latency));
        self.effect = Some(effect);
        true
    }

    /// Discards the scheduled completion and its effect.
    ///
    /// Only the pending completion is cleared; `is_busy` keeps reporting the
    /// committed state until the next clock edge.
    pub fn cancel(&mut self) {
        self.done.stage(None);
        self.effect = None;
    }

    /// Returns the effect if it matures this cycle.
    ///
    /// The effect is consumed, so it is applied at most once.
    pub fn take_matured(&mut self, clock: &Clock) -> Option<E> {
        match *self.done.pending() {
            Some(done) if clock.cycle() + 1 == done => self.effect.take(),
            _ => None,
        }
    }

    /// Returns the in-flight effect unconditionally; used to drain at shutdown.
    pub const fn force_take(&mut self) -> Option<E> {
        self.effect.take()
    }

    /// Mutable access to the in-flight effect, for partial cancellation.
    pub const fn in_flight_mut(&mut self) -> Option<&mut E> {
        self.effect.as_mut()
    }
}
