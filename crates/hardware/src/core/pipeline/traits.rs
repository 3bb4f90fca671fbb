//! Clocked Unit Interface.
//!
//! This module defines the trait every stateful unit implements. It provides:
//! 1. **Advance:** Commits all of a unit's staged cells at the clock edge.
//! 2. **Apply:** Runs matured latency-controller effects after the compute phase.
//!
//! Compute is not part of the trait: each unit reads a different
//! subset of its collaborators, which the orchestrator passes explicitly.

use crate::sim::clock::Clock;

/// A unit whose state is double-buffered and advanced by the global clock.
pub trait Sequential {
    /// Copies every pending cell into its committed slot.
    fn advance(&mut self);

    /// Applies effects whose latency matures this cycle.
    ///
    /// Units without multi-cycle work keep the default no-op.
    fn apply(&mut self, _clock: &Clock) {}
}
