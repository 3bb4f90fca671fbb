//! Branch prediction unit (BRU).
//!
//! A direct-mapped table of 2-bit saturating counters indexed by `pc mod entries`.
//! It provides:
//! 1. **Prediction:** Taken when the counter's high bit is set, read from committed state.
//! 2. **Training:** Counters move toward the committed outcome of each conditional branch.
//! 3. **Accounting:** Lookups and correct predictions per slot and in aggregate.
//!
//! PCs that alias to the same slot share a counter; there are no tags.
//!
//! # Performance
//!
//! - **Time Complexity:** `predict()` and `update()` are O(1).
//! - **Space Complexity:** O(N) for N table entries.

use crate::core::pipeline::signals::BranchOutcome;
use crate::core::pipeline::traits::Sequential;
use crate::sim::cell::Staged;

/// Initial counter value: weakly not-taken.
const WEAKLY_NOT_TAKEN: u8 = 0b01;

/// Saturation limit of a 2-bit counter.
const COUNTER_MAX: u8 = 0b11;

/// Counter bit that selects a taken prediction.
const TAKEN_BIT: u8 = 0b10;

/// Counters plus per-slot accuracy bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Table {
    counters: Vec<u8>,
    lookups: Vec<u64>,
    correct: Vec<u64>,
}

/// 2-bit saturating-counter branch predictor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BranchPredictor {
    table: Staged<Table>,
}

impl BranchPredictor {
    /// Creates a predictor with `entries` slots, all weakly not-taken.
    pub fn new(entries: usize) -> Self {
        let entries = entries.max(1);
        Self {
            table: Staged::new(Table {
                counters: vec![WEAKLY_NOT_TAKEN; entries],
                lookups: vec![0; entries],
                correct: vec![0; entries],
            }),
        }
    }

    /// Number of table slots.
    #[inline]
    pub fn entries(&self) -> usize {
        self.table.read().counters.len()
    }

    /// Slot used by `pc`.
    #[inline]
    pub fn index(&self, pc: u32) -> usize {
        pc as usize % self.entries()
    }

    /// Predicted direction for the branch at `pc`.
    #[inline]
    pub fn predict(&self, pc: u32) -> bool {
        self.counter(pc) & TAKEN_BIT != 0
    }

    /// Committed counter value for `pc`'s slot.
    pub fn counter(&self, pc: u32) -> u8 {
        self.table.read().counters[self.index(pc)]
    }

    /// Trains `pc`'s slot with an actual outcome and records whether it was predicted.
    pub fn update(&mut self, pc: u32, taken: bool, was_correct: bool) {
        let idx = self.index(pc);
        let table = self.table.pending_mut();
        let counter = &mut table.counters[idx];
        *counter = if taken {
            (*counter + 1).min(COUNTER_MAX)
        } else {
            counter.saturating_sub(1)
        };
        table.lookups[idx] += 1;
        if was_correct {
            table.correct[idx] += 1;
        }
    }

    /// Applies the reorder buffer's committed branch outcome, if any.
    pub fn compute(&mut self, outcome: Option<BranchOutcome>) {
        if let Some(o) = outcome {
            self.update(o.pc, o.taken, o.correct);
        }
    }

    /// Branches resolved so far.
    pub fn lookups(&self) -> u64 {
        self.table.read().lookups.iter().sum()
    }

    /// Branches whose prediction was correct.
    pub fn correct(&self) -> u64 {
        self.table.read().correct.iter().sum()
    }

    /// Aggregate accuracy in `[0, 1]`; `None` before any branch resolves.
    pub fn accuracy(&self) -> Option<f64> {
        let lookups = self.lookups();
        (lookups > 0).then(|| self.correct() as f64 / lookups as f64)
    }

    /// Accuracy of `pc`'s slot; `None` before that slot resolves a branch.
    pub fn slot_accuracy(&self, pc: u32) -> Option<f64> {
        let idx = self.index(pc);
        let table = self.table.read();
        (table.lookups[idx] > 0).then(|| table.correct[idx] as f64 / table.lookups[idx] as f64)
    }
}

impl Sequential for BranchPredictor {
    fn advance(&mut self) {
        self.table.commit();
    }
}
