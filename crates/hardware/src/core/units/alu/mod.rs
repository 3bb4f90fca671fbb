//! Arithmetic Logic Unit (ALU).
//!
//! This module implements the single integer ALU fed by the reservation station.
//! It provides a fixed one-cycle latency through a latency controller and
//! publishes each result on the common data bus for exactly one cycle.
//!
//! Operations are organized into submodules by category:
//! - [`arithmetic`]: Add, Sub
//! - [`logic`]:      And, Or, Xor and the six comparison predicates
//! - [`shifts`]:     Sll, Srl, Sra

/// Integer arithmetic operations (add, subtract).
pub mod arithmetic;

/// Bitwise logical and comparison operations.
pub mod logic;

/// Shift operations (sll, srl, sra).
pub mod shifts;

use tracing::warn;

use crate::core::pipeline::signals::{AluIssue, AluOp, AluOutput, Control};
use crate::core::pipeline::traits::Sequential;
use crate::sim::cell::Staged;
use crate::sim::clock::Clock;
use crate::sim::latency::LatencyController;

/// Cycles from issue to result.
pub const ALU_LATENCY: u64 = 1;

/// Arithmetic Logic Unit with its in-flight operation and bus output.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Alu {
    pipe: LatencyController<AluIssue>,
    output: Staged<Option<AluOutput>>,
}

impl Alu {
    /// Creates an idle ALU.
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes an integer ALU operation.
    ///
    /// # Examples
    ///
    /// ```
    /// use tomasim_core::core::units::alu::Alu;
    /// use tomasim_core::core::pipeline::signals::AluOp;
    ///
    /// assert_eq!(Alu::execute(AluOp::Add, 0xFFFF_FFFF, 1), 0);
    /// assert_eq!(Alu::execute(AluOp::Sra, 0x8000_0000, 31), 0xFFFF_FFFF);
    /// assert_eq!(Alu::execute(AluOp::Lt, -5_i32 as u32, 10), 1);
    /// assert_eq!(Alu::execute(AluOp::Ltu, -5_i32 as u32, 10), 0);
    /// ```
    pub const fn execute(op: AluOp, a: u32, b: u32) -> u32 {
        match op {
            AluOp::Add | AluOp::Sub => arithmetic::execute(op, a, b),
            AluOp::Sll | AluOp::Srl | AluOp::Sra => shifts::execute(op, a, b),
            AluOp::And
            | AluOp::Or
            | AluOp::Xor
            | AluOp::Eq
            | AluOp::Ne
            | AluOp::Lt
            | AluOp::Ltu
            | AluOp::Ge
            | AluOp::Geu => logic::execute(op, a, b),
        }
    }

    /// Result on the bus this cycle.
    #[inline]
    pub const fn output(&self) -> Option<AluOutput> {
        *self.output.read()
    }

    /// True while an operation is in flight.
    pub fn is_busy(&self, clock: &Clock) -> bool {
        self.pipe.is_busy(clock)
    }

    /// Accepts the reservation station's committed issue, or cancels on flush.
    pub fn compute(&mut self, clock: &Clock, ctrl: &Control, issue: Option<AluIssue>) {
        self.output.stage(None);
        if ctrl.is_flush() {
            self.pipe.cancel();
            return;
        }
        if let Some(issue) = issue {
            if !self.pipe.schedule(clock, issue, ALU_LATENCY) {
                warn!(id = issue.id.0, "ALU busy, issue dropped");
            }
        }
    }
}

impl Sequential for Alu {
    fn advance(&mut self) {
        self.pipe.advance();
        self.output.commit();
    }

    fn apply(&mut self, clock: &Clock) {
        if let Some(issue) = self.pipe.take_matured(clock) {
            self.output.stage(Some(AluOutput {
                id: issue.id,
                value: Self::execute(issue.op, issue.lhs, issue.rhs),
                is_target: issue.is_target,
            }));
        }
    }
}
