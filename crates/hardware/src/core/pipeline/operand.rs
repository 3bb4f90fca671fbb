//! Source Operand Resolution.
//!
//! Instructions entering the reservation station or load/store buffer name their
//! sources by register. This module turns a register (or a waiting tag) into either
//! a value or the reorder buffer slot still producing it. It looks, in order, at:
//! 1. **Register File:** Committed value when the register is not renamed.
//! 2. **Reorder Buffer:** A completed entry holding the value.
//! 3. **Common Data Bus:** The ALU output and the memory load broadcast of this cycle.
//! 4. **Commit Port:** The reorder buffer's write-back of this cycle.
//!
//! Every source is a committed (previous-cycle) value, so resolution gives the same
//! answer whichever unit computes first.

use crate::core::arch::RegisterFile;
use crate::core::pipeline::rob::ReorderBuffer;
use crate::core::pipeline::signals::RobId;
use crate::core::units::alu::Alu;
use crate::core::units::memory::Memory;

/// A source operand: a value, or the slot that will produce it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    /// Value available.
    Ready(u32),
    /// Waiting on the named reorder buffer slot.
    Pending(RobId),
}

impl Operand {
    /// The value, if ready.
    #[inline]
    pub const fn value(self) -> Option<u32> {
        match self {
            Self::Ready(v) => Some(v),
            Self::Pending(_) => None,
        }
    }

    /// True once the value is known.
    #[inline]
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

/// Read-only view of every unit that can supply an operand value.
#[derive(Clone, Copy, Debug)]
pub struct OperandView<'a> {
    /// Architectural registers and rename tags.
    pub rf: &'a RegisterFile,
    /// In-flight results and the commit port.
    pub rob: &'a ReorderBuffer,
    /// ALU result bus.
    pub alu: &'a Alu,
    /// Load result bus.
    pub memory: &'a Memory,
}

impl OperandView<'_> {
    /// Resolves register `reg` as seen by an instruction decoded this cycle.
    pub fn resolve_register(&self, reg: usize) -> Operand {
        if reg == 0 {
            return Operand::Ready(0);
        }
        match self.rf.status(reg) {
            None => Operand::Ready(self.register_value(reg)),
            Some(tag) => match self.resolve_tag(tag) {
                // A tag whose slot already left the buffer was written back last cycle.
                Operand::Pending(q) if !self.rob.is_live(q) => {
                    Operand::Ready(self.register_value(reg))
                }
                operand => operand,
            },
        }
    }

    /// Looks for the value produced by slot `tag` on every result path.
    pub fn resolve_tag(&self, tag: RobId) -> Operand {
        if let Some(value) = self.rob.completed_value(tag) {
            return Operand::Ready(value);
        }
        if let Some(out) = self.alu.output().filter(|o| o.id == tag && !o.is_target) {
            return Operand::Ready(out.value);
        }
        if let Some(bc) = self.memory.broadcast().filter(|b| b.id == tag) {
            return Operand::Ready(bc.value);
        }
        if let Some(wb) = self.rob.writeback().filter(|wb| wb.id == tag) {
            return Operand::Ready(wb.value);
        }
        Operand::Pending(tag)
    }

    /// Re-resolves an operand that may still be waiting.
    #[inline]
    pub fn wake(&self, operand: Operand) -> Operand {
        match operand {
            Operand::Pending(tag) => self.resolve_tag(tag),
            ready => ready,
        }
    }

    /// Committed register value, overlaid with a write-back that lands this cycle.
    fn register_value(&self, reg: usize) -> u32 {
        match self.rob.writeback() {
            Some(wb) if wb.rd == reg => wb.value,
            _ => self.rf.value(reg),
        }
    }
}
