//! Reservation Station.
//!
//! Holds ALU-class instructions until both operands are known. Each cycle it:
//! 1. **Wakes:** Resolves waiting operands from the common data bus and the reorder buffer.
//! 2. **Selects:** Issues the oldest entry with both operands ready to the ALU.
//! 3. **Inserts:** Accepts the decoder's instruction when dispatch is not stalled.
//!
//! On flush every entry is dropped and the pending issue is withdrawn.

use crate::core::pipeline::operand::{Operand, OperandView};
use crate::core::pipeline::signals::{AluIssue, AluOp, Control, DecodedInst, RobId};
use crate::core::pipeline::traits::Sequential;
use crate::isa::instruction::InstKind;
use crate::sim::cell::Staged;

/// An instruction waiting for its operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RsEntry {
    /// ALU operation.
    pub op: AluOp,
    /// First operand (`rs1`).
    pub lhs: Operand,
    /// Second operand (`rs2` or the immediate).
    pub rhs: Operand,
    /// Reorder buffer slot receiving the result.
    pub id: RobId,
    /// Result is a JALR target.
    pub is_target: bool,
}

impl RsEntry {
    /// Issue form, once both operands are values.
    fn issue(&self) -> Option<AluIssue> {
        Some(AluIssue {
            op: self.op,
            lhs: self.lhs.value()?,
            rhs: self.rhs.value()?,
            id: self.id,
            is_target: self.is_target,
        })
    }
}

/// Fixed-capacity pool of ALU instructions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReservationStation {
    entries: Staged<Vec<RsEntry>>,
    to_alu: Staged<Option<AluIssue>>,
    capacity: usize,
}

impl ReservationStation {
    /// Creates an empty station with `capacity` slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Staged::new(Vec::with_capacity(capacity)),
            to_alu: Staged::default(),
            capacity,
        }
    }

    /// True if no slot is free.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.entries.read().len() >= self.capacity
    }

    /// Number of occupied slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True if no instruction is waiting.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Waiting instructions, oldest first.
    pub fn entries(&self) -> &[RsEntry] {
        self.entries.read()
    }

    /// Operation issued to the ALU.
    #[inline]
    pub const fn to_alu(&self) -> Option<AluIssue> {
        *self.to_alu.read()
    }

    /// Computes this cycle's wake-up, issue and insertion.
    ///
    /// # Arguments
    ///
    /// * `ctrl` - Flush/stall control for this cycle.
    /// * `view` - Committed operand sources.
    /// * `decoded` - The decoder's committed output.
    /// * `next_id` - Slot the reorder buffer allocates this cycle.
    pub fn compute(
        &mut self,
        ctrl: &Control,
        view: &OperandView<'_>,
        decoded: Option<&DecodedInst>,
        next_id: RobId,
    ) {
        if ctrl.is_flush() {
            self.entries.stage(Vec::new());
            self.to_alu.stage(None);
            return;
        }

        let mut entries: Vec<RsEntry> = self
            .entries
            .read()
            .iter()
            .map(|e| RsEntry {
                lhs: view.wake(e.lhs),
                rhs: view.wake(e.rhs),
                ..*e
            })
            .collect();

        let ready = entries.iter().position(|e| e.issue().is_some());
        self.to_alu.stage(ready.and_then(|i| entries.remove(i).issue()));

        if !ctrl.stall {
            if let Some(inst) = decoded {
                if let Some(op) = inst.kind.alu_op() {
                    entries.push(RsEntry {
                        op,
                        lhs: view.resolve_register(inst.rs1),
                        rhs: if inst.kind.uses_imm_operand() {
                            Operand::Ready(inst.imm)
                        } else {
                            view.resolve_register(inst.rs2)
                        },
                        id: next_id,
                        is_target: inst.kind == InstKind::Jalr,
                    });
                }
            }
        }
        self.entries.stage(entries);
    }
}

impl Sequential for ReservationStation {
    fn advance(&mut self) {
        self.entries.commit();
        self.to_alu.commit();
    }
}
