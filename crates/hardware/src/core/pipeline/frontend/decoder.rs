//! Decode Stage.
//!
//! Decodes the instruction handed over by the instruction unit and latches it for one
//! cycle. It performs the following:
//! 1. **Decoding:** Raw word to `DecodedInst`; malformed encodings become bubbles.
//! 2. **Stall Hold:** Keeps the latched instruction while the back end has no room for it.
//! 3. **Flush:** Discards the latched instruction.

use tracing::trace;

use crate::core::pipeline::signals::{Control, DecodedInst, FetchedInst};
use crate::core::pipeline::traits::Sequential;
use crate::isa::decode::decode;
use crate::isa::instruction::{ExecUnit, InstKind};
use crate::sim::cell::Staged;

/// One-entry decode latch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Decoder {
    output: Staged<Option<DecodedInst>>,
}

/// True if `kind` cannot be dispatched given the back end's fullness.
///
/// Every instruction needs a reorder buffer slot; memory operations also need a
/// load/store buffer slot and ALU instructions a reservation station slot.
pub const fn is_stall_needed(kind: InstKind, rob_full: bool, rs_full: bool, lsb_full: bool) -> bool {
    rob_full
        || match kind.unit() {
            ExecUnit::LoadStore => lsb_full,
            ExecUnit::Alu => rs_full,
            ExecUnit::None => false,
        }
}

impl Decoder {
    /// Creates an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Latched instruction offered to the back end this cycle.
    #[inline]
    pub const fn output(&self) -> Option<DecodedInst> {
        *self.output.read()
    }

    /// Computes the next latched instruction from the instruction unit's hand-off.
    pub fn compute(&mut self, ctrl: &Control, fetched: Option<FetchedInst>) {
        if ctrl.is_flush() {
            self.output.stage(None);
        } else if ctrl.stall {
            self.output.stage(*self.output.read());
        } else {
            self.output.stage(fetched.and_then(decode_fetched));
        }
    }
}

/// Decodes a fetched instruction, dropping encodings the core does not implement.
fn decode_fetched(fetched: FetchedInst) -> Option<DecodedInst> {
    let Some(d) = decode(fetched.inst) else {
        trace!(pc = fetched.pc, inst = fetched.inst, "dropping malformed instruction");
        return None;
    };
    Some(DecodedInst {
        kind: d.kind,
        rd: d.rd,
        rs1: d.rs1,
        rs2: d.rs2,
        imm: d.imm,
        pc: fetched.pc,
        predicted_taken: fetched.predicted_taken,
    })
}

impl Sequential for Decoder {
    fn advance(&mut self) {
        self.output.commit();
    }
}
