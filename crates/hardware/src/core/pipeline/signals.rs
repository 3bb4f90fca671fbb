//! Inter-unit messages and operation types.
//!
//! This module defines the values units publish to each other. It performs:
//! 1. **Operation Classification:** `AluOp`, the operation the ALU applies.
//! 2. **Front-End Traffic:** Fetch requests, fetched words and decoded instructions.
//! 3. **Back-End Traffic:** ALU issue, common-data-bus broadcasts, memory requests.
//! 4. **Commit Traffic:** Register write-back, store hand-off, redirect and branch outcome.
//!
//! Every message is published through a `Staged<Option<_>>` owned by its sender
//! and restaged every cycle, so it is visible for exactly one cycle.

use crate::isa::instruction::InstKind;

/// Reorder buffer slot index; doubles as the renaming tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct RobId(pub usize);

/// ALU operation types.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AluOp {
    /// Integer addition.
    #[default]
    Add,

    /// Integer subtraction.
    Sub,

    /// Bitwise AND.
    And,

    /// Bitwise OR.
    Or,

    /// Bitwise XOR.
    Xor,

    /// Shift left logical.
    Sll,

    /// Shift right logical.
    Srl,

    /// Shift right arithmetic.
    Sra,

    /// Equal (0/1).
    Eq,

    /// Not equal (0/1).
    Ne,

    /// Less than, signed (0/1).
    Lt,

    /// Less than, unsigned (0/1).
    Ltu,

    /// Greater or equal, signed (0/1).
    Ge,

    /// Greater or equal, unsigned (0/1).
    Geu,
}

/// A word returned by the instruction port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchedWord {
    /// Raw encoding.
    pub inst: u32,
    /// Address it was fetched from.
    pub pc: u32,
}

/// An instruction queue entry handed to the decoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchedInst {
    /// Raw encoding.
    pub inst: u32,
    /// Address it was fetched from.
    pub pc: u32,
    /// Whether fetch redirected to the jump/branch target after it.
    pub predicted_taken: bool,
}

/// Decoder output latched for the back end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedInst {
    /// Instruction kind.
    pub kind: InstKind,
    /// Destination register.
    pub rd: usize,
    /// First source register.
    pub rs1: usize,
    /// Second source register.
    pub rs2: usize,
    /// Sign-extended immediate.
    pub imm: u32,
    /// Instruction address.
    pub pc: u32,
    /// Fetch-time prediction.
    pub predicted_taken: bool,
}

/// Operation handed from the reservation station to the ALU.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AluIssue {
    /// Operation.
    pub op: AluOp,
    /// First operand.
    pub lhs: u32,
    /// Second operand.
    pub rhs: u32,
    /// Producing reorder buffer slot.
    pub id: RobId,
    /// Result is a jump target, not a register value.
    pub is_target: bool,
}

/// ALU result on the common data bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AluOutput {
    /// Producing reorder buffer slot.
    pub id: RobId,
    /// Result value (0/1 for comparisons).
    pub value: u32,
    /// Value is a JALR target; consumers of `rd` must not take it.
    pub is_target: bool,
}

/// Load result on the common data bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Broadcast {
    /// Producing reorder buffer slot.
    pub id: RobId,
    /// Loaded, extended value.
    pub value: u32,
}

/// Load issued from the load/store buffer to the data port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadRequest {
    /// Load kind (width and extension).
    pub kind: InstKind,
    /// Effective address.
    pub addr: u32,
    /// Reorder buffer slot waiting for the value.
    pub id: RobId,
}

/// Store handed from commit to the data port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StoreRequest {
    /// Store kind (width).
    pub kind: InstKind,
    /// Effective address.
    pub addr: u32,
    /// Data (low bytes written).
    pub value: u32,
    /// Committed reorder buffer slot; the load/store buffer retires it.
    pub id: RobId,
}

/// Architectural register write produced at commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegWriteback {
    /// Destination register.
    pub rd: usize,
    /// Value.
    pub value: u32,
    /// Committing reorder buffer slot.
    pub id: RobId,
}

/// Outcome of a committed conditional branch, for predictor training.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BranchOutcome {
    /// Branch address.
    pub pc: u32,
    /// Actual direction.
    pub taken: bool,
    /// Prediction matched.
    pub correct: bool,
}

/// Per-cycle control derived from committed state before any unit computes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Control {
    /// Redirect target when a flush is asserted this cycle.
    pub flush: Option<u32>,
    /// Decode output cannot be accepted by the back end this cycle.
    pub stall: bool,
}

impl Control {
    /// True if speculative state must be discarded this cycle.
    #[inline]
    pub const fn is_flush(&self) -> bool {
        self.flush.is_some()
    }
}
