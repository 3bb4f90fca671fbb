//! Instruction kind tag and classification.
//!
//! This module names every instruction the core executes and answers the
//! questions the pipeline asks about them. It provides:
//! 1. **Kind Tag:** `InstKind`, one variant per RV32I instruction plus `Halt`.
//! 2. **Routing:** Which execution resource (`ExecUnit`) an instruction occupies.
//! 3. **Semantics:** Register write-back, ALU operation, immediate use and memory width.
//! 4. **Decoded Form:** `Decoded`, the operand fields extracted from an encoding.

use crate::core::pipeline::signals::AluOp;

/// Instruction kind produced by the decoder.
///
/// Variants are named after their assembler mnemonics.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InstKind {
    Lui,
    Auipc,
    Jal,
    Jalr,
    Beq,
    Bne,
    Blt,
    Bge,
    Bltu,
    Bgeu,
    Lb,
    Lh,
    Lw,
    Lbu,
    Lhu,
    Sb,
    Sh,
    Sw,
    Addi,
    Slti,
    Sltiu,
    Xori,
    Ori,
    Andi,
    Slli,
    Srli,
    Srai,
    Add,
    Sub,
    Sll,
    Slt,
    Sltu,
    Xor,
    Srl,
    Sra,
    Or,
    And,
    /// Reserved encoding that ends the program when committed.
    Halt,
}

/// Execution resource an instruction waits in after decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecUnit {
    /// Reservation station, then the ALU.
    Alu,
    /// Load/store buffer, then the memory data port.
    LoadStore,
    /// Complete at allocation; only needs a reorder buffer slot.
    None,
}

impl InstKind {
    /// Conditional branch (BEQ..BGEU).
    pub const fn is_branch(self) -> bool {
        matches!(
            self,
            Self::Beq | Self::Bne | Self::Blt | Self::Bge | Self::Bltu | Self::Bgeu
        )
    }

    /// Load from memory.
    pub const fn is_load(self) -> bool {
        matches!(self, Self::Lb | Self::Lh | Self::Lw | Self::Lbu | Self::Lhu)
    }

    /// Store to memory.
    pub const fn is_store(self) -> bool {
        matches!(self, Self::Sb | Self::Sh | Self::Sw)
    }

    /// True if the instruction produces a value for `rd` at commit.
    pub const fn writes_rd(self) -> bool {
        !(self.is_branch() || self.is_store() || matches!(self, Self::Halt))
    }

    /// The resource the instruction is dispatched to.
    pub const fn unit(self) -> ExecUnit {
        if self.is_load() || self.is_store() {
            ExecUnit::LoadStore
        } else if matches!(self, Self::Lui | Self::Auipc | Self::Jal | Self::Halt) {
            ExecUnit::None
        } else {
            ExecUnit::Alu
        }
    }

    /// Second ALU operand is the immediate rather than `rs2`.
    pub const fn uses_imm_operand(self) -> bool {
        matches!(
            self,
            Self::Addi
                | Self::Slti
                | Self::Sltiu
                | Self::Xori
                | Self::Ori
                | Self::Andi
                | Self::Slli
                | Self::Srli
                | Self::Srai
                | Self::Jalr
        )
    }

    /// ALU operation computing this instruction's result, branch condition or jump target.
    pub const fn alu_op(self) -> Option<AluOp> {
        Some(match self {
            Self::Add | Self::Addi | Self::Jalr => AluOp::Add,
            Self::Sub => AluOp::Sub,
            Self::And | Self::Andi => AluOp::And,
            Self::Or | Self::Ori => AluOp::Or,
            Self::Xor | Self::Xori => AluOp::Xor,
            Self::Sll | Self::Slli => AluOp::Sll,
            Self::Srl | Self::Srli => AluOp::Srl,
            Self::Sra | Self::Srai => AluOp::Sra,
            Self::Slt | Self::Slti | Self::Blt => AluOp::Lt,
            Self::Sltu | Self::Sltiu | Self::Bltu => AluOp::Ltu,
            Self::Beq => AluOp::Eq,
            Self::Bne => AluOp::Ne,
            Self::Bge => AluOp::Ge,
            Self::Bgeu => AluOp::Geu,
            _ => return None,
        })
    }

    /// Access width in bytes for loads and stores.
    pub const fn access_bytes(self) -> u32 {
        match self {
            Self::Lb | Self::Lbu | Self::Sb => 1,
            Self::Lh | Self::Lhu | Self::Sh => 2,
            _ => 4,
        }
    }

    /// Loads whose result is sign-extended.
    pub const fn is_signed_load(self) -> bool {
        matches!(self, Self::Lb | Self::Lh)
    }
}

/// Operand fields of a decoded instruction.
///
/// Absent register fields are 0, which always resolves to the value 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decoded {
    /// Instruction kind.
    pub kind: InstKind,
    /// Destination register index.
    pub rd: usize,
    /// First source register index.
    pub rs1: usize,
    /// Second source register index.
    pub rs2: usize,
    /// Sign-extended immediate (shift amount for shift-immediates).
    pub imm: u32,
}
