//! RV32I Instruction Decoder.
//!
//! This module turns 32-bit encodings into `Decoded` instructions. It performs:
//! 1. **Operand Decoding:** Selects the format (U/J/B/S/R/I) from the opcode, extracts
//!    register indices and builds the sign-extended immediate.
//! 2. **Kind Decoding:** Looks up opcode, funct3 and funct7 to produce an `InstKind`,
//!    checking the reserved halt encoding first.
//!
//! Encodings with an unknown opcode/funct combination decode to `None`; the
//! pipeline treats them as bubbles.

use crate::common::bits::{field, sign_extend};
use crate::common::constants::{HALT_INSTRUCTION, OPCODE_MASK};
use crate::isa::instruction::{Decoded, InstKind};
use crate::isa::rv32i::{funct3, funct7, opcodes};

/// Bit mask for extracting the U-Type immediate (bits 31-12, not shifted).
const U_IMM_MASK: u32 = 0xFFFF_F000;

/// Width of I-Type and S-Type immediates before sign extension.
const IS_IMM_BITS: u32 = 12;

/// Width of the B-Type immediate (imm[12:1] plus an implicit zero bit).
const B_IMM_BITS: u32 = 13;

/// Width of the J-Type immediate (imm[20:1] plus an implicit zero bit).
const J_IMM_BITS: u32 = 21;

/// Instruction encoding format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    R,
    I,
    S,
    B,
    U,
    J,
}

/// Selects the encoding format from the major opcode.
const fn format_of(opcode: u32) -> Format {
    match opcode {
        opcodes::OP_LUI | opcodes::OP_AUIPC => Format::U,
        opcodes::OP_JAL => Format::J,
        opcodes::OP_BRANCH => Format::B,
        opcodes::OP_STORE => Format::S,
        opcodes::OP_REG => Format::R,
        _ => Format::I,
    }
}

/// Reassembles the B-Type immediate: `imm[12|10:5] rs2 rs1 funct3 imm[4:1|11]`.
const fn b_imm(inst: u32) -> u32 {
    let imm = (field(inst, 31, 31) << 12)
        | (field(inst, 7, 7) << 11)
        | (field(inst, 30, 25) << 5)
        | (field(inst, 11, 8) << 1);
    sign_extend(imm, B_IMM_BITS)
}

/// Reassembles the J-Type immediate: `imm[20|10:1|11|19:12] rd`.
const fn j_imm(inst: u32) -> u32 {
    let imm = (field(inst, 31, 31) << 20)
        | (field(inst, 19, 12) << 12)
        | (field(inst, 20, 20) << 11)
        | (field(inst, 30, 21) << 1);
    sign_extend(imm, J_IMM_BITS)
}

/// Operand fields of an encoding, independent of its kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Operands {
    /// Destination register (0 when the format has none).
    pub rd: usize,
    /// First source register (0 when absent).
    pub rs1: usize,
    /// Second source register (0 when absent).
    pub rs2: usize,
    /// Sign-extended immediate.
    pub imm: u32,
}

/// Extracts register indices and the immediate according to the encoding format.
///
/// Shift-immediate instructions carry their 5-bit shift amount as the immediate.
pub const fn decode_operands(inst: u32) -> Operands {
    let opcode = inst & OPCODE_MASK;
    let rd = field(inst, 11, 7) as usize;
    let rs1 = field(inst, 19, 15) as usize;
    let rs2 = field(inst, 24, 20) as usize;
    let f3 = field(inst, 14, 12);

    match format_of(opcode) {
        Format::U => Operands {
            rd,
            rs1: 0,
            rs2: 0,
            imm: inst & U_IMM_MASK,
        },
        Format::J => Operands {
            rd,
            rs1: 0,
            rs2: 0,
            imm: j_imm(inst),
        },
        Format::B => Operands {
            rd: 0,
            rs1,
            rs2,
            imm: b_imm(inst),
        },
        Format::S => Operands {
            rd: 0,
            rs1,
            rs2,
            imm: sign_extend(
                (field(inst, 31, 25) << 5) | field(inst, 11, 7),
                IS_IMM_BITS,
            ),
        },
        Format::R => Operands {
            rd,
            rs1,
            rs2,
            imm: 0,
        },
        Format::I => {
            let is_shift = opcode == opcodes::OP_IMM
                && (f3 == funct3::SLL || f3 == funct3::SRL_SRA);
            let imm = if is_shift {
                field(inst, 24, 20)
            } else {
                sign_extend(field(inst, 31, 20), IS_IMM_BITS)
            };
            Operands {
                rd,
                rs1,
                rs2: 0,
                imm,
            }
        }
    }
}

/// Maps opcode/funct fields to an instruction kind.
///
/// The halt encoding wins over normal dispatch. Returns `None` for
/// encodings outside the supported subset.
pub const fn decode_kind(inst: u32) -> Option<InstKind> {
    if inst == HALT_INSTRUCTION {
        return Some(InstKind::Halt);
    }

    let opcode = inst & OPCODE_MASK;
    let f3 = field(inst, 14, 12);
    let f7 = field(inst, 31, 25);

    let kind = match opcode {
        opcodes::OP_LUI => InstKind::Lui,
        opcodes::OP_AUIPC => InstKind::Auipc,
        opcodes::OP_JAL => InstKind::Jal,
        opcodes::OP_JALR if f3 == funct3::JALR => InstKind::Jalr,
        opcodes::OP_BRANCH => match f3 {
            funct3::BEQ => InstKind::Beq,
            funct3::BNE => InstKind::Bne,
            funct3::BLT => InstKind::Blt,
            funct3::BGE => InstKind::Bge,
            funct3::BLTU => InstKind::Bltu,
            funct3::BGEU => InstKind::Bgeu,
            _ => return None,
        },
        opcodes::OP_LOAD => match f3 {
            funct3::LB => InstKind::Lb,
            funct3::LH => InstKind::Lh,
            funct3::LW => InstKind::Lw,
            funct3::LBU => InstKind::Lbu,
            funct3::LHU => InstKind::Lhu,
            _ => return None,
        },
        opcodes::OP_STORE => match f3 {
            funct3::SB => InstKind::Sb,
            funct3::SH => InstKind::Sh,
            funct3::SW => InstKind::Sw,
            _ => return None,
        },
        opcodes::OP_IMM => match (f3, f7) {
            (funct3::ADD_SUB, _) => InstKind::Addi,
            (funct3::SLT, _) => InstKind::Slti,
            (funct3::SLTU, _) => InstKind::Sltiu,
            (funct3::XOR, _) => InstKind::Xori,
            (funct3::OR, _) => InstKind::Ori,
            (funct3::AND, _) => InstKind::Andi,
            (funct3::SLL, funct7::DEFAULT) => InstKind::Slli,
            (funct3::SRL_SRA, funct7::DEFAULT) => InstKind::Srli,
            (funct3::SRL_SRA, funct7::ALT) => InstKind::Srai,
            _ => return None,
        },
        opcodes::OP_REG => match (f3, f7) {
            (funct3::ADD_SUB, funct7::DEFAULT) => InstKind::Add,
            (funct3::ADD_SUB, funct7::ALT) => InstKind::Sub,
            (funct3::SLL, funct7::DEFAULT) => InstKind::Sll,
            (funct3::SLT, funct7::DEFAULT) => InstKind::Slt,
            (funct3::SLTU, funct7::DEFAULT) => InstKind::Sltu,
            (funct3::XOR, funct7::DEFAULT) => InstKind::Xor,
            (funct3::SRL_SRA, funct7::DEFAULT) => InstKind::Srl,
            (funct3::SRL_SRA, funct7::ALT) => InstKind::Sra,
            (funct3::OR, funct7::DEFAULT) => InstKind::Or,
            (funct3::AND, funct7::DEFAULT) => InstKind::And,
            _ => return None,
        },
        _ => return None,
    };
    Some(kind)
}

/// Decodes an encoding into kind plus operands, or `None` for a bubble.
pub const fn decode(inst: u32) -> Option<Decoded> {
    let Some(kind) = decode_kind(inst) else {
        return None;
    };
    let ops = decode_operands(inst);
    Some(Decoded {
        kind,
        rd: ops.rd,
        rs1: ops.rs1,
        rs2: ops.rs2,
        imm: ops.imm,
    })
}
