use tomasim_core::common::constants::HALT_INSTRUCTION;
use tomasim_core::isa::rv32i::opcodes::*;
use tomasim_core::isa::rv32i::{funct3, funct7};

pub struct InstructionBuilder {
    opcode: u32,
    rd: u32,
    funct3: u32,
    rs1: u32,
    rs2: u32,
    funct7: u32,
    imm: i32,
}

impl Default for InstructionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InstructionBuilder {
    pub fn new() -> Self {
        Self {
            opcode: 0,
            rd: 0,
            funct3: 0,
            rs1: 0,
            rs2: 0,
            funct7: 0,
            imm: 0,
        }
    }

    pub fn opcode(mut self, op: u32) -> Self {
        self.opcode = op;
        self
    }

    pub fn rd(mut self, rd: u32) -> Self {
        self.rd = rd;
        self
    }

    pub fn rs1(mut self, rs1: u32) -> Self {
        self.rs1 = rs1;
        self
    }

    pub fn rs2(mut self, rs2: u32) -> Self {
        self.rs2 = rs2;
        self
    }

    pub fn funct3(mut self, funct3: u32) -> Self {
        self.funct3 = funct3;
        self
    }

    pub fn funct7(mut self, funct7: u32) -> Self {
        self.funct7 = funct7;
        self
    }

    pub fn imm(mut self, imm: i32) -> Self {
        self.imm = imm;
        self
    }

    fn reg_op(mut self, f3: u32, f7: u32, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.opcode = OP_REG;
        self.funct3 = f3;
        self.funct7 = f7;
        self.rd = rd;
        self.rs1 = rs1;
        self.rs2 = rs2;
        self
    }

    fn imm_op(mut self, op: u32, f3: u32, rd: u32, rs1: u32, imm: i32) -> Self {
        self.opcode = op;
        self.funct3 = f3;
        self.rd = rd;
        self.rs1 = rs1;
        self.imm = imm;
        self
    }

    fn store_op(mut self, f3: u32, rs1: u32, rs2: u32, imm: i32) -> Self {
        self.opcode = OP_STORE;
        self.funct3 = f3;
        self.rs1 = rs1;
        self.rs2 = rs2;
        self.imm = imm;
        self
    }

    fn branch_op(mut self, f3: u32, rs1: u32, rs2: u32, imm: i32) -> Self {
        self.opcode = OP_BRANCH;
        self.funct3 = f3;
        self.rs1 = rs1;
        self.rs2 = rs2;
        self.imm = imm;
        self
    }

    // --- Register-register ---

    pub fn add(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.reg_op(funct3::ADD_SUB, funct7::DEFAULT, rd, rs1, rs2)
    }

    pub fn sub(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.reg_op(funct3::ADD_SUB, funct7::ALT, rd, rs1, rs2)
    }

    pub fn and(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.reg_op(funct3::AND, funct7::DEFAULT, rd, rs1, rs2)
    }

    pub fn or(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.reg_op(funct3::OR, funct7::DEFAULT, rd, rs1, rs2)
    }

    pub fn xor(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.reg_op(funct3::XOR, funct7::DEFAULT, rd, rs1, rs2)
    }

    pub fn sll(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.reg_op(funct3::SLL, funct7::DEFAULT, rd, rs1, rs2)
    }

    pub fn sra(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.reg_op(funct3::SRL_SRA, funct7::ALT, rd, rs1, rs2)
    }

    pub fn slt(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.reg_op(funct3::SLT, funct7::DEFAULT, rd, rs1, rs2)
    }

    pub fn sltu(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.reg_op(funct3::SLTU, funct7::DEFAULT, rd, rs1, rs2)
    }

    // --- Immediate ---

    pub fn addi(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.imm_op(OP_IMM, funct3::ADD_SUB, rd, rs1, imm)
    }

    pub fn andi(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.imm_op(OP_IMM, funct3::AND, rd, rs1, imm)
    }

    pub fn xori(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.imm_op(OP_IMM, funct3::XOR, rd, rs1, imm)
    }

    pub fn slli(self, rd: u32, rs1: u32, shamt: u32) -> Self {
        self.imm_op(OP_IMM, funct3::SLL, rd, rs1, (shamt & 0x1F) as i32)
            .funct7(funct7::DEFAULT)
    }

    pub fn srai(self, rd: u32, rs1: u32, shamt: u32) -> Self {
        self.imm_op(OP_IMM, funct3::SRL_SRA, rd, rs1, (shamt & 0x1F) as i32)
            .funct7(funct7::ALT)
    }

    // --- Memory ---

    pub fn lw(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.imm_op(OP_LOAD, funct3::LW, rd, rs1, imm)
    }

    pub fn lb(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.imm_op(OP_LOAD, funct3::LB, rd, rs1, imm)
    }

    pub fn lbu(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.imm_op(OP_LOAD, funct3::LBU, rd, rs1, imm)
    }

    pub fn lhu(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.imm_op(OP_LOAD, funct3::LHU, rd, rs1, imm)
    }

    pub fn sw(self, rs1: u32, rs2: u32, imm: i32) -> Self {
        self.store_op(funct3::SW, rs1, rs2, imm)
    }

    pub fn sh(self, rs1: u32, rs2: u32, imm: i32) -> Self {
        self.store_op(funct3::SH, rs1, rs2, imm)
    }

    pub fn sb(self, rs1: u32, rs2: u32, imm: i32) -> Self {
        self.store_op(funct3::SB, rs1, rs2, imm)
    }

    // --- Control flow ---

    pub fn beq(self, rs1: u32, rs2: u32, imm: i32) -> Self {
        self.branch_op(funct3::BEQ, rs1, rs2, imm)
    }

    pub fn bne(self, rs1: u32, rs2: u32, imm: i32) -> Self {
        self.branch_op(funct3::BNE, rs1, rs2, imm)
    }

    pub fn blt(self, rs1: u32, rs2: u32, imm: i32) -> Self {
        self.branch_op(funct3::BLT, rs1, rs2, imm)
    }

    pub fn bge(self, rs1: u32, rs2: u32, imm: i32) -> Self {
        self.branch_op(funct3::BGE, rs1, rs2, imm)
    }

    pub fn jal(mut self, rd: u32, imm: i32) -> Self {
        self.opcode = OP_JAL;
        self.rd = rd;
        self.imm = imm;
        self
    }

    pub fn jalr(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.imm_op(OP_JALR, funct3::JALR, rd, rs1, imm)
    }

    /// `imm` is the 20-bit upper immediate, not the shifted value.
    pub fn lui(mut self, rd: u32, imm: i32) -> Self {
        self.opcode = OP_LUI;
        self.rd = rd;
        self.imm = imm;
        self
    }

    /// `imm` is the 20-bit upper immediate, not the shifted value.
    pub fn auipc(mut self, rd: u32, imm: i32) -> Self {
        self.opcode = OP_AUIPC;
        self.rd = rd;
        self.imm = imm;
        self
    }

    pub fn nop(self) -> Self {
        self.addi(0, 0, 0)
    }

    pub fn build(self) -> u32 {
        let opcode = self.opcode & 0x7F;
        let rd = (self.rd & 0x1F) << 7;
        let funct3 = (self.funct3 & 0x7) << 12;
        let rs1 = (self.rs1 & 0x1F) << 15;
        let rs2 = (self.rs2 & 0x1F) << 20;
        let funct7 = (self.funct7 & 0x7F) << 25;
        let imm = self.imm as u32;

        match self.opcode {
            OP_REG => funct7 | rs2 | rs1 | funct3 | rd | opcode,
            OP_IMM if matches!(self.funct3, funct3::SLL | funct3::SRL_SRA) => {
                funct7 | ((imm & 0x1F) << 20) | rs1 | funct3 | rd | opcode
            }
            OP_IMM | OP_LOAD | OP_JALR => ((imm & 0xFFF) << 20) | rs1 | funct3 | rd | opcode,
            OP_STORE => {
                let imm_11_5 = ((imm >> 5) & 0x7F) << 25;
                let imm_4_0 = (imm & 0x1F) << 7;
                imm_11_5 | rs2 | rs1 | funct3 | imm_4_0 | opcode
            }
            OP_BRANCH => {
                let imm_12 = ((imm >> 12) & 0x1) << 31;
                let imm_10_5 = ((imm >> 5) & 0x3F) << 25;
                let imm_4_1 = ((imm >> 1) & 0xF) << 8;
                let imm_11 = ((imm >> 11) & 0x1) << 7;
                imm_12 | imm_10_5 | rs2 | rs1 | funct3 | imm_4_1 | imm_11 | opcode
            }
            OP_LUI | OP_AUIPC => ((imm & 0xF_FFFF) << 12) | rd | opcode,
            OP_JAL => {
                let imm_20 = ((imm >> 20) & 0x1) << 31;
                let imm_10_1 = ((imm >> 1) & 0x3FF) << 21;
                let imm_11 = ((imm >> 11) & 0x1) << 20;
                let imm_19_12 = ((imm >> 12) & 0xFF) << 12;
                imm_20 | imm_10_1 | imm_11 | imm_19_12 | rd | opcode
            }
            _ => funct7 | rs2 | rs1 | funct3 | rd | opcode,
        }
    }
}

/// The reserved encoding that stops the simulator when it commits.
pub const fn halt() -> u32 {
    HALT_INSTRUCTION
}
