//! Shared fixtures for back-end unit tests.

use crate::core::arch::RegisterFile;
use crate::core::pipeline::backend::LoadStoreBuffer;
use crate::core::pipeline::operand::OperandView;
use crate::core::pipeline::rob::ReorderBuffer;
use crate::core::pipeline::signals::{AluIssue, AluOp, Control, DecodedInst, RobId};
use crate::core::pipeline::traits::Sequential;
use crate::core::units::alu::Alu;
use crate::core::units::memory::Memory;
use crate::isa::instruction::InstKind;
use crate::sim::clock::Clock;

pub const RUN: Control = Control {
    flush: None,
    stall: false,
};

pub const STALL: Control = Control {
    flush: None,
    stall: true,
};

pub const FLUSH: Control = Control {
    flush: Some(0),
    stall: false,
};

pub const fn inst(kind: InstKind, rd: usize, rs1: usize, rs2: usize, imm: u32) -> DecodedInst {
    DecodedInst {
        kind,
        rd,
        rs1,
        rs2,
        imm,
        pc: 0,
        predicted_taken: false,
    }
}

/// The operand sources around a unit under test.
pub struct Fixture {
    pub clock: Clock,
    pub rf: RegisterFile,
    pub rob: ReorderBuffer,
    pub alu: Alu,
    pub memory: Memory,
}

impl Fixture {
    pub fn new() -> Self {
        let mut clock = Clock::new();
        clock.run();
        Self {
            clock,
            rf: RegisterFile::new(),
            rob: ReorderBuffer::new(8, false),
            alu: Alu::new(),
            memory: Memory::new(3),
        }
    }

    pub const fn view(&self) -> OperandView<'_> {
        OperandView {
            rf: &self.rf,
            rob: &self.rob,
            alu: &self.alu,
            memory: &self.memory,
        }
    }

    /// Renames `inst` into the register file and reorder buffer.
    pub fn dispatch(&mut self, inst: DecodedInst) -> RobId {
        let id = self.rob.next_id();
        let no_stores = LoadStoreBuffer::new(1);
        self.rf.compute(&RUN, None, Some(&inst), id);
        self.rob
            .compute(&self.clock, &RUN, None, None, &no_stores, false, Some(&inst));
        self.rf.advance();
        self.rob.advance();
        id
    }

    /// Puts `value` for slot `id` on the ALU result bus.
    pub fn alu_result(&mut self, id: RobId, value: u32) {
        let issue = AluIssue {
            op: AluOp::Add,
            lhs: value,
            rhs: 0,
            id,
            is_target: false,
        };
        self.alu.compute(&self.clock, &RUN, Some(issue));
        self.alu.apply(&self.clock);
        self.clock.tick();
        self.alu.advance();
    }
}
