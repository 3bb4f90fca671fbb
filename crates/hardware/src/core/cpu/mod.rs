//! CPU Core Definition and Initialization.
//!
//! This module defines the central `Cpu` structure, which owns every unit of the
//! Tomasulo core. It coordinates the following:
//! 1. **State Management:** The clock plus each unit's double-buffered state.
//! 2. **Pipeline Control:** Flush and dispatch stall derived from committed state.
//! 3. **Unit Identity:** `UnitId` names each unit so the compute phase can visit them in
//!    any order.
//! 4. **Statistics:** Commit, flush, stall and prediction counters.

/// Three-phase cycle execution.
pub mod execution;

use crate::common::constants::NUM_REGS;
use crate::config::Config;
use crate::core::arch::RegisterFile;
use crate::core::pipeline::backend::{LoadStoreBuffer, ReservationStation};
use crate::core::pipeline::frontend::{Decoder, InstructionUnit};
use crate::core::pipeline::rob::ReorderBuffer;
use crate::core::units::alu::Alu;
use crate::core::units::bru::BranchPredictor;
use crate::core::units::memory::Memory;
use crate::sim::clock::Clock;
use crate::sim::loader::ProgramImage;
use crate::stats::SimStats;

/// Identifies one clocked unit for the compute phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UnitId {
    /// Branch predictor.
    Predictor,
    /// Instruction unit (fetch).
    Fetch,
    /// Decode latch.
    Decoder,
    /// Register file and rename tags.
    RegisterFile,
    /// Reservation station.
    ReservationStation,
    /// Integer ALU.
    Alu,
    /// Load/store buffer.
    LoadStoreBuffer,
    /// Main memory and its ports.
    Memory,
    /// Reorder buffer.
    ReorderBuffer,
}

impl UnitId {
    /// Every unit, in the canonical visit order.
    pub const ALL: [Self; 9] = [
        Self::Predictor,
        Self::Fetch,
        Self::Decoder,
        Self::RegisterFile,
        Self::ReservationStation,
        Self::Alu,
        Self::LoadStoreBuffer,
        Self::Memory,
        Self::ReorderBuffer,
    ];
}

/// Main CPU structure containing all processor state and components.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cpu {
    /// Global clock.
    pub clock: Clock,
    /// Branch predictor.
    pub predictor: BranchPredictor,
    /// Instruction unit.
    pub fetch: InstructionUnit,
    /// Decode latch.
    pub decoder: Decoder,
    /// Architectural registers and rename tags.
    pub regs: RegisterFile,
    /// Reservation station.
    pub rs: ReservationStation,
    /// Integer ALU.
    pub alu: Alu,
    /// Load/store buffer.
    pub lsb: LoadStoreBuffer,
    /// Main memory.
    pub memory: Memory,
    /// Reorder buffer.
    pub rob: ReorderBuffer,
    /// Cycles in which a decoded instruction could not be dispatched.
    pub decode_stalls: u64,
}

impl Cpu {
    /// Creates a CPU sized by `config` with empty memory and a running clock.
    pub fn new(config: &Config) -> Self {
        let p = &config.pipeline;
        let mut clock = Clock::new();
        clock.run();
        Self {
            clock,
            predictor: BranchPredictor::new(p.predictor_entries),
            fetch: InstructionUnit::new(p.iq_size),
            decoder: Decoder::new(),
            regs: RegisterFile::new(),
            rs: ReservationStation::new(p.rs_size),
            alu: Alu::new(),
            lsb: LoadStoreBuffer::new(p.lsb_size),
            memory: Memory::new(config.memory.data_latency),
            rob: ReorderBuffer::new(p.rob_size, config.general.trace_commits),
            decode_stalls: 0,
        }
    }

    /// Copies a program image into memory.
    pub fn load_image(&mut self, image: &ProgramImage) {
        self.memory.load_image(image);
    }

    /// True once the halt instruction has committed.
    #[inline]
    pub const fn is_halted(&self) -> bool {
        self.rob.is_halted()
    }

    /// Current cycle.
    #[inline]
    pub const fn cycle(&self) -> u64 {
        self.clock.cycle()
    }

    /// Committed value of register `reg`.
    #[inline]
    pub fn reg(&self, reg: usize) -> u32 {
        self.regs.value(reg)
    }

    /// All committed register values.
    pub const fn regs(&self) -> &[u32; NUM_REGS] {
        self.regs.values()
    }

    /// Snapshot of the performance counters.
    pub fn stats(&self) -> SimStats {
        SimStats {
            cycles: self.clock.cycle(),
            instructions_committed: self.rob.committed(),
            flushes: self.rob.flushes(),
            decode_stalls: self.decode_stalls,
            branches: self.predictor.lookups(),
            branch_correct: self.predictor.correct(),
        }
    }
}
