//! Core processor implementation.
//!
//! This module contains the Tomasulo core: the out-of-order pipeline, the
//! execution units, the architectural register file, and the orchestrator
//! that runs every unit through the three-phase cycle.

/// Architectural state (register file with rename tags).
pub mod arch;

/// CPU core implementation and execution orchestration.
pub mod cpu;

/// Instruction pipeline implementation (front end, back end, ROB, signals).
pub mod pipeline;

/// Execution units (ALU, branch predictor, memory).
pub mod units;

pub use self::cpu::{Cpu, UnitId};
