//! Cycle-accurate Tomasulo RV32I simulator library.
//!
//! This crate implements an out-of-order RV32I core with the following:
//! 1. **Core:** Instruction fetch with static prediction, decode, register renaming,
//!    reservation station, load/store buffer, and in-order commit through a reorder buffer.
//! 2. **Memory:** Sparse paged memory behind a 1-cycle instruction port and a
//!    latency-configurable data port.
//! 3. **ISA:** Decoding of the RV32I base integer set plus a reserved halt encoding.
//! 4. **Simulation:** Double-buffered state cells, latency controllers, image loading,
//!    configuration, and statistics collection.

/// Common types and constants (errors, bit helpers, encodings).
pub mod common;
/// Simulator configuration (defaults, hierarchical config structures, validation).
pub mod config;
/// CPU core (pipeline, arch, units, orchestration).
pub mod core;
/// Instruction set (decode, instruction kinds, ABI, RV32I encodings).
pub mod isa;
/// Substrate, loader and driver.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Error type for loading, configuration and run control.
pub use crate::common::error::{SimError, SimResult};
/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Main CPU type; owns every unit of the core.
pub use crate::core::Cpu;
/// Run-to-halt driver; construct with `Simulator::new`.
pub use crate::sim::Simulator;
/// Performance counters of a run.
pub use crate::stats::SimStats;
