//! Simulation substrate and driver.
//!
//! Provides the clocked building blocks every unit is made of, program loading,
//! and the loop that runs a program to halt.

/// Double-buffered state cell.
pub mod cell;

/// Global cycle counter.
pub mod clock;

/// Multi-cycle effect scheduling.
pub mod latency;

/// Hex program image parser.
pub mod loader;

/// Run-to-halt driver.
pub mod simulator;

pub use simulator::Simulator;
