//! Execution units and functional components.
//!
//! This module contains the units that do work on behalf of the out-of-order
//! window: the integer ALU, the branch predictor consulted by fetch, and the
//! paged main memory with its instruction and data ports.

/// Arithmetic Logic Unit for integer operations.
pub mod alu;

/// Branch prediction unit (2-bit saturating counters).
pub mod bru;

/// Sparse main memory with latency-controlled ports.
pub mod memory;
