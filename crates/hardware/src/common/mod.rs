//! Common utilities and types used throughout the Tomasulo core simulator.
//!
//! This module provides the building blocks shared by every unit of the simulator.
//! It includes:
//! 1. **Constants:** Page geometry, register count, fetch headroom and the halt encoding.
//! 2. **Bit Manipulation:** Field extraction and sign extension for instruction decoding.
//! 3. **Error Handling:** The host-facing `SimError` type and its `SimResult` alias.

/// Bit-field extraction and sign-extension helpers.
pub mod bits;

/// Common constants used throughout the simulator.
pub mod constants;

/// Error types for image loading, configuration and run control.
pub mod error;

pub use constants::{HALT_INSTRUCTION, NUM_REGS, PAGE_SIZE};
pub use error::{SimError, SimResult};
