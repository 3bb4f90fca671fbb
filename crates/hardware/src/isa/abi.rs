//! RISC-V Application Binary Interface (ABI) register name constants.
//!
//! Defines the register indices the simulator refers to by ABI name.

/// Register x0 (zero register, always zero).
pub const REG_ZERO: usize = 0;
/// Register x1 (return address, ra).
pub const REG_RA: usize = 1;
/// Register x2 (stack pointer, sp).
pub const REG_SP: usize = 2;
/// Register x10 (first argument/return value, a0); its low byte is the program result.
pub const REG_A0: usize = 10;
