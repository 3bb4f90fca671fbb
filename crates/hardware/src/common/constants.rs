//! Global Simulator Constants.
//!
//! This module defines constants shared across the simulator. It includes:
//! 1. **Memory Constants:** Page size and masks for the sparse memory store.
//! 2. **Instruction Constants:** Instruction width and the reserved halt encoding.
//! 3. **Pipeline Constants:** Architectural register count and fetch queue headroom.

/// Page size in bytes (4KB).
pub const PAGE_SIZE: usize = 4096;

/// Number of bits to shift to convert between bytes and pages.
pub const PAGE_SHIFT: u32 = 12;

/// Mask for extracting the page offset from an address.
pub const PAGE_OFFSET_MASK: u32 = (PAGE_SIZE as u32) - 1;

/// Size of an instruction in bytes.
pub const INSTRUCTION_SIZE: u32 = 4;

/// Bit mask for extracting the opcode field from an instruction.
pub const OPCODE_MASK: u32 = 0x7F;

/// Reserved encoding decoded as halt before normal opcode dispatch.
///
/// Bit-identical to `addi a0, x0, 255`.
pub const HALT_INSTRUCTION: u32 = 0x0ff00513;

/// Number of architectural integer registers.
pub const NUM_REGS: usize = 32;

/// Free instruction queue slots required before a new fetch is issued.
///
/// Covers the word arriving this cycle, the request already in flight and
/// the request about to be issued.
pub const FETCH_HEADROOM: usize = 3;
