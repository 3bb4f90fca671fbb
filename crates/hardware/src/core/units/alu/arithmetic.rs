//! ALU arithmetic operations (ADD, SUB), wrapping at 32 bits.

use crate::core::pipeline::signals::AluOp;

/// Executes an arithmetic operation; returns `0` for non-arithmetic opcodes.
pub const fn execute(op: AluOp, a: u32, b: u32) -> u32 {
    match op {
        AluOp::Add => a.wrapping_add(b),
        AluOp::Sub => a.wrapping_sub(b),
        _ => 0,
    }
}
