//! ALU bitwise and comparison operations.
//!
//! Comparisons produce 1 when the predicate holds and 0 otherwise; they serve
//! both SLT-family instructions and conditional branch resolution.

use crate::core::pipeline::signals::AluOp;

/// Executes a bitwise or comparison operation; returns `0` for other opcodes.
pub const fn execute(op: AluOp, a: u32, b: u32) -> u32 {
    match op {
        AluOp::And => a & b,
        AluOp::Or => a | b,
        AluOp::Xor => a ^ b,
        AluOp::Eq => (a == b) as u32,
        AluOp::Ne => (a != b) as u32,
        AluOp::Lt => ((a as i32) < (b as i32)) as u32,
        AluOp::Ltu => (a < b) as u32,
        AluOp::Ge => ((a as i32) >= (b as i32)) as u32,
        AluOp::Geu => (a >= b) as u32,
        _ => 0,
    }
}
