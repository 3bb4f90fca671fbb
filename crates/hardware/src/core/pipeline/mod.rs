//! Instruction pipeline implementation.
//!
//! This module contains the Tomasulo pipeline between fetch and commit.
//! It includes the following components:
//! 1. **Frontend:** Instruction fetch with static prediction, and decode.
//! 2. **Backend:** Reservation station and load/store buffer.
//! 3. **Operands:** Value-or-tag resolution shared by every dispatching unit.
//! 4. **ROB:** In-order completion, commit and redirect.
//! 5. **Signals:** Messages published between units.
//! 6. **Traits:** The clocked-unit interface.

/// Reservation station and load/store buffer.
pub mod backend;

/// Instruction fetch and decode.
pub mod frontend;

/// Source operand resolution.
pub mod operand;

/// Reorder buffer.
pub mod rob;

/// Inter-unit messages.
pub mod signals;

/// Clocked-unit trait.
pub mod traits;

#[cfg(test)]
pub(crate) mod test_support;
