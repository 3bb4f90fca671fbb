//! Simulation statistics collection and reporting.
//!
//! This module tracks performance metrics for the Tomasulo core. It provides:
//! 1. **Cycle and IPC:** Total cycles, committed instructions, and derived IPC/CPI.
//! 2. **Speculation:** Flushes caused by mispredicted branches and indirect jumps.
//! 3. **Branch prediction:** Conditional branches committed and correctly predicted.
//! 4. **Stalls:** Cycles in which the decoded instruction could not be dispatched.
//!
//! The report is rendered through `Display`; `serde` serialization backs `--stats json`.

use std::fmt;

use serde::Serialize;

/// Performance counters of one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SimStats {
    /// Total simulator cycles elapsed.
    pub cycles: u64,
    /// Number of instructions committed (including the halt marker).
    pub instructions_committed: u64,
    /// Pipeline flushes (mispredicted branches, JALR, unpredicted JAL).
    pub flushes: u64,
    /// Cycles in which dispatch stalled on a full buffer.
    pub decode_stalls: u64,
    /// Conditional branches committed.
    pub branches: u64,
    /// Conditional branches whose prediction was correct.
    pub branch_correct: u64,
}

impl SimStats {
    /// Committed instructions per cycle.
    pub fn ipc(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            self.instructions_committed as f64 / self.cycles as f64
        }
    }

    /// Cycles per committed instruction.
    pub fn cpi(&self) -> f64 {
        if self.instructions_committed == 0 {
            0.0
        } else {
            self.cycles as f64 / self.instructions_committed as f64
        }
    }

    /// Fraction of conditional branches predicted correctly, if any committed.
    pub fn branch_accuracy(&self) -> Option<f64> {
        (self.branches > 0).then(|| self.branch_correct as f64 / self.branches as f64)
    }
}

impl fmt::Display for SimStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==========================================================")?;
        writeln!(f, "TOMASULO CORE SIMULATION STATISTICS")?;
        writeln!(f, "==========================================================")?;
        writeln!(f, "sim_cycles               {}", self.cycles)?;
        writeln!(f, "sim_insts                {}", self.instructions_committed)?;
        writeln!(f, "sim_ipc                  {:.4}", self.ipc())?;
        writeln!(f, "sim_cpi                  {:.4}", self.cpi())?;
        writeln!(f, "----------------------------------------------------------")?;
        writeln!(f, "PIPELINE")?;
        writeln!(f, "  flushes                {}", self.flushes)?;
        writeln!(f, "  stalls.dispatch        {}", self.decode_stalls)?;
        writeln!(f, "----------------------------------------------------------")?;
        writeln!(f, "BRANCH PREDICTION")?;
        writeln!(f, "  bp.lookups             {}", self.branches)?;
        writeln!(
            f,
            "  bp.mispredicts         {}",
            self.branches - self.branch_correct
        )?;
        match self.branch_accuracy() {
            Some(acc) => writeln!(f, "  bp.accuracy            {:.2}%", acc * 100.0)?,
            None => writeln!(f, "  bp.accuracy            n/a")?,
        }
        write!(f, "==========================================================")
    }
}
