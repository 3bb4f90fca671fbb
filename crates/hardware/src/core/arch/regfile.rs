//! Renamed Integer Register File.
//!
//! This module implements the 32 architectural registers plus renaming state.
//! It performs the following:
//! 1. **Storage:** Committed register values; `x0` is hardwired to zero.
//! 2. **Renaming:** A producer tag (reorder buffer slot) per register, set at decode.
//! 3. **Write-Back:** Stores committed values and clears a tag only if it still names
//!    the committing slot, so a younger rename is never erased by an older commit.
//! 4. **Flush:** Drops every tag; architectural values are untouched.

use crate::common::constants::NUM_REGS;
use crate::core::pipeline::signals::{Control, DecodedInst, RegWriteback, RobId};
use crate::core::pipeline::traits::Sequential;
use crate::sim::cell::Staged;

/// Integer registers plus the slot that will next write each of them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterFile {
    values: Staged<[u32; NUM_REGS]>,
    status: Staged<[Option<RobId>; NUM_REGS]>,
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterFile {
    /// Creates a register file with every register zero and unrenamed.
    pub fn new() -> Self {
        Self {
            values: Staged::new([0; NUM_REGS]),
            status: Staged::new([None; NUM_REGS]),
        }
    }

    /// Committed value of `reg`.
    #[inline]
    pub fn value(&self, reg: usize) -> u32 {
        if reg == 0 { 0 } else { self.values.read()[reg] }
    }

    /// Committed producer tag of `reg`.
    #[inline]
    pub fn status(&self, reg: usize) -> Option<RobId> {
        if reg == 0 { None } else { self.status.read()[reg] }
    }

    /// All committed register values.
    pub const fn values(&self) -> &[u32; NUM_REGS] {
        self.values.read()
    }

    /// Sets a register immediately in both slots; for loading initial state.
    pub fn set(&mut self, reg: usize, value: u32) {
        if reg == 0 {
            return;
        }
        let mut values = *self.values.read();
        values[reg] = value;
        self.values.force(values);
    }

    /// Computes this cycle's register and tag updates.
    ///
    /// # Arguments
    ///
    /// * `ctrl` - Flush/stall control for this cycle.
    /// * `writeback` - The reorder buffer's committed write-back, if any.
    /// * `decoded` - The decoder's committed output.
    /// * `next_id` - Slot the reorder buffer allocates this cycle.
    pub fn compute(
        &mut self,
        ctrl: &Control,
        writeback: Option<RegWriteback>,
        decoded: Option<&DecodedInst>,
        next_id: RobId,
    ) {
        let mut values = *self.values.read();
        let mut status = *self.status.read();

        // Commits are architectural and survive a flush.
        if let Some(wb) = writeback.filter(|wb| wb.rd != 0) {
            values[wb.rd] = wb.value;
            if status[wb.rd] == Some(wb.id) {
                status[wb.rd] = None;
            }
        }

        if ctrl.is_flush() {
            status = [None; NUM_REGS];
        } else if !ctrl.stall {
            if let Some(inst) = decoded.filter(|i| i.kind.writes_rd() && i.rd != 0) {
                status[inst.rd] = Some(next_id);
            }
        }

        self.values.stage(values);
        self.status.stage(status);
    }
}

impl Sequential for RegisterFile {
    fn advance(&mut self) {
        self.values.commit();
        self.status.commit();
    }
}
