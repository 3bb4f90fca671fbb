//! Main Execution Loop.
//!
//! This module implements the three-phase clock cycle. It performs the following:
//! 1. **Advance:** Every unit commits its staged state (the clock edge).
//! 2. **Control:** Flush and dispatch stall are derived from committed state only.
//! 3. **Compute:** Each unit reads its collaborators' committed state and stages its own.
//! 4. **Apply:** Matured latency effects write their results.
//! 5. **Drain:** After halt, in-flight memory writes are forced to complete.
//!
//! Because compute reads only committed state, the visit order within the phase
//! cannot change the outcome; `step_with_order` lets callers check that.

use tracing::{debug, trace};

use super::{Cpu, UnitId};
use crate::core::pipeline::frontend::is_stall_needed;
use crate::core::pipeline::operand::OperandView;
use crate::core::pipeline::signals::Control;
use crate::core::pipeline::traits::Sequential;

impl Cpu {
    /// Runs one cycle, visiting units in the canonical order.
    pub fn step(&mut self) {
        self.step_with_order(&UnitId::ALL);
    }

    /// Runs one cycle, computing units in `order`.
    ///
    /// `order` is expected to be a permutation of [`UnitId::ALL`]; a unit left
    /// out keeps last cycle's staged state.
    pub fn step_with_order(&mut self, order: &[UnitId]) {
        self.advance();
        let ctrl = self.control();
        if ctrl.stall {
            self.decode_stalls += 1;
        }
        trace!(
            cycle = self.clock.cycle(),
            pc = self.fetch.pc(),
            iq = self.fetch.queue_len(),
            rob = self.rob.len(),
            rs = self.rs.len(),
            lsb = self.lsb.len(),
            flush = ?ctrl.flush,
            stall = ctrl.stall,
            "cycle"
        );
        for &unit in order {
            self.compute_unit(unit, &ctrl);
        }
        self.apply();
        self.clock.tick();
    }

    /// Flush and stall for this cycle, from committed state.
    pub fn control(&self) -> Control {
        let flush = self.rob.redirect();
        let stall = flush.is_none()
            && self.decoder.output().is_some_and(|d| {
                is_stall_needed(
                    d.kind,
                    self.rob.is_full(),
                    self.rs.is_full(),
                    self.lsb.is_full(),
                )
            });
        Control { flush, stall }
    }

    /// True if neither requester holds the data port and no access is in flight.
    pub fn is_data_port_free(&self) -> bool {
        !self.memory.is_data_busy(&self.clock)
            && self.lsb.load_request().is_none()
            && self.rob.store_request().is_none()
    }

    /// Completes in-flight memory writes after halt and ticks once more.
    pub fn drain(&mut self) {
        debug!(cycle = self.clock.cycle(), "draining in-flight memory access");
        self.memory.drain();
        self.advance();
        self.clock.tick();
    }

    /// Commits every unit's staged state.
    ///
    /// Idempotent: staged slots keep their value, so calling this between
    /// steps only exposes the last cycle's results early.
    pub fn advance(&mut self) {
        self.predictor.advance();
        self.fetch.advance();
        self.decoder.advance();
        self.regs.advance();
        self.rs.advance();
        self.alu.advance();
        self.lsb.advance();
        self.memory.advance();
        self.rob.advance();
    }

    /// Runs matured latency effects.
    fn apply(&mut self) {
        self.alu.apply(&self.clock);
        self.memory.apply(&self.clock);
    }

    /// Computes one unit from committed state.
    fn compute_unit(&mut self, unit: UnitId, ctrl: &Control) {
        let decoded = self.decoder.output();
        let next_id = self.rob.next_id();
        let port_free = self.is_data_port_free();

        match unit {
            UnitId::Predictor => self.predictor.compute(self.rob.outcome()),
            UnitId::Fetch => {
                self.fetch.compute(
                    ctrl,
                    self.memory.fetched(),
                    &self.predictor,
                    self.memory.is_fetch_busy(&self.clock),
                );
            }
            UnitId::Decoder => self.decoder.compute(ctrl, self.fetch.to_decoder()),
            UnitId::RegisterFile => {
                self.regs
                    .compute(ctrl, self.rob.writeback(), decoded.as_ref(), next_id);
            }
            UnitId::ReservationStation => {
                let view = OperandView {
                    rf: &self.regs,
                    rob: &self.rob,
                    alu: &self.alu,
                    memory: &self.memory,
                };
                self.rs.compute(ctrl, &view, decoded.as_ref(), next_id);
            }
            UnitId::Alu => self.alu.compute(&self.clock, ctrl, self.rs.to_alu()),
            UnitId::LoadStoreBuffer => {
                let view = OperandView {
                    rf: &self.regs,
                    rob: &self.rob,
                    alu: &self.alu,
                    memory: &self.memory,
                };
                self.lsb.compute(
                    ctrl,
                    &view,
                    port_free,
                    self.rob.store_request(),
                    decoded.as_ref(),
                    next_id,
                );
            }
            UnitId::Memory => self.memory.compute(
                &self.clock,
                ctrl,
                self.fetch.fetch_request(),
                self.lsb.load_request(),
                self.rob.store_request(),
            ),
            UnitId::ReorderBuffer => self.rob.compute(
                &self.clock,
                ctrl,
                self.alu.output(),
                self.memory.broadcast(),
                &self.lsb,
                port_free,
                decoded.as_ref(),
            ),
        }
    }
}
