//! Instruction Unit: PC generation, fetch and static prediction.
//!
//! The instruction unit keeps one request in flight on the instruction port and
//! buffers returned words in a bounded queue. Each cycle it:
//! 1. **Dequeues:** Hands the oldest queued instruction to the decoder unless decode is stalled.
//! 2. **Enqueues:** Takes the word the instruction port returned, predicting JAL as taken and
//!    conditional branches via the branch predictor.
//! 3. **Redirects:** On a predicted-taken word, fetches the target next and neglects the
//!    sequential word already in flight.
//! 4. **Requests:** Issues the next fetch while the queue has headroom and the
//!    instruction port is idle.
//!
//! On flush the queue is emptied and fetch restarts at the redirect target in the same cycle.

use std::collections::VecDeque;

use tracing::trace;

use crate::common::constants::{FETCH_HEADROOM, INSTRUCTION_SIZE};
use crate::core::pipeline::signals::{Control, FetchedInst, FetchedWord};
use crate::core::pipeline::traits::Sequential;
use crate::core::units::bru::BranchPredictor;
use crate::isa::decode::decode;
use crate::isa::instruction::InstKind;
use crate::sim::cell::Staged;

/// Fetch state: PC, instruction queue and the request/hand-off latches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstructionUnit {
    pc: Staged<u32>,
    queue: Staged<VecDeque<FetchedInst>>,
    to_mem: Staged<Option<u32>>,
    to_decoder: Staged<Option<FetchedInst>>,
    neglect: Staged<bool>,
    capacity: usize,
}

impl InstructionUnit {
    /// Creates an instruction unit fetching from address 0 with a queue of `capacity`.
    pub fn new(capacity: usize) -> Self {
        Self {
            pc: Staged::new(0),
            queue: Staged::new(VecDeque::with_capacity(capacity)),
            to_mem: Staged::default(),
            to_decoder: Staged::default(),
            neglect: Staged::default(),
            capacity,
        }
    }

    /// Next address to fetch.
    #[inline]
    pub const fn pc(&self) -> u32 {
        *self.pc.read()
    }

    /// Fetch request presented to the instruction port.
    #[inline]
    pub const fn fetch_request(&self) -> Option<u32> {
        *self.to_mem.read()
    }

    /// Instruction handed to the decoder.
    #[inline]
    pub const fn to_decoder(&self) -> Option<FetchedInst> {
        *self.to_decoder.read()
    }

    /// Number of queued instructions.
    #[inline]
    pub fn queue_len(&self) -> usize {
        self.queue.read().len()
    }

    /// Queued instructions, oldest first.
    pub fn queue(&self) -> impl Iterator<Item = &FetchedInst> {
        self.queue.read().iter()
    }

    /// True while the next returned word will be discarded.
    #[inline]
    pub const fn is_neglecting(&self) -> bool {
        *self.neglect.read()
    }

    /// Computes this cycle's queue, decoder hand-off and fetch request.
    ///
    /// # Arguments
    ///
    /// * `ctrl` - Flush/stall control for this cycle.
    /// * `fetched` - Word returned by the instruction port this cycle.
    /// * `predictor` - Branch predictor (committed counters).
    /// * `port_busy` - Instruction port still working on an earlier request.
    pub fn compute(
        &mut self,
        ctrl: &Control,
        fetched: Option<FetchedWord>,
        predictor: &BranchPredictor,
        port_busy: bool,
    ) {
        if let Some(target) = ctrl.flush {
            self.queue.stage(VecDeque::new());
            self.to_decoder.stage(None);
            self.neglect.stage(false);
            self.to_mem.stage(Some(target));
            self.pc.stage(target.wrapping_add(INSTRUCTION_SIZE));
            return;
        }

        let mut queue = self.queue.read().clone();
        let mut next = *self.pc.read();
        let mut neglect = *self.neglect.read();

        if ctrl.stall {
            self.to_decoder.stage(*self.to_decoder.read());
        } else {
            self.to_decoder.stage(queue.pop_front());
        }

        if let Some(word) = fetched {
            if neglect {
                trace!(pc = word.pc, "neglecting stale sequential fetch");
                neglect = false;
            } else {
                let target = predicted_target(word, predictor);
                queue.push_back(FetchedInst {
                    inst: word.inst,
                    pc: word.pc,
                    predicted_taken: target.is_some(),
                });
                if let Some(target) = target {
                    next = target;
                    neglect = self.to_mem.read().is_some();
                }
            }
        }

        if !port_busy && self.queue.read().len() + FETCH_HEADROOM <= self.capacity {
            self.to_mem.stage(Some(next));
            self.pc.stage(next.wrapping_add(INSTRUCTION_SIZE));
        } else {
            self.to_mem.stage(None);
            self.pc.stage(next);
        }
        self.neglect.stage(neglect);
        self.queue.stage(queue);
    }
}

/// Target fetch should continue at after `word`, if it is predicted taken.
fn predicted_target(word: FetchedWord, predictor: &BranchPredictor) -> Option<u32> {
    let decoded = decode(word.inst)?;
    let taken = match decoded.kind {
        InstKind::Jal => true,
        kind if kind.is_branch() => predictor.predict(word.pc),
        _ => false,
    };
    taken.then(|| word.pc.wrapping_add(decoded.imm))
}

impl Sequential for InstructionUnit {
    fn advance(&mut self) {
        self.pc.commit();
        self.queue.commit();
        self.to_mem.commit();
        self.to_decoder.commit();
        self.neglect.commit();
    }
}
