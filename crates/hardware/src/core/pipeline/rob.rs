//! Reorder Buffer (ROB) for in-order commit.
//!
//! The ROB is a circular buffer that gives every dispatched instruction its place in
//! program order. It provides:
//! 1. **Allocation:** One slot per dispatched instruction; the slot index is its rename tag.
//!    LUI, AUIPC, JAL and the halt marker are complete on allocation.
//! 2. **Completion:** ALU and load broadcasts, and store operands resolved in the
//!    load/store buffer, fill in pending entries.
//! 3. **In-order Commit:** At most one instruction per cycle retires from the head,
//!    producing a register write-back, a store hand-off, a predictor update or a redirect.
//! 4. **Flush:** A redirect published at commit clears the whole buffer the next cycle.
//! 5. **Commit Trace:** Optionally records the PC and cycle of every committed instruction.

use tracing::debug;

use crate::core::pipeline::backend::load_store_buffer::LoadStoreBuffer;
use crate::core::pipeline::signals::{
    AluOutput, BranchOutcome, Broadcast, Control, DecodedInst, RegWriteback, RobId, StoreRequest,
};
use crate::core::pipeline::traits::Sequential;
use crate::isa::instruction::InstKind;
use crate::sim::cell::Staged;
use crate::sim::clock::Clock;

/// A single entry in the Reorder Buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RobEntry {
    /// Instruction kind.
    pub kind: InstKind,
    /// Destination register.
    pub rd: usize,
    /// Program counter of the instruction.
    pub pc: u32,
    /// Result, link address, branch condition (0/1) or store data.
    pub value: u32,
    /// Jump/branch target or store address.
    pub target: u32,
    /// Fetch-time prediction.
    pub predicted_taken: bool,
    /// Result known; eligible to commit at the head.
    pub done: bool,
}

impl RobEntry {
    /// Allocates an entry for `inst`, completing it if no execution is needed.
    fn allocate(inst: &DecodedInst) -> Self {
        let link = inst.pc.wrapping_add(4);
        let target = inst.pc.wrapping_add(inst.imm);
        let (value, done) = match inst.kind {
            InstKind::Lui => (inst.imm, true),
            InstKind::Auipc => (target, true),
            InstKind::Jal => (link, true),
            InstKind::Jalr => (link, false),
            InstKind::Halt => (0, true),
            _ => (0, false),
        };
        Self {
            kind: inst.kind,
            rd: inst.rd,
            pc: inst.pc,
            value,
            target,
            predicted_taken: inst.predicted_taken,
            done,
        }
    }

    /// Redirect target if committing this entry must flush the pipeline.
    fn redirect(&self) -> Option<u32> {
        match self.kind {
            InstKind::Jalr => Some(self.target),
            InstKind::Jal => (!self.predicted_taken).then_some(self.target),
            kind if kind.is_branch() => {
                let taken = self.value != 0;
                (taken != self.predicted_taken).then(|| {
                    if taken {
                        self.target
                    } else {
                        self.pc.wrapping_add(4)
                    }
                })
            }
            _ => None,
        }
    }
}

/// Slots plus the circular head/count pair.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Ring {
    slots: Vec<Option<RobEntry>>,
    head: usize,
    count: usize,
}

impl Ring {
    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn tail(&self) -> usize {
        (self.head + self.count) % self.capacity()
    }

    fn is_live(&self, id: RobId) -> bool {
        id.0 < self.capacity() && (id.0 + self.capacity() - self.head) % self.capacity() < self.count
    }

    fn live_mut(&mut self, id: RobId) -> Option<&mut RobEntry> {
        if self.is_live(id) {
            self.slots[id.0].as_mut()
        } else {
            None
        }
    }

    fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
        self.count = 0;
    }
}

/// Everything a commit publishes for the next cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Retire {
    writeback: Option<RegWriteback>,
    store: Option<StoreRequest>,
    redirect: Option<u32>,
    outcome: Option<BranchOutcome>,
}

/// Reorder Buffer: circular buffer for in-order commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReorderBuffer {
    ring: Staged<Ring>,
    writeback: Staged<Option<RegWriteback>>,
    to_mem: Staged<Option<StoreRequest>>,
    redirect: Staged<Option<u32>>,
    outcome: Staged<Option<BranchOutcome>>,
    halted: Staged<bool>,
    // Host-side counters: no unit reads them, so they are not staged.
    committed: u64,
    flushes: u64,
    trace: Option<Vec<(u32, u64)>>,
}

impl ReorderBuffer {
    /// Creates an empty buffer with `capacity` slots.
    pub fn new(capacity: usize, trace_commits: bool) -> Self {
        Self {
            ring: Staged::new(Ring {
                slots: vec![None; capacity.max(1)],
                head: 0,
                count: 0,
            }),
            writeback: Staged::default(),
            to_mem: Staged::default(),
            redirect: Staged::default(),
            outcome: Staged::default(),
            halted: Staged::default(),
            committed: 0,
            flushes: 0,
            trace: trace_commits.then(Vec::new),
        }
    }

    /// Slot the next dispatched instruction receives.
    #[inline]
    pub fn next_id(&self) -> RobId {
        RobId(self.ring.read().tail())
    }

    /// True if no slot is free.
    #[inline]
    pub fn is_full(&self) -> bool {
        let ring = self.ring.read();
        ring.count >= ring.capacity()
    }

    /// Number of in-flight instructions.
    #[inline]
    pub fn len(&self) -> usize {
        self.ring.read().count
    }

    /// True if nothing is in flight.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.read().count == 0
    }

    /// True if `id` names an allocated, uncommitted slot.
    #[inline]
    pub fn is_live(&self, id: RobId) -> bool {
        self.ring.read().is_live(id)
    }

    /// The entry in slot `id`, if live.
    pub fn entry(&self, id: RobId) -> Option<&RobEntry> {
        let ring = self.ring.read();
        if ring.is_live(id) {
            ring.slots[id.0].as_ref()
        } else {
            None
        }
    }

    /// In-flight entries from head to tail.
    pub fn entries(&self) -> impl Iterator<Item = &RobEntry> {
        let ring = self.ring.read();
        (0..ring.count).filter_map(move |i| ring.slots[(ring.head + i) % ring.capacity()].as_ref())
    }

    /// Value of slot `id` if it is live and complete.
    pub fn completed_value(&self, id: RobId) -> Option<u32> {
        self.entry(id).filter(|e| e.done).map(|e| e.value)
    }

    /// Register write-back from last cycle's commit.
    #[inline]
    pub const fn writeback(&self) -> Option<RegWriteback> {
        *self.writeback.read()
    }

    /// Store handed to memory by last cycle's commit.
    #[inline]
    pub const fn store_request(&self) -> Option<StoreRequest> {
        *self.to_mem.read()
    }

    /// Redirect target published by last cycle's commit.
    #[inline]
    pub const fn redirect(&self) -> Option<u32> {
        *self.redirect.read()
    }

    /// Conditional branch outcome from last cycle's commit.
    #[inline]
    pub const fn outcome(&self) -> Option<BranchOutcome> {
        *self.outcome.read()
    }

    /// True once the halt marker has committed.
    #[inline]
    pub const fn is_halted(&self) -> bool {
        *self.halted.read()
    }

    /// Instructions committed so far.
    pub const fn committed(&self) -> u64 {
        self.committed
    }

    /// Redirects published so far.
    pub const fn flushes(&self) -> u64 {
        self.flushes
    }

    /// Recorded `(pc, cycle)` pairs of committed instructions, if tracing.
    pub fn trace(&self) -> Option<&[(u32, u64)]> {
        self.trace.as_deref()
    }

    /// Computes completion, commit and allocation for this cycle.
    ///
    /// # Arguments
    ///
    /// * `clock` - Global clock, for the commit trace.
    /// * `ctrl` - Flush/stall control; the flush is this buffer's own last redirect.
    /// * `alu` - ALU output on the bus this cycle.
    /// * `broadcast` - Load result on the bus this cycle.
    /// * `lsb` - Load/store buffer (committed), for store operands.
    /// * `port_free` - The data port can accept a store this cycle.
    /// * `decoded` - The decoder's committed output.
    #[allow(clippy::too_many_arguments)]
    pub fn compute(
        &mut self,
        clock: &Clock,
        ctrl: &Control,
        alu: Option<AluOutput>,
        broadcast: Option<Broadcast>,
        lsb: &LoadStoreBuffer,
        port_free: bool,
        decoded: Option<&DecodedInst>,
    ) {
        let mut ring = self.ring.read().clone();
        let mut retire = Retire::default();

        if ctrl.is_flush() {
            ring.clear();
        } else if !self.is_halted() {
            Self::complete(&mut ring, alu, broadcast, lsb);
            retire = self.commit_head(clock, &mut ring, port_free);
            if !ctrl.stall {
                if let Some(inst) = decoded {
                    let tail = ring.tail();
                    ring.slots[tail] = Some(RobEntry::allocate(inst));
                    ring.count += 1;
                }
            }
        }

        self.ring.stage(ring);
        self.writeback.stage(retire.writeback);
        self.to_mem.stage(retire.store);
        self.redirect.stage(retire.redirect);
        self.outcome.stage(retire.outcome);
    }

    /// Applies this cycle's broadcasts and resolved store operands.
    fn complete(
        ring: &mut Ring,
        alu: Option<AluOutput>,
        broadcast: Option<Broadcast>,
        lsb: &LoadStoreBuffer,
    ) {
        if let Some(out) = alu {
            if let Some(e) = ring.live_mut(out.id) {
                if out.is_target {
                    e.target = out.value & !1;
                } else {
                    e.value = out.value;
                }
                e.done = true;
            }
        }
        if let Some(bc) = broadcast {
            if let Some(e) = ring.live_mut(bc.id) {
                e.value = bc.value;
                e.done = true;
            }
        }
        for i in 0..ring.count {
            let id = RobId((ring.head + i) % ring.capacity());
            let pending_store = ring.slots[id.0]
                .as_ref()
                .is_some_and(|e| e.kind.is_store() && !e.done);
            if !pending_store {
                continue;
            }
            if let (Some((addr, data)), Some(e)) = (lsb.store_operands(id), ring.slots[id.0].as_mut()) {
                e.target = addr;
                e.value = data;
                e.done = true;
            }
        }
    }

    /// Retires the head entry if it is complete.
    fn commit_head(&mut self, clock: &Clock, ring: &mut Ring, port_free: bool) -> Retire {
        let id = RobId(ring.head);
        let Some(head) = ring.slots[id.0] else {
            return Retire::default();
        };
        if !head.done || (head.kind.is_store() && !port_free) {
            return Retire::default();
        }

        ring.slots[id.0] = None;
        ring.head = (ring.head + 1) % ring.capacity();
        ring.count -= 1;
        self.committed += 1;
        if let Some(trace) = self.trace.as_mut() {
            trace.push((head.pc, clock.cycle()));
        }
        #[cfg(feature = "commit-log")]
        tracing::info!(pc = head.pc, kind = ?head.kind, value = head.value, "commit");

        let mut retire = Retire::default();
        if head.kind.writes_rd() {
            retire.writeback = Some(RegWriteback {
                rd: head.rd,
                value: head.value,
                id,
            });
        }
        if head.kind.is_store() {
            retire.store = Some(StoreRequest {
                kind: head.kind,
                addr: head.target,
                value: head.value,
                id,
            });
        }
        if head.kind.is_branch() {
            let taken = head.value != 0;
            retire.outcome = Some(BranchOutcome {
                pc: head.pc,
                taken,
                correct: taken == head.predicted_taken,
            });
        }
        retire.redirect = head.redirect();
        if let Some(target) = retire.redirect {
            self.flushes += 1;
            debug!(pc = head.pc, target, cycle = clock.cycle(), "redirect at commit");
        }
        if head.kind == InstKind::Halt {
            debug!(pc = head.pc, cycle = clock.cycle(), "halt committed");
            self.halted.stage(true);
        }
        retire
    }
}

impl Sequential for ReorderBuffer {
    fn advance(&mut self) {
        self.ring.commit();
        self.writeback.commit();
        self.to_mem.commit();
        self.redirect.commit();
        self.outcome.commit();
        self.halted.commit();
    }
}
