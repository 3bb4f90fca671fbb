//! Load/Store Buffer.
//!
//! A FIFO of memory instructions in program order. It performs:
//! 1. **Dependency Tracking:** Base address and store data resolve independently through
//!    the shared operand resolver.
//! 2. **Load Issue:** Only the head entry, only a load, only with a resolved address and a
//!    free data port. Issued loads leave the buffer.
//! 3. **Store Retirement:** Stores stay until the reorder buffer hands them to memory at
//!    commit, so every load behind a store waits for it.
//! 4. **Flush:** Clears the buffer and withdraws a staged load request.

use std::collections::VecDeque;

use crate::core::pipeline::operand::{Operand, OperandView};
use crate::core::pipeline::signals::{Control, DecodedInst, LoadRequest, RobId, StoreRequest};
use crate::core::pipeline::traits::Sequential;
use crate::isa::instruction::InstKind;
use crate::sim::cell::Staged;

/// A memory instruction waiting in program order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LsbEntry {
    /// Load or store kind.
    pub kind: InstKind,
    /// Reorder buffer slot of the instruction.
    pub id: RobId,
    /// Base register operand.
    pub base: Operand,
    /// Sign-extended offset.
    pub offset: u32,
    /// Store data operand; `None` for loads.
    pub data: Option<Operand>,
}

impl LsbEntry {
    /// Effective address, once the base is known.
    #[inline]
    pub fn address(&self) -> Option<u32> {
        self.base.value().map(|b| b.wrapping_add(self.offset))
    }

    /// Address and data of a store whose operands have both resolved.
    pub fn resolved_store(&self) -> Option<(u32, u32)> {
        Some((self.address()?, self.data?.value()?))
    }
}

/// In-order buffer of loads and stores.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadStoreBuffer {
    entries: Staged<VecDeque<LsbEntry>>,
    to_mem: Staged<Option<LoadRequest>>,
    capacity: usize,
}

impl LoadStoreBuffer {
    /// Creates an empty buffer with `capacity` slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Staged::new(VecDeque::with_capacity(capacity)),
            to_mem: Staged::default(),
            capacity,
        }
    }

    /// True if no slot is free.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.entries.read().len() >= self.capacity
    }

    /// Number of buffered instructions.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True if nothing is buffered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Buffered instructions, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &LsbEntry> {
        self.entries.read().iter()
    }

    /// Resolved address and data of the store in slot `id`, if both are known.
    pub fn store_operands(&self, id: RobId) -> Option<(u32, u32)> {
        self.entries
            .read()
            .iter()
            .find(|e| e.id == id && e.kind.is_store())
            .and_then(LsbEntry::resolved_store)
    }

    /// Load request presented to the data port.
    #[inline]
    pub const fn load_request(&self) -> Option<LoadRequest> {
        *self.to_mem.read()
    }

    /// Computes this cycle's wake-up, load issue, store retirement and enqueue.
    ///
    /// # Arguments
    ///
    /// * `ctrl` - Flush/stall control for this cycle.
    /// * `view` - Committed operand sources.
    /// * `port_free` - The data port can accept a new access this cycle.
    /// * `retired` - Store handed to memory by the reorder buffer this cycle.
    /// * `decoded` - The decoder's committed output.
    /// * `next_id` - Slot the reorder buffer allocates this cycle.
    pub fn compute(
        &mut self,
        ctrl: &Control,
        view: &OperandView<'_>,
        port_free: bool,
        retired: Option<StoreRequest>,
        decoded: Option<&DecodedInst>,
        next_id: RobId,
    ) {
        if ctrl.is_flush() {
            self.entries.stage(VecDeque::new());
            self.to_mem.stage(None);
            return;
        }

        let mut entries: VecDeque<LsbEntry> = self
            .entries
            .read()
            .iter()
            .map(|e| LsbEntry {
                base: view.wake(e.base),
                data: e.data.map(|d| view.wake(d)),
                ..*e
            })
            .collect();

        if let Some(st) = retired {
            entries.retain(|e| e.id != st.id);
        }

        let request = match entries.front() {
            Some(head) if head.kind.is_load() && port_free => head.address().map(|addr| {
                LoadRequest {
                    kind: head.kind,
                    addr,
                    id: head.id,
                }
            }),
            _ => None,
        };
        if request.is_some() {
            let _ = entries.pop_front();
        }
        self.to_mem.stage(request);

        if !ctrl.stall {
            if let Some(inst) = decoded.filter(|i| i.kind.is_load() || i.kind.is_store()) {
                entries.push_back(LsbEntry {
                    kind: inst.kind,
                    id: next_id,
                    base: view.resolve_register(inst.rs1),
                    offset: inst.imm,
                    data: inst
                        .kind
                        .is_store()
                        .then(|| view.resolve_register(inst.rs2)),
                });
            }
        }
        self.entries.stage(entries);
    }
}

impl Sequential for LoadStoreBuffer {
    fn advance(&mut self) {
        self.entries.commit();
        self.to_mem.commit();
    }
}
