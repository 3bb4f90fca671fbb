//! Sparse Main Memory with Instruction and Data Ports.
//!
//! This module implements byte-addressable memory behind two latency-controlled ports.
//! It performs:
//! 1. **Storage:** 4 KiB pages allocated on first write; untouched addresses read as zero.
//! 2. **Instruction Port:** Serves the fetch unit's request each cycle (1 cycle).
//! 3. **Data Port:** Serves one activation at a time (default 3 cycles). An activation may
//!    carry a load from the load/store buffer and a committed store together; the store
//!    is written first.
//! 4. **Flush:** Strips a speculative load from an in-flight activation. Committed stores
//!    are never cancelled.
//!
//! Page contents are only touched by this unit's own matured effects during the apply
//! phase, so they are not double-buffered.

use std::collections::HashMap;
use std::fmt;

use tracing::warn;

use crate::common::bits::sign_extend;
use crate::common::constants::{PAGE_OFFSET_MASK, PAGE_SHIFT, PAGE_SIZE};
use crate::core::pipeline::signals::{Broadcast, Control, FetchedWord, LoadRequest, StoreRequest};
use crate::core::pipeline::traits::Sequential;
use crate::isa::instruction::InstKind;
use crate::sim::cell::Staged;
use crate::sim::clock::Clock;
use crate::sim::latency::LatencyController;
use crate::sim::loader::ProgramImage;

type Page = Box<[u8; PAGE_SIZE]>;

/// Instruction port latency in cycles.
pub const FETCH_LATENCY: u64 = 1;

/// One data port activation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DataAccess {
    /// Speculative load, dropped on flush.
    pub load: Option<LoadRequest>,
    /// Committed store.
    pub store: Option<StoreRequest>,
}

/// Paged memory plus its two ports.
#[derive(Clone, PartialEq, Eq)]
pub struct Memory {
    pages: HashMap<u32, Page>,
    fetch_port: LatencyController<u32>,
    data_port: LatencyController<DataAccess>,
    fetched: Staged<Option<FetchedWord>>,
    broadcast: Staged<Option<Broadcast>>,
    data_latency: u64,
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memory")
            .field("pages", &self.pages.len())
            .field("fetch_port", &self.fetch_port)
            .field("data_port", &self.data_port)
            .field("fetched", &self.fetched)
            .field("broadcast", &self.broadcast)
            .finish_non_exhaustive()
    }
}

impl Memory {
    /// Creates empty memory with the given data port latency.
    pub fn new(data_latency: u64) -> Self {
        Self {
            pages: HashMap::new(),
            fetch_port: LatencyController::new(),
            data_port: LatencyController::new(),
            fetched: Staged::default(),
            broadcast: Staged::default(),
            data_latency,
        }
    }

    /// Reads one byte; untouched pages read as zero without being allocated.
    #[inline]
    pub fn read_byte(&self, addr: u32) -> u8 {
        self.pages
            .get(&(addr >> PAGE_SHIFT))
            .map_or(0, |page| page[(addr & PAGE_OFFSET_MASK) as usize])
    }

    /// Writes one byte, materializing its page as zeroes if needed.
    #[inline]
    pub fn write_byte(&mut self, addr: u32, value: u8) {
        let page = self
            .pages
            .entry(addr >> PAGE_SHIFT)
            .or_insert_with(|| Box::new([0; PAGE_SIZE]));
        page[(addr & PAGE_OFFSET_MASK) as usize] = value;
    }

    /// Reads `bytes` bytes little-endian, zero-extended.
    pub fn read(&self, addr: u32, bytes: u32) -> u32 {
        (0..bytes).fold(0, |acc, i| {
            acc | (u32::from(self.read_byte(addr.wrapping_add(i))) << (8 * i))
        })
    }

    /// Writes the low `bytes` bytes of `value` little-endian.
    pub fn write(&mut self, addr: u32, bytes: u32, value: u32) {
        for i in 0..bytes {
            self.write_byte(addr.wrapping_add(i), (value >> (8 * i)) as u8);
        }
    }

    /// Performs a load of `kind` at `addr`, sign- or zero-extending per kind.
    pub fn load(&self, kind: InstKind, addr: u32) -> u32 {
        let bytes = kind.access_bytes();
        let raw = self.read(addr, bytes);
        if kind.is_signed_load() {
            sign_extend(raw, bytes * 8)
        } else {
            raw
        }
    }

    /// Performs a store of `kind` at `addr`.
    pub fn store(&mut self, kind: InstKind, addr: u32, value: u32) {
        self.write(addr, kind.access_bytes(), value);
    }

    /// Copies a parsed program image into memory.
    pub fn load_image(&mut self, image: &ProgramImage) {
        for (addr, byte) in image.bytes() {
            self.write_byte(addr, byte);
        }
    }

    /// Number of materialized pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Instruction word delivered to fetch this cycle.
    #[inline]
    pub const fn fetched(&self) -> Option<FetchedWord> {
        *self.fetched.read()
    }

    /// Load result on the bus this cycle.
    #[inline]
    pub const fn broadcast(&self) -> Option<Broadcast> {
        *self.broadcast.read()
    }

    /// True while a data port activation is in flight.
    #[inline]
    pub fn is_data_busy(&self, clock: &Clock) -> bool {
        self.data_port.is_busy(clock)
    }

    /// True while an instruction fetch is in flight.
    #[inline]
    pub fn is_fetch_busy(&self, clock: &Clock) -> bool {
        self.fetch_port.is_busy(clock)
    }

    /// Starts this cycle's port activations from the committed requests.
    ///
    /// # Arguments
    ///
    /// * `clock` - Global clock.
    /// * `ctrl` - Flush/stall control for this cycle.
    /// * `fetch` - Fetch unit's committed request PC.
    /// * `load` - Load/store buffer's committed load request.
    /// * `store` - Reorder buffer's committed store hand-off.
    pub fn compute(
        &mut self,
        clock: &Clock,
        ctrl: &Control,
        fetch: Option<u32>,
        load: Option<LoadRequest>,
        store: Option<StoreRequest>,
    ) {
        self.fetched.stage(None);
        self.broadcast.stage(None);

        if ctrl.is_flush() {
            // A store already in flight was committed and must land.
            if let Some(access) = self.data_port.in_flight_mut() {
                access.load = None;
                if access.store.is_none() {
                    self.data_port.cancel();
                }
            }
        } else if let Some(pc) = fetch {
            if !self.fetch_port.schedule(clock, pc, FETCH_LATENCY) {
                warn!("instruction port busy, fetch of {pc:#x} dropped");
            }
        }

        let load = if ctrl.is_flush() { None } else { load };
        if load.is_some() || store.is_some() {
            let access = DataAccess { load, store };
            if !self.data_port.schedule(clock, access, self.data_latency) {
                warn!(?access, "data port busy, access dropped");
            }
        }
    }

    /// Applies any in-flight data access immediately; used to drain at halt.
    pub fn drain(&mut self) {
        if let Some(access) = self.data_port.force_take() {
            self.perform(access);
        }
    }

    /// Executes a matured data access: store first, then the load broadcast.
    fn perform(&mut self, access: DataAccess) {
        if let Some(st) = access.store {
            self.store(st.kind, st.addr, st.value);
        }
        if let Some(ld) = access.load {
            self.broadcast.stage(Some(Broadcast {
                id: ld.id,
                value: self.load(ld.kind, ld.addr),
            }));
        }
    }
}

impl Sequential for Memory {
    fn advance(&mut self) {
        self.fetch_port.advance();
        self.data_port.advance();
        self.fetched.commit();
        self.broadcast.commit();
    }

    fn apply(&mut self, clock: &Clock) {
        if let Some(access) = self.data_port.take_matured(clock) {
            self.perform(access);
        }
        if let Some(pc) = self.fetch_port.take_matured(clock) {
            self.fetched.stage(Some(FetchedWord {
                inst: self.read(pc, 4),
                pc,
            }));
        }
    }
}
