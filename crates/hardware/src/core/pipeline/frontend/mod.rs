//! In-order front end.
//!
//! Fetch and decode, ahead of dispatch into the out-of-order back end:
//! InstructionUnit -> Decoder -> (ReorderBuffer, ReservationStation, LoadStoreBuffer)

/// Decode latch and dispatch stall classification.
pub mod decoder;

/// PC generation, instruction queue and static prediction.
pub mod fetch;

pub use decoder::{Decoder, is_stall_needed};
pub use fetch::InstructionUnit;
