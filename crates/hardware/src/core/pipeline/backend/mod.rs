//! Out-of-order back end buffers.
//!
//! Dispatched instructions wait here until their operands are known:
//! ALU-class instructions in the reservation station, loads and stores in the
//! load/store buffer. Completion and commit happen in the reorder buffer.

/// In-order buffer of loads and stores.
pub mod load_store_buffer;

/// Operand-waiting pool for the ALU.
pub mod reservation_station;

pub use load_store_buffer::LoadStoreBuffer;
pub use reservation_station::ReservationStation;
