//! Architectural state.
//!
//! Holds the state that survives speculation: the integer register file and its
//! renaming status.

/// Integer register file with per-register producer tags.
pub mod regfile;

pub use regfile::RegisterFile;
