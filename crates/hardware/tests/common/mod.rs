//! Shared helpers for the hardware test suite.


/// `TestContext`: a simulator plus convenience loaders and runners.
pub mod harness;
