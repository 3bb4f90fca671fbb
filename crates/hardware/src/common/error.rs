//! Simulator error definitions.
//!
//! This module defines the errors surfaced to the host driving the simulator. It provides:
//! 1. **Image Errors:** Malformed program image lines, reported with their line number.
//! 2. **Configuration Errors:** Unparseable or out-of-range configuration values.
//! 3. **Run Control Errors:** I/O failures and an exceeded cycle limit.
//!
//! Nothing inside the cycle model is fallible: malformed instructions become
//! bubbles, full buffers become stalls and mispredictions become flushes.

use thiserror::Error;

/// Errors returned by host-facing simulator operations.
#[derive(Debug, Error)]
pub enum SimError {
    /// Reading an image, a configuration file or writing a trace failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A program image line could not be parsed.
    #[error("malformed program image at line {line}: {message}")]
    ImageParse {
        /// 1-based line number within the image.
        line: usize,
        /// Description of the offending token.
        message: String,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A JSON configuration document could not be parsed.
    #[error("configuration parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The program did not halt within the configured cycle budget.
    #[error("no halt committed within {limit} cycles")]
    CycleLimit {
        /// The configured `max_cycles`.
        limit: u64,
    },
}

/// Convenience alias for results carrying a [`SimError`].
pub type SimResult<T> = Result<T, SimError>;
