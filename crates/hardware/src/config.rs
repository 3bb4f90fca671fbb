//! Configuration system for the Tomasulo core simulator.
//!
//! This module defines the configuration structures used to parameterize
//! the simulator. It provides:
//! 1. **Defaults:** Baseline buffer capacities, predictor size and data port latency.
//! 2. **Structures:** Hierarchical config for general run control, pipeline buffers and memory.
//! 3. **Validation:** Rejection of capacities and latencies the pipeline cannot run with.
//!
//! Configuration is supplied as JSON (every field optional) or taken from `Config::default()`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::constants::FETCH_HEADROOM;
use crate::common::error::{SimError, SimResult};

/// Default configuration constants for the simulator.
///
/// These values define the baseline core when not explicitly
/// overridden in a JSON configuration document.
mod defaults {
    /// Reorder buffer capacity.
    pub const ROB_SIZE: usize = 32;

    /// Reservation station capacity.
    pub const RS_SIZE: usize = 32;

    /// Load/store buffer capacity.
    pub const LSB_SIZE: usize = 32;

    /// Instruction queue (fetch buffer) capacity.
    ///
    /// Fetch keeps three slots of headroom, so the queue must hold at least four.
    pub const IQ_SIZE: usize = 32;

    /// Branch predictor table entries (indexed by `pc mod entries`).
    pub const PREDICTOR_ENTRIES: usize = 128;

    /// Data port latency in cycles.
    pub const DATA_LATENCY: u64 = 3;
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Run control and tracing
    #[serde(default)]
    pub general: GeneralConfig,
    /// Buffer capacities and branch predictor
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Memory port latencies
    #[serde(default)]
    pub memory: MemoryConfig,
}

impl Config {
    /// Parses a JSON configuration document; omitted fields take their defaults.
    pub fn from_json_str(text: &str) -> SimResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> SimResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Checks that every capacity and latency is usable by the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> SimResult<()> {
        let p = &self.pipeline;
        for (name, value) in [
            ("pipeline.rob_size", p.rob_size),
            ("pipeline.rs_size", p.rs_size),
            ("pipeline.lsb_size", p.lsb_size),
            ("pipeline.predictor_entries", p.predictor_entries),
        ] {
            if value == 0 {
                return Err(SimError::InvalidConfig(format!("{name} must be non-zero")));
            }
        }
        if p.iq_size <= FETCH_HEADROOM {
            return Err(SimError::InvalidConfig(format!(
                "pipeline.iq_size must exceed the fetch headroom of {FETCH_HEADROOM}, got {}",
                p.iq_size
            )));
        }
        if self.memory.data_latency == 0 {
            return Err(SimError::InvalidConfig(
                "memory.data_latency must be at least one cycle".to_owned(),
            ));
        }
        if self.general.max_cycles == Some(0) {
            return Err(SimError::InvalidConfig(
                "general.max_cycles must be non-zero when set".to_owned(),
            ));
        }
        Ok(())
    }
}

/// General simulation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Record the PC and cycle of every committed instruction
    #[serde(default)]
    pub trace_commits: bool,

    /// Abort with `SimError::CycleLimit` if no halt commits within this many cycles
    #[serde(default)]
    pub max_cycles: Option<u64>,
}

/// Out-of-order buffer capacities and branch predictor size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Reorder buffer entries
    #[serde(default = "PipelineConfig::default_rob_size")]
    pub rob_size: usize,

    /// Reservation station entries
    #[serde(default = "PipelineConfig::default_rs_size")]
    pub rs_size: usize,

    /// Load/store buffer entries
    #[serde(default = "PipelineConfig::default_lsb_size")]
    pub lsb_size: usize,

    /// Instruction queue entries
    #[serde(default = "PipelineConfig::default_iq_size")]
    pub iq_size: usize,

    /// Branch predictor table entries
    #[serde(default = "PipelineConfig::default_predictor_entries")]
    pub predictor_entries: usize,
}

impl PipelineConfig {
    /// Returns the default reorder buffer capacity.
    const fn default_rob_size() -> usize {
        defaults::ROB_SIZE
    }

    /// Returns the default reservation station capacity.
    const fn default_rs_size() -> usize {
        defaults::RS_SIZE
    }

    /// Returns the default load/store buffer capacity.
    const fn default_lsb_size() -> usize {
        defaults::LSB_SIZE
    }

    /// Returns the default instruction queue capacity.
    const fn default_iq_size() -> usize {
        defaults::IQ_SIZE
    }

    /// Returns the default predictor table size.
    const fn default_predictor_entries() -> usize {
        defaults::PREDICTOR_ENTRIES
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            rob_size: defaults::ROB_SIZE,
            rs_size: defaults::RS_SIZE,
            lsb_size: defaults::LSB_SIZE,
            iq_size: defaults::IQ_SIZE,
            predictor_entries: defaults::PREDICTOR_ENTRIES,
        }
    }
}

/// Memory port timing.
///
/// The instruction port is fixed at one cycle; fetch relies on at most one
/// request being in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Cycles from load/store request to completion
    #[serde(default = "MemoryConfig::default_data_latency")]
    pub data_latency: u64,
}

impl MemoryConfig {
    /// Returns the default data port latency.
    const fn default_data_latency() -> u64 {
        defaults::DATA_LATENCY
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            data_latency: defaults::DATA_LATENCY,
        }
    }
}
