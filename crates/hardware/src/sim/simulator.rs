//! Simulator: drives the CPU from reset to halt.
//!
//! The simulator owns the `Cpu` and the run configuration. It provides:
//! 1. **Loading:** Program images from text, files or any buffered reader.
//! 2. **Driver Loop:** Steps the CPU until the halt instruction commits, honouring an
//!    optional cycle limit.
//! 3. **Drain and Result:** Forces in-flight memory writes to land, ticks once more and
//!    reports the low byte of `a0`.
//! 4. **Commit Trace:** Writes committed PCs (optionally with their cycle) to a stream.

use std::io::{BufRead, Write};
use std::path::Path;

use tracing::info;

use crate::common::error::{SimError, SimResult};
use crate::config::Config;
use crate::core::Cpu;
use crate::isa::abi::REG_A0;
use crate::sim::loader::ProgramImage;
use crate::stats::SimStats;

/// Top-level simulator: the CPU plus run control.
#[derive(Clone, Debug)]
pub struct Simulator {
    /// The simulated core.
    pub cpu: Cpu,
    max_cycles: Option<u64>,
    finished: bool,
}

impl Simulator {
    /// Creates a simulator for a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: &Config) -> SimResult<Self> {
        config.validate()?;
        Ok(Self {
            cpu: Cpu::new(config),
            max_cycles: config.general.max_cycles,
            finished: false,
        })
    }

    /// Copies a parsed image into memory.
    pub fn load_image(&mut self, image: &ProgramImage) {
        self.cpu.load_image(image);
    }

    /// Parses and loads an image from any buffered reader (file or stdin).
    pub fn load_reader<R: BufRead>(&mut self, reader: R) -> SimResult<()> {
        let image = ProgramImage::parse(reader)?;
        self.load_image(&image);
        Ok(())
    }

    /// Parses and loads an image held in a string.
    pub fn load_image_str(&mut self, text: &str) -> SimResult<()> {
        self.load_reader(text.as_bytes())
    }

    /// Parses and loads an image file.
    pub fn load_image_file(&mut self, path: impl AsRef<Path>) -> SimResult<()> {
        let image = ProgramImage::from_file(path)?;
        self.load_image(&image);
        Ok(())
    }

    /// Advances the simulator by one clock cycle.
    pub fn tick(&mut self) {
        self.cpu.step();
    }

    /// True once the halt instruction has committed.
    pub const fn is_halted(&self) -> bool {
        self.cpu.is_halted()
    }

    /// Runs to halt, drains, and returns the low byte of `a0`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::CycleLimit`] if a cycle limit is configured and reached
    /// before halt.
    pub fn run(&mut self) -> SimResult<u8> {
        if self.finished {
            return Ok(self.result());
        }
        while !self.cpu.is_halted() {
            if let Some(limit) = self.max_cycles.filter(|&l| self.cpu.cycle() >= l) {
                return Err(SimError::CycleLimit { limit });
            }
            self.tick();
        }
        self.cpu.drain();
        self.finished = true;

        let stats = self.stats();
        info!(
            cycles = stats.cycles,
            committed = stats.instructions_committed,
            ipc = stats.ipc(),
            result = self.result(),
            "halted"
        );
        Ok(self.result())
    }

    /// Low eight bits of `a0`.
    pub fn result(&self) -> u8 {
        self.cpu.reg(REG_A0) as u8
    }

    /// Performance counters so far.
    pub fn stats(&self) -> SimStats {
        self.cpu.stats()
    }

    /// Recorded `(pc, cycle)` pairs, if commit tracing is enabled.
    pub fn commit_trace(&self) -> Option<&[(u32, u64)]> {
        self.cpu.rob.trace()
    }

    /// Writes one committed PC per line, followed by its cycle if `with_cycle`.
    ///
    /// Writes nothing if commit tracing was not enabled in the configuration.
    pub fn write_pc_trace<W: Write>(&self, mut out: W, with_cycle: bool) -> SimResult<()> {
        for &(pc, cycle) in self.commit_trace().unwrap_or_default() {
            if with_cycle {
                writeln!(out, "{pc:08x} {cycle}")?;
            } else {
                writeln!(out, "{pc:08x}")?;
            }
        }
        out.flush()?;
        Ok(())
    }
}
