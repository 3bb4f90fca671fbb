use tomasim_core::config::Config;
use tomasim_core::core::Cpu;
use tomasim_core::isa::abi::REG_A0;
use tomasim_core::sim::loader::ProgramImage;
use tomasim_core::{SimResult, Simulator};

use super::builder::ImageBuilder;

/// Upper bound on cycles for test programs that are expected to halt.
pub const TEST_CYCLE_LIMIT: u64 = 20_000;

pub struct TestContext {
    pub sim: Simulator,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Builds a context with commit tracing and a cycle limit on top of `config`.
    pub fn with_config(mut config: Config) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        config.general.trace_commits = true;
        if config.general.max_cycles.is_none() {
            config.general.max_cycles = Some(TEST_CYCLE_LIMIT);
        }
        let sim = Simulator::new(&config).expect("test config is valid");
        Self { sim }
    }

    /// Convenience accessor for the CPU.
    pub fn cpu(&self) -> &Cpu {
        &self.sim.cpu
    }

    /// Mutable convenience accessor for the CPU.
    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.sim.cpu
    }

    /// Load a sequence of 32-bit instructions at address 0, where fetch starts.
    pub fn load_program(self, instructions: &[u32]) -> Self {
        self.load_at(0, instructions)
    }

    /// Load 32-bit words at `addr` through the image text format.
    pub fn load_at(mut self, addr: u32, words: &[u32]) -> Self {
        let text = ImageBuilder::new().at(addr).words(words).build();
        let image = ProgramImage::from_text(&text).expect("builder emits valid images");
        self.sim.load_image(&image);
        self
    }

    /// Run until halt and return the low byte of `a0`.
    pub fn run(&mut self) -> SimResult<u8> {
        self.sim.run()
    }

    /// Run a fixed number of cycles, stopping early on halt.
    pub fn run_cycles(&mut self, cycles: u64) {
        for _ in 0..cycles {
            if self.sim.is_halted() {
                break;
            }
            self.sim.tick();
        }
    }

    /// Read a committed general-purpose register value.
    pub fn get_reg(&self, reg: usize) -> u32 {
        self.sim.cpu.reg(reg)
    }

    /// Full 32-bit value of `a0`.
    pub fn a0(&self) -> u32 {
        self.get_reg(REG_A0)
    }

    /// Committed PCs in commit order.
    pub fn committed_pcs(&self) -> Vec<u32> {
        self.sim
            .commit_trace()
            .unwrap_or_default()
            .iter()
            .map(|&(pc, _)| pc)
            .collect()
    }
}
