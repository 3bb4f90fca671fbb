//! Global discrete time source.

/// Cycle counter shared by every unit.
///
/// The counter only advances while the clock is running; units consult
/// `is_running` before scheduling multi-cycle work.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Clock {
    cycle: u64,
    running: bool,
}

impl Clock {
    /// Creates a stopped clock at cycle zero.
    pub const fn new() -> Self {
        Self {
            cycle: 0,
            running: false,
        }
    }

    /// Returns the current cycle.
    #[inline]
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Returns true while the clock is running.
    #[inline]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Starts the clock.
    pub const fn run(&mut self) {
        self.running = true;
    }

    /// Stops the clock; the cycle count is kept.
    pub const fn stop(&mut self) {
        self.running = false;
    }

    /// Stops the clock and rewinds it to cycle zero.
    pub const fn reset(&mut self) {
        self.cycle = 0;
        self.running = false;
    }

    /// Advances one cycle if running.
    #[inline]
    pub const fn tick(&mut self) {
        if self.running {
            self.cycle += 1;
        }
    }
}
