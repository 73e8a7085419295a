//! Run statistics.
//!
//! Counters updated by the execution loop and reported when a run ends.

/// Counters for one machine run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Instructions retired.
    pub instructions: u64,
    /// Clock interrupts delivered.
    pub clock_interrupts: u64,
    /// TTY interrupts delivered.
    pub tty_interrupts: u64,
    /// Software interrupts taken.
    pub software_interrupts: u64,
}

impl RunStats {
    /// Total interrupts delivered from any source.
    pub fn interrupts(&self) -> u64 {
        self.clock_interrupts + self.tty_interrupts + self.software_interrupts
    }

    /// Prints a summary to stdout.
    pub fn print(&self) {
        println!("instructions: {}", self.instructions);
        println!(
            "interrupts:   {} (clock {}, tty {}, software {})",
            self.interrupts(),
            self.clock_interrupts,
            self.tty_interrupts,
            self.software_interrupts
        );
    }
}
