//! Run configuration.
//!
//! Configuration is supplied as JSON (see the CLI's `--config`) or built
//! from command-line flags; every field has a default so a partial
//! document works. Applying a configuration seeds the debug bits of
//! status register 0 and the clock frequency register.

use serde::Deserialize;

use crate::common::constants::{STATUS_DEBUG_STEPPING, STATUS_DEBUG_TRACING};
use crate::core::Cpu;

/// Root run configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// Debugging behavior of the run loop.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Device setup.
    #[serde(default)]
    pub devices: DeviceConfig,
}

/// Debugging behavior of the run loop.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GeneralConfig {
    /// Dump machine state and disassembly before each instruction.
    #[serde(default)]
    pub trace: bool,
    /// Pause for input before each instruction.
    #[serde(default)]
    pub step: bool,
}

/// Device setup.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DeviceConfig {
    /// Clock interrupt period in milliseconds; zero disables the clock.
    #[serde(default)]
    pub clock_freq_ms: u32,
    /// Attach the serial TTY console.
    #[serde(default)]
    pub tty: bool,
}

impl Config {
    /// Applies this configuration to a machine.
    ///
    /// Seeds the debug flags in status register 0 and the clock
    /// frequency register. TTY attachment is the caller's job because
    /// it blocks until a console connects.
    pub fn apply(&self, cpu: &mut Cpu) {
        if self.general.step {
            cpu.s[0] |= STATUS_DEBUG_STEPPING;
        }
        if self.general.trace {
            cpu.s[0] |= STATUS_DEBUG_TRACING;
        }
        cpu.set_clock_frequency(self.devices.clock_freq_ms);
    }
}
