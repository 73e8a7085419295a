//! CPU state definition and initialization.
//!
//! This module defines the central `Cpu` structure holding all machine
//! state. It owns:
//! 1. **Registers:** General-purpose file, four status registers, program counter.
//! 2. **Memory:** 2^20 words of physical memory, word-addressed.
//! 3. **Interrupt shadows:** Saved PC, saved flags, and saved stack pointer.
//! 4. **Devices:** The clock frequency register and an optional serial TTY.
//!
//! The CPU is not thread safe; a single owner drives it. Execution logic
//! lives in the sibling `execution`, `memory`, and `interrupt` modules.

/// Fetch, execute, and the per-step driver.
pub mod execution;
/// General-purpose register file.
pub mod gpr;
/// Interrupt entry and the device poll.
pub mod interrupt;
/// Address translation and memory access.
pub mod memory;

use std::fmt;
use std::time::Instant;

use crate::common::constants::{
    MEMORY_SIZE, NUM_STATUS_REGISTERS, STATUS_DEBUG_STEPPING, STATUS_DEBUG_TRACING,
    STATUS_INTERRUPTS, STATUS_PAGING, STATUS_USER_MODE,
};
use crate::soc::tty::Tty;
use crate::stats::RunStats;

use gpr::Gpr;

/// A RiSC-32 machine instance.
pub struct Cpu {
    /// General-purpose registers; `r0` is hardwired to zero.
    pub gpr: Gpr,
    /// Status registers: flags, page table base, interrupt vector base,
    /// interrupt stack base.
    pub s: [u32; NUM_STATUS_REGISTERS as usize],
    /// Program counter, word-addressed.
    pub pc: u32,
    /// Physical memory.
    pub mem: Box<[u32]>,
    /// Saved program counter, captured on interrupt entry.
    pub(crate) ipc: u32,
    /// Saved status register 0, captured on interrupt entry.
    pub(crate) is0: u32,
    /// Saved user stack pointer, captured on interrupt entry.
    pub(crate) isp: u32,
    /// Clock interrupt period in milliseconds; zero disables the clock.
    pub(crate) clock_freq: u32,
    /// Timestamp of the most recent clock interrupt.
    pub(crate) last_tick: Option<Instant>,
    /// Attached serial TTY, if any.
    pub(crate) tty: Option<Box<dyn Tty>>,
    /// Run statistics.
    pub stats: RunStats,
}

impl Cpu {
    /// Creates a machine with zeroed registers and memory.
    pub fn new() -> Self {
        Self {
            gpr: Gpr::new(),
            s: [0; NUM_STATUS_REGISTERS as usize],
            pc: 0,
            mem: vec![0; MEMORY_SIZE as usize].into_boxed_slice(),
            ipc: 0,
            is0: 0,
            isp: 0,
            clock_freq: 0,
            last_tick: None,
            tty: None,
            stats: RunStats::default(),
        }
    }

    /// Copies a program image into memory starting at address zero.
    pub fn load_words(&mut self, words: &[u32]) {
        self.mem[..words.len()].copy_from_slice(words);
    }

    /// Attaches a serial TTY, enabling its MMIO registers.
    pub fn attach_tty(&mut self, tty: Box<dyn Tty>) {
        self.tty = Some(tty);
    }

    /// Sets the clock interrupt period in milliseconds; zero disables it.
    pub fn set_clock_frequency(&mut self, millis: u32) {
        self.clock_freq = millis;
    }

    /// Returns the clock interrupt period in milliseconds.
    pub fn clock_frequency(&self) -> u32 {
        self.clock_freq
    }

    /// Returns `true` while executing in user mode.
    pub fn user_mode(&self) -> bool {
        self.s[0] & STATUS_USER_MODE != 0
    }

    /// Returns `true` while paging is enabled.
    pub fn paging(&self) -> bool {
        self.s[0] & STATUS_PAGING != 0
    }

    /// Returns `true` while interrupt delivery is enabled.
    pub fn interrupts_enabled(&self) -> bool {
        self.s[0] & STATUS_INTERRUPTS != 0
    }

    /// Returns `true` while the stepping debug flag is set.
    pub fn stepping(&self) -> bool {
        self.s[0] & STATUS_DEBUG_STEPPING != 0
    }

    /// Returns `true` while the tracing debug flag is set.
    pub fn tracing(&self) -> bool {
        self.s[0] & STATUS_DEBUG_TRACING != 0
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Cpu {
    /// Formats the machine state: PC, status registers, and the
    /// general-purpose registers four to a row.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "PC={:#010x} S=[{:#x} {:#x} {:#x} {:#x}]",
            self.pc, self.s[0], self.s[1], self.s[2], self.s[3]
        )?;
        for row in 0..8 {
            let base = row * 4;
            writeln!(
                f,
                "r{:<2}={:#010x} r{:<2}={:#010x} r{:<2}={:#010x} r{:<2}={:#010x}",
                base,
                self.gpr.read(base),
                base + 1,
                self.gpr.read(base + 1),
                base + 2,
                self.gpr.read(base + 2),
                base + 3,
                self.gpr.read(base + 3)
            )?;
        }
        Ok(())
    }
}
