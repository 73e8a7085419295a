//! Interrupt entry and the device poll.
//!
//! Entry is atomic from the guest's perspective: the flags, stack
//! pointer, and program counter are shadowed, the kernel stack is
//! installed, and user mode, paging, and interrupt delivery are all
//! cleared until `iret` restores the shadows.
//!
//! The poll runs at every instruction boundary while interrupt delivery
//! is enabled. Sources are checked in fixed priority order (clock, then
//! TTY) and at most one interrupt is delivered per boundary; a pending
//! lower-priority source is picked up at the next one.

use std::time::{Duration, Instant};

use crate::common::constants::{IRQ_CLOCK, IRQ_HALT, IRQ_TTY, IVT_ENTRIES, MEMORY_SIZE, REG_SP,
    STATUS_INTERRUPTS, STATUS_PAGING, STATUS_USER_MODE, TABLE_ALIGN};
use crate::common::error::{Fault, StepError};

use super::Cpu;

impl Cpu {
    /// Enters the interrupt handler for the given vector.
    ///
    /// Vectors at or above the table size are clamped to the hard halt
    /// vector. The vector table base (`S[2]`) and interrupt stack base
    /// (`S[3]`) must both be 1024-aligned.
    pub(crate) fn interrupt(&mut self, code: u32) -> Result<(), Fault> {
        let ivt = self.s[2];
        let stack = self.s[3];
        if ivt % TABLE_ALIGN != 0 {
            return Err(Fault::Segfault("interrupt vector table base not aligned"));
        }
        if stack % TABLE_ALIGN != 0 {
            return Err(Fault::Segfault("interrupt stack base not aligned"));
        }
        let code = if code >= IVT_ENTRIES { IRQ_HALT } else { code };

        self.is0 = self.s[0];
        self.isp = self.gpr.read(REG_SP);
        self.ipc = self.pc;
        self.gpr.write(REG_SP, stack);
        self.s[0] &= !(STATUS_USER_MODE | STATUS_INTERRUPTS | STATUS_PAGING);

        let slot = ivt.wrapping_add(code);
        if slot >= MEMORY_SIZE {
            return Err(Fault::Segfault("interrupt vector above physical memory"));
        }
        self.pc = self.mem[slot as usize];
        log::debug!("irq: vector {} -> pc {:#x}", code, self.pc);
        Ok(())
    }

    /// Checks interrupt sources and delivers at most one interrupt.
    ///
    /// A no-op while interrupt delivery is disabled. The first clock
    /// check only records the epoch; later checks fire once per period.
    pub(crate) fn poll_devices(&mut self) -> Result<(), StepError> {
        if !self.interrupts_enabled() {
            return Ok(());
        }

        if self.clock_freq > 0 {
            let now = Instant::now();
            match self.last_tick {
                None => self.last_tick = Some(now),
                Some(last) => {
                    if now.duration_since(last) >= Duration::from_millis(u64::from(self.clock_freq))
                    {
                        self.last_tick = Some(now);
                        self.stats.clock_interrupts += 1;
                        return Ok(self.interrupt(IRQ_CLOCK)?);
                    }
                }
            }
        }

        if let Some(tty) = self.tty.as_mut() {
            if tty.interrupt_pending()? {
                self.stats.tty_interrupts += 1;
                return Ok(self.interrupt(IRQ_TTY)?);
            }
        }
        Ok(())
    }
}
