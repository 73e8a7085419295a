//! Address translation and memory access.
//!
//! `access` is the sole path to memory. Resolution happens in a fixed
//! order:
//! 1. **MMIO:** Device register addresses resolve directly, bypassing paging.
//! 2. **Paging:** When enabled, the address is split into a page id and a
//!    10-bit offset; the page table entry supplies the physical base and
//!    the R/W/X permission bits, all of which the request must hold.
//! 3. **Bounds:** The physical address must fall inside memory.
//!
//! The returned reference reads or writes exactly one 32-bit word;
//! callers never cache it across instructions.

use crate::common::constants::{
    MEMORY_SIZE, MMIO_CLOCK_FREQ, MMIO_TTY_IN, MMIO_TTY_OUT, MMIO_TTY_STATUS, PAGE_BASE_MASK,
    PAGE_FLAGS_MASK, PAGE_OFFSET_MASK, PAGE_SHIFT, TABLE_ALIGN,
};
use crate::common::error::Fault;

use super::Cpu;

impl Cpu {
    /// Resolves an address to a mutable reference to one memory word or
    /// device register.
    ///
    /// `flags` is the requested access kind, a combination of
    /// `ACCESS_READ`, `ACCESS_WRITE`, and `ACCESS_EXEC`. When paging is
    /// enabled the page entry must grant every requested bit; a zeroed
    /// entry grants nothing and therefore always faults.
    pub fn access(&mut self, addr: u32, flags: u32) -> Result<&mut u32, Fault> {
        if addr == MMIO_CLOCK_FREQ {
            return Ok(&mut self.clock_freq);
        }
        if self.tty.is_some() && (MMIO_TTY_STATUS..=MMIO_TTY_OUT).contains(&addr) {
            return self.tty_register(addr);
        }
        let phys = self.translate(addr, flags)?;
        Ok(&mut self.mem[phys as usize])
    }

    /// Reads one word through `access`.
    pub fn load(&mut self, addr: u32, flags: u32) -> Result<u32, Fault> {
        Ok(*self.access(addr, flags)?)
    }

    /// Writes one word through `access`.
    pub fn store(&mut self, addr: u32, flags: u32, value: u32) -> Result<(), Fault> {
        *self.access(addr, flags)? = value;
        Ok(())
    }

    /// Resolves a TTY MMIO address to its device register.
    fn tty_register(&mut self, addr: u32) -> Result<&mut u32, Fault> {
        let Some(tty) = self.tty.as_mut() else {
            return Err(Fault::Segfault("no tty attached"));
        };
        Ok(match addr {
            MMIO_TTY_STATUS => tty.status_register(),
            MMIO_TTY_IN => tty.in_register(),
            _ => tty.out_register(),
        })
    }

    /// Translates an address to a physical word index, applying paging
    /// and the final bounds check.
    fn translate(&self, addr: u32, flags: u32) -> Result<u32, Fault> {
        let mut phys = addr;
        if self.paging() {
            let table = self.s[1];
            if table % TABLE_ALIGN != 0 {
                return Err(Fault::Segfault("page table base not aligned"));
            }
            let entry_addr = table.wrapping_add(addr >> PAGE_SHIFT);
            if entry_addr >= MEMORY_SIZE {
                return Err(Fault::Segfault("page entry above physical memory"));
            }
            let entry = self.mem[entry_addr as usize];
            if (entry & PAGE_FLAGS_MASK) & flags != flags {
                return Err(Fault::NotPermitted("page access flags mismatch"));
            }
            phys = (entry & PAGE_BASE_MASK) | (addr & PAGE_OFFSET_MASK);
        }
        if phys >= MEMORY_SIZE {
            return Err(Fault::Segfault("address above physical memory"));
        }
        Ok(phys)
    }
}
