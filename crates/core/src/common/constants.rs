//! Global machine constants.
//!
//! This module defines the architectural constants of the RiSC-32 machine:
//! 1. **Memory geometry:** Word-addressed physical memory and page layout.
//! 2. **Registers:** General-purpose and status register counts, conventional roles.
//! 3. **Status bits:** Flag assignments in status register 0.
//! 4. **MMIO map:** Device register addresses that bypass paging.
//! 5. **Interrupts:** Vector table geometry and fixed vector numbers.

/// Physical memory size in 32-bit words.
pub const MEMORY_SIZE: u32 = 1 << 20;

/// Number of general-purpose registers.
pub const NUM_REGISTERS: usize = 32;

/// Number of status registers reachable through `wsr`/`rsr`.
pub const NUM_STATUS_REGISTERS: u32 = 4;

/// Conventional stack pointer register.
pub const REG_SP: usize = 29;

/// Conventional link register.
pub const REG_RA: usize = 31;

/// Status register 0 bit: set while executing in user mode.
pub const STATUS_USER_MODE: u32 = 1 << 0;

/// Status register 0 bit: set while paging is enabled.
pub const STATUS_PAGING: u32 = 1 << 1;

/// Status register 0 bit: set while interrupt delivery is enabled.
pub const STATUS_INTERRUPTS: u32 = 1 << 2;

/// Status register 0 bit: pause before each instruction (debugger stepping).
pub const STATUS_DEBUG_STEPPING: u32 = 1 << 3;

/// Status register 0 bit: dump machine state before each instruction.
pub const STATUS_DEBUG_TRACING: u32 = 1 << 4;

/// Page access bit: the page contains executable code.
pub const ACCESS_EXEC: u32 = 1 << 0;

/// Page access bit: the page is writable.
pub const ACCESS_WRITE: u32 = 1 << 1;

/// Page access bit: the page is readable.
pub const ACCESS_READ: u32 = 1 << 2;

/// Number of address bits covered by one page (1024 words per page).
pub const PAGE_SHIFT: u32 = 10;

/// Page size in words.
pub const PAGE_SIZE: u32 = 1 << PAGE_SHIFT;

/// Mask extracting the in-page offset from a virtual address.
pub const PAGE_OFFSET_MASK: u32 = PAGE_SIZE - 1;

/// Mask extracting the physical base address from a page-table entry.
pub const PAGE_BASE_MASK: u32 = !PAGE_OFFSET_MASK;

/// Mask extracting the R/W/X bits from a page-table entry.
pub const PAGE_FLAGS_MASK: u32 = 0b111;

/// Required alignment, in words, for the page table, the interrupt
/// vector table, and the interrupt stack base.
pub const TABLE_ALIGN: u32 = 1024;

/// Number of entries in the interrupt vector table.
pub const IVT_ENTRIES: u32 = 16;

/// Interrupt vector: hard halt (also the clamp target for bad vectors).
pub const IRQ_HALT: u32 = 0;

/// Interrupt vector: periodic clock.
pub const IRQ_CLOCK: u32 = 1;

/// Interrupt vector: serial TTY.
pub const IRQ_TTY: u32 = 2;

/// MMIO address of the clock frequency register (milliseconds, 0 disables).
pub const MMIO_CLOCK_FREQ: u32 = 0x20000;

/// MMIO address of the TTY status register.
pub const MMIO_TTY_STATUS: u32 = 0x20001;

/// MMIO address of the TTY input register.
pub const MMIO_TTY_IN: u32 = 0x20002;

/// MMIO address of the TTY output register.
pub const MMIO_TTY_OUT: u32 = 0x20003;

/// TTY status bit: the input register holds an unread byte.
pub const TTY_IN: u32 = 1 << 0;

/// TTY status bit: the output register holds a byte awaiting transmission.
pub const TTY_OUT: u32 = 1 << 1;
