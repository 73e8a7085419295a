//! Opcode assignments.
//!
//! Five bits of opcode space allow up to 32 operations; eleven are defined.
//! `JALR` is deliberately opcode zero: an all-zero word is `jalr r0 r0`,
//! which halts the processor (or raises a software interrupt when interrupt
//! delivery is enabled), so a run that strays into zeroed memory stops.

/// Jump-and-link-register; also the halt / software-trap encoding.
pub const JALR: u32 = 0;
/// Register-register addition.
pub const ADD: u32 = 1;
/// Register-immediate addition.
pub const ADDI: u32 = 2;
/// Register-register not-and.
pub const NAND: u32 = 3;
/// Load upper immediate (bits 31..10 of the destination).
pub const LUI: u32 = 4;
/// Store word.
pub const SW: u32 = 5;
/// Load word.
pub const LW: u32 = 6;
/// Branch when equal.
pub const BEQ: u32 = 7;
/// Write status register (privileged).
pub const WSR: u32 = 8;
/// Read status register (privileged).
pub const RSR: u32 = 9;
/// Return from interrupt (privileged).
pub const IRET: u32 = 10;
