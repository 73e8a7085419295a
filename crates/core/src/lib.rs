//! RiSC-32 assembler and virtual machine library.
//!
//! This crate implements the RiSC-32 architecture, a 32-bit teaching ISA
//! descended from the RiSC-16. It provides:
//! 1. **ISA:** Instruction formats (RRR/RRI/RI), encoding, decoding, and disassembly.
//! 2. **Assembler:** Lexer, parser, and two-pass encoder producing textual bytecode.
//! 3. **CPU:** Fetch/decode/execute loop with paging, privilege modes, and precise interrupts.
//! 4. **Devices:** Memory-mapped clock and serial TTY reachable over TCP.
//! 5. **Simulation:** Bytecode loader, run configuration, and statistics collection.

/// Assembler pipeline (lexer, parser, encoder, two-pass driver).
pub mod asm;
/// Common types and constants (errors, memory geometry, status bits).
pub mod common;
/// Run configuration (defaults, serde-deserializable structures).
pub mod config;
/// CPU core (registers, memory access, execution, interrupts).
pub mod core;
/// Instruction set (opcodes, field layout, decode, disassembly).
pub mod isa;
/// Bytecode loading.
pub mod sim;
/// Memory-mapped devices (serial TTY).
pub mod soc;
/// Run statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Main CPU type; owns registers, memory, and attached devices.
pub use crate::core::Cpu;
