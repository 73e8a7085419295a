//! Simulation support.
//!
//! Bytecode loading for the virtual machine driver.

/// Bytecode text parsing.
pub mod loader;

pub use loader::parse_bytecode;
