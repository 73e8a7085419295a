//! Common types shared across the assembler and the virtual machine.
//!
//! This module provides the building blocks used by every other component:
//! 1. **Constants:** Memory geometry, status register bits, page layout, MMIO map.
//! 2. **Errors:** CPU faults, assembler errors, loader errors, device errors.

/// System-wide constants.
pub mod constants;

/// Error and fault definitions.
pub mod error;

pub use error::{AsmError, Fault, LoadError, StepError, TtyError};
