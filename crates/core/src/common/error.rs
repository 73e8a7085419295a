//! Error and fault definitions.
//!
//! This module defines every error surfaced by the crate:
//! 1. **CPU faults:** The three machine-level outcomes (`Halted`, `NotPermitted`, `Segfault`).
//! 2. **Step errors:** A CPU fault or a device failure observed at an instruction boundary.
//! 3. **Assembler errors:** Parse, resolution, and encoding failures with source line numbers.
//! 4. **Loader errors:** Malformed bytecode text.
//! 5. **Device errors:** TTY connection loss.

use std::fmt;
use std::io;

/// Faults raised by the CPU core.
///
/// `Halted` is the normal terminal state of a run; the other variants are
/// fatal. Each carries a short reason describing the violated condition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fault {
    /// The processor reached a halt instruction.
    Halted,

    /// A privileged operation was refused.
    ///
    /// Raised for status register access in user mode, an out-of-range
    /// status register index, or a page access missing a required flag.
    NotPermitted(&'static str),

    /// A memory reference could not be resolved.
    ///
    /// Raised for misaligned table bases, physical addresses beyond the
    /// end of memory, and out-of-range interrupt vector lookups.
    Segfault(&'static str),
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::Halted => write!(f, "halted"),
            Fault::NotPermitted(reason) => write!(f, "operation not permitted: {}", reason),
            Fault::Segfault(reason) => write!(f, "segmentation fault: {}", reason),
        }
    }
}

impl std::error::Error for Fault {}

/// Failure of the serial TTY device.
#[derive(Debug)]
pub enum TtyError {
    /// The peer closed the connection or the socket failed.
    Detached(io::Error),
}

impl fmt::Display for TtyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TtyError::Detached(err) => write!(f, "tty detached: {}", err),
        }
    }
}

impl std::error::Error for TtyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TtyError::Detached(err) => Some(err),
        }
    }
}

/// Outcome of a single execution step: either a CPU fault or a device failure.
#[derive(Debug)]
pub enum StepError {
    /// The CPU faulted (or halted).
    Fault(Fault),
    /// The attached TTY failed during the device poll.
    Tty(TtyError),
}

impl StepError {
    /// Returns `true` when this step error is the normal halt state.
    pub fn is_halt(&self) -> bool {
        matches!(self, StepError::Fault(Fault::Halted))
    }
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepError::Fault(fault) => fault.fmt(f),
            StepError::Tty(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for StepError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StepError::Fault(fault) => Some(fault),
            StepError::Tty(err) => Some(err),
        }
    }
}

impl From<Fault> for StepError {
    fn from(fault: Fault) -> Self {
        StepError::Fault(fault)
    }
}

impl From<TtyError> for StepError {
    fn from(err: TtyError) -> Self {
        StepError::Tty(err)
    }
}

/// Errors produced while assembling source text.
///
/// Every variant that refers to a specific statement carries the 1-based
/// source line number; assembly stops at the first error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AsmError {
    /// Lexical or grammatical error.
    Parse {
        /// Source line of the offending statement.
        line: usize,
        /// Human-readable description.
        msg: String,
    },

    /// A label reference never bound by a definition.
    UndefinedLabel {
        /// The unresolved label name.
        name: String,
        /// Source line of the reference.
        line: usize,
    },

    /// A resolved immediate does not fit the target field.
    ImmediateOutOfRange {
        /// Width of the target field in bits.
        bits: u32,
        /// Source line of the statement.
        line: usize,
    },

    /// The program does not fit in machine memory.
    TooManyInstructions,

    /// A statement that cannot be turned into a machine word.
    CannotEncode {
        /// Why encoding failed.
        reason: String,
        /// Source line of the statement.
        line: usize,
    },
}

impl AsmError {
    /// Returns the source line this error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            AsmError::Parse { line, .. }
            | AsmError::UndefinedLabel { line, .. }
            | AsmError::ImmediateOutOfRange { line, .. }
            | AsmError::CannotEncode { line, .. } => Some(*line),
            AsmError::TooManyInstructions => None,
        }
    }
}

impl fmt::Display for AsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsmError::Parse { line, msg } => write!(f, "line {}: {}", line, msg),
            AsmError::UndefinedLabel { name, line } => {
                write!(f, "line {}: undefined label '{}'", line, name)
            }
            AsmError::ImmediateOutOfRange { bits, line } => {
                write!(f, "line {}: immediate out of {}-bit range", line, bits)
            }
            AsmError::TooManyInstructions => {
                write!(f, "program does not fit in machine memory")
            }
            AsmError::CannotEncode { reason, line } => {
                write!(f, "line {}: cannot encode: {}", line, reason)
            }
        }
    }
}

impl std::error::Error for AsmError {}

/// Error produced while parsing bytecode text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadError {
    /// 1-based line number of the malformed line.
    pub line: usize,
    /// Human-readable description.
    pub msg: String,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bytecode line {}: {}", self.line, self.msg)
    }
}

impl std::error::Error for LoadError {}
