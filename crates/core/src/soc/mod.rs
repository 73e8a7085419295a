//! Memory-mapped devices.
//!
//! Devices expose 32-bit register references the CPU hands out through
//! `access`, plus a bounded poll the CPU runs between instructions.

/// Serial TTY device trait and TCP implementation.
pub mod tty;

pub use tty::{SerialTty, Tty, TtyListener};
