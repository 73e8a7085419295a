//! Configuration Tests.
//!
//! Verifies JSON deserialization with partial documents and the
//! application of a configuration to a machine.

use risc32_core::common::constants::{STATUS_DEBUG_STEPPING, STATUS_DEBUG_TRACING};
use risc32_core::Config;
use risc32_core::Cpu;

#[test]
fn defaults_are_quiet() {
    let config = Config::default();
    assert!(!config.general.trace);
    assert!(!config.general.step);
    assert_eq!(config.devices.clock_freq_ms, 0);
    assert!(!config.devices.tty);
}

#[test]
fn partial_json_documents_fill_in_defaults() {
    let config: Config = serde_json::from_str(r#"{"devices": {"clock_freq_ms": 50}}"#).unwrap();
    assert_eq!(config.devices.clock_freq_ms, 50);
    assert!(!config.devices.tty);
    assert!(!config.general.trace);
}

#[test]
fn full_json_document() {
    let config: Config = serde_json::from_str(
        r#"{
            "general": {"trace": true, "step": true},
            "devices": {"clock_freq_ms": 10, "tty": true}
        }"#,
    )
    .unwrap();
    assert!(config.general.trace);
    assert!(config.general.step);
    assert_eq!(config.devices.clock_freq_ms, 10);
    assert!(config.devices.tty);
}

#[test]
fn apply_seeds_debug_flags_and_clock() {
    let config: Config = serde_json::from_str(
        r#"{"general": {"trace": true, "step": true}, "devices": {"clock_freq_ms": 9}}"#,
    )
    .unwrap();
    let mut cpu = Cpu::new();
    config.apply(&mut cpu);
    assert_ne!(cpu.s[0] & STATUS_DEBUG_TRACING, 0);
    assert_ne!(cpu.s[0] & STATUS_DEBUG_STEPPING, 0);
    assert_eq!(cpu.clock_frequency(), 9);
    assert!(cpu.tracing());
    assert!(cpu.stepping());
}
