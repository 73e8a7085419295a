//! Interrupt Handling Unit Tests.
//!
//! Drives interrupt entry and return through guest programs: software
//! traps, handler-side machine state, exact restoration on `iret`,
//! vector clamping, alignment faults, and the periodic clock source.

use std::thread;
use std::time::Duration;

use risc32_core::common::error::{Fault, StepError};

use crate::common::TestContext;

/// Common prologue: vector `v` -> `_handler`, vector table at 1024,
/// interrupt stack base at 2048, interrupt delivery enabled.
fn prologue(vector: u32) -> String {
    format!(
        "
        movi r1 _handler
        movi r2 1024
        sw   r1 r2 {}
        wsr  r2 2
        movi r3 2048
        wsr  r3 3
        addi r4 r0 4
        wsr  r4 0
",
        vector
    )
}

// ══════════════════════════════════════════════════════════
// 1. Software traps
// ══════════════════════════════════════════════════════════

#[test]
fn trap_handler_counts_three_traps() {
    let source = prologue(1)
        + r"
        jalr r0 r0 1
        jalr r0 r0 1
        jalr r0 r0 1
        wsr  r0 0
        halt
_handler:
        movi r7 512
        lw   r6 r7 0
        addi r6 r6 1
        sw   r6 r7 0
        iret
";
    let mut ctx = TestContext::with_source(&source);
    ctx.run_to_halt(200);
    assert_eq!(ctx.cpu.mem[512], 3);
    assert_eq!(ctx.cpu.stats.software_interrupts, 3);
}

#[test]
fn handler_runs_with_kernel_stack_and_cleared_flags() {
    let source = prologue(5)
        + r"
        movi r29 300
        jalr r0 r0 5
        sw   r29 r0 40
        rsr  r5 0
        sw   r5 r0 41
        wsr  r0 0
        halt
_handler:
        sw   r29 r0 42
        rsr  r6 0
        sw   r6 r0 43
        iret
";
    let mut ctx = TestContext::with_source(&source);
    ctx.run_to_halt(200);
    // Inside the handler: kernel stack installed, all flags cleared.
    assert_eq!(ctx.cpu.mem[42], 2048);
    assert_eq!(ctx.cpu.mem[43], 0);
    // After iret: user stack pointer and flags restored exactly.
    assert_eq!(ctx.cpu.mem[40], 300);
    assert_eq!(ctx.cpu.mem[41], 0b100);
}

#[test]
fn out_of_range_vectors_clamp_to_the_halt_vector() {
    // Vector 16 clamps to 0; the handler bound at vector 0 runs.
    let source = prologue(0)
        + r"
        jalr r0 r0 16
        wsr  r0 0
        halt
_handler:
        addi r6 r0 1
        sw   r6 r0 50
        iret
";
    let mut ctx = TestContext::with_source(&source);
    ctx.run_to_halt(100);
    assert_eq!(ctx.cpu.mem[50], 1);
}

// ══════════════════════════════════════════════════════════
// 2. Entry preconditions
// ══════════════════════════════════════════════════════════

#[test]
fn misaligned_vector_table_base_faults() {
    let source = r"
        addi r1 r0 1000
        wsr  r1 2
        movi r3 2048
        wsr  r3 3
        addi r4 r0 4
        wsr  r4 0
        jalr r0 r0 1
";
    let mut ctx = TestContext::with_source(source);
    let err = ctx.run_to_error(100);
    assert!(
        matches!(err, StepError::Fault(Fault::Segfault(_))),
        "got {:?}",
        err
    );
}

#[test]
fn misaligned_interrupt_stack_base_faults() {
    let source = r"
        movi r2 1024
        wsr  r2 2
        addi r3 r0 12
        wsr  r3 3
        addi r4 r0 4
        wsr  r4 0
        jalr r0 r0 1
";
    let mut ctx = TestContext::with_source(source);
    let err = ctx.run_to_error(100);
    assert!(
        matches!(err, StepError::Fault(Fault::Segfault(_))),
        "got {:?}",
        err
    );
}

// ══════════════════════════════════════════════════════════
// 3. Clock interrupts
// ══════════════════════════════════════════════════════════

#[test]
fn clock_interrupts_fire_once_per_period() {
    let source = prologue(1)
        + r"
        movi r5 0x20000
        addi r6 r0 1
        sw   r6 r5 0
_spin:  beq  r0 r0 _spin
_handler:
        movi r7 512
        lw   r6 r7 0
        addi r6 r6 1
        sw   r6 r7 0
        iret
";
    let mut ctx = TestContext::with_source(&source);
    // Reach the spin loop; the first poll records the clock epoch.
    ctx.run_steps(40).unwrap();
    assert_eq!(ctx.cpu.clock_frequency(), 1);

    thread::sleep(Duration::from_millis(3));
    ctx.run_steps(40).unwrap();
    assert!(
        ctx.cpu.mem[512] >= 1,
        "clock handler never ran, count {}",
        ctx.cpu.mem[512]
    );
    assert!(ctx.cpu.stats.clock_interrupts >= 1);
}
