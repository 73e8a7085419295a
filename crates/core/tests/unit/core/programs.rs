//! Whole-Program Tests.
//!
//! Assembles small guest programs and checks their final machine state:
//! halting, call/return through the link register, and the classic
//! multiply and factorial examples built from repeated addition.

use crate::common::TestContext;

#[test]
fn minimal_halt() {
    let mut ctx = TestContext::with_source("halt");
    ctx.run_to_halt(1);
    assert_eq!(ctx.cpu.pc, 1);
    for reg in 0..32 {
        assert_eq!(ctx.cpu.gpr.read(reg), 0, "r{} must stay zero", reg);
    }
}

#[test]
fn call_and_return() {
    let source = r"
        movi r1 _main
        jalr r31 r1
        halt
_main:  addi r1 r0 6
        addi r2 r0 7
        add  r3 r1 r2
        jalr r0 r31
";
    let mut ctx = TestContext::with_source(source);
    ctx.run_to_halt(50);
    assert_eq!(ctx.cpu.gpr.read(3), 13);
}

#[test]
fn double_through_a_subroutine() {
    let source = r"
        movi r1 _twice
        jalr r31 r1
        halt
_twice: addi r2 r0 17
        add  r2 r2 r2
        jalr r0 r31
";
    let mut ctx = TestContext::with_source(source);
    ctx.run_to_halt(50);
    assert_eq!(ctx.cpu.gpr.read(2), 34);
}

#[test]
fn multiply_by_repeated_addition() {
    // 4 * 7, product stored at the top of the stack.
    let source = r"
        movi r29 0x8000
        addi r1 r0 4
        addi r2 r0 7
        addi r3 r0 0
_loop:  beq  r2 r0 _done
        add  r3 r3 r1
        addi r2 r2 -1
        beq  r0 r0 _loop
_done:  sw   r3 r29 0
        halt
";
    let mut ctx = TestContext::with_source(source);
    ctx.run_to_halt(200);
    let sp = ctx.cpu.gpr.read(29);
    assert_eq!(sp, 0x8000);
    assert_eq!(ctx.cpu.mem[sp as usize], 28);
}

#[test]
fn factorial_with_nested_multiply_calls() {
    // fact(4) = 24: acc starts at 1, multiplied by n, n-1, ..., 1,
    // each product computed by calling _mult.
    let source = r"
        movi r29 0x8000
        addi r4 r0 4
        addi r5 r0 1
_fact:  beq  r4 r0 _store
        add  r1 r5 r0
        add  r2 r4 r0
        movi r6 _mult
        jalr r31 r6
        add  r5 r3 r0
        addi r4 r4 -1
        beq  r0 r0 _fact
_store: sw   r5 r29 0
        halt
_mult:  addi r3 r0 0
_mloop: beq  r2 r0 _mret
        add  r3 r3 r1
        addi r2 r2 -1
        beq  r0 r0 _mloop
_mret:  jalr r0 r31
";
    let mut ctx = TestContext::with_source(source);
    ctx.run_to_halt(500);
    let sp = ctx.cpu.gpr.read(29);
    assert_eq!(ctx.cpu.mem[sp as usize], 24);
}

#[test]
fn straying_into_zeroed_memory_halts() {
    // No explicit halt: execution falls off the program into zeroed
    // memory, whose words are halt instructions.
    let mut ctx = TestContext::with_source("addi r1 r0 1\naddi r2 r0 2");
    ctx.run_to_halt(10);
    assert_eq!(ctx.cpu.pc, 3);
    assert_eq!(ctx.cpu.gpr.read(1), 1);
    assert_eq!(ctx.cpu.gpr.read(2), 2);
}
