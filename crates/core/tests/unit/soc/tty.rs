//! Serial TTY Tests.
//!
//! Drives the TTY echo handler against both the scripted in-memory
//! device and the real TCP-backed serial console.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::thread;

use risc32_core::common::error::StepError;
use risc32_core::soc::tty::TtyListener;

use crate::common::mocks::ScriptedTty;
use crate::common::TestContext;

/// Guest program: vector 2 echoes the input register to the output
/// register and requests transmission, then spins waiting for the next
/// interrupt.
const ECHO_GUEST: &str = r"
        movi r1 _tty
        movi r2 1024
        sw   r1 r2 2
        wsr  r2 2
        movi r3 2048
        wsr  r3 3
        addi r4 r0 4
        wsr  r4 0
_spin:  beq  r0 r0 _spin
_tty:
        movi r20 0x20001
        lw   r21 r20 1
        sw   r21 r20 2
        addi r22 r0 2
        sw   r22 r20 0
        iret
";

// ══════════════════════════════════════════════════════════
// 1. Scripted device
// ══════════════════════════════════════════════════════════

#[test]
fn echo_through_a_scripted_tty() {
    let mut ctx = TestContext::with_source(ECHO_GUEST);
    let (tty, sent) = ScriptedTty::new(b"hi");
    ctx.cpu.attach_tty(Box::new(tty));

    ctx.run_steps(500).unwrap();

    assert_eq!(sent.borrow().as_slice(), b"hi");
    assert!(
        ctx.cpu.stats.tty_interrupts >= 2,
        "expected one interrupt per byte, saw {}",
        ctx.cpu.stats.tty_interrupts
    );
}

#[test]
fn idle_tty_raises_no_interrupts() {
    let mut ctx = TestContext::with_source(ECHO_GUEST);
    let (tty, sent) = ScriptedTty::new(b"");
    ctx.cpu.attach_tty(Box::new(tty));

    ctx.run_steps(200).unwrap();

    assert!(sent.borrow().is_empty());
    assert_eq!(ctx.cpu.stats.tty_interrupts, 0);
}

// ══════════════════════════════════════════════════════════
// 2. TCP serial console
// ══════════════════════════════════════════════════════════

#[test]
fn echo_over_a_tcp_connection() {
    let listener = TtyListener::bind().expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    let console = thread::spawn(move || {
        let mut stream = TcpStream::connect(addr).expect("connect to tty");
        stream.write_all(b"hi").expect("send bytes");
        let mut echoed = [0u8; 2];
        stream.read_exact(&mut echoed).expect("read echo");
        echoed
        // Dropping the stream closes the connection; the machine side
        // observes the detach on its next poll.
    });

    let tty = listener.accept().expect("console attaches");
    let mut ctx = TestContext::with_source(ECHO_GUEST);
    ctx.cpu.attach_tty(Box::new(tty));

    let err = ctx.run_to_error(20_000);
    assert!(
        matches!(err, StepError::Tty(_)),
        "expected detach after the console closed, got {:?}",
        err
    );
    assert!(ctx.cpu.stats.tty_interrupts >= 2);

    let echoed = console.join().expect("console thread");
    assert_eq!(&echoed, b"hi");
}
