//! Serial TTY device.
//!
//! The TTY owns three 32-bit registers the guest reaches through MMIO:
//! status, input, and output. The guest sets `TTY_OUT` in the status
//! register to request transmission of the output register's low byte;
//! the device clears the bit once the byte is on the wire. The device
//! sets `TTY_IN` after receiving a byte into the input register; the
//! guest clears it after consuming.
//!
//! `SerialTty` carries the registers over a single TCP connection. The
//! poll uses millisecond socket deadlines so it can run on the execution
//! hot path without stalling the machine.

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::time::Duration;

use crate::common::constants::{TTY_IN, TTY_OUT};
use crate::common::error::TtyError;

/// Socket deadline for one poll; bounds how long the CPU loop can block.
const POLL_DEADLINE: Duration = Duration::from_millis(1);

/// Abstract TTY device contract.
///
/// The register accessors return references into device-owned storage;
/// `interrupt_pending` is a bounded, non-blocking probe that may move
/// bytes between the registers and the wire as a side effect.
pub trait Tty {
    /// The status register (`TTY_IN` / `TTY_OUT` bits).
    fn status_register(&mut self) -> &mut u32;

    /// The input register (last received byte).
    fn in_register(&mut self) -> &mut u32;

    /// The output register (byte to transmit).
    fn out_register(&mut self) -> &mut u32;

    /// Services the wire and reports whether an interrupt is pending.
    fn interrupt_pending(&mut self) -> Result<bool, TtyError>;
}

/// A bound TCP listener awaiting the console connection.
pub struct TtyListener {
    listener: TcpListener,
}

impl TtyListener {
    /// Binds an ephemeral local port for the console to connect to.
    pub fn bind() -> io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        Ok(Self { listener })
    }

    /// Returns the address the console must connect to.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Blocks until a console attaches, then returns the serial TTY.
    pub fn accept(self) -> io::Result<SerialTty> {
        log::info!(
            "tty: waiting for console to attach on {}/tcp...",
            self.listener.local_addr()?
        );
        let (stream, peer) = self.listener.accept()?;
        stream.set_read_timeout(Some(POLL_DEADLINE))?;
        stream.set_write_timeout(Some(POLL_DEADLINE))?;
        log::info!("tty: console attached from {}", peer);
        Ok(SerialTty {
            stream,
            status: 0,
            input: 0,
            output: 0,
        })
    }
}

/// Serial TTY backed by a TCP connection.
pub struct SerialTty {
    stream: TcpStream,
    status: u32,
    input: u32,
    output: u32,
}

impl SerialTty {
    /// Binds an ephemeral port and blocks until a console attaches.
    pub fn attach() -> io::Result<Self> {
        TtyListener::bind()?.accept()
    }
}

impl Tty for SerialTty {
    fn status_register(&mut self) -> &mut u32 {
        &mut self.status
    }

    fn in_register(&mut self) -> &mut u32 {
        &mut self.input
    }

    fn out_register(&mut self) -> &mut u32 {
        &mut self.output
    }

    /// Services the connection with a bounded deadline.
    ///
    /// A transmission request is flushed first, then a receive is
    /// attempted if the input register is free. Deadline expiry means
    /// the wire had no work for us; any other socket error (including
    /// the peer closing the connection) is a detach.
    fn interrupt_pending(&mut self) -> Result<bool, TtyError> {
        if self.status & TTY_OUT != 0 {
            let byte = [(self.output & 0xFF) as u8];
            match self.stream.write(&byte) {
                Ok(_) => self.status &= !TTY_OUT,
                Err(err) if deadline_expired(&err) => {}
                Err(err) => return Err(TtyError::Detached(err)),
            }
        }
        if self.status & TTY_IN == 0 {
            let mut byte = [0u8; 1];
            match self.stream.read(&mut byte) {
                Ok(0) => {
                    return Err(TtyError::Detached(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "connection closed by peer",
                    )));
                }
                Ok(_) => {
                    self.input = u32::from(byte[0]);
                    self.status |= TTY_IN;
                }
                Err(err) if deadline_expired(&err) => {}
                Err(err) => return Err(TtyError::Detached(err)),
            }
        }
        Ok(self.status & (TTY_IN | TTY_OUT) != 0)
    }
}

/// Returns `true` when a socket error only means the deadline passed.
fn deadline_expired(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}
