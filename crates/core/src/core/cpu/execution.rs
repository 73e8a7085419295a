//! Fetch, execute, and the per-step driver.
//!
//! One step is fetch → execute → device poll. The fetch translates the
//! program counter with read and execute permission and advances it
//! before execution, so every relative quantity (branch offsets, the
//! link register, the saved interrupt PC) is measured from the address
//! of the *next* instruction. All arithmetic wraps at 32 bits.

use crate::common::constants::{ACCESS_EXEC, ACCESS_READ, ACCESS_WRITE, REG_SP};
use crate::common::error::{Fault, StepError};
use crate::isa::decode::decode;
use crate::isa::opcodes;

use super::Cpu;

impl Cpu {
    /// Fetches the next instruction and advances the program counter.
    pub fn fetch(&mut self) -> Result<u32, Fault> {
        let word = self.load(self.pc, ACCESS_READ | ACCESS_EXEC)?;
        self.pc = self.pc.wrapping_add(1);
        Ok(word)
    }

    /// Executes one already-fetched instruction.
    ///
    /// The program counter must already point past the instruction.
    pub fn execute(&mut self, word: u32) -> Result<(), Fault> {
        let inst = decode(word);
        match inst.op {
            opcodes::JALR => {
                if inst.ra != 0 || inst.rb != 0 {
                    // Link first, then jump: with ra == rb the jump target
                    // is the freshly written link value.
                    self.gpr.write(inst.ra, self.pc);
                    self.pc = self.gpr.read(inst.rb);
                } else if !self.interrupts_enabled() {
                    return Err(Fault::Halted);
                } else {
                    self.stats.software_interrupts += 1;
                    self.interrupt(inst.imm17)?;
                }
            }
            opcodes::ADD => {
                let value = self.gpr.read(inst.rb).wrapping_add(self.gpr.read(inst.rc));
                self.gpr.write(inst.ra, value);
            }
            opcodes::ADDI => {
                let value = self.gpr.read(inst.rb).wrapping_add(inst.imm17);
                self.gpr.write(inst.ra, value);
            }
            opcodes::NAND => {
                let value = !(self.gpr.read(inst.rb) & self.gpr.read(inst.rc));
                self.gpr.write(inst.ra, value);
            }
            opcodes::LUI => {
                self.gpr.write(inst.ra, inst.imm22 << 10);
            }
            opcodes::SW => {
                let addr = self.gpr.read(inst.rb).wrapping_add(inst.imm17);
                let value = self.gpr.read(inst.ra);
                self.store(addr, ACCESS_WRITE, value)?;
            }
            opcodes::LW => {
                let addr = self.gpr.read(inst.rb).wrapping_add(inst.imm17);
                let value = self.load(addr, ACCESS_READ)?;
                self.gpr.write(inst.ra, value);
            }
            opcodes::BEQ => {
                if self.gpr.read(inst.ra) == self.gpr.read(inst.rb) {
                    self.pc = self.pc.wrapping_add(inst.imm17);
                }
            }
            opcodes::WSR => {
                self.check_status_access(inst.imm22)?;
                self.s[inst.imm22 as usize] = self.gpr.read(inst.ra);
            }
            opcodes::RSR => {
                self.check_status_access(inst.imm22)?;
                self.gpr.write(inst.ra, self.s[inst.imm22 as usize]);
            }
            opcodes::IRET => {
                if self.user_mode() {
                    return Err(Fault::NotPermitted("iret in user mode"));
                }
                self.s[0] = self.is0;
                self.gpr.write(REG_SP, self.isp);
                self.pc = self.ipc;
            }
            // Opcodes 11..31 are unassigned and execute as no-ops.
            _ => {}
        }
        Ok(())
    }

    /// Executes one fetched instruction, then runs the device poll.
    pub fn retire(&mut self, word: u32) -> Result<(), StepError> {
        self.execute(word)?;
        self.stats.instructions += 1;
        self.poll_devices()
    }

    /// Runs one full step: fetch, execute, device poll.
    pub fn step(&mut self) -> Result<(), StepError> {
        let word = self.fetch()?;
        self.retire(word)
    }

    /// Rejects status register access in user mode or with a bad index.
    fn check_status_access(&self, index: u32) -> Result<(), Fault> {
        if self.user_mode() {
            return Err(Fault::NotPermitted("status register access in user mode"));
        }
        if index >= self.s.len() as u32 {
            return Err(Fault::NotPermitted("status register index out of range"));
        }
        Ok(())
    }
}
