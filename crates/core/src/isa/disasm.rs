//! Instruction disassembler.
//!
//! Converts a 32-bit instruction word into assembly text for debug
//! tracing, fault reports, and test diagnostics. The output of
//! `disassemble` reassembles to an instruction with the same semantics
//! (immediates are printed in decimal, labels as absolute values).

use crate::isa::decode::decode;
use crate::isa::opcodes;

/// Disassembles a single instruction word.
///
/// Returns one canonical mnemonic per opcode, `"halt"` for the all-zero
/// `jalr r0 r0` encoding, and an `<unknown instruction: …>` marker for
/// opcodes outside the defined set.
pub fn disassemble(word: u32) -> String {
    let inst = decode(word);
    match inst.op {
        opcodes::JALR => {
            if inst.ra == 0 && inst.rb == 0 {
                if inst.imm17 == 0 {
                    "halt".to_string()
                } else {
                    format!("jalr r0 r0 {}", inst.imm17 as i32)
                }
            } else {
                format!("jalr r{} r{}", inst.ra, inst.rb)
            }
        }
        opcodes::ADD => format!("add r{} r{} r{}", inst.ra, inst.rb, inst.rc),
        opcodes::ADDI => format!("addi r{} r{} {}", inst.ra, inst.rb, inst.imm17 as i32),
        opcodes::NAND => format!("nand r{} r{} r{}", inst.ra, inst.rb, inst.rc),
        // Printed as the loaded upper value so the text reassembles to
        // the same word (the assembler emits the high 22 bits of its
        // operand).
        opcodes::LUI => format!("lui r{} {}", inst.ra, inst.imm22 << 10),
        opcodes::SW => format!("sw r{} r{} {}", inst.ra, inst.rb, inst.imm17 as i32),
        opcodes::LW => format!("lw r{} r{} {}", inst.ra, inst.rb, inst.imm17 as i32),
        opcodes::BEQ => format!("beq r{} r{} {}", inst.ra, inst.rb, inst.imm17 as i32),
        opcodes::WSR => format!("wsr r{} {}", inst.ra, inst.imm22),
        opcodes::RSR => format!("rsr r{} {}", inst.ra, inst.imm22),
        opcodes::IRET => "iret".to_string(),
        _ => format!("<unknown instruction: {:#010x}>", word),
    }
}
