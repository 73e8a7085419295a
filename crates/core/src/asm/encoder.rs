//! Per-statement encoding and immediate resolution.
//!
//! Resolution produces a signed 64-bit value from a literal or a symbol
//! table lookup, then casts it into the target field width: signed fields
//! accept `[-2^(w-1), 2^(w-1)-1]`, word-sized fields accept any 32-bit
//! two's-complement pattern, and status register indices accept `0..=3`.

use std::collections::HashMap;

use crate::common::constants::NUM_STATUS_REGISTERS;
use crate::common::error::AsmError;
use crate::asm::parser::{Operand, Operation};
use crate::isa::instruction::{encode_ri, encode_rri, encode_rrr, IMM17_MASK};
use crate::isa::opcodes;

/// Label bindings: name to word address.
pub type SymbolTable = HashMap<String, i64>;

/// Resolves an operand to a signed 64-bit value.
pub fn resolve(labels: &SymbolTable, operand: &Operand, line: usize) -> Result<i64, AsmError> {
    match operand {
        Operand::Literal(value) => Ok(*value),
        Operand::Label(name) => {
            labels
                .get(name)
                .copied()
                .ok_or_else(|| AsmError::UndefinedLabel {
                    name: name.clone(),
                    line,
                })
        }
    }
}

/// Casts a resolved value into a signed field of the given width,
/// returning the field's two's-complement bit pattern.
pub fn cast_signed(value: i64, bits: u32, line: usize) -> Result<u32, AsmError> {
    let min = -(1i64 << (bits - 1));
    let max = (1i64 << (bits - 1)) - 1;
    if value < min || value > max {
        return Err(AsmError::ImmediateOutOfRange { bits, line });
    }
    Ok(value as u32 & ((1u32 << bits) - 1))
}

/// Casts a resolved value into a full 32-bit word, accepting any value
/// with a 32-bit two's-complement representation.
pub fn cast_word(value: i64, line: usize) -> Result<u32, AsmError> {
    if value < i32::MIN as i64 || value > u32::MAX as i64 {
        return Err(AsmError::ImmediateOutOfRange { bits: 32, line });
    }
    Ok(value as u32)
}

/// Casts a resolved value into a 32-bit word that must be non-negative.
fn cast_unsigned_word(value: i64, line: usize) -> Result<u32, AsmError> {
    if value < 0 {
        return Err(AsmError::CannotEncode {
            reason: format!("operand {} must be non-negative", value),
            line,
        });
    }
    if value > u32::MAX as i64 {
        return Err(AsmError::ImmediateOutOfRange { bits: 32, line });
    }
    Ok(value as u32)
}

/// Casts a resolved value into a status register index.
fn cast_status_index(value: i64, line: usize) -> Result<u32, AsmError> {
    if value < 0 || value >= NUM_STATUS_REGISTERS as i64 {
        return Err(AsmError::ImmediateOutOfRange { bits: 22, line });
    }
    Ok(value as u32)
}

/// Encodes one operation at word address `pc`, appending its words to `out`.
pub fn encode_operation(
    op: &Operation,
    labels: &SymbolTable,
    pc: u32,
    line: usize,
    out: &mut Vec<u32>,
) -> Result<(), AsmError> {
    match op {
        Operation::Add { ra, rb, rc } => {
            out.push(encode_rrr(opcodes::ADD, *ra as u32, *rb as u32, *rc as u32));
        }
        Operation::Nand { ra, rb, rc } => {
            out.push(encode_rrr(opcodes::NAND, *ra as u32, *rb as u32, *rc as u32));
        }
        Operation::Addi { ra, rb, imm } => {
            let field = cast_signed(resolve(labels, imm, line)?, 17, line)?;
            out.push(encode_rri(opcodes::ADDI, *ra as u32, *rb as u32, field));
        }
        Operation::Sw { ra, rb, imm } => {
            let field = cast_signed(resolve(labels, imm, line)?, 17, line)?;
            out.push(encode_rri(opcodes::SW, *ra as u32, *rb as u32, field));
        }
        Operation::Lw { ra, rb, imm } => {
            let field = cast_signed(resolve(labels, imm, line)?, 17, line)?;
            out.push(encode_rri(opcodes::LW, *ra as u32, *rb as u32, field));
        }
        Operation::Beq { ra, rb, target } => {
            let target = resolve(labels, target, line)?;
            let offset = target - i64::from(pc) - 1;
            let field = cast_signed(offset, 17, line)?;
            out.push(encode_rri(opcodes::BEQ, *ra as u32, *rb as u32, field));
        }
        Operation::Lui { ra, imm } => {
            let value = cast_unsigned_word(resolve(labels, imm, line)?, line)?;
            out.push(encode_ri(opcodes::LUI, *ra as u32, value >> 10));
        }
        Operation::Jalr { ra, rb, vector } => {
            let mut word = encode_rrr(opcodes::JALR, *ra as u32, *rb as u32, 0);
            if let Some(vector) = vector {
                let field = cast_signed(resolve(labels, vector, line)?, 17, line)?;
                word |= field & IMM17_MASK;
            }
            out.push(word);
        }
        Operation::Halt => {
            out.push(encode_rrr(opcodes::JALR, 0, 0, 0));
        }
        Operation::Nop => {
            out.push(encode_rrr(opcodes::ADD, 0, 0, 0));
        }
        Operation::Iret => {
            out.push(encode_ri(opcodes::IRET, 0, 0));
        }
        Operation::Wsr { ra, index } => {
            let index = cast_status_index(resolve(labels, index, line)?, line)?;
            out.push(encode_ri(opcodes::WSR, *ra as u32, index));
        }
        Operation::Rsr { ra, index } => {
            let index = cast_status_index(resolve(labels, index, line)?, line)?;
            out.push(encode_ri(opcodes::RSR, *ra as u32, index));
        }
        Operation::Lli { ra, imm } => {
            let value = cast_word(resolve(labels, imm, line)?, line)?;
            out.push(encode_rri(opcodes::ADDI, *ra as u32, *ra as u32, value & 0x3FF));
        }
        Operation::Movi { ra, imm } => {
            let value = cast_word(resolve(labels, imm, line)?, line)?;
            out.push(encode_ri(opcodes::LUI, *ra as u32, value >> 10));
            out.push(encode_rri(opcodes::ADDI, *ra as u32, *ra as u32, value & 0x3FF));
        }
        Operation::Fill { value } => {
            out.push(cast_word(resolve(labels, value, line)?, line)?);
        }
        Operation::Space { count } => {
            out.extend(std::iter::repeat(0).take(*count as usize));
        }
    }
    Ok(())
}
