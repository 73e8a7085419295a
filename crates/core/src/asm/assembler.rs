//! Two-pass assembly driver.
//!
//! Pass one parses every statement, assigns word addresses, and binds
//! labels; pass two encodes each statement at its address. Buffering all
//! parsed statements between the passes costs `O(n)` memory in the program
//! length, which is what forward label references require.

use std::io::{self, Write};

use crate::common::constants::MEMORY_SIZE;
use crate::common::error::AsmError;
use crate::asm::encoder::{encode_operation, SymbolTable};
use crate::asm::parser::{Parser, Statement};

/// One emitted machine word together with its source line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodedWord {
    /// The 32-bit machine word.
    pub word: u32,
    /// 1-based source line the word came from.
    pub line: usize,
}

/// Assembles source text into machine words annotated with source lines.
///
/// Stops at the first error; previously produced words are discarded.
pub fn assemble(source: &str) -> Result<Vec<EncodedWord>, AsmError> {
    let mut statements: Vec<Statement> = Vec::new();
    let mut labels = SymbolTable::new();
    let mut addr: u64 = 0;

    for statement in Parser::new(source) {
        let statement = statement?;
        if let Some(name) = &statement.label {
            if labels.insert(name.clone(), addr as i64).is_some() {
                return Err(AsmError::Parse {
                    line: statement.line,
                    msg: format!("duplicate label '{}'", name),
                });
            }
        }
        if let Some(op) = &statement.op {
            addr += u64::from(op.words());
            if addr > u64::from(MEMORY_SIZE) {
                return Err(AsmError::TooManyInstructions);
            }
        }
        statements.push(statement);
    }

    let mut words = Vec::with_capacity(addr as usize);
    let mut scratch = Vec::new();
    let mut pc: u32 = 0;
    for statement in &statements {
        let Some(op) = &statement.op else {
            continue;
        };
        scratch.clear();
        encode_operation(op, &labels, pc, statement.line, &mut scratch)?;
        pc += scratch.len() as u32;
        words.extend(scratch.iter().map(|&word| EncodedWord {
            word,
            line: statement.line,
        }));
    }
    Ok(words)
}

/// Assembles source text into bare machine words.
pub fn assemble_words(source: &str) -> Result<Vec<u32>, AsmError> {
    Ok(assemble(source)?.into_iter().map(|w| w.word).collect())
}

/// Writes words in the bytecode text format: one hexadecimal word per
/// line with a binary-rendition comment carrying the source line.
pub fn write_bytecode<W: Write>(words: &[EncodedWord], mut out: W) -> io::Result<()> {
    for encoded in words {
        writeln!(
            out,
            "0x{:08x}\t# 0b{:032b} - line: {}",
            encoded.word, encoded.word, encoded.line
        )?;
    }
    Ok(())
}
