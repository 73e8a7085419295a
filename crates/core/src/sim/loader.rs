//! Bytecode text parsing.
//!
//! The bytecode format is one 32-bit word per line, written as an
//! integer literal (hexadecimal with `0x` prefix as emitted by the
//! assembler, decimal and `0b` binary also accepted). Everything after
//! a `#` is a comment. A word's address is its index among the value
//! lines, so blank lines between words are an error rather than a gap.

use crate::common::constants::MEMORY_SIZE;
use crate::common::error::LoadError;
use crate::asm::lexer::parse_int;

/// Parses bytecode text into a program image.
///
/// Words land at consecutive addresses starting from zero.
pub fn parse_bytecode(text: &str) -> Result<Vec<u32>, LoadError> {
    let mut words = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let value = raw.split('#').next().unwrap_or("").trim();
        if value.is_empty() {
            return Err(LoadError {
                line,
                msg: "missing instruction word".to_string(),
            });
        }
        let parsed = parse_int(value).ok_or_else(|| LoadError {
            line,
            msg: format!("malformed word '{}'", value),
        })?;
        if !(0..=i64::from(u32::MAX)).contains(&parsed) {
            return Err(LoadError {
                line,
                msg: format!("word {} out of 32-bit range", parsed),
            });
        }
        if words.len() as u32 >= MEMORY_SIZE {
            return Err(LoadError {
                line,
                msg: "program does not fit in machine memory".to_string(),
            });
        }
        words.push(parsed as u32);
    }
    Ok(words)
}
