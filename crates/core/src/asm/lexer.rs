//! Line-oriented tokenizer.
//!
//! Splits assembly source into per-line token sequences. A `#` starts a
//! comment running to end of line; whitespace separates tokens; newlines
//! separate statements. Blank and comment-only lines produce nothing.

use crate::common::error::AsmError;

/// A single lexical token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// A label definition (`name:`).
    Label(String),
    /// A mnemonic or label reference.
    Ident(String),
    /// An assembler directive (`.fill`, `.space`).
    Directive(String),
    /// A register literal (`r0`..`r31`).
    Register(u8),
    /// An integer literal (decimal, `0x`, or `0b`; possibly negative).
    Int(i64),
}

/// The tokens of one logical source line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    /// 1-based source line number.
    pub number: usize,
    /// Tokens in source order.
    pub tokens: Vec<Token>,
}

/// Lazily tokenizes assembly source, one line at a time.
pub struct Lexer<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over the given source text.
    pub fn new(source: &'a str) -> Self {
        Self {
            lines: source.lines().enumerate(),
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Line, AsmError>;

    fn next(&mut self) -> Option<Self::Item> {
        for (index, raw) in self.lines.by_ref() {
            let number = index + 1;
            let text = raw.split('#').next().unwrap_or("");
            if text.trim().is_empty() {
                continue;
            }
            return Some(lex_line(number, text));
        }
        None
    }
}

/// Tokenizes a single comment-stripped line.
fn lex_line(number: usize, text: &str) -> Result<Line, AsmError> {
    let mut tokens = Vec::new();
    for word in text.split_whitespace() {
        tokens.push(classify(number, word)?);
    }
    Ok(Line { number, tokens })
}

/// Classifies one whitespace-delimited word.
fn classify(line: usize, word: &str) -> Result<Token, AsmError> {
    if let Some(name) = word.strip_suffix(':') {
        if !is_identifier(name) {
            return Err(AsmError::Parse {
                line,
                msg: format!("invalid label name '{}'", name),
            });
        }
        return Ok(Token::Label(name.to_string()));
    }
    if let Some(rest) = word.strip_prefix('r') {
        if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) {
            let index: u32 = rest.parse().map_err(|_| AsmError::Parse {
                line,
                msg: format!("invalid register '{}'", word),
            })?;
            if index > 31 {
                return Err(AsmError::Parse {
                    line,
                    msg: format!("register index {} out of range", index),
                });
            }
            return Ok(Token::Register(index as u8));
        }
    }
    if let Some(value) = parse_int(word) {
        return Ok(Token::Int(value));
    }
    if let Some(name) = word.strip_prefix('.') {
        if is_identifier(name) {
            return Ok(Token::Directive(word.to_string()));
        }
    }
    if is_identifier(word) {
        return Ok(Token::Ident(word.to_string()));
    }
    Err(AsmError::Parse {
        line,
        msg: format!("unrecognized token '{}'", word),
    })
}

/// Parses an integer literal: decimal, `0x` hexadecimal, or `0b` binary,
/// with an optional leading minus. Returns `None` when the text is not a
/// well-formed literal.
pub fn parse_int(text: &str) -> Option<i64> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    if digits.is_empty() {
        return None;
    }
    let magnitude = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()?
    } else if let Some(bin) = digits.strip_prefix("0b").or_else(|| digits.strip_prefix("0B")) {
        i64::from_str_radix(bin, 2).ok()?
    } else {
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()?
    };
    Some(if negative { -magnitude } else { magnitude })
}

/// Returns `true` when `text` is a well-formed identifier:
/// a letter or underscore followed by letters, digits, or underscores.
fn is_identifier(text: &str) -> bool {
    let mut bytes = text.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_alphabetic() || b == b'_' => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}
