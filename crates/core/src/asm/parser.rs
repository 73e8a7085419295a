//! Statement grammar.
//!
//! Each logical line is one statement:
//!
//! ```text
//! stmt      := [label ":"] (instr | directive)?
//! directive := ".fill" imm | ".space" N
//! ```
//!
//! The parser validates operand kinds and counts and produces a closed
//! [`Operation`] enum with one variant per mnemonic, each carrying exactly
//! the fields that operation needs. Address assignment and immediate
//! resolution happen later, in the encoder.

use std::vec;

use crate::common::constants::MEMORY_SIZE;
use crate::common::error::AsmError;
use crate::asm::lexer::{Lexer, Line, Token};

/// An unresolved immediate: a literal value or a label reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operand {
    /// A literal integer.
    Literal(i64),
    /// A label resolved against the symbol table during encoding.
    Label(String),
}

/// One assembly operation, directive, or pseudo-instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    /// `add rA rB rC`
    Add { ra: u8, rb: u8, rc: u8 },
    /// `nand rA rB rC`
    Nand { ra: u8, rb: u8, rc: u8 },
    /// `addi rA rB imm`
    Addi { ra: u8, rb: u8, imm: Operand },
    /// `sw rA rB imm`
    Sw { ra: u8, rb: u8, imm: Operand },
    /// `lw rA rB imm`
    Lw { ra: u8, rb: u8, imm: Operand },
    /// `beq rA rB target`; target is a label or absolute address.
    Beq { ra: u8, rb: u8, target: Operand },
    /// `lui rA imm`
    Lui { ra: u8, imm: Operand },
    /// `jalr rA rB [vector]`; the optional immediate is a trap vector.
    Jalr { ra: u8, rb: u8, vector: Option<Operand> },
    /// `halt`, the all-zero word.
    Halt,
    /// `nop`, encoded as `add r0 r0 r0`.
    Nop,
    /// `iret`
    Iret,
    /// `wsr rA index`
    Wsr { ra: u8, index: Operand },
    /// `rsr rA index`
    Rsr { ra: u8, index: Operand },
    /// `lli rA imm` pseudo-instruction: `addi rA rA (imm & 0x3FF)`.
    Lli { ra: u8, imm: Operand },
    /// `movi rA imm` pseudo-instruction: a `lui`/`lli` pair, two words.
    Movi { ra: u8, imm: Operand },
    /// `.fill imm`: one literal word.
    Fill { value: Operand },
    /// `.space N`: N zero words.
    Space { count: u32 },
}

impl Operation {
    /// Number of machine words this operation occupies.
    ///
    /// Label addresses depend on this: `movi` expands to two words and
    /// `.space` to `N`, so both passes must agree on these sizes.
    pub fn words(&self) -> u32 {
        match self {
            Operation::Movi { .. } => 2,
            Operation::Space { count } => *count,
            _ => 1,
        }
    }
}

/// A parsed source line: an optional label binding plus an optional operation.
///
/// A bare `label:` line is legal; the label binds to the next emitted word.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Statement {
    /// 1-based source line number.
    pub line: usize,
    /// Label defined on this line, if any.
    pub label: Option<String>,
    /// The operation, absent for label-only lines.
    pub op: Option<Operation>,
}

/// Lazily parses tokenized lines into statements.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    /// Creates a parser over the given source text.
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Lexer::new(source),
        }
    }
}

impl Iterator for Parser<'_> {
    type Item = Result<Statement, AsmError>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = match self.lexer.next()? {
            Ok(line) => line,
            Err(err) => return Some(Err(err)),
        };
        Some(parse_line(line))
    }
}

/// Parses one tokenized line into a statement.
fn parse_line(line: Line) -> Result<Statement, AsmError> {
    let number = line.number;
    let mut tokens = line.tokens.into_iter().peekable();

    let label = tokens
        .next_if(|token| matches!(token, Token::Label(_)))
        .map(|token| match token {
            Token::Label(name) => name,
            _ => unreachable!(),
        });

    let op = match tokens.next() {
        None => None,
        Some(Token::Ident(mnemonic)) => Some(parse_instruction(number, &mnemonic, &mut tokens)?),
        Some(Token::Directive(name)) => Some(parse_directive(number, &name, &mut tokens)?),
        Some(Token::Label(name)) => {
            return Err(AsmError::Parse {
                line: number,
                msg: format!("label '{}' must start the line", name),
            });
        }
        Some(other) => {
            return Err(AsmError::Parse {
                line: number,
                msg: format!("expected mnemonic, found {:?}", other),
            });
        }
    };

    if let Some(extra) = tokens.next() {
        return Err(AsmError::Parse {
            line: number,
            msg: format!("trailing operand {:?}", extra),
        });
    }

    Ok(Statement {
        line: number,
        label,
        op,
    })
}

type Tokens = std::iter::Peekable<vec::IntoIter<Token>>;

/// Parses an instruction given its mnemonic.
fn parse_instruction(line: usize, mnemonic: &str, tokens: &mut Tokens) -> Result<Operation, AsmError> {
    match mnemonic {
        "add" => {
            let (ra, rb, rc) = three_registers(line, tokens)?;
            Ok(Operation::Add { ra, rb, rc })
        }
        "nand" => {
            let (ra, rb, rc) = three_registers(line, tokens)?;
            Ok(Operation::Nand { ra, rb, rc })
        }
        "addi" => {
            let ra = register(line, tokens)?;
            let rb = register(line, tokens)?;
            let imm = operand(line, tokens)?;
            Ok(Operation::Addi { ra, rb, imm })
        }
        "sw" => {
            let ra = register(line, tokens)?;
            let rb = register(line, tokens)?;
            let imm = operand(line, tokens)?;
            Ok(Operation::Sw { ra, rb, imm })
        }
        "lw" => {
            let ra = register(line, tokens)?;
            let rb = register(line, tokens)?;
            let imm = operand(line, tokens)?;
            Ok(Operation::Lw { ra, rb, imm })
        }
        "beq" => {
            let ra = register(line, tokens)?;
            let rb = register(line, tokens)?;
            let target = operand(line, tokens)?;
            Ok(Operation::Beq { ra, rb, target })
        }
        "lui" => {
            let ra = register(line, tokens)?;
            let imm = operand(line, tokens)?;
            Ok(Operation::Lui { ra, imm })
        }
        "jalr" => {
            let ra = register(line, tokens)?;
            let rb = register(line, tokens)?;
            let vector = optional_operand(tokens);
            Ok(Operation::Jalr { ra, rb, vector })
        }
        "halt" => Ok(Operation::Halt),
        "nop" => Ok(Operation::Nop),
        "iret" => Ok(Operation::Iret),
        "wsr" => {
            let ra = register(line, tokens)?;
            let index = operand(line, tokens)?;
            Ok(Operation::Wsr { ra, index })
        }
        "rsr" => {
            let ra = register(line, tokens)?;
            let index = operand(line, tokens)?;
            Ok(Operation::Rsr { ra, index })
        }
        "lli" => {
            let ra = register(line, tokens)?;
            let imm = operand(line, tokens)?;
            Ok(Operation::Lli { ra, imm })
        }
        "movi" => {
            let ra = register(line, tokens)?;
            let imm = operand(line, tokens)?;
            Ok(Operation::Movi { ra, imm })
        }
        other => Err(AsmError::Parse {
            line,
            msg: format!("unknown mnemonic '{}'", other),
        }),
    }
}

/// Parses a directive given its name (with the leading dot).
fn parse_directive(line: usize, name: &str, tokens: &mut Tokens) -> Result<Operation, AsmError> {
    match name {
        ".fill" => {
            let value = operand(line, tokens)?;
            Ok(Operation::Fill { value })
        }
        ".space" => match tokens.next() {
            Some(Token::Int(count)) if (0..=MEMORY_SIZE as i64).contains(&count) => {
                Ok(Operation::Space {
                    count: count as u32,
                })
            }
            Some(Token::Int(count)) => Err(AsmError::Parse {
                line,
                msg: format!(".space count {} out of range", count),
            }),
            other => Err(AsmError::Parse {
                line,
                msg: format!(".space expects a literal word count, found {:?}", other),
            }),
        },
        other => Err(AsmError::Parse {
            line,
            msg: format!("unknown directive '{}'", other),
        }),
    }
}

/// Consumes one register operand.
fn register(line: usize, tokens: &mut Tokens) -> Result<u8, AsmError> {
    match tokens.next() {
        Some(Token::Register(index)) => Ok(index),
        other => Err(AsmError::Parse {
            line,
            msg: format!("expected register, found {:?}", other),
        }),
    }
}

/// Consumes three register operands.
fn three_registers(line: usize, tokens: &mut Tokens) -> Result<(u8, u8, u8), AsmError> {
    Ok((
        register(line, tokens)?,
        register(line, tokens)?,
        register(line, tokens)?,
    ))
}

/// Consumes one immediate operand: an integer literal or a label reference.
fn operand(line: usize, tokens: &mut Tokens) -> Result<Operand, AsmError> {
    match tokens.next() {
        Some(Token::Int(value)) => Ok(Operand::Literal(value)),
        Some(Token::Ident(name)) => Ok(Operand::Label(name)),
        other => Err(AsmError::Parse {
            line,
            msg: format!("expected immediate or label, found {:?}", other),
        }),
    }
}

/// Consumes a trailing immediate operand when present.
fn optional_operand(tokens: &mut Tokens) -> Option<Operand> {
    tokens
        .next_if(|token| matches!(token, Token::Int(_) | Token::Ident(_)))
        .map(|token| match token {
            Token::Int(value) => Operand::Literal(value),
            Token::Ident(name) => Operand::Label(name),
            _ => unreachable!(),
        })
}
