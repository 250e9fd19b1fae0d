//! Error types for all compilation phases.

use thiserror::Error;

/// Scanner errors.
#[derive(Debug, Error)]
pub enum LexError {
    #[error("line {line}: unterminated string constant")]
    UnterminatedString { line: u32 },

    #[error("line {line}: unterminated block comment")]
    UnterminatedComment { line: u32 },

    #[error("line {line}: integer constant '{literal}' out of range (0..=32767)")]
    IntOutOfRange { literal: String, line: u32 },

    #[error("line {line}: identifier contains invalid bytes")]
    InvalidBytes { line: u32 },

    #[error("line {line}: unexpected end of file inside a token")]
    UnexpectedEof { line: u32 },

    #[error("cannot rewind {steps} tokens, only {available} buffered")]
    RewindOutOfRange { steps: usize, available: usize },

    #[error("read error: {0}")]
    Read(#[from] std::io::Error),
}

/// Parser errors.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        line: u32,
    },

    #[error("line {line}: undefined variable '{name}'")]
    UndefinedVariable { name: String, line: u32 },
}

impl ParseError {
    pub fn unexpected_token(
        expected: impl Into<String>,
        found: impl Into<String>,
        line: u32,
    ) -> Self {
        Self::UnexpectedToken {
            expected: expected.into(),
            found: found.into(),
            line,
        }
    }

    pub fn undefined_variable(name: impl Into<String>, line: u32) -> Self {
        Self::UndefinedVariable {
            name: name.into(),
            line,
        }
    }
}

/// A unified error type for a whole compilation run.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("lexical error: {0}")]
    Lex(#[from] LexError),

    #[error("syntax error: {0}")]
    Parse(#[from] ParseError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
