//! Single-pass compiler: recursive-descent parsing with interleaved code
//! generation.
//!
//! There is no syntax tree. The compiler pulls tokens from the scanner,
//! resolves identifiers through the symbol table, and writes VM instructions
//! as each grammar production is recognized. The grammar methods are split
//! across `declarations`, `statements` and `expressions`, all working on the
//! one context struct defined here.

mod declarations;
mod expressions;
mod statements;


use std::io::{Read, Write};

use crate::error::{CompileError, ParseError};
use crate::lexer::{Keyword, Scanner, Token};
use crate::symbols::SymbolTable;
use crate::vm::{Segment, Writer};

pub type CompileResult<T> = Result<T, CompileError>;

/// Compilation context for a single source file.
pub struct Compiler<R: Read, W: Write> {
    pub(crate) tokens: Scanner<R>,
    pub(crate) symbols: SymbolTable,
    pub(crate) writer: Writer<W>,
    /// Name of the class being compiled; qualifies emitted function names.
    pub(crate) class_name: String,
    /// Whether the current subroutine is a constructor (its bare `return`
    /// hands back the receiver).
    pub(crate) in_constructor: bool,
}

impl<R: Read, W: Write> Compiler<R, W> {
    pub fn new(source: R, out: W) -> Self {
        Self {
            tokens: Scanner::new(source),
            symbols: SymbolTable::new(),
            writer: Writer::new(out),
            class_name: String::new(),
            in_constructor: false,
        }
    }

    /// Compile the one class in the source, writing VM code to the sink.
    /// The first error aborts the file.
    pub fn compile(mut self) -> CompileResult<()> {
        self.compile_class()?;
        self.writer.into_inner()?;
        Ok(())
    }

    // ===== Token consumption =====

    /// Unconditionally take the next token.
    pub(crate) fn eat(&mut self) -> Token {
        self.tokens.advance();
        self.tokens.consume()
    }

    /// Consume the current token if it is one of the given symbols.
    pub(crate) fn match_symbol(&mut self, candidates: &[char]) -> Option<char> {
        self.tokens.advance();
        match self.tokens.current() {
            Token::Symbol(c) if candidates.contains(c) => {
                let c = *c;
                self.tokens.consume();
                Some(c)
            }
            _ => None,
        }
    }

    /// Consume the current token if it is one of the given keywords.
    pub(crate) fn match_keyword(&mut self, candidates: &[Keyword]) -> Option<Keyword> {
        self.tokens.advance();
        match self.tokens.current() {
            Token::Keyword(k) if candidates.contains(k) => {
                let k = *k;
                self.tokens.consume();
                Some(k)
            }
            _ => None,
        }
    }

    /// Look at the current token without consuming it.
    pub(crate) fn check_symbol(&mut self, candidate: char) -> bool {
        self.tokens.advance();
        self.tokens.current().is_symbol(&[candidate])
    }

    pub(crate) fn expect_symbol(&mut self, candidates: &[char]) -> CompileResult<char> {
        self.match_symbol(candidates)
            .ok_or_else(|| self.unexpected(&describe_symbols(candidates)))
    }

    pub(crate) fn expect_keyword(&mut self, candidates: &[Keyword]) -> CompileResult<Keyword> {
        self.match_keyword(candidates)
            .ok_or_else(|| self.unexpected(&describe_keywords(candidates)))
    }

    pub(crate) fn expect_identifier(&mut self) -> CompileResult<String> {
        self.tokens.advance();
        match self.tokens.current() {
            Token::Identifier(name) => {
                let name = name.clone();
                self.tokens.consume();
                Ok(name)
            }
            _ => Err(self.unexpected("an identifier")),
        }
    }

    /// A type name: `int`, `char`, `boolean` or a class identifier. Types are
    /// recorded for call dispatch but never verified.
    pub(crate) fn expect_type(&mut self, allow_void: bool) -> CompileResult<String> {
        self.tokens.advance();
        match self.tokens.current() {
            Token::Identifier(name) => {
                let name = name.clone();
                self.tokens.consume();
                Ok(name)
            }
            Token::Keyword(k @ (Keyword::Int | Keyword::Char | Keyword::Boolean)) => {
                let k = *k;
                self.tokens.consume();
                Ok(k.as_str().to_string())
            }
            Token::Keyword(Keyword::Void) if allow_void => {
                self.tokens.consume();
                Ok(Keyword::Void.as_str().to_string())
            }
            _ => Err(self.unexpected(if allow_void { "a return type" } else { "a type" })),
        }
    }

    // ===== Resolution and errors =====

    /// Resolve a name that must be a variable to its segment and index.
    pub(crate) fn resolve(&self, name: &str, line: u32) -> CompileResult<(Segment, u16)> {
        match self.symbols.get(name) {
            Some(entry) => Ok((entry.kind.segment(), entry.index)),
            None => Err(ParseError::undefined_variable(name, line).into()),
        }
    }

    /// Build the error for the current token: the parked lexical cause if the
    /// scanner failed, otherwise a mismatch naming the expected set.
    pub(crate) fn unexpected(&mut self, expected: &str) -> CompileError {
        if matches!(self.tokens.current(), Token::Error) {
            if let Some(cause) = self.tokens.take_error() {
                return cause.into();
            }
        }
        ParseError::unexpected_token(
            expected,
            self.tokens.current().to_string(),
            self.tokens.current_line(),
        )
        .into()
    }
}

fn describe_symbols(candidates: &[char]) -> String {
    candidates
        .iter()
        .map(|c| format!("'{}'", c))
        .collect::<Vec<_>>()
        .join(" or ")
}

fn describe_keywords(candidates: &[Keyword]) -> String {
    candidates
        .iter()
        .map(|k| format!("'{}'", k))
        .collect::<Vec<_>>()
        .join(" or ")
}
