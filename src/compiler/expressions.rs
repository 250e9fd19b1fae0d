//! Expression and term compilation, including subroutine calls.

use std::io::{Read, Write};

use crate::lexer::{Keyword, Token};
use crate::vm::{ArithOp, Segment};

use super::{CompileResult, Compiler};

/// Binary operators, all at one precedence level.
const BIN_OPS: &[char] = &['+', '-', '*', '/', '&', '|', '<', '>', '='];

impl<R: Read, W: Write> Compiler<R, W> {
    /// `term (op term)*` — folded strictly left to right, no precedence.
    /// Each operator is emitted right after its right-hand term.
    pub(crate) fn compile_expression(&mut self) -> CompileResult<()> {
        self.compile_term()?;
        while let Some(op) = self.match_symbol(BIN_OPS) {
            self.compile_term()?;
            match op {
                '*' => self.writer.write_call("Math.multiply", 2)?,
                '/' => self.writer.write_call("Math.divide", 2)?,
                '+' => self.writer.write_arith(ArithOp::Add)?,
                '-' => self.writer.write_arith(ArithOp::Sub)?,
                '&' => self.writer.write_arith(ArithOp::And)?,
                '|' => self.writer.write_arith(ArithOp::Or)?,
                '<' => self.writer.write_arith(ArithOp::Lt)?,
                '>' => self.writer.write_arith(ArithOp::Gt)?,
                _ => self.writer.write_arith(ArithOp::Eq)?,
            }
        }
        Ok(())
    }

    pub(crate) fn compile_term(&mut self) -> CompileResult<()> {
        match self.eat() {
            Token::IntConst(n) => self.writer.write_push(Segment::Constant, n)?,
            Token::StringConst(s) => self.compile_string_constant(&s)?,
            Token::Keyword(Keyword::True) => {
                self.writer.write_push(Segment::Constant, 1)?;
                self.writer.write_arith(ArithOp::Neg)?;
            }
            Token::Keyword(Keyword::False) | Token::Keyword(Keyword::Null) => {
                self.writer.write_push(Segment::Constant, 0)?;
            }
            Token::Keyword(Keyword::This) => self.writer.write_push(Segment::Pointer, 0)?,
            Token::Identifier(name) => {
                let line = self.tokens.current_line();
                self.compile_identifier_term(name, line)?;
            }
            Token::Symbol('(') => {
                self.compile_expression()?;
                self.expect_symbol(&[')'])?;
            }
            Token::Symbol('-') => {
                self.compile_term()?;
                self.writer.write_arith(ArithOp::Neg)?;
            }
            Token::Symbol('~') => {
                self.compile_term()?;
                self.writer.write_arith(ArithOp::Not)?;
            }
            _ => return Err(self.unexpected("a term")),
        }
        Ok(())
    }

    /// A term led by an identifier: a subroutine call, an array read, or a
    /// plain variable, decided by one token of lookahead.
    fn compile_identifier_term(&mut self, name: String, line: u32) -> CompileResult<()> {
        match self.match_symbol(&['(', '.', '[']) {
            Some('(') | Some('.') => {
                // Hand the identifier back so the call sees its full form.
                self.tokens.rewind(1)?;
                self.compile_subroutine_call()
            }
            Some(_) => {
                let (segment, index) = self.resolve(&name, line)?;
                self.writer.write_push(segment, index)?;
                self.compile_expression()?;
                self.expect_symbol(&[']'])?;
                self.writer.write_arith(ArithOp::Add)?;
                self.writer.write_pop(Segment::Pointer, 1)?;
                self.writer.write_push(Segment::That, 0)?;
                Ok(())
            }
            None => {
                let (segment, index) = self.resolve(&name, line)?;
                self.writer.write_push(segment, index)?;
                Ok(())
            }
        }
    }

    /// A string constant builds a String object at runtime, one character at
    /// a time, leaving the reference on the stack.
    fn compile_string_constant(&mut self, s: &str) -> CompileResult<()> {
        let chars: Vec<char> = s.chars().collect();
        self.writer
            .write_push(Segment::Constant, chars.len() as u16)?;
        self.writer.write_call("String.new", 1)?;
        for c in chars {
            self.writer.write_push(Segment::Constant, c as u16)?;
            self.writer.write_call("String.appendChar", 2)?;
        }
        Ok(())
    }

    /// One of the three call forms, decided by looking the leading
    /// identifier up in the symbol table:
    ///
    /// - `f(args)` — method on the current object; `this` is argument 0.
    /// - `var.f(args)` — method on a variable; its value is argument 0 and
    ///   its declared type qualifies the callee.
    /// - `Class.f(args)` — plain function or constructor call, no receiver.
    pub(crate) fn compile_subroutine_call(&mut self) -> CompileResult<()> {
        let name = self.expect_identifier()?;

        let (callee, receiver_args) = if self.match_symbol(&['.']).is_some() {
            let method = self.expect_identifier()?;
            match self.symbols.get(&name) {
                Some(entry) => {
                    let segment = entry.kind.segment();
                    let index = entry.index;
                    let ty = entry.ty.clone();
                    self.writer.write_push(segment, index)?;
                    (format!("{}.{}", ty, method), 1)
                }
                None => (format!("{}.{}", name, method), 0),
            }
        } else {
            self.writer.write_push(Segment::Pointer, 0)?;
            (format!("{}.{}", self.class_name, name), 1)
        };

        self.expect_symbol(&['('])?;
        let n_args = self.compile_expression_list()?;
        self.expect_symbol(&[')'])?;

        self.writer.write_call(&callee, n_args + receiver_args)?;
        Ok(())
    }

    /// `(expr (',' expr)*)?` — returns how many arguments were pushed.
    fn compile_expression_list(&mut self) -> CompileResult<u16> {
        if self.check_symbol(')') {
            return Ok(0);
        }

        let mut n_args = 0;
        loop {
            self.compile_expression()?;
            n_args += 1;
            if self.match_symbol(&[',']).is_none() {
                break;
            }
        }
        Ok(n_args)
    }
}
