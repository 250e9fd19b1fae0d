//! Statement compilation: let, if, while, do, return.

use std::io::{Read, Write};

use crate::lexer::Keyword;
use crate::vm::{ArithOp, Segment};

use super::{CompileResult, Compiler};

impl<R: Read, W: Write> Compiler<R, W> {
    /// Zero or more statements, up to the closing `}` of the enclosing block.
    pub(crate) fn compile_statements(&mut self) -> CompileResult<()> {
        loop {
            let Some(kw) = self.match_keyword(&[
                Keyword::Let,
                Keyword::If,
                Keyword::While,
                Keyword::Do,
                Keyword::Return,
            ]) else {
                return Ok(());
            };

            match kw {
                Keyword::Let => self.compile_let()?,
                Keyword::If => self.compile_if()?,
                Keyword::While => self.compile_while()?,
                Keyword::Do => self.compile_do()?,
                _ => self.compile_return()?,
            }
        }
    }

    /// `let name ('[' expr ']')? '=' expr ';'`
    fn compile_let(&mut self) -> CompileResult<()> {
        let name = self.expect_identifier()?;
        let line = self.tokens.current_line();
        let (segment, index) = self.resolve(&name, line)?;

        if self.match_symbol(&['[']).is_some() {
            // Target address first: base plus subscript.
            self.writer.write_push(segment, index)?;
            self.compile_expression()?;
            self.expect_symbol(&[']'])?;
            self.writer.write_arith(ArithOp::Add)?;

            self.expect_symbol(&['='])?;
            self.compile_expression()?;
            self.expect_symbol(&[';'])?;

            // Park the value in temp 0 before loading `pointer 1`; a
            // subscripted RHS would otherwise clobber the target address.
            self.writer.write_pop(Segment::Temp, 0)?;
            self.writer.write_pop(Segment::Pointer, 1)?;
            self.writer.write_push(Segment::Temp, 0)?;
            self.writer.write_pop(Segment::That, 0)?;
        } else {
            self.expect_symbol(&['='])?;
            self.compile_expression()?;
            self.expect_symbol(&[';'])?;
            self.writer.write_pop(segment, index)?;
        }
        Ok(())
    }

    /// `if '(' expr ')' '{' statements '}' ('else' '{' statements '}')?`
    ///
    /// The condition is negated so a single `if-goto` can skip the then
    /// branch; both labels are minted fresh per statement.
    fn compile_if(&mut self) -> CompileResult<()> {
        let lbl_false = self.writer.register_label("IF_FALSE");
        let lbl_true = self.writer.register_label("IF_TRUE");

        self.expect_symbol(&['('])?;
        self.compile_expression()?;
        self.expect_symbol(&[')'])?;

        self.writer.write_arith(ArithOp::Not)?;
        self.writer.write_if(&lbl_false)?;

        self.expect_symbol(&['{'])?;
        self.compile_statements()?;
        self.expect_symbol(&['}'])?;

        self.writer.write_goto(&lbl_true)?;
        self.writer.write_label(&lbl_false)?;

        if self.match_keyword(&[Keyword::Else]).is_some() {
            self.expect_symbol(&['{'])?;
            self.compile_statements()?;
            self.expect_symbol(&['}'])?;
        }

        self.writer.write_label(&lbl_true)?;
        Ok(())
    }

    /// `while '(' expr ')' '{' statements '}'`
    fn compile_while(&mut self) -> CompileResult<()> {
        let lbl_false = self.writer.register_label("IF_FALSE");
        let lbl_true = self.writer.register_label("IF_TRUE");

        self.writer.write_label(&lbl_true)?;

        self.expect_symbol(&['('])?;
        self.compile_expression()?;
        self.expect_symbol(&[')'])?;

        self.writer.write_arith(ArithOp::Not)?;
        self.writer.write_if(&lbl_false)?;

        self.expect_symbol(&['{'])?;
        self.compile_statements()?;
        self.expect_symbol(&['}'])?;

        self.writer.write_goto(&lbl_true)?;
        self.writer.write_label(&lbl_false)?;
        Ok(())
    }

    /// `do subroutineCall ';'` — the unused return value is discarded.
    fn compile_do(&mut self) -> CompileResult<()> {
        self.compile_subroutine_call()?;
        self.expect_symbol(&[';'])?;
        self.writer.write_pop(Segment::Temp, 0)?;
        Ok(())
    }

    /// `return expr? ';'` — void subroutines return a dummy zero;
    /// a constructor's bare return hands back the receiver.
    fn compile_return(&mut self) -> CompileResult<()> {
        if self.check_symbol(';') {
            if self.in_constructor {
                self.writer.write_push(Segment::Pointer, 0)?;
            } else {
                self.writer.write_push(Segment::Constant, 0)?;
            }
        } else {
            self.compile_expression()?;
        }
        self.expect_symbol(&[';'])?;
        self.writer.write_return()?;
        Ok(())
    }
}
