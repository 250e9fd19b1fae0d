//! Class-level declarations: class, class variables, subroutines.

use std::io::{Read, Write};

use crate::lexer::Keyword;
use crate::symbols::SymbolKind;
use crate::vm::Segment;

use super::{CompileResult, Compiler};

impl<R: Read, W: Write> Compiler<R, W> {
    /// `class <Name> { classVarDec* subroutineDec* }`
    pub(crate) fn compile_class(&mut self) -> CompileResult<()> {
        self.expect_keyword(&[Keyword::Class])?;
        self.class_name = self.expect_identifier()?;
        self.expect_symbol(&['{'])?;

        while let Some(kw) = self.match_keyword(&[Keyword::Static, Keyword::Field]) {
            self.compile_class_var_dec(kw)?;
        }

        while let Some(kind) =
            self.match_keyword(&[Keyword::Constructor, Keyword::Function, Keyword::Method])
        {
            self.compile_subroutine_dec(kind)?;
        }

        self.expect_symbol(&['}'])?;
        Ok(())
    }

    /// `('static'|'field') type name (',' name)* ';'` — the leading keyword
    /// has already been consumed and doubles as the kind tag.
    fn compile_class_var_dec(&mut self, kw: Keyword) -> CompileResult<()> {
        let ty = self.expect_type(false)?;
        loop {
            let name = self.expect_identifier()?;
            self.symbols.define(&name, &ty, kw.as_str());
            if self.expect_symbol(&[',', ';'])? == ';' {
                break;
            }
        }
        Ok(())
    }

    /// `('constructor'|'function'|'method') (type|'void') name '(' params ')' body`
    fn compile_subroutine_dec(&mut self, kind: Keyword) -> CompileResult<()> {
        self.expect_type(true)?;
        let name = self.expect_identifier()?;

        // Fresh argument/local scope; methods reserve argument 0 for `this`.
        self.symbols.switch_subroutine_to(&name, kind.as_str());

        self.expect_symbol(&['('])?;
        self.compile_parameter_list()?;
        self.expect_symbol(&[')'])?;
        self.compile_subroutine_body(&name, kind)
    }

    /// `(type name (',' type name)*)?`
    fn compile_parameter_list(&mut self) -> CompileResult<()> {
        if self.check_symbol(')') {
            return Ok(());
        }
        loop {
            let ty = self.expect_type(false)?;
            let name = self.expect_identifier()?;
            self.symbols.define(&name, &ty, "arg");
            if self.match_symbol(&[',']).is_none() {
                break;
            }
        }
        Ok(())
    }

    /// `{ varDec* statements }` — the function header can only be emitted
    /// once every `var` declaration has been consumed, because its local
    /// count is the `Local` counter at that point.
    fn compile_subroutine_body(&mut self, name: &str, kind: Keyword) -> CompileResult<()> {
        self.expect_symbol(&['{'])?;

        while self.match_keyword(&[Keyword::Var]).is_some() {
            self.compile_var_dec()?;
        }

        let n_locals = self.symbols.count(SymbolKind::Local);
        let qualified = format!("{}.{}", self.class_name, name);
        self.writer.write_function(&qualified, n_locals)?;

        match kind {
            Keyword::Method => {
                // Bind the receiver passed as argument 0 to `this`.
                self.writer.write_push(Segment::Argument, 0)?;
                self.writer.write_pop(Segment::Pointer, 0)?;
            }
            Keyword::Constructor => {
                // Allocate one word per field and point `this` at the block.
                let n_fields = self.symbols.count(SymbolKind::Field);
                self.writer.write_push(Segment::Constant, n_fields)?;
                self.writer.write_call("Memory.alloc", 1)?;
                self.writer.write_pop(Segment::Pointer, 0)?;
            }
            _ => {}
        }
        self.in_constructor = kind == Keyword::Constructor;

        self.compile_statements()?;
        self.expect_symbol(&['}'])?;
        Ok(())
    }

    /// `'var' type name (',' name)* ';'` — the `var` keyword has already
    /// been consumed.
    fn compile_var_dec(&mut self) -> CompileResult<()> {
        let ty = self.expect_type(false)?;
        loop {
            let name = self.expect_identifier()?;
            self.symbols.define(&name, &ty, "local");
            if self.expect_symbol(&[',', ';'])? == ';' {
                break;
            }
        }
        Ok(())
    }
}
