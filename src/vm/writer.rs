//! Line-oriented VM code writer.

use std::io::{self, Write};

use crate::vm::instruction::{ArithOp, Instruction, Segment};

/// Writes VM instructions to an output sink, one per line, and mints fresh
/// labels from a per-file counter.
pub struct Writer<W: Write> {
    out: W,
    labels: u32,
}

impl<W: Write> Writer<W> {
    pub fn new(out: W) -> Self {
        Self { out, labels: 0 }
    }

    /// Mint a fresh `prefix<N>` label. The counter never resets within a
    /// file, so every minted label is unique in the output.
    pub fn register_label(&mut self, prefix: &str) -> String {
        let label = format!("{}{}", prefix, self.labels);
        self.labels += 1;
        label
    }

    fn write(&mut self, instruction: Instruction) -> io::Result<()> {
        writeln!(self.out, "{}", instruction)
    }

    pub fn write_push(&mut self, segment: Segment, index: u16) -> io::Result<()> {
        self.write(Instruction::Push(segment, index))
    }

    pub fn write_pop(&mut self, segment: Segment, index: u16) -> io::Result<()> {
        self.write(Instruction::Pop(segment, index))
    }

    pub fn write_arith(&mut self, op: ArithOp) -> io::Result<()> {
        self.write(Instruction::Arith(op))
    }

    pub fn write_label(&mut self, label: &str) -> io::Result<()> {
        self.write(Instruction::Label(label.to_string()))
    }

    pub fn write_goto(&mut self, label: &str) -> io::Result<()> {
        self.write(Instruction::Goto(label.to_string()))
    }

    pub fn write_if(&mut self, label: &str) -> io::Result<()> {
        self.write(Instruction::IfGoto(label.to_string()))
    }

    pub fn write_call(&mut self, name: &str, n_args: u16) -> io::Result<()> {
        self.write(Instruction::Call(name.to_string(), n_args))
    }

    pub fn write_function(&mut self, name: &str, n_locals: u16) -> io::Result<()> {
        self.write(Instruction::Function(name.to_string(), n_locals))
    }

    pub fn write_return(&mut self) -> io::Result<()> {
        self.write(Instruction::Return)
    }

    /// Flush and hand back the underlying sink.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}
