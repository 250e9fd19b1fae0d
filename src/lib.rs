//! jackc: a single-pass compiler from Jack source to Hack VM code.
//!
//! Each `.jack` file holds exactly one class and compiles to one `.vm` file.
//! There is no intermediate syntax tree: the scanner feeds tokens to a
//! recursive-descent compiler that resolves names through a two-scope symbol
//! table and emits VM instructions as it parses.

pub mod compiler;
pub mod error;
pub mod lexer;
pub mod symbols;
pub mod vm;

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use compiler::Compiler;
use error::CompileError;

/// Compile one class from `source`, writing VM code to `out`.
pub fn compile_source<R: Read, W: Write>(source: R, out: W) -> Result<(), CompileError> {
    Compiler::new(source, out).compile()
}

/// Compile `<stem>.jack` into `<stem>.vm` next to it, returning the output
/// path. A partially written output is removed when compilation fails.
pub fn compile_file(path: &Path) -> Result<PathBuf, CompileError> {
    let out_path = path.with_extension("vm");
    let input = BufReader::new(File::open(path)?);
    let output = BufWriter::new(File::create(&out_path)?);

    match compile_source(input, output) {
        Ok(()) => Ok(out_path),
        Err(e) => {
            let _ = fs::remove_file(&out_path);
            Err(e)
        }
    }
}
