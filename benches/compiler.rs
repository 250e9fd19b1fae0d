//! Benchmarks for tokenization and whole-file compilation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use jackc::compiler::Compiler;
use jackc::lexer::{Scanner, Token};

const SQUARE: &str = r#"
class Square {
    field int x, y;
    field int size;

    constructor Square new(int ax, int ay, int asize) {
        let x = ax;
        let y = ay;
        let size = asize;
        do draw();
        return this;
    }

    method void draw() {
        do Screen.setColor(true);
        do Screen.drawRectangle(x, y, x + size, y + size);
        return;
    }

    method void moveRight() {
        if ((x + size) < 510) {
            do Screen.setColor(false);
            do Screen.drawRectangle(x, y, x + 1, y + size);
            let x = x + 2;
            do Screen.setColor(true);
            do Screen.drawRectangle((x + size) - 1, y, x + size, y + size);
        }
        return;
    }

    method void dispose() {
        do Memory.deAlloc(this);
        return;
    }
}
"#;

fn scan_all(source: &str) {
    let mut scanner = Scanner::new(source.as_bytes());
    loop {
        scanner.advance();
        match scanner.consume() {
            Token::Eof | Token::Error => break,
            _ => {}
        }
    }
}

fn compile(source: &str) {
    let mut out = Vec::new();
    Compiler::new(source.as_bytes(), &mut out)
        .compile()
        .expect("compile error");
}

fn tokenization(c: &mut Criterion) {
    c.bench_function("scan_square", |b| b.iter(|| scan_all(black_box(SQUARE))));
}

fn compilation_overhead(c: &mut Criterion) {
    c.bench_function("compile_square", |b| b.iter(|| compile(black_box(SQUARE))));
}

criterion_group!(benches, tokenization, compilation_overhead);
criterion_main!(benches);
