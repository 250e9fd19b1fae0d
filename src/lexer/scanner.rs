//! Streaming scanner for Jack source code.
//!
//! Tokens are read from the byte source one at a time and appended to a
//! history buffer. A cursor plus a consumed flag give the parser one-token
//! lookahead: `advance` only fetches fresh input when the current token has
//! been consumed, and `rewind` steps the cursor back over buffered history.

use std::io::Read;

use crate::error::LexError;
use crate::lexer::token::{Keyword, Token, SYMBOLS};

/// The scanner transforms a byte stream into a rewindable token stream.
pub struct Scanner<R: Read> {
    src: R,
    /// One byte of pushback for terminators that belong to the next token.
    pushback: Option<u8>,
    /// Append-only token history with the line each token started on.
    history: Vec<(Token, u32)>,
    cursor: usize,
    consumed: bool,
    line: u32,
    /// Cause of the most recent `Token::Error`, surfaced by the parser.
    error: Option<LexError>,
}

impl<R: Read> Scanner<R> {
    pub fn new(src: R) -> Self {
        Self {
            src,
            pushback: None,
            history: Vec::new(),
            cursor: 0,
            consumed: false,
            line: 1,
            error: None,
        }
    }

    /// Position the cursor on the next token.
    ///
    /// A fresh token is read from the source only if the current one has been
    /// consumed (or nothing has been read yet) and the cursor sits at the end
    /// of the history; otherwise the cursor moves within buffered history.
    pub fn advance(&mut self) {
        if self.history.is_empty() {
            let token = self.next_token();
            self.history.push(token);
        } else if self.consumed {
            if self.cursor + 1 < self.history.len() {
                self.cursor += 1;
            } else {
                let token = self.next_token();
                self.history.push(token);
                self.cursor += 1;
            }
        }
        self.consumed = false;
    }

    /// The token under the cursor. Call `advance` at least once first.
    pub fn current(&self) -> &Token {
        &self.history[self.cursor].0
    }

    /// The line the current token started on.
    pub fn current_line(&self) -> u32 {
        self.history
            .get(self.cursor)
            .map(|(_, line)| *line)
            .unwrap_or(self.line)
    }

    /// Mark the current token consumed and hand it out; the next `advance`
    /// will move past it.
    pub fn consume(&mut self) -> Token {
        self.consumed = true;
        self.history[self.cursor].0.clone()
    }

    /// Step the cursor back `n` tokens over buffered history and clear the
    /// consumed flag. `rewind(0)` un-consumes the current token.
    pub fn rewind(&mut self, n: usize) -> Result<(), LexError> {
        if n > self.cursor {
            return Err(LexError::RewindOutOfRange {
                steps: n,
                available: self.cursor,
            });
        }
        self.cursor -= n;
        self.consumed = false;
        Ok(())
    }

    /// Take the parked cause of the most recent `Token::Error`.
    pub fn take_error(&mut self) -> Option<LexError> {
        self.error.take()
    }

    fn fail(&mut self, error: LexError) -> Token {
        self.error = Some(error);
        Token::Error
    }

    /// Read one byte, honoring the pushback buffer and counting lines.
    fn read_byte(&mut self) -> Result<Option<u8>, std::io::Error> {
        if let Some(byte) = self.pushback.take() {
            return Ok(Some(byte));
        }
        let mut buf = [0u8; 1];
        loop {
            match self.src.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    if buf[0] == b'\n' {
                        self.line += 1;
                    }
                    return Ok(Some(buf[0]));
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn unread(&mut self, byte: u8) {
        self.pushback = Some(byte);
    }

    /// Scan the next token from the source, skipping whitespace and comments.
    fn next_token(&mut self) -> (Token, u32) {
        loop {
            let byte = match self.read_byte() {
                Ok(Some(b)) => b,
                Ok(None) => return (Token::Eof, self.line),
                Err(e) => return (self.fail(e.into()), self.line),
            };

            if byte.is_ascii_whitespace() {
                continue;
            }

            let line = self.line;
            let token = match byte {
                b'/' => self.slash(line),
                b if SYMBOLS.contains(b as char) => Token::Symbol(b as char),
                b'0'..=b'9' => self.integer(byte, line),
                b'"' => self.string(line),
                _ => self.word(byte, line),
            };

            if token == Token::Comment {
                continue;
            }
            return (token, line);
        }
    }

    /// A `/` starts a line comment, a block comment, or is the division
    /// symbol; the peeked byte is unread in the last case.
    fn slash(&mut self, line: u32) -> Token {
        match self.read_byte() {
            Ok(Some(b'/')) => self.line_comment(),
            Ok(Some(b'*')) => self.block_comment(line),
            Ok(Some(other)) => {
                self.unread(other);
                Token::Symbol('/')
            }
            Ok(None) => Token::Symbol('/'),
            Err(e) => self.fail(e.into()),
        }
    }

    fn line_comment(&mut self) -> Token {
        loop {
            match self.read_byte() {
                Ok(Some(b'\n')) | Ok(None) => return Token::Comment,
                Ok(Some(_)) => continue,
                Err(e) => return self.fail(e.into()),
            }
        }
    }

    fn block_comment(&mut self, line: u32) -> Token {
        let mut star = false;
        loop {
            match self.read_byte() {
                Ok(Some(b'/')) if star => return Token::Comment,
                Ok(Some(byte)) => star = byte == b'*',
                Ok(None) => return self.fail(LexError::UnterminatedComment { line }),
                Err(e) => return self.fail(e.into()),
            }
        }
    }

    /// Accumulate a digit run; a non-digit terminator is unread.
    fn integer(&mut self, first: u8, line: u32) -> Token {
        let mut literal = String::new();
        literal.push(first as char);
        loop {
            match self.read_byte() {
                Ok(Some(b @ b'0'..=b'9')) => literal.push(b as char),
                Ok(Some(b)) if b.is_ascii_whitespace() => break,
                Ok(Some(b)) => {
                    self.unread(b);
                    break;
                }
                Ok(None) => return self.fail(LexError::UnexpectedEof { line }),
                Err(e) => return self.fail(e.into()),
            }
        }

        match literal.parse::<u32>() {
            Ok(n) if n <= 32767 => Token::IntConst(n as u16),
            _ => self.fail(LexError::IntOutOfRange { literal, line }),
        }
    }

    /// Accumulate bytes up to the closing quote; no escape processing.
    fn string(&mut self, line: u32) -> Token {
        let mut bytes = Vec::new();
        loop {
            match self.read_byte() {
                Ok(Some(b'"')) => break,
                Ok(Some(b)) => bytes.push(b),
                Ok(None) => return self.fail(LexError::UnterminatedString { line }),
                Err(e) => return self.fail(e.into()),
            }
        }

        match String::from_utf8(bytes) {
            Ok(s) => Token::StringConst(s),
            Err(_) => self.fail(LexError::InvalidBytes { line }),
        }
    }

    /// Accumulate an identifier or keyword; a symbol terminator is unread.
    fn word(&mut self, first: u8, line: u32) -> Token {
        let mut bytes = vec![first];
        loop {
            match self.read_byte() {
                Ok(Some(b)) if b.is_ascii_whitespace() => break,
                Ok(Some(b)) if SYMBOLS.contains(b as char) => {
                    self.unread(b);
                    break;
                }
                Ok(Some(b)) => bytes.push(b),
                Ok(None) => return self.fail(LexError::UnexpectedEof { line }),
                Err(e) => return self.fail(e.into()),
            }
        }

        let word = match String::from_utf8(bytes) {
            Ok(s) => s,
            Err(_) => return self.fail(LexError::InvalidBytes { line }),
        };

        match Keyword::from_word(&word) {
            Some(kw) => Token::Keyword(kw),
            None => Token::Identifier(word),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(source: &str) -> Vec<Token> {
        let mut scanner = Scanner::new(source.as_bytes());
        let mut tokens = Vec::new();
        loop {
            scanner.advance();
            let token = scanner.consume();
            let done = matches!(token, Token::Eof | Token::Error);
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }

    #[test]
    fn test_symbols() {
        assert_eq!(
            scan("{ } ( ) ; "),
            vec![
                Token::Symbol('{'),
                Token::Symbol('}'),
                Token::Symbol('('),
                Token::Symbol(')'),
                Token::Symbol(';'),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_adjacent_symbols_and_words() {
        assert_eq!(
            scan("let x=y;\n"),
            vec![
                Token::Keyword(Keyword::Let),
                Token::Identifier("x".into()),
                Token::Symbol('='),
                Token::Identifier("y".into()),
                Token::Symbol(';'),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_integer_pushback() {
        assert_eq!(
            scan("12+3 "),
            vec![
                Token::IntConst(12),
                Token::Symbol('+'),
                Token::IntConst(3),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_integer_range() {
        assert_eq!(scan("32767 "), vec![Token::IntConst(32767), Token::Eof]);

        let mut scanner = Scanner::new("32768 ".as_bytes());
        scanner.advance();
        assert_eq!(scanner.current(), &Token::Error);
        assert!(matches!(
            scanner.take_error(),
            Some(LexError::IntOutOfRange { .. })
        ));
    }

    #[test]
    fn test_string_constant() {
        assert_eq!(
            scan("\"hello world\" "),
            vec![Token::StringConst("hello world".into()), Token::Eof]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let mut scanner = Scanner::new("\"oops".as_bytes());
        scanner.advance();
        assert_eq!(scanner.current(), &Token::Error);
        assert!(matches!(
            scanner.take_error(),
            Some(LexError::UnterminatedString { line: 1 })
        ));
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            scan("1 // one\n/* two\n * lines */ 2 "),
            vec![Token::IntConst(1), Token::IntConst(2), Token::Eof]
        );
    }

    #[test]
    fn test_slash_is_division() {
        assert_eq!(
            scan("a/b;\n"),
            vec![
                Token::Identifier("a".into()),
                Token::Symbol('/'),
                Token::Identifier("b".into()),
                Token::Symbol(';'),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_block_comment() {
        let mut scanner = Scanner::new("/* no end".as_bytes());
        scanner.advance();
        assert_eq!(scanner.current(), &Token::Error);
        assert!(matches!(
            scanner.take_error(),
            Some(LexError::UnterminatedComment { line: 1 })
        ));
    }

    #[test]
    fn test_eof_mid_token() {
        let mut scanner = Scanner::new("123".as_bytes());
        scanner.advance();
        assert_eq!(scanner.current(), &Token::Error);
        assert!(matches!(
            scanner.take_error(),
            Some(LexError::UnexpectedEof { line: 1 })
        ));
    }

    #[test]
    fn test_advance_without_consume_is_stable() {
        let mut scanner = Scanner::new("foo bar ".as_bytes());
        scanner.advance();
        assert_eq!(scanner.current(), &Token::Identifier("foo".into()));
        scanner.advance();
        scanner.advance();
        assert_eq!(scanner.current(), &Token::Identifier("foo".into()));
        scanner.consume();
        scanner.advance();
        assert_eq!(scanner.current(), &Token::Identifier("bar".into()));
    }

    #[test]
    fn test_rewind_rereads_history() {
        let mut scanner = Scanner::new("a b c ".as_bytes());
        scanner.advance();
        scanner.consume();
        scanner.advance();
        scanner.consume();
        assert_eq!(scanner.current(), &Token::Identifier("b".into()));

        scanner.rewind(1).unwrap();
        assert_eq!(scanner.current(), &Token::Identifier("a".into()));

        scanner.consume();
        scanner.advance();
        assert_eq!(scanner.current(), &Token::Identifier("b".into()));
        scanner.consume();
        scanner.advance();
        assert_eq!(scanner.current(), &Token::Identifier("c".into()));
    }

    #[test]
    fn test_rewind_zero_unconsumes() {
        let mut scanner = Scanner::new("x y ".as_bytes());
        scanner.advance();
        scanner.consume();
        scanner.rewind(0).unwrap();
        scanner.advance();
        assert_eq!(scanner.current(), &Token::Identifier("x".into()));
    }

    #[test]
    fn test_rewind_out_of_range() {
        let mut scanner = Scanner::new("x ".as_bytes());
        scanner.advance();
        let err = scanner.rewind(3).unwrap_err();
        assert!(matches!(
            err,
            LexError::RewindOutOfRange {
                steps: 3,
                available: 0
            }
        ));
    }

    #[test]
    fn test_line_tracking() {
        let mut scanner = Scanner::new("a\n\nb ".as_bytes());
        scanner.advance();
        assert_eq!(scanner.current_line(), 1);
        scanner.consume();
        scanner.advance();
        assert_eq!(scanner.current(), &Token::Identifier("b".into()));
        assert_eq!(scanner.current_line(), 3);
    }

    #[test]
    fn test_eof_is_repeatable() {
        let mut scanner = Scanner::new("".as_bytes());
        scanner.advance();
        assert_eq!(scanner.current(), &Token::Eof);
        scanner.consume();
        scanner.advance();
        assert_eq!(scanner.current(), &Token::Eof);
    }
}
