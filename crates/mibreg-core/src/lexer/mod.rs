//! SMI lexer.
//!
//! Tokenizes SMIv1/SMIv2 definition files. The lexer never fails: bad input
//! becomes [`TokenKind::Error`] tokens plus diagnostics, and scanning goes on.

// Source size is limited to u32::MAX bytes
#![allow(clippy::cast_possible_truncation)]

mod keyword;
mod token;

pub use keyword::lookup_keyword;
pub use token::{Span, Token, TokenKind};

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

/// Byte offset into source text.
pub type ByteOffset = u32;

/// Diagnostic severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    /// The input is malformed; some definitions may be missing.
    Error,
    /// Suspicious but usable input.
    Warning,
}

/// A located message from the lexer or parser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity.
    pub severity: Severity,
    /// Location in source.
    pub span: Span,
    /// Human-readable message.
    pub message: String,
}

impl Diagnostic {
    /// An error at `span`.
    #[must_use]
    pub fn error(span: Span, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            span,
            message: message.into(),
        }
    }

    /// A warning at `span`.
    #[must_use]
    pub fn warning(span: Span, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            span,
            message: message.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LexerState {
    Normal,
    /// After `MACRO`: skip to the closing `END`.
    InMacro,
    /// After `EXPORTS`: skip to `;`.
    InExports,
}

/// SMI lexer over a byte slice.
pub struct Lexer<'src> {
    source: &'src [u8],
    pos: usize,
    state: LexerState,
    diagnostics: Vec<Diagnostic>,
}

impl<'src> Lexer<'src> {
    /// Create a lexer.
    #[must_use]
    pub fn new(source: &'src [u8]) -> Self {
        Self {
            source,
            pos: 0,
            state: LexerState::Normal,
            diagnostics: Vec::new(),
        }
    }

    /// Tokenize everything. The last token is always [`TokenKind::Eof`].
    #[must_use]
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            tokens.push(token);
            if token.kind == TokenKind::Eof {
                break;
            }
        }
        (tokens, self.diagnostics)
    }

    /// Produce the next token.
    pub fn next_token(&mut self) -> Token {
        match self.state {
            LexerState::Normal => self.next_normal_token(),
            LexerState::InMacro => self.skip_macro_body(),
            LexerState::InExports => self.skip_exports_body(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start as ByteOffset, self.pos as ByteOffset)
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            span: self.span_from(start),
        }
    }

    fn is_comment_start(&self) -> bool {
        self.peek() == Some(b'-') && self.peek_at(1) == Some(b'-')
    }

    /// Skip whitespace and `--` comments. A comment ends at end of line or
    /// at the next `--`.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\r' | b'\n' | 0x0c) => self.pos += 1,
                Some(b'-') if self.is_comment_start() => {
                    self.pos += 2;
                    while let Some(b) = self.peek() {
                        if b == b'\n' || b == b'\r' {
                            break;
                        }
                        if self.is_comment_start() {
                            self.pos += 2;
                            break;
                        }
                        self.pos += 1;
                    }
                }
                _ => return,
            }
        }
    }

    fn next_normal_token(&mut self) -> Token {
        self.skip_trivia();
        let start = self.pos;
        let Some(b) = self.peek() else {
            return self.token(TokenKind::Eof, start);
        };

        let single = match b {
            b'{' => Some(TokenKind::LBrace),
            b'}' => Some(TokenKind::RBrace),
            b'(' => Some(TokenKind::LParen),
            b')' => Some(TokenKind::RParen),
            b'[' => Some(TokenKind::LBracket),
            b']' => Some(TokenKind::RBracket),
            b',' => Some(TokenKind::Comma),
            b';' => Some(TokenKind::Semicolon),
            b'|' => Some(TokenKind::Pipe),
            b'-' => Some(TokenKind::Minus),
            _ => None,
        };
        if let Some(kind) = single {
            self.pos += 1;
            return self.token(kind, start);
        }

        match b {
            b'.' => {
                self.pos += 1;
                if self.peek() == Some(b'.') {
                    self.pos += 1;
                    return self.token(TokenKind::DotDot, start);
                }
                self.token(TokenKind::Dot, start)
            }
            b':' => {
                self.pos += 1;
                if self.peek() == Some(b':') && self.peek_at(1) == Some(b'=') {
                    self.pos += 2;
                    return self.token(TokenKind::ColonColonEqual, start);
                }
                self.token(TokenKind::Colon, start)
            }
            b'"' => self.scan_quoted_string(),
            b'\'' => self.scan_hex_or_bin_string(),
            b'0'..=b'9' => {
                while self.peek().is_some_and(|b| b.is_ascii_digit()) {
                    self.pos += 1;
                }
                self.token(TokenKind::Number, start)
            }
            b if b.is_ascii_alphabetic() => self.scan_identifier_or_keyword(),
            _ => {
                self.pos += 1;
                // swallow the rest of a multi-byte character
                while self.peek().is_some_and(|b| (b & 0xc0) == 0x80) {
                    self.pos += 1;
                }
                let span = self.span_from(start);
                let text = String::from_utf8_lossy(&self.source[start..self.pos]);
                self.diagnostics
                    .push(Diagnostic::error(span, format!("unexpected character {text:?}")));
                self.token(TokenKind::Error, start)
            }
        }
    }

    /// Length of the identifier at the current position. A `--` ends the
    /// identifier since it opens a comment.
    fn identifier_len(&self) -> usize {
        let mut len = 0;
        while let Some(b) = self.peek_at(len) {
            let continues = b.is_ascii_alphanumeric()
                || b == b'_'
                || (b == b'-' && self.peek_at(len + 1) != Some(b'-'));
            if !continues {
                break;
            }
            len += 1;
        }
        len
    }

    fn scan_identifier_or_keyword(&mut self) -> Token {
        let start = self.pos;
        self.pos += self.identifier_len();
        let text = core::str::from_utf8(&self.source[start..self.pos]).unwrap_or("");

        if text.ends_with('-') {
            let span = self.span_from(start);
            self.diagnostics
                .push(Diagnostic::error(span, format!("identifier ends in hyphen: {text}")));
        }

        if let Some(kind) = lookup_keyword(text) {
            match kind {
                TokenKind::KwMacro => self.state = LexerState::InMacro,
                TokenKind::KwExports => self.state = LexerState::InExports,
                _ => {}
            }
            return self.token(kind, start);
        }

        let kind = if text.as_bytes()[0].is_ascii_uppercase() {
            TokenKind::UppercaseIdent
        } else {
            TokenKind::LowercaseIdent
        };
        self.token(kind, start)
    }

    fn scan_quoted_string(&mut self) -> Token {
        let start = self.pos;
        self.pos += 1;
        while let Some(b) = self.peek() {
            self.pos += 1;
            if b == b'"' {
                return self.token(TokenKind::QuotedString, start);
            }
        }
        let span = self.span_from(start);
        self.diagnostics
            .push(Diagnostic::error(span, "unterminated quoted string"));
        self.token(TokenKind::QuotedString, start)
    }

    fn scan_hex_or_bin_string(&mut self) -> Token {
        let start = self.pos;
        self.pos += 1;
        while let Some(b) = self.peek() {
            self.pos += 1;
            if b == b'\'' {
                let kind = match self.peek() {
                    Some(b'H' | b'h') => TokenKind::HexString,
                    Some(b'B' | b'b') => TokenKind::BinString,
                    _ => {
                        let span = self.span_from(start);
                        self.diagnostics
                            .push(Diagnostic::error(span, "expected H or B after quoted value"));
                        return self.token(TokenKind::Error, start);
                    }
                };
                self.pos += 1;
                return self.token(kind, start);
            }
        }
        let span = self.span_from(start);
        self.diagnostics
            .push(Diagnostic::error(span, "unterminated hex or binary string"));
        self.token(TokenKind::Error, start)
    }

    /// Skip a MACRO body up to and including its `END`.
    fn skip_macro_body(&mut self) -> Token {
        loop {
            self.skip_trivia();
            let start = self.pos;
            match self.peek() {
                None => {
                    self.state = LexerState::Normal;
                    self.diagnostics.push(Diagnostic::error(
                        self.span_from(start),
                        "MACRO body is not terminated by END",
                    ));
                    return self.token(TokenKind::Eof, start);
                }
                Some(b'"') => {
                    self.scan_quoted_string();
                }
                Some(b) if b.is_ascii_alphabetic() => {
                    self.pos += self.identifier_len();
                    if &self.source[start..self.pos] == b"END" {
                        self.state = LexerState::Normal;
                        return self.token(TokenKind::KwEnd, start);
                    }
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    /// Skip an EXPORTS list up to and including its `;`.
    fn skip_exports_body(&mut self) -> Token {
        while let Some(b) = self.peek() {
            let start = self.pos;
            self.pos += 1;
            if b == b';' {
                self.state = LexerState::Normal;
                return self.token(TokenKind::Semicolon, start);
            }
        }
        self.state = LexerState::Normal;
        self.token(TokenKind::Eof, self.pos)
    }
}
