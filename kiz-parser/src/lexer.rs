// kiz-parser - Lexer for kiz
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! Lexer (tokeniser) for kiz source code.
//!
//! Converts a source string into a vector of tokens. Newlines are
//! significant in kiz (they terminate statements), so the lexer emits
//! explicit `Newline` tokens; consecutive blank lines collapse to one.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use num_bigint::BigInt;

use crate::Span;
use crate::token::{Token, TokenKind};

/// Lexer error with position information.
#[derive(Debug, Clone)]
pub struct LexError {
    pub message: String,
    pub span: Span,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lex error at {}:{}: {}",
            self.span.line_start, self.span.col_start, self.message
        )
    }
}

impl std::error::Error for LexError {}

/// The kiz lexer.
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over the given source text, starting at line 1.
    pub fn new(source: &'a str) -> Self {
        Lexer::with_start_line(source, 1)
    }

    /// Create a lexer whose first line is numbered `start_line`.
    ///
    /// The REPL appends each input to a running virtual file, so tokens
    /// from later inputs must carry their real line numbers.
    pub fn with_start_line(source: &'a str, start_line: usize) -> Self {
        Lexer {
            chars: source.chars().peekable(),
            line: start_line,
            col: 1,
        }
    }

    /// Tokenise the whole input.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let at_end = token.kind == TokenKind::Eof;
            // Collapse runs of newlines
            if token.kind == TokenKind::Newline
                && matches!(
                    tokens.last().map(|t: &Token| &t.kind),
                    None | Some(TokenKind::Newline)
                )
            {
                continue;
            }
            tokens.push(token);
            if at_end {
                return Ok(tokens);
            }
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn error(&self, message: impl Into<String>) -> LexError {
        LexError {
            message: message.into(),
            span: Span::point(self.line, self.col),
        }
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_space_and_comments()?;

        let line = self.line;
        let col = self.col;
        let point = Span::point(line, col);

        let Some(c) = self.peek() else {
            return Ok(Token::new(TokenKind::Eof, point));
        };

        if c == '\n' {
            self.bump();
            return Ok(Token::new(TokenKind::Newline, point));
        }

        if c.is_ascii_digit() {
            return self.lex_number(line, col);
        }

        // M"..." / m"..." multiline string
        if (c == 'M' || c == 'm') && self.peek_second() == Some('"') {
            self.bump();
            return self.lex_string('"', true, line, col);
        }

        if c == '_' || c.is_alphabetic() {
            return Ok(self.lex_ident(line, col));
        }

        if c == '"' || c == '\'' {
            return self.lex_string(c, false, line, col);
        }

        self.bump();
        let kind = match c {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '^' => TokenKind::Caret,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            '=' => {
                if self.peek() == Some('=') {
                    self.bump();
                    TokenKind::Eq
                } else {
                    TokenKind::Assign
                }
            }
            '!' => {
                if self.peek() == Some('=') {
                    self.bump();
                    TokenKind::Ne
                } else {
                    return Err(self.error("expected '=' after '!'"));
                }
            }
            '<' => {
                if self.peek() == Some('=') {
                    self.bump();
                    TokenKind::Le
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.peek() == Some('=') {
                    self.bump();
                    TokenKind::Ge
                } else {
                    TokenKind::Gt
                }
            }
            other => {
                return Err(self.error(format!("unexpected character '{}'", other)));
            }
        };
        Ok(Token::new(
            kind,
            Span::new(line, line, col, self.col.saturating_sub(1)),
        ))
    }

    fn peek_second(&mut self) -> Option<char> {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next()
    }

    /// Skip spaces, tabs, carriage returns, `#` line comments and
    /// `/* ... */` block comments. Newlines are not skipped.
    fn skip_space_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') => {
                    self.bump();
                }
                Some('#') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                Some('/') if self.peek_second() == Some('*') => {
                    self.bump();
                    self.bump();
                    loop {
                        match self.bump() {
                            Some('*') if self.peek() == Some('/') => {
                                self.bump();
                                break;
                            }
                            Some(_) => {}
                            None => return Err(self.error("unterminated block comment")),
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn lex_ident(&mut self, line: usize, col: usize) -> Token {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c == '_' || c.is_alphanumeric() {
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }
        let span = Span::new(line, line, col, col + text.chars().count() - 1);
        match TokenKind::keyword(&text) {
            Some(kind) => Token::new(kind, span),
            None => Token::new(TokenKind::Ident(text), span),
        }
    }

    /// Lex an integer or decimal literal. A literal containing `.` or a
    /// scientific-notation exponent becomes a decimal; its raw text is
    /// preserved for the runtime to parse at full precision.
    fn lex_number(&mut self, line: usize, col: usize) -> Result<Token, LexError> {
        let mut text = String::new();
        let mut is_decimal = false;

        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '_' {
                if c != '_' {
                    text.push(c);
                }
                self.bump();
            } else if c == '.' && !is_decimal && self.peek_second().is_some_and(|d| d.is_ascii_digit())
            {
                is_decimal = true;
                text.push(c);
                self.bump();
            } else if (c == 'e' || c == 'E') && self.peek_second().is_some_and(|d| d.is_ascii_digit() || d == '-' || d == '+')
            {
                is_decimal = true;
                text.push(c);
                self.bump();
                if let Some(sign) = self.peek()
                    && (sign == '-' || sign == '+')
                {
                    text.push(sign);
                    self.bump();
                }
            } else {
                break;
            }
        }

        let span = Span::new(line, line, col, self.col.saturating_sub(1));
        if is_decimal {
            Ok(Token::new(TokenKind::Decimal(text), span))
        } else {
            let value: BigInt = text
                .parse()
                .map_err(|_| self.error(format!("invalid integer literal '{}'", text)))?;
            Ok(Token::new(TokenKind::Int(value), span))
        }
    }

    fn lex_string(
        &mut self,
        quote: char,
        multiline: bool,
        line: usize,
        col: usize,
    ) -> Result<Token, LexError> {
        self.bump(); // opening quote
        let mut text = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => break,
                Some('\n') if !multiline => {
                    return Err(self.error("unterminated string literal"));
                }
                Some('\\') => {
                    let escaped = self.bump().ok_or_else(|| {
                        self.error("unterminated escape sequence in string literal")
                    })?;
                    text.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        '0' => '\0',
                        other => other, // \\ \" \' and anything else pass through
                    });
                }
                Some(c) => text.push(c),
                None => return Err(self.error("unterminated string literal")),
            }
        }
        let span = Span::new(line, self.line, col, self.col.saturating_sub(1));
        Ok(Token::new(TokenKind::Str(text), span))
    }
}
