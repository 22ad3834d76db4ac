//! Lexer implementation.

use super::{Keyword, Span, Token, TokenKind};

/// A lexer that tokenizes SQL statement text.
pub struct Lexer<'a> {
    /// The input source code.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
        }
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Returns the next character without advancing.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skips whitespace and comments.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.advance();
            }

            if self.peek() == Some('-') && self.peek_next() == Some('-') {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                continue;
            }

            if self.peek() == Some('/') && self.peek_next() == Some('*') {
                self.advance();
                self.advance();
                loop {
                    match self.advance() {
                        Some('*') if self.peek() == Some('/') => {
                            self.advance();
                            break;
                        }
                        None => break,
                        _ => {}
                    }
                }
                continue;
            }

            break;
        }
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, Span::new(self.start, self.pos))
    }

    fn scan_word(&mut self) -> Token {
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$' || c == '#' || c == '@')
        {
            self.advance();
        }

        let text = &self.input[self.start..self.pos];
        match Keyword::from_str(text) {
            Some(keyword) => self.make_token(TokenKind::Keyword(keyword)),
            None => self.make_token(TokenKind::Identifier(text.to_string())),
        }
    }

    /// Scans text up to `close`, where a doubled `close` is an escaped one.
    ///
    /// The opening delimiter must already be consumed.
    fn scan_delimited(&mut self, close: char) -> Option<String> {
        let mut value = String::new();
        loop {
            match self.advance() {
                Some(c) if c == close => {
                    if self.peek() == Some(close) {
                        self.advance();
                        value.push(close);
                    } else {
                        return Some(value);
                    }
                }
                Some(c) => value.push(c),
                None => return None,
            }
        }
    }

    fn scan_string(&mut self) -> Token {
        match self.scan_delimited('\'') {
            Some(value) => self.make_token(TokenKind::String(value)),
            None => self.make_token(TokenKind::Error("Unterminated string literal".to_string())),
        }
    }

    fn scan_quoted_identifier(&mut self, close: char) -> Token {
        match self.scan_delimited(close) {
            Some(value) => self.make_token(TokenKind::QuotedIdentifier(value)),
            None => self.make_token(TokenKind::Error(
                "Unterminated quoted identifier".to_string(),
            )),
        }
    }

    fn scan_number(&mut self) -> Token {
        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '.') {
            self.advance();
        }
        if self.peek().is_some_and(|c| c == 'e' || c == 'E') {
            self.advance();
            if self.peek().is_some_and(|c| c == '+' || c == '-') {
                self.advance();
            }
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        let text = &self.input[self.start..self.pos];
        self.make_token(TokenKind::Number(text.to_string()))
    }

    /// Scans the next token.
    #[must_use]
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();
        self.start = self.pos;

        let Some(c) = self.advance() else {
            return self.make_token(TokenKind::Eof);
        };

        match c {
            '(' => self.make_token(TokenKind::LeftParen),
            ')' => self.make_token(TokenKind::RightParen),
            ',' => self.make_token(TokenKind::Comma),
            ';' => self.make_token(TokenKind::Semicolon),
            '.' if !self.peek().is_some_and(|n| n.is_ascii_digit()) => {
                self.make_token(TokenKind::Dot)
            }
            '?' => self.make_token(TokenKind::Parameter("?".to_string())),
            '\'' => self.scan_string(),
            'N' | 'n' if self.peek() == Some('\'') => {
                self.advance();
                self.scan_string()
            }
            '"' => self.scan_quoted_identifier('"'),
            '`' => self.scan_quoted_identifier('`'),
            '[' => self.scan_quoted_identifier(']'),
            '@' if self.peek().is_some_and(|n| n.is_alphanumeric() || n == '_') => {
                while self.peek().is_some_and(|n| n.is_alphanumeric() || n == '_') {
                    self.advance();
                }
                let text = &self.input[self.start..self.pos];
                self.make_token(TokenKind::Parameter(text.to_string()))
            }
            c if c.is_ascii_digit() || c == '.' => self.scan_number(),
            c if c.is_alphabetic() || c == '_' || c == '#' => self.scan_word(),
            _ => {
                while self
                    .peek()
                    .is_some_and(|n| matches!(n, '<' | '>' | '=' | '!' | '|' | '&'))
                {
                    self.advance();
                }
                let text = &self.input[self.start..self.pos];
                self.make_token(TokenKind::Operator(text.to_string()))
            }
        }
    }

    /// Tokenizes the entire input and returns all tokens, ending with `Eof`.
    #[must_use]
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }
}
