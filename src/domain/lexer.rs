//! Formula tokenizer.
//!
//! Turns formula text into a flat token stream terminated by `Eof`. Positions are
//! zero-based character offsets into the input.

use crate::domain::error::LexError;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Number(f64),
    Comma,
    LParen,
    RParen,
    Plus,
    Minus,
    Star,
    Slash,
    Eof,
}

impl TokenKind {
    /// Short human-readable form used in parse error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Ident(name) => format!("'{}'", name),
            TokenKind::Number(n) => format!("'{}'", n),
            TokenKind::Comma => "','".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::Plus => "'+'".to_string(),
            TokenKind::Minus => "'-'".to_string(),
            TokenKind::Star => "'*'".to_string(),
            TokenKind::Slash => "'/'".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
}

impl Lexer {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn lex_number(&mut self) -> Result<Token, LexError> {
        let start = self.pos;
        let mut text = self.take_while(|c| c.is_ascii_digit());

        if self.peek() == Some('.') {
            if !self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
                return Err(LexError {
                    position: self.pos,
                    character: '.',
                });
            }
            self.pos += 1;
            text.push('.');
            text.push_str(&self.take_while(|c| c.is_ascii_digit()));
        }

        // digits with at most one dot always parse
        let value = text.parse::<f64>().map_err(|_| LexError {
            position: start,
            character: self.chars[start],
        })?;
        Ok(Token {
            kind: TokenKind::Number(value),
            position: start,
        })
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();
        let position = self.pos;
        let Some(ch) = self.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                position,
            });
        };

        if ch.is_ascii_alphabetic() || ch == '_' {
            let name = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
            return Ok(Token {
                kind: TokenKind::Ident(name),
                position,
            });
        }

        if ch.is_ascii_digit() {
            return self.lex_number();
        }

        let kind = match ch {
            ',' => TokenKind::Comma,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            other => {
                return Err(LexError {
                    position,
                    character: other,
                });
            }
        };
        self.pos += 1;
        Ok(Token { kind, position })
    }
}

/// Tokenize `input`. The returned stream always ends with an `Eof` token.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}
