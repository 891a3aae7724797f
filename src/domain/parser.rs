//! Formula parser.
//!
//! Recursive descent over the token stream produced by [`tokenize`]:
//!
//! ```text
//! expression := term (('+'|'-') term)*
//! term       := factor (('*'|'/') factor)*
//! factor     := NUMBER | IDENT ('(' args ')')? | '(' expression ')' | '-' factor
//! args       := expression (',' expression)*
//! ```
//!
//! No semantic checks happen here: unknown names and arity mismatches surface at
//! evaluation time so that syntax errors and reference errors stay distinguishable.

use crate::domain::ast::{BinaryOperator, Node};
use crate::domain::error::{EngineError, ParseError};
use crate::domain::lexer::{Token, TokenKind, tokenize};

/// Maximum nesting of parentheses, calls and unary minus.
pub const MAX_NESTING_DEPTH: usize = 256;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> &Token {
        // tokenize always terminates the stream with Eof
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn error_here(&self, message: String) -> ParseError {
        ParseError {
            message,
            position: self.peek().position,
        }
    }

    fn expect(&mut self, expected: TokenKind) -> Result<Token, ParseError> {
        if self.peek().kind == expected {
            Ok(self.advance())
        } else {
            Err(self.error_here(format!(
                "expected {}, found {}",
                expected.describe(),
                self.peek().kind.describe()
            )))
        }
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(self.error_here(format!(
                "expression nested deeper than {} levels",
                MAX_NESTING_DEPTH
            )));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn parse_expression(&mut self) -> Result<Node, ParseError> {
        let mut node = self.parse_term()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOperator::Add,
                TokenKind::Minus => BinaryOperator::Subtract,
                _ => return Ok(node),
            };
            self.advance();
            let right = self.parse_term()?;
            node = Node::binary(op, node, right);
        }
    }

    fn parse_term(&mut self) -> Result<Node, ParseError> {
        let mut node = self.parse_factor()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOperator::Multiply,
                TokenKind::Slash => BinaryOperator::Divide,
                _ => return Ok(node),
            };
            self.advance();
            let right = self.parse_factor()?;
            node = Node::binary(op, node, right);
        }
    }

    fn parse_factor(&mut self) -> Result<Node, ParseError> {
        self.enter()?;
        let node = self.parse_factor_inner();
        self.leave();
        node
    }

    fn parse_factor_inner(&mut self) -> Result<Node, ParseError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Number(value) => {
                self.advance();
                Ok(Node::Literal(value))
            }
            TokenKind::Ident(name) => {
                self.advance();
                if self.peek().kind == TokenKind::LParen {
                    self.advance();
                    let args = self.parse_args(&name)?;
                    self.expect(TokenKind::RParen)?;
                    Ok(Node::FunctionCall { name, args })
                } else {
                    Ok(Node::SeriesRef(name))
                }
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Minus => {
                self.advance();
                let inner = self.parse_factor()?;
                Ok(Node::UnaryMinus(Box::new(inner)))
            }
            other => Err(self.error_here(format!(
                "expected number, name, '(' or '-', found {}",
                other.describe()
            ))),
        }
    }

    fn parse_args(&mut self, function: &str) -> Result<Vec<Node>, ParseError> {
        if self.peek().kind == TokenKind::RParen {
            return Err(self.error_here(format!(
                "{} requires at least one argument",
                function
            )));
        }

        let mut args = vec![self.parse_expression()?];
        while self.peek().kind == TokenKind::Comma {
            self.advance();
            args.push(self.parse_expression()?);
        }
        Ok(args)
    }

    fn parse(&mut self) -> Result<Node, ParseError> {
        let node = self.parse_expression()?;
        let next = self.peek();
        if next.kind != TokenKind::Eof {
            let message = match next.kind {
                TokenKind::RParen => "unmatched ')'".to_string(),
                ref other => format!("unexpected {} after expression", other.describe()),
            };
            return Err(self.error_here(message));
        }
        Ok(node)
    }
}

/// Parse an already-tokenized formula.
pub fn parse_tokens(tokens: Vec<Token>) -> Result<Node, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError {
            message: "empty token stream".to_string(),
            position: 0,
        });
    }
    Parser::new(tokens).parse()
}

/// Tokenize and parse formula text.
pub fn parse(input: &str) -> Result<Node, EngineError> {
    let tokens = tokenize(input)?;
    Ok(parse_tokens(tokens)?)
}
