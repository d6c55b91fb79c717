//! pyjs-par - Recursive-descent parser for the Python-subset source dialect.
//!
//! The parser consumes the lexer's whole token stream with one token of
//! lookahead plus an explicit second-token peek (used only to tell an
//! assignment from an expression statement). Expressions are parsed by
//! precedence climbing through a fixed ladder, lowest first:
//!
//! | Level | Operators | Associativity |
//! |-------|-----------------------------------|---------------|
//! | 1 | `or` | Left |
//! | 2 | `and` | Left |
//! | 3 | `==`, `!=`, `<`, `<=`, `>`, `>=` | Left |
//! | 4 | `+`, `-` | Left |
//! | 5 | `*`, `/`, `%` | Left |
//! | 6 | `**` | Right |
//! | 7 | unary `+`, `-`, `not` | Prefix |
//!
//! Blocks are bracketed by the lexer's synthetic `Indent`/`Dedent` tokens; a
//! block may also be a single inline statement after the colon. `else` and
//! `elif` terminate a block without being consumed, and an `elif` chain
//! parses as a nested `IfStatement` in the else-branch.
//!
//! ```
//! use pyjs_lex::Lexer;
//! use pyjs_par::{ast::Stmt, Parser};
//!
//! let tokens = Lexer::new("x = 5").tokenize().unwrap();
//! let program = Parser::new(tokens).parse().unwrap();
//! assert!(matches!(program.statements[0], Stmt::Assign(_)));
//! ```

pub mod ast;
mod edge_cases;
mod expr;
mod stmt;

use pyjs_lex::{Token, TokenKind};
use pyjs_util::Position;
use thiserror::Error;

use crate::ast::Program;

/// A fatal parse error, positioned at the offending token.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ParseError {
    /// The current token cannot appear here.
    #[error("expected {expected}, found {found:?}")]
    UnexpectedToken {
        /// What the parser was looking for.
        expected: String,
        /// The kind actually found.
        found: TokenKind,
        /// Position of the found token.
        position: Position,
    },

    /// Input ended while a token was still required.
    #[error("missing required token: {expected:?}")]
    MissingToken {
        /// The required kind.
        expected: TokenKind,
        /// Position where it was required.
        position: Position,
    },

    /// A literal token whose text does not fit the literal's value type.
    #[error("invalid {what} literal '{lexeme}'")]
    InvalidLiteral {
        /// Literal class, e.g. "integer".
        what: &'static str,
        /// The offending text.
        lexeme: String,
        /// Position of the literal.
        position: Position,
    },

    /// A list literal element that is not itself a literal.
    #[error("list literal elements must be literals")]
    NonLiteralListElement {
        /// Position of the offending element.
        position: Position,
    },
}

impl ParseError {
    /// Position of the error.
    pub fn position(&self) -> Position {
        match self {
            ParseError::UnexpectedToken { position, .. }
            | ParseError::MissingToken { position, .. }
            | ParseError::InvalidLiteral { position, .. }
            | ParseError::NonLiteralListElement { position } => *position,
        }
    }

    /// Short kind label for the structured driver error.
    pub fn kind(&self) -> &'static str {
        match self {
            ParseError::UnexpectedToken { .. } => "unexpected token",
            ParseError::MissingToken { .. } => "missing token",
            ParseError::InvalidLiteral { .. } => "invalid literal",
            ParseError::NonLiteralListElement { .. } => "non-literal list element",
        }
    }
}

/// The parser.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Creates a parser over a token stream.
    ///
    /// The stream is expected to end with `Eof`; one is appended if the
    /// caller handed over a stream without it.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        let needs_eof = tokens.last().map(|t| t.kind) != Some(TokenKind::Eof);
        if needs_eof {
            let position = tokens.last().map(|t| t.position).unwrap_or_default();
            tokens.push(Token::new(TokenKind::Eof, "", position));
        }
        Self { tokens, pos: 0 }
    }

    /// Parses a whole program: top-level statements until `Eof`, skipping
    /// stray newlines and dedents between them.
    pub fn parse(&mut self) -> Result<Program, ParseError> {
        let mut statements = Vec::new();
        while !self.check(TokenKind::Eof) {
            if matches!(
                self.current().kind,
                TokenKind::Newline | TokenKind::Dedent
            ) {
                self.advance();
                continue;
            }
            statements.push(self.parse_top_level()?);
            self.skip_newlines();
        }
        Ok(Program { statements })
    }

    // =========================================================================
    // TOKEN PLUMBING
    // =========================================================================

    /// The current token. Never advances past `Eof`.
    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// The token one past the current one. This is the parser's only
    /// second-token lookahead, used for assignment detection.
    fn peek_second(&self) -> &Token {
        &self.tokens[(self.pos + 1).min(self.tokens.len() - 1)]
    }

    /// Moves to the next token, stopping at `Eof`.
    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    /// True if the current token has the given kind.
    fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    /// Consumes the current token if it has the expected kind, otherwise
    /// fails with the given description of what was expected.
    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, ParseError> {
        if self.current().kind == kind {
            let token = self.current().clone();
            self.advance();
            return Ok(token);
        }
        if self.current().kind == TokenKind::Eof {
            return Err(ParseError::MissingToken {
                expected: kind,
                position: self.current().position,
            });
        }
        Err(ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: self.current().kind,
            position: self.current().position,
        })
    }

    /// Skips any run of `Newline` tokens.
    fn skip_newlines(&mut self) {
        while self.check(TokenKind::Newline) {
            self.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;
    use pyjs_lex::Lexer;

    fn parse_source(source: &str) -> Program {
        let tokens = Lexer::new(source).tokenize().expect("lexing should succeed");
        Parser::new(tokens).parse().expect("parsing should succeed")
    }

    #[test]
    fn test_empty_program() {
        assert!(parse_source("").statements.is_empty());
        assert!(parse_source("# just a comment\n").statements.is_empty());
    }

    #[test]
    fn test_missing_token_at_eof() {
        let tokens = Lexer::new("def f(a").tokenize().unwrap();
        let err = Parser::new(tokens).parse().unwrap_err();
        assert!(matches!(
            err,
            ParseError::MissingToken {
                expected: TokenKind::RParen,
                ..
            }
        ));
    }

    #[test]
    fn test_eof_is_appended_when_absent() {
        let mut parser = Parser::new(Vec::new());
        let program = parser.parse().unwrap();
        assert!(program.statements.is_empty());
    }

    #[test]
    fn test_stray_dedents_are_skipped_at_top_level() {
        let program = parse_source("if a:\n    x = 1\ny = 2");
        assert_eq!(program.statements.len(), 2);
        assert!(matches!(program.statements[1], Stmt::Assign(_)));
    }
}
