//! Main lexer implementation.
//!
//! The lexer is a direct-coded scanner: each token class has its own reader
//! function, dispatched on the first character. Layered on top is the
//! indentation engine, a two-state machine (line-start / mid-line) that
//! compares each logical line's indent width against a stack of open block
//! widths and synthesizes `Indent`/`Dedent` tokens. Dedents that cannot be
//! returned immediately wait in a pending queue which is drained before
//! scanning resumes.

use std::collections::VecDeque;
use std::fmt;

use pyjs_util::Position;
use thiserror::Error;

use crate::cursor::Cursor;
use crate::token::{
    delimiter, keyword_from_ident, one_char_operator, two_char_operator, Token, TokenKind,
};

/// Which quote delimited an unclosed string literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuoteKind {
    /// `'`
    Single,
    /// `"`
    Double,
}

impl QuoteKind {
    fn from_char(quote: char) -> Self {
        if quote == '\'' {
            QuoteKind::Single
        } else {
            QuoteKind::Double
        }
    }
}

impl fmt::Display for QuoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteKind::Single => f.write_str("single"),
            QuoteKind::Double => f.write_str("double"),
        }
    }
}

/// A fatal lexical error. All variants carry the exact source position.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LexError {
    /// A character that starts no token.
    #[error("invalid character '{ch}'")]
    InvalidCharacter {
        /// The offending character.
        ch: char,
        /// Where it was found.
        position: Position,
    },

    /// A string literal that was never closed.
    #[error("unclosed {quote} quote string literal")]
    UnclosedString {
        /// Which quote opened the literal.
        quote: QuoteKind,
        /// Position of the opening quote.
        position: Position,
    },

    /// A malformed numeric literal (second dot, or a letter glued to digits).
    #[error("invalid number literal '{lexeme}'")]
    InvalidNumber {
        /// The malformed text, including the offending character.
        lexeme: String,
        /// Position of the first digit.
        position: Position,
    },
}

impl LexError {
    /// Position of the error.
    pub fn position(&self) -> Position {
        match self {
            LexError::InvalidCharacter { position, .. }
            | LexError::UnclosedString { position, .. }
            | LexError::InvalidNumber { position, .. } => *position,
        }
    }

    /// Short kind label for the structured driver error.
    pub fn kind(&self) -> &'static str {
        match self {
            LexError::InvalidCharacter { .. } => "invalid character",
            LexError::UnclosedString { .. } => "unclosed string",
            LexError::InvalidNumber { .. } => "invalid number",
        }
    }
}

/// The lexer.
///
/// # Example
///
/// ```
/// use pyjs_lex::{Lexer, TokenKind};
///
/// let tokens = Lexer::new("if x:\n    y = 1").tokenize().unwrap();
/// assert!(tokens.iter().any(|t| t.kind == TokenKind::Indent));
/// assert!(tokens.iter().any(|t| t.kind == TokenKind::Dedent));
/// ```
pub struct Lexer<'a> {
    /// Character cursor over the source.
    cursor: Cursor<'a>,

    /// Widths of currently open blocks, strictly increasing, bottom always 0.
    indent_stack: Vec<u32>,

    /// Queue of synthesized tokens waiting to be returned.
    pending: VecDeque<Token>,

    /// Indentation-engine state: true between a consumed newline and the
    /// first significant character of the next logical line.
    at_line_start: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over the given source buffer.
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            indent_stack: vec![0],
            pending: VecDeque::new(),
            at_line_start: true,
        }
    }

    /// Scans the whole source into a token sequence ending with `Eof`.
    ///
    /// Still-open blocks are closed with trailing `Dedent` tokens before the
    /// final `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    /// Returns the next token.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        if let Some(token) = self.pending.pop_front() {
            return Ok(token);
        }

        if self.at_line_start {
            if let Some(token) = self.handle_line_start() {
                return Ok(token);
            }
        }

        loop {
            self.skip_spaces();
            if self.cursor.is_at_end() {
                return Ok(self.close_open_blocks());
            }
            match self.cursor.current_char() {
                '\n' => {
                    let position = self.position();
                    self.cursor.advance();
                    self.at_line_start = true;
                    return Ok(Token::new(TokenKind::Newline, "\n", position));
                }
                '#' => self.skip_comment(),
                _ => break,
            }
        }

        self.scan_token()
    }

    /// Current cursor position as a token position.
    fn position(&self) -> Position {
        Position::new(self.cursor.line(), self.cursor.column())
    }

    /// Measures the indent of the next logical line and compares it against
    /// the stack. Blank and comment-only lines are consumed without touching
    /// the stack or producing tokens.
    fn handle_line_start(&mut self) -> Option<Token> {
        loop {
            let mut width = 0u32;
            loop {
                match self.cursor.current_char() {
                    ' ' => {
                        width += 1;
                        self.cursor.advance();
                    }
                    '\t' => {
                        // A tab advances to the next multiple of four.
                        width = (width / 4 + 1) * 4;
                        self.cursor.advance();
                    }
                    _ => break,
                }
            }
            match self.cursor.current_char() {
                '\n' => self.cursor.advance(),
                '#' => self.skip_comment(),
                _ => {
                    self.at_line_start = false;
                    if self.cursor.is_at_end() {
                        return None;
                    }
                    return self.apply_indentation(width);
                }
            }
        }
    }

    /// Pushes or pops indent levels for a line starting at `width`.
    ///
    /// Returns the first synthesized token, with any further `Dedent`s left
    /// in the pending queue. Landing between two open levels is accepted and
    /// treated as the nearest lower level (forgiving policy).
    fn apply_indentation(&mut self, width: u32) -> Option<Token> {
        let position = self.position();
        let top = self.indent_stack.last().copied().unwrap_or(0);

        if width > top {
            self.indent_stack.push(width);
            let lexeme = " ".repeat(width as usize);
            return Some(Token::new(TokenKind::Indent, lexeme, position));
        }

        while self.indent_stack.last().copied().unwrap_or(0) > width {
            self.indent_stack.pop();
            self.pending
                .push_back(Token::new(TokenKind::Dedent, "", position));
        }
        self.pending.pop_front()
    }

    /// At end of input: one `Dedent` per still-open block, then `Eof`.
    fn close_open_blocks(&mut self) -> Token {
        let position = self.position();
        if self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            return Token::new(TokenKind::Dedent, "", position);
        }
        Token::new(TokenKind::Eof, "", position)
    }

    /// Skips spaces and tabs within a line.
    fn skip_spaces(&mut self) {
        while matches!(self.cursor.current_char(), ' ' | '\t') {
            self.cursor.advance();
        }
    }

    /// Skips a `#` comment up to (not including) the line terminator.
    fn skip_comment(&mut self) {
        while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
            self.cursor.advance();
        }
    }

    /// Scans one significant token, dispatching on the first character.
    fn scan_token(&mut self) -> Result<Token, LexError> {
        let c = self.cursor.current_char();

        // Numbers first: digits, or a leading dot as in `.5`.
        if c.is_ascii_digit() || (c == '.' && self.cursor.peek_char(1).is_ascii_digit()) {
            return self.read_number();
        }

        if c == '"' || c == '\'' {
            return self.read_string(c, false);
        }

        // An `f` immediately before a quote begins a formatted string.
        if c == 'f' && matches!(self.cursor.peek_char(1), '"' | '\'') {
            self.cursor.advance();
            let quote = self.cursor.current_char();
            return self.read_string(quote, true);
        }

        if c.is_alphabetic() || c == '_' {
            return Ok(self.read_identifier());
        }

        if let Some(token) = self.read_operator() {
            return Ok(token);
        }

        if let Some(kind) = delimiter(c) {
            let position = self.position();
            self.cursor.advance();
            return Ok(Token::new(kind, c.to_string(), position));
        }

        Err(LexError::InvalidCharacter {
            ch: c,
            position: self.position(),
        })
    }

    /// Reads an integer or float literal.
    fn read_number(&mut self) -> Result<Token, LexError> {
        let position = self.position();
        let start = self.cursor.position();

        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }

        if self.cursor.current_char() == '.' {
            let dot = self.cursor.snapshot();
            self.cursor.advance();

            if self.cursor.current_char().is_ascii_digit() {
                while self.cursor.current_char().is_ascii_digit() {
                    self.cursor.advance();
                }
                let next = self.cursor.current_char();
                if next == '.' || next.is_alphabetic() || next == '_' {
                    return Err(LexError::InvalidNumber {
                        lexeme: format!("{}{}", self.cursor.slice_from(start), next),
                        position,
                    });
                }
                let lexeme = self.cursor.slice_from(start);
                return Ok(Token::new(TokenKind::FloatNumber, lexeme, position));
            }

            // A lone trailing dot belongs to the next token.
            self.cursor.restore(dot);
            let lexeme = self.cursor.slice_from(start);
            return Ok(Token::new(TokenKind::Integer, lexeme, position));
        }

        let next = self.cursor.current_char();
        if next.is_alphabetic() || next == '_' {
            return Err(LexError::InvalidNumber {
                lexeme: format!("{}{}", self.cursor.slice_from(start), next),
                position,
            });
        }
        let lexeme = self.cursor.slice_from(start);
        Ok(Token::new(TokenKind::Integer, lexeme, position))
    }

    /// Reads a string, char or formatted string literal. The cursor is on
    /// the opening quote.
    fn read_string(&mut self, quote: char, is_fstring: bool) -> Result<Token, LexError> {
        let position = self.position();
        self.cursor.advance();

        if is_fstring {
            return self.read_fstring_body(quote, position);
        }

        let mut value = String::new();
        while !self.cursor.is_at_end() && self.cursor.current_char() != quote {
            if self.cursor.current_char() == '\\' {
                self.cursor.advance();
                match self.cursor.current_char() {
                    'n' => value.push('\n'),
                    't' => value.push('\t'),
                    '\\' => value.push('\\'),
                    '"' => value.push('"'),
                    '\'' => value.push('\''),
                    // Unknown escapes keep the backslash.
                    other => {
                        value.push('\\');
                        value.push(other);
                    }
                }
                self.cursor.advance();
            } else {
                value.push(self.cursor.current_char());
                self.cursor.advance();
            }
        }

        if self.cursor.is_at_end() {
            return Err(LexError::UnclosedString {
                quote: QuoteKind::from_char(quote),
                position,
            });
        }
        self.cursor.advance();

        let kind = if quote == '\'' && value.chars().count() == 1 {
            TokenKind::Char
        } else {
            TokenKind::String
        };
        Ok(Token::new(kind, value, position))
    }

    /// Reads an f-string body. Braced segments are recorded verbatim with a
    /// balanced-brace counter; interpretation is deferred to the emitter.
    fn read_fstring_body(&mut self, quote: char, position: Position) -> Result<Token, LexError> {
        let mut value = String::new();
        while !self.cursor.is_at_end() && self.cursor.current_char() != quote {
            match self.cursor.current_char() {
                '{' => {
                    value.push('{');
                    self.cursor.advance();
                    let mut depth = 1u32;
                    while !self.cursor.is_at_end() && depth > 0 {
                        let c = self.cursor.current_char();
                        if c == '{' {
                            depth += 1;
                        } else if c == '}' {
                            depth -= 1;
                        }
                        value.push(c);
                        self.cursor.advance();
                    }
                }
                '\\' => {
                    self.cursor.advance();
                    match self.cursor.current_char() {
                        'n' => value.push('\n'),
                        't' => value.push('\t'),
                        '\\' => value.push('\\'),
                        '{' => value.push('{'),
                        '}' => value.push('}'),
                        c if c == quote => value.push(c),
                        other => {
                            value.push('\\');
                            value.push(other);
                        }
                    }
                    self.cursor.advance();
                }
                c => {
                    value.push(c);
                    self.cursor.advance();
                }
            }
        }

        if self.cursor.is_at_end() {
            return Err(LexError::UnclosedString {
                quote: QuoteKind::from_char(quote),
                position,
            });
        }
        self.cursor.advance();
        Ok(Token::new(TokenKind::String, value, position))
    }

    /// Reads an identifier, keyword or reserved word.
    fn read_identifier(&mut self) -> Token {
        let position = self.position();
        let start = self.cursor.position();
        while self.cursor.current_char().is_alphanumeric() || self.cursor.current_char() == '_' {
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(start);
        let kind = keyword_from_ident(text).unwrap_or(TokenKind::Variable);
        Token::new(kind, text, position)
    }

    /// Reads an operator, two-character forms first.
    fn read_operator(&mut self) -> Option<Token> {
        let position = self.position();
        let first = self.cursor.current_char();
        let second = self.cursor.peek_char(1);

        if let Some(kind) = two_char_operator(first, second) {
            self.cursor.advance();
            self.cursor.advance();
            return Some(Token::new(kind, format!("{first}{second}"), position));
        }
        if let Some(kind) = one_char_operator(first) {
            self.cursor.advance();
            return Some(Token::new(kind, first.to_string(), position));
        }
        None
    }
}
