//! pyjs-lex - Lexical analyzer for the Python-subset source dialect.
//!
//! The lexer transforms a character buffer into a finite token sequence
//! terminated by [`TokenKind::Eof`]. Two things distinguish it from a
//! conventional scanner:
//!
//! - **The off-side rule.** Block structure in the source dialect is carried
//!   by indentation, which the lexer reifies as synthetic [`TokenKind::Indent`]
//!   and [`TokenKind::Dedent`] tokens bracketing each block, with
//!   [`TokenKind::Newline`] separating logical lines. The engine keeps a
//!   strictly increasing stack of open indent widths and a pending-token
//!   queue that is drained before scanning resumes.
//!
//! - **Formatted string literals.** An `f` immediately before a quote starts
//!   an f-string; the scanner records the body verbatim (balanced `{...}`
//!   segments included) and leaves interpolation to the code generator.
//!
//! ```
//! use pyjs_lex::{Lexer, TokenKind};
//!
//! let tokens = Lexer::new("x = 5").tokenize().unwrap();
//! let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     vec![TokenKind::Variable, TokenKind::Assign, TokenKind::Integer, TokenKind::Eof],
//! );
//! ```

pub mod cursor;
mod edge_cases;
pub mod lexer;
pub mod token;

pub use cursor::{Cursor, CursorSnapshot};
pub use lexer::{Lexer, LexError, QuoteKind};
pub use token::{keyword_from_ident, Token, TokenKind};
