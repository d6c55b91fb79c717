//! pyjs-util - Foundation types shared by every translator stage.
//!
//! This crate holds the pieces that all pipeline stages agree on: source
//! positions, the pipeline stage tag, and the structured error that the
//! driver surfaces to callers. It deliberately has no knowledge of tokens,
//! AST nodes, or emitted text.

pub mod error;
pub mod span;

pub use error::{Stage, TranslateError};
pub use span::Position;
