//! The structured error surfaced by the driver.
//!
//! Each stage defines its own error type; the driver folds whichever one
//! aborted the pipeline into a [`TranslateError`] so that callers see a
//! single shape: which stage failed, what kind of problem it was, where,
//! and a human-readable message.

use thiserror::Error;

use crate::span::Position;

/// Pipeline stage that produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Lexical analysis (character stream to token stream).
    Lex,
    /// Parsing (token stream to AST).
    Parse,
    /// Semantic analysis (scope and type checking).
    Analyze,
    /// Code generation (AST to target text).
    Codegen,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Lex => "lex",
            Stage::Parse => "parse",
            Stage::Analyze => "semantic",
            Stage::Codegen => "codegen",
        };
        f.write_str(name)
    }
}

/// A translation failure.
///
/// Carries the stage, a short machine-readable kind (e.g. `"invalid
/// character"`, `"type mismatch"`), the position of the first offending
/// character, and the full message. Partial output is never produced
/// alongside one of these.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{stage} error at {position}: {message}")]
pub struct TranslateError {
    /// Which stage aborted the pipeline.
    pub stage: Stage,

    /// Short error-kind label.
    pub kind: String,

    /// Position of the first offending character.
    pub position: Position,

    /// Human-readable message.
    pub message: String,
}

impl TranslateError {
    /// Creates a new error for the given stage.
    pub fn new(
        stage: Stage,
        kind: impl Into<String>,
        position: Position,
        message: impl Into<String>,
    ) -> Self {
        Self {
            stage,
            kind: kind.into(),
            position,
            message: message.into(),
        }
    }
}
