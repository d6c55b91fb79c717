//! pyjs-drv - Translator driver.
//!
//! Composes the four stages into the single entry point
//! [`translate`]: `emit(analyze(parse(tokenize(source))))`. Each stage
//! consumes the previous stage's whole output; diagnostics from any stage
//! abort the pipeline as one structured [`TranslateError`], and partial
//! output is never returned.
//!
//! Each translation run owns its own lexer, parser, analyzer and generator
//! state; concurrent runs are independent.
//!
//! ```
//! let output = pyjs_drv::translate("x = 5").unwrap();
//! assert!(output.contains("\"use strict\";"));
//! assert!(output.contains("let x = 5;"));
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use pyjs_gen::CodeGenerator;
use pyjs_lex::{LexError, Lexer};
use pyjs_par::{ParseError, Parser};
use pyjs_sem::{SemanticAnalyzer, SemanticError};
use pyjs_util::{Stage, TranslateError};

/// Translates a whole source buffer of the Python subset into JavaScript.
///
/// Translation is a pure function of the buffer: two runs over the same
/// input produce byte-identical output.
pub fn translate(source: &str) -> Result<String, TranslateError> {
    let tokens = Lexer::new(source).tokenize().map_err(lex_error)?;
    debug!(tokens = tokens.len(), "lexical analysis complete");

    let program = Parser::new(tokens).parse().map_err(parse_error)?;
    debug!(
        statements = program.statements.len(),
        "parsing complete"
    );

    SemanticAnalyzer::new()
        .analyze(&program)
        .map_err(semantic_errors)?;
    debug!("semantic analysis complete");

    let output = CodeGenerator::new().generate(&program);
    debug!(bytes = output.len(), "code generation complete");
    Ok(output)
}

/// Default output path: the input with its extension replaced by `.js`.
pub fn default_output_path(input: &Path) -> PathBuf {
    let mut output = input.to_path_buf();
    output.set_extension("js");
    output
}

/// Reads `input`, translates it and writes the target text to `output`
/// (or the mirrored `.js` path). Returns the path written.
pub fn translate_file(input: &Path, output: Option<&Path>) -> anyhow::Result<PathBuf> {
    let source = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let target = translate(&source)?;
    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(input));
    fs::write(&path, target).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

fn lex_error(err: LexError) -> TranslateError {
    TranslateError::new(Stage::Lex, err.kind(), err.position(), err.to_string())
}

fn parse_error(err: ParseError) -> TranslateError {
    TranslateError::new(Stage::Parse, err.kind(), err.position(), err.to_string())
}

/// Folds the analyzer's collected diagnostics into one abort, positioned
/// at the first of them.
fn semantic_errors(errors: Vec<SemanticError>) -> TranslateError {
    let position = errors.first().map(|e| e.position()).unwrap_or_default();
    let kind = errors.first().map(|e| e.kind()).unwrap_or("semantic error");
    let message = errors
        .iter()
        .map(|e| format!("{} at {}", e, e.position()))
        .collect::<Vec<_>>()
        .join("\n");
    TranslateError::new(Stage::Analyze, kind, position, message)
}
