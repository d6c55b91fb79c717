//! Edge case tests for pyjs-lex
