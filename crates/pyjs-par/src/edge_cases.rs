//! Edge case tests for pyjs-par
