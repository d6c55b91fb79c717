//! End-to-end pipeline tests: source text in, JavaScript text out.

use pyjs_drv::translate;
use pyjs_util::{Position, Stage};

#[test]
fn test_trivial_assignment() {
    let output = translate("x = 5").unwrap();
    assert!(output.contains("\"use strict\";"));
    assert!(output.contains("let x = 5;"));
}

#[test]
fn test_function_with_main_guard() {
    let source = "def main():\n    print(\"Hello, World!\")\nif __name__ == \"__main__\":\n    main()";
    let output = translate(source).unwrap();
    assert!(output.contains("function main() {"));
    assert!(output.contains("console.log(\"Hello, World!\")"));
    assert!(output.trim_end().ends_with("main();"));
    assert!(!output.contains("__name__"));
    assert!(!output.contains("if (__name__"));
}

#[test]
fn test_recursive_function_with_comparison() {
    let source = "def fibonacci(n):\n    if n <= 1:\n        return n\n    else:\n        return fibonacci(n-1) + fibonacci(n-2)";
    let output = translate(source).unwrap();
    assert!(output.contains("function fibonacci(n)"));
    assert!(output.contains("if (n <= 1)"));
    assert!(output.contains("return fibonacci(n - 1) + fibonacci(n - 2);"));
}

#[test]
fn test_for_loop_with_range_shim() {
    let source = "for i in range(10):\n    print(i)";
    let output = translate(source).unwrap();
    assert_eq!(output.matches("function range()").count(), 1);
    assert!(output.contains("for (let i of range(10)) {"));
    assert!(output.contains("console.log(i);"));
}

#[test]
fn test_logical_with_comparisons() {
    let source = "a = 1\nb = 2\nc = 3\nd = 4\ne = 5\nf = 6\nresult = (a > b) and (c < d) or (e == f)";
    let output = translate(source).unwrap();
    assert!(output.contains("(a > b) && (c < d) || (e == f)"));
}

#[test]
fn test_formatted_string() {
    let source = "def fibonacci(n):\n    return n\nfor i in range(3):\n    print(f\"fib({i}) = {fibonacci(i)}\")";
    let output = translate(source).unwrap();
    assert!(output.contains("console.log(`fib(${i}) = ${fibonacci(i)}`)"));
}

#[test]
fn test_empty_input_yields_header_only() {
    assert_eq!(translate("").unwrap(), "\"use strict\";\n\n");
}

#[test]
fn test_comment_only_input_yields_header_only() {
    assert_eq!(translate("# nothing\n").unwrap(), "\"use strict\";\n\n");
}

#[test]
fn test_unterminated_blocks_at_eof_are_closed() {
    let source = "def f(a):\n    if a > 0:\n        while a > 1:\n            a -= 1";
    let output = translate(source).unwrap();
    assert!(output.contains("function f(a) {"));
    assert!(output.contains("a = a - 1;"));
}

#[test]
fn test_inline_function_body() {
    let output = translate("def five(): return 5").unwrap();
    assert!(output.contains("function five() {"));
    assert!(output.contains("return 5;"));
}

#[test]
fn test_elif_chain_end_to_end() {
    let source = "def sign(n):\n    if n > 0:\n        return 1\n    elif n < 0:\n        return 0 - 1\n    else:\n        return 0";
    let output = translate(source).unwrap();
    assert!(output.contains("if (n > 0) {"));
    assert!(output.contains("} else if (n < 0) {"));
    assert!(output.contains("} else {"));
}

#[test]
fn test_compound_assignment_pipeline() {
    let source = "total = 0\nfor i in range(5):\n    total += i\nprint(total)";
    let output = translate(source).unwrap();
    assert!(output.contains("let total = 0;"));
    assert!(output.contains("total = total + i;"));
}

#[test]
fn test_import_preserved_as_comment() {
    let output = translate("import math\nx = 1").unwrap();
    assert!(output.contains("// import math"));
}

#[test]
fn test_translation_is_deterministic() {
    let source = "def main():\n    for i in range(10):\n        print(f\"fib({i})\")\nif __name__ == \"__main__\":\n    main()";
    let first = translate(source).unwrap();
    let second = translate(source).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_lex_error_surfaces_stage_kind_position() {
    let err = translate("x = 5\ny = @").unwrap_err();
    assert_eq!(err.stage, Stage::Lex);
    assert_eq!(err.kind, "invalid character");
    assert_eq!(err.position, Position::new(2, 5));
    assert_eq!(err.to_string(), "lex error at 2:5: invalid character '@'");
}

#[test]
fn test_unclosed_string_error() {
    let err = translate("x = \"oops").unwrap_err();
    assert_eq!(err.stage, Stage::Lex);
    assert_eq!(err.kind, "unclosed string");
}

#[test]
fn test_parse_error_surfaces_stage() {
    let err = translate("def f(:").unwrap_err();
    assert_eq!(err.stage, Stage::Parse);
    assert_eq!(err.kind, "unexpected token");
}

#[test]
fn test_semantic_errors_are_all_reported() {
    let err = translate("x = a + b\ny = c").unwrap_err();
    assert_eq!(err.stage, Stage::Analyze);
    for name in ["'a'", "'b'", "'c'"] {
        assert!(err.message.contains(name), "missing {name} in {}", err.message);
    }
}

#[test]
fn test_type_mismatch_end_to_end() {
    let err = translate("x = 5 + 'hello'").unwrap_err();
    assert_eq!(err.stage, Stage::Analyze);
    assert!(err.message.contains("type mismatch"));
}

#[test]
fn test_translate_file_mirrors_extension() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("prog.py");
    std::fs::write(&input, "x = 1\n").unwrap();

    let written = pyjs_drv::translate_file(&input, None).unwrap();
    assert_eq!(written, dir.path().join("prog.js"));
    let text = std::fs::read_to_string(written).unwrap();
    assert!(text.contains("let x = 1;"));
}

#[test]
fn test_translate_file_reports_translation_errors() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.py");
    std::fs::write(&input, "x = y\n").unwrap();

    let err = pyjs_drv::translate_file(&input, None).unwrap_err();
    assert!(err.to_string().contains("semantic error"));
    assert!(!dir.path().join("bad.js").exists());
}

#[test]
fn test_full_fibonacci_program() {
    let source = "def fibonacci(n):\n    if n <= 1:\n        return n\n    else:\n        return fibonacci(n-1) + fibonacci(n-2)\n\ndef main():\n    for i in range(10):\n        print(f\"fib({i}) = {fibonacci(i)}\")\n\nif __name__ == \"__main__\":\n    main()\n";
    let output = translate(source).unwrap();
    assert!(output.starts_with("\"use strict\";\n"));
    assert!(output.contains("function range() {"));
    assert!(output.contains("function fibonacci(n) {"));
    assert!(output.contains("function main() {"));
    assert!(output.contains("for (let i of range(10)) {"));
    assert!(output.contains("console.log(`fib(${i}) = ${fibonacci(i)}`);"));
    assert!(output.trim_end().ends_with("main();"));
}
