//! Edge case tests for pyjs-gen

#[cfg(test)]
mod tests {
    use crate::CodeGenerator;
    use pyjs_lex::Lexer;
    use pyjs_par::ast::*;
    use pyjs_par::Parser;
    use pyjs_util::Position;

    fn generate(source: &str) -> String {
        let tokens = Lexer::new(source).tokenize().expect("lexing should succeed");
        let program = Parser::new(tokens).parse().expect("parsing should succeed");
        CodeGenerator::new().generate(&program)
    }

    // ==================== EDGE CASES ====================

    #[test]
    fn test_edge_nested_main_guard_is_not_suppressed() {
        // Only the module-level guard is special.
        let output = generate(
            "def main():\n    if __name__ == \"__main__\":\n        print(1)\nmain()",
        );
        assert!(output.contains("if (__name__ === \"__main__\")")
            || output.contains("if (__name__ == \"__main__\")"));
    }

    #[test]
    fn test_edge_guard_with_swapped_operands_is_emitted() {
        let output = generate("if \"__main__\" == __name__:\n    print(1)");
        assert!(output.contains("if ("));
        assert!(!output.contains("main();"));
    }

    #[test]
    fn test_edge_regular_string_with_braces_becomes_template() {
        // The raw-body heuristic cannot tell a plain string containing a
        // balanced brace pair from an f-string body.
        let output = generate("x = \"pair: {a}\"");
        assert!(output.contains("let x = `pair: ${a}`;"));
    }

    #[test]
    fn test_edge_deeply_nested_blocks_indent_consistently() {
        let output = generate(
            "def f(a):\n    if a > 0:\n        while a > 0:\n            a -= 1\n    return a",
        );
        assert!(output.contains("    if (a > 0) {"));
        assert!(output.contains("        while (a > 0) {"));
        assert!(output.contains("            a = a - 1;"));
        assert!(output.contains("    return a;"));
    }

    #[test]
    fn test_edge_declared_names_are_tracked_across_functions() {
        // The declared-name set follows the output stream, so a second
        // function reusing a name sees it as already declared.
        let output = generate("def f():\n    x = 1\n    return x\ndef g():\n    x = 2\n    return x");
        assert!(output.contains("let x = 1;"));
        assert!(output.contains("    x = 2;"));
    }

    #[test]
    fn test_edge_empty_function_body_emits_empty_braces() {
        let program = Program {
            statements: vec![Stmt::FunctionDecl(FunctionDecl {
                name: "noop".to_string(),
                parameters: vec![],
                body: Block {
                    statements: vec![],
                    position: Position::START,
                },
                return_type: DataType::Any,
                position: Position::START,
            })],
        };
        let output = CodeGenerator::new().generate(&program);
        assert!(output.contains("function noop() {\n}"));
    }

    #[test]
    fn test_edge_is_and_is_not_map_to_strict_equality() {
        // Emitter-only operators: build the nodes directly.
        let make = |op: BinOp| Program {
            statements: vec![Stmt::Expression(ExprStmt {
                expression: Expr::Binary(Box::new(BinaryExpr {
                    left: Expr::Identifier(Ident {
                        name: "a".to_string(),
                        position: Position::START,
                    }),
                    op,
                    right: Expr::Literal(Literal {
                        value: LiteralValue::None,
                        ty: DataType::None,
                        position: Position::new(1, 6),
                    }),
                    position: Position::new(1, 3),
                })),
                position: Position::START,
            })],
        };
        assert!(CodeGenerator::new()
            .generate(&make(BinOp::Is))
            .contains("a === null;"));
        assert!(CodeGenerator::new()
            .generate(&make(BinOp::IsNot))
            .contains("a !== null;"));
    }

    #[test]
    fn test_edge_variable_decl_without_initializer() {
        let program = Program {
            statements: vec![Stmt::VariableDecl(VariableDecl {
                name: "x".to_string(),
                declared_type: DataType::Int,
                init: None,
                position: Position::START,
            })],
        };
        let output = CodeGenerator::new().generate(&program);
        assert!(output.contains("let x;"));
    }

    #[test]
    fn test_edge_nested_list_literal() {
        let output = generate("x = [[1, 2], [3]]");
        assert!(output.contains("let x = [[1, 2], [3]];"));
    }

    #[test]
    fn test_edge_generator_instance_is_reusable() {
        let tokens = Lexer::new("x = 1").tokenize().unwrap();
        let program = Parser::new(tokens).parse().unwrap();
        let mut generator = CodeGenerator::new();
        let first = generator.generate(&program);
        let second = generator.generate(&program);
        assert_eq!(first, second);
    }

    #[test]
    fn test_edge_comparison_under_logical_on_one_side_only() {
        let output = generate("x = flag and a > b");
        assert!(output.contains("flag && (a > b)"));
    }
}
