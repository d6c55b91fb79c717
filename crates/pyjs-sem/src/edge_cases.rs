//! Edge case tests for pyjs-sem

#[cfg(test)]
mod tests {
    use crate::{SemanticAnalyzer, SemanticError};
    use pyjs_lex::Lexer;
    use pyjs_par::ast::*;
    use pyjs_par::Parser;
    use pyjs_util::Position;

    fn analyze(source: &str) -> Result<(), Vec<SemanticError>> {
        let tokens = Lexer::new(source).tokenize().expect("lexing should succeed");
        let program = Parser::new(tokens).parse().expect("parsing should succeed");
        SemanticAnalyzer::new().analyze(&program)
    }

    // ==================== EDGE CASES ====================

    #[test]
    fn test_edge_empty_program_analyzes() {
        assert!(analyze("").is_ok());
    }

    #[test]
    fn test_edge_shadowing_a_builtin_function_fails_redeclaration() {
        // `range` already lives in the module scope.
        let source = "def range(): return 1";
        let errors = analyze(source).unwrap_err();
        assert!(matches!(
            &errors[0],
            SemanticError::Redeclaration { name, .. } if name == "range"
        ));
    }

    #[test]
    fn test_edge_function_parameter_may_shadow_module_variable() {
        assert!(analyze("x = 5\ndef f(x): return x").is_ok());
    }

    #[test]
    fn test_edge_nested_loops_each_scope_their_variable() {
        assert!(analyze(
            "for i in range(3):\n    for j in range(3):\n        print(i + j)"
        )
        .is_ok());
    }

    #[test]
    fn test_edge_loop_variable_may_reuse_outer_name() {
        assert!(analyze("i = 10\nfor i in range(3):\n    print(i)\nprint(i)").is_ok());
    }

    #[test]
    fn test_edge_assignment_in_branch_binds_function_wide() {
        // Per-function scoping: the branch assignment and the later use
        // refer to the same variable.
        assert!(analyze(
            "def f(a):\n    if a > 0:\n        result = 1\n    else:\n        result = 2\n    return result"
        )
        .is_ok());
    }

    #[test]
    fn test_edge_use_before_any_assignment_in_function() {
        let errors = analyze("def f():\n    return x").unwrap_err();
        assert!(matches!(
            &errors[0],
            SemanticError::UndefinedVariable { name, .. } if name == "x"
        ));
    }

    #[test]
    fn test_edge_call_before_declaration_is_an_error() {
        // Declarations are processed in order; forward calls at the top
        // level are not resolved.
        let errors = analyze("main()\ndef main(): return 1").unwrap_err();
        assert!(matches!(
            &errors[0],
            SemanticError::UndefinedVariable { name, .. } if name == "main"
        ));
    }

    #[test]
    fn test_edge_variable_declaration_node_type_checked() {
        // The VariableDecl node is not produced by the parser; feed the
        // analyzer a handwritten AST.
        let program = Program {
            statements: vec![Stmt::VariableDecl(VariableDecl {
                name: "x".to_string(),
                declared_type: DataType::Int,
                init: Some(Expr::Literal(Literal {
                    value: LiteralValue::Str("nope".to_string()),
                    ty: DataType::String,
                    position: Position::new(1, 9),
                })),
                position: Position::START,
            })],
        };
        let errors = SemanticAnalyzer::new().analyze(&program).unwrap_err();
        assert!(matches!(
            &errors[0],
            SemanticError::TypeMismatch {
                expected: DataType::Int,
                found: DataType::String,
                ..
            }
        ));
    }

    #[test]
    fn test_edge_variable_declaration_then_incompatible_assign() {
        let program = Program {
            statements: vec![
                Stmt::VariableDecl(VariableDecl {
                    name: "x".to_string(),
                    declared_type: DataType::Int,
                    init: None,
                    position: Position::START,
                }),
                Stmt::Assign(Assign {
                    target: Ident {
                        name: "x".to_string(),
                        position: Position::new(2, 1),
                    },
                    value: Expr::Literal(Literal {
                        value: LiteralValue::Str("s".to_string()),
                        ty: DataType::String,
                        position: Position::new(2, 5),
                    }),
                    position: Position::new(2, 1),
                }),
            ],
        };
        let errors = SemanticAnalyzer::new().analyze(&program).unwrap_err();
        assert!(matches!(
            &errors[0],
            SemanticError::TypeMismatch {
                expected: DataType::Int,
                found: DataType::String,
                ..
            }
        ));
    }

    #[test]
    fn test_edge_is_operator_requires_compatible_operands() {
        // `is` / `is not` never come out of the parser; check the rule
        // directly on a handwritten node.
        let program = Program {
            statements: vec![Stmt::Expression(ExprStmt {
                expression: Expr::Binary(Box::new(BinaryExpr {
                    left: Expr::Literal(Literal {
                        value: LiteralValue::None,
                        ty: DataType::None,
                        position: Position::START,
                    }),
                    op: BinOp::Is,
                    right: Expr::Literal(Literal {
                        value: LiteralValue::Int(3),
                        ty: DataType::Int,
                        position: Position::new(1, 9),
                    }),
                    position: Position::new(1, 6),
                })),
                position: Position::START,
            })],
        };
        let errors = SemanticAnalyzer::new().analyze(&program).unwrap_err();
        assert!(matches!(&errors[0], SemanticError::TypeMismatch { .. }));
    }

    #[test]
    fn test_edge_return_at_top_level_is_unchecked() {
        assert!(analyze("return 5").is_ok());
    }

    #[test]
    fn test_edge_deep_recursion_in_expression_tree() {
        let source = format!("x = {}", vec!["1"; 300].join(" + "));
        assert!(analyze(&source).is_ok());
    }

    #[test]
    fn test_edge_error_order_is_deterministic() {
        let first = analyze("x = a + b").unwrap_err();
        let second = analyze("x = a + b").unwrap_err();
        assert_eq!(first, second);
    }
}
