//! Runtime shims emitted into the target program.
//!
//! Shims are textual contracts, not host dependencies: each is a plain
//! JavaScript function prepended to the output only when the
//! corresponding name is referenced, as a call target or a bare identifier.
//! Each shim is emitted at most once per translation unit.

use pyjs_par::ast::*;

/// Which helpers the emitted program needs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RuntimeNeeds {
    /// The `range(...)` helper.
    pub range: bool,
    /// The `str(...)` coercion helper.
    pub str_coerce: bool,
}

/// Emulates `range(stop)`, `range(start, stop)` and
/// `range(start, stop, step)` as an eagerly built array, stop exclusive.
/// A zero step throws at runtime.
pub const RANGE_SHIM: &str = r#"function range() {
    const args = Array.from(arguments);
    let start = 0, stop = 0, step = 1;
    if (args.length === 1) {
        stop = args[0];
    } else if (args.length === 2) {
        start = args[0]; stop = args[1];
    } else if (args.length >= 3) {
        start = args[0]; stop = args[1]; step = args[2];
    }
    if (step === 0) { throw new Error("range() step argument must not be zero"); }
    const out = [];
    if (step > 0) {
        for (let i = start; i < stop; i += step) out.push(i);
    } else {
        for (let i = start; i > stop; i += step) out.push(i);
    }
    return out;
}"#;

/// String coercion.
pub const STR_SHIM: &str = r#"function str(value) {
    return String(value);
}"#;

/// Walks the whole AST and records which shims it references.
pub fn scan(program: &Program) -> RuntimeNeeds {
    let mut needs = RuntimeNeeds::default();
    for statement in &program.statements {
        scan_stmt(statement, &mut needs);
    }
    needs
}

fn scan_stmt(stmt: &Stmt, needs: &mut RuntimeNeeds) {
    match stmt {
        Stmt::FunctionDecl(func) => scan_block(&func.body, needs),
        Stmt::VariableDecl(decl) => {
            if let Some(init) = &decl.init {
                scan_expr(init, needs);
            }
        }
        Stmt::Assign(assign) => scan_expr(&assign.value, needs),
        Stmt::If(node) => scan_if(node, needs),
        Stmt::While(node) => {
            scan_expr(&node.condition, needs);
            scan_block(&node.body, needs);
        }
        Stmt::For(node) => {
            scan_expr(&node.iterable, needs);
            scan_block(&node.body, needs);
        }
        Stmt::Return(node) => {
            if let Some(value) = &node.value {
                scan_expr(value, needs);
            }
        }
        Stmt::Expression(node) => scan_expr(&node.expression, needs),
        Stmt::Break(_) | Stmt::Continue(_) | Stmt::Import(_) => {}
    }
}

fn scan_if(node: &IfStmt, needs: &mut RuntimeNeeds) {
    scan_expr(&node.condition, needs);
    scan_block(&node.then_branch, needs);
    match &node.else_branch {
        Some(ElseBranch::Block(block)) => scan_block(block, needs),
        Some(ElseBranch::If(nested)) => scan_if(nested, needs),
        None => {}
    }
}

fn scan_block(block: &Block, needs: &mut RuntimeNeeds) {
    for statement in &block.statements {
        scan_stmt(statement, needs);
    }
}

fn scan_expr(expr: &Expr, needs: &mut RuntimeNeeds) {
    match expr {
        Expr::Call(call) => {
            mark(&call.callee.name, needs);
            for argument in &call.arguments {
                scan_expr(argument, needs);
            }
        }
        Expr::Identifier(ident) => mark(&ident.name, needs),
        Expr::Binary(node) => {
            scan_expr(&node.left, needs);
            scan_expr(&node.right, needs);
        }
        Expr::Unary(node) => scan_expr(&node.operand, needs),
        Expr::Literal(_) => {}
    }
}

fn mark(name: &str, needs: &mut RuntimeNeeds) {
    match name {
        "range" => needs.range = true,
        "str" => needs.str_coerce = true,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyjs_lex::Lexer;
    use pyjs_par::Parser;

    fn scan_source(source: &str) -> RuntimeNeeds {
        let tokens = Lexer::new(source).tokenize().expect("lexing should succeed");
        let program = Parser::new(tokens).parse().expect("parsing should succeed");
        scan(&program)
    }

    #[test]
    fn test_no_needs_for_plain_program() {
        assert_eq!(scan_source("x = 5"), RuntimeNeeds::default());
    }

    #[test]
    fn test_range_in_for_iterable() {
        let needs = scan_source("for i in range(10):\n    print(i)");
        assert!(needs.range);
        assert!(!needs.str_coerce);
    }

    #[test]
    fn test_str_in_expression() {
        let needs = scan_source("x = str(5) + \"!\"");
        assert!(needs.str_coerce);
        assert!(!needs.range);
    }

    #[test]
    fn test_reference_deep_inside_function_body() {
        let needs = scan_source("def f(n):\n    while n > 0:\n        if n % 2 == 0:\n            return range(n)\n        n = n - 1");
        assert!(needs.range);
    }

    #[test]
    fn test_bare_identifier_counts_as_reference() {
        let needs = scan_source("def f(g):\n    return g\nf(range)");
        assert!(needs.range);
    }

    #[test]
    fn test_range_in_call_argument() {
        let needs = scan_source("print(range(3))");
        assert!(needs.range);
    }
}
