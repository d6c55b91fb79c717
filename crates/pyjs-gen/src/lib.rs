//! pyjs-gen - Target-code emitter.
//!
//! Walks the AST and produces JavaScript text. Statements are written to
//! the output buffer; expression visitors return owned strings, so no
//! buffer-redirect tricks are needed anywhere. Emission is total over the
//! closed AST: every node kind has a translation, so `generate` cannot
//! fail.
//!
//! The output starts with `"use strict";`, then any runtime shims the
//! program references (see [`shims`]), then the translated statements. A
//! module-level `if __name__ == "__main__":` is suppressed and replaced by
//! a trailing `main();` call, provided a module-level `main` function
//! exists.
//!
//! Parenthesization is driven by the single shared precedence table on
//! [`BinOp`]: a left operand is parenthesized iff its operator binds
//! strictly looser than the current one, a right operand also at equal
//! precedence (for the right-associative `**` the two sides swap roles).
//! Comparison operands directly under `and`/`or` are always parenthesized.

mod edge_cases;
mod fstring;
pub mod shims;

use pyjs_par::ast::*;
use rustc_hash::FxHashSet;

/// The code generator. One per translation run; `generate` resets all
/// state, so an instance may be reused.
pub struct CodeGenerator {
    lines: Vec<String>,
    indent_level: usize,
    declared: FxHashSet<String>,
    call_main: bool,
}

impl CodeGenerator {
    /// Creates a fresh generator.
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            indent_level: 0,
            declared: FxHashSet::default(),
            call_main: false,
        }
    }

    /// Emits the whole program as JavaScript text.
    pub fn generate(&mut self, program: &Program) -> String {
        self.lines.clear();
        self.indent_level = 0;
        self.declared.clear();
        self.call_main = false;

        self.push_line("\"use strict\";");
        self.push_blank();

        let needs = shims::scan(program);
        if needs.range {
            self.push_raw(shims::RANGE_SHIM);
            self.push_blank();
        }
        if needs.str_coerce {
            self.push_raw(shims::STR_SHIM);
            self.push_blank();
        }

        for statement in &program.statements {
            self.emit_stmt(statement);
        }

        if self.call_main && has_main_function(program) {
            self.push_blank();
            self.push_line("main();");
        }

        let mut output = self.lines.join("\n");
        output.push('\n');
        output
    }

    // =========================================================================
    // OUTPUT BUFFER
    // =========================================================================

    fn push_line(&mut self, line: impl AsRef<str>) {
        let line = line.as_ref();
        if line.is_empty() {
            self.lines.push(String::new());
            return;
        }
        let indent = "    ".repeat(self.indent_level);
        self.lines.push(format!("{indent}{line}"));
    }

    fn push_blank(&mut self) {
        self.lines.push(String::new());
    }

    /// Pushes a multi-line snippet such as a shim, line by line.
    fn push_raw(&mut self, text: &str) {
        for line in text.lines() {
            self.lines.push(line.to_string());
        }
    }

    // =========================================================================
    // STATEMENTS
    // =========================================================================

    fn emit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::FunctionDecl(func) => self.emit_function(func),
            Stmt::VariableDecl(decl) => self.emit_variable_decl(decl),
            Stmt::Assign(assign) => self.emit_assign(assign),
            Stmt::If(node) => self.emit_if(node),
            Stmt::While(node) => self.emit_while(node),
            Stmt::For(node) => self.emit_for(node),
            Stmt::Return(node) => self.emit_return(node),
            Stmt::Break(_) => self.push_line("break;"),
            Stmt::Continue(_) => self.push_line("continue;"),
            Stmt::Import(import) => {
                // Imports have no runtime counterpart; keep the intent.
                let line = format!("// import {}", import.module);
                self.push_line(line);
            }
            Stmt::Expression(node) => {
                let code = self.emit_expr(&node.expression);
                self.push_line(format!("{code};"));
            }
        }
    }

    fn emit_block(&mut self, block: &Block) {
        for statement in &block.statements {
            self.emit_stmt(statement);
        }
    }

    fn emit_function(&mut self, func: &FunctionDecl) {
        let params: Vec<&str> = func.parameters.iter().map(|p| p.name.as_str()).collect();
        self.push_line(format!("function {}({}) {{", func.name, params.join(", ")));
        self.indent_level += 1;
        for param in &func.parameters {
            self.declared.insert(param.name.clone());
        }
        self.emit_block(&func.body);
        self.indent_level -= 1;
        self.push_line("}");
        self.push_blank();
    }

    fn emit_variable_decl(&mut self, decl: &VariableDecl) {
        match &decl.init {
            Some(init) => {
                let value = self.emit_expr(init);
                self.push_line(format!("let {} = {};", decl.name, value));
            }
            None => self.push_line(format!("let {};", decl.name)),
        }
        self.declared.insert(decl.name.clone());
    }

    /// First binding in the output stream gets `let`; later writes are
    /// plain assignments.
    fn emit_assign(&mut self, assign: &Assign) {
        let value = self.emit_expr(&assign.value);
        if self.declared.insert(assign.target.name.clone()) {
            self.push_line(format!("let {} = {};", assign.target.name, value));
        } else {
            self.push_line(format!("{} = {};", assign.target.name, value));
        }
    }

    fn emit_if(&mut self, node: &IfStmt) {
        // A module-level `if __name__ == "__main__":` is suppressed; the
        // trailing `main();` call replaces it.
        if self.indent_level == 0 && is_main_guard(&node.condition) {
            self.call_main = true;
            return;
        }

        let condition = self.emit_expr(&node.condition);
        self.push_line(format!("if ({condition}) {{"));
        self.indent_level += 1;
        self.emit_block(&node.then_branch);
        self.indent_level -= 1;

        let mut else_branch = node.else_branch.as_ref();
        loop {
            match else_branch {
                None => {
                    self.push_line("}");
                    break;
                }
                Some(ElseBranch::Block(block)) => {
                    self.push_line("} else {");
                    self.indent_level += 1;
                    self.emit_block(block);
                    self.indent_level -= 1;
                    self.push_line("}");
                    break;
                }
                Some(ElseBranch::If(elif)) => {
                    let condition = self.emit_expr(&elif.condition);
                    self.push_line(format!("}} else if ({condition}) {{"));
                    self.indent_level += 1;
                    self.emit_block(&elif.then_branch);
                    self.indent_level -= 1;
                    else_branch = elif.else_branch.as_ref();
                }
            }
        }
    }

    fn emit_while(&mut self, node: &WhileStmt) {
        let condition = self.emit_expr(&node.condition);
        self.push_line(format!("while ({condition}) {{"));
        self.indent_level += 1;
        self.emit_block(&node.body);
        self.indent_level -= 1;
        self.push_line("}");
    }

    fn emit_for(&mut self, node: &ForStmt) {
        self.declared.insert(node.variable.name.clone());
        let iterable = self.emit_expr(&node.iterable);
        self.push_line(format!("for (let {} of {}) {{", node.variable.name, iterable));
        self.indent_level += 1;
        self.emit_block(&node.body);
        self.indent_level -= 1;
        self.push_line("}");
    }

    fn emit_return(&mut self, node: &ReturnStmt) {
        match &node.value {
            Some(value) => {
                let value = self.emit_expr(value);
                self.push_line(format!("return {value};"));
            }
            None => self.push_line("return;"),
        }
    }

    // =========================================================================
    // EXPRESSIONS
    // =========================================================================

    fn emit_expr(&self, expr: &Expr) -> String {
        match expr {
            Expr::Identifier(ident) => ident.name.clone(),
            Expr::Literal(literal) => emit_literal_value(&literal.value),
            Expr::Unary(node) => self.emit_unary(node),
            Expr::Binary(node) => self.emit_binary(node),
            Expr::Call(call) => self.emit_call(call),
        }
    }

    fn emit_binary(&self, node: &BinaryExpr) -> String {
        let mut left = self.emit_expr(&node.left);
        let mut right = self.emit_expr(&node.right);
        if child_needs_parens(&node.left, node.op, false) {
            left = format!("({left})");
        }
        if child_needs_parens(&node.right, node.op, true) {
            right = format!("({right})");
        }
        format!("{} {} {}", left, node.op.js_symbol(), right)
    }

    fn emit_unary(&self, node: &UnaryExpr) -> String {
        let operand = self.emit_expr(&node.operand);
        match node.operand {
            // A composite operand keeps its grouping under the prefix.
            Expr::Binary(_) | Expr::Unary(_) => {
                format!("{}({})", node.op.js_symbol(), operand)
            }
            _ => format!("{}{}", node.op.js_symbol(), operand),
        }
    }

    fn emit_call(&self, call: &CallExpr) -> String {
        let arguments: Vec<String> = call
            .arguments
            .iter()
            .map(|argument| self.emit_expr(argument))
            .collect();
        let arguments = arguments.join(", ");
        if call.callee.name == "print" {
            return format!("console.log({arguments})");
        }
        format!("{}({})", call.callee.name, arguments)
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether `child`, as an operand of `parent`, must be parenthesized to
/// preserve the AST's grouping under target precedence rules.
fn child_needs_parens(child: &Expr, parent: BinOp, is_right: bool) -> bool {
    let child_node = match child {
        Expr::Binary(node) => node,
        // The target dialect rejects a bare unary operand left of `**`.
        Expr::Unary(_) => return parent == BinOp::Pow && !is_right,
        _ => return false,
    };
    let child_op = child_node.op;

    // Comparison operands inside a logical operator are always
    // parenthesized.
    if parent.is_logical() && child_op.is_comparison() {
        return true;
    }

    if parent == BinOp::Pow {
        // `**` is right-associative: equal precedence re-parenthesizes on
        // the left instead of the right.
        return if is_right {
            child_op.precedence() < parent.precedence()
        } else {
            child_op.precedence() <= parent.precedence()
        };
    }

    if is_right {
        child_op.precedence() <= parent.precedence()
    } else {
        child_op.precedence() < parent.precedence()
    }
}

/// Recognizes the module entry-point guard condition
/// `__name__ == "__main__"`.
fn is_main_guard(condition: &Expr) -> bool {
    let Expr::Binary(node) = condition else {
        return false;
    };
    if node.op != BinOp::Eq {
        return false;
    }
    let Expr::Identifier(left) = &node.left else {
        return false;
    };
    let Expr::Literal(Literal {
        value: LiteralValue::Str(right),
        ..
    }) = &node.right
    else {
        return false;
    };
    left.name == "__name__" && right == "__main__"
}

/// True if the program declares a module-level function named `main`.
fn has_main_function(program: &Program) -> bool {
    program
        .statements
        .iter()
        .any(|s| matches!(s, Stmt::FunctionDecl(func) if func.name == "main"))
}

fn emit_literal_value(value: &LiteralValue) -> String {
    match value {
        LiteralValue::None => "null".to_string(),
        LiteralValue::Bool(true) => "true".to_string(),
        LiteralValue::Bool(false) => "false".to_string(),
        LiteralValue::Int(v) => v.to_string(),
        LiteralValue::Float(v) => format_float(*v),
        LiteralValue::Str(s) => {
            if fstring::is_template(s) {
                fstring::rewrite(s)
            } else {
                format!("\"{}\"", escape_string(s))
            }
        }
        LiteralValue::List(values) => {
            let elements: Vec<String> = values.iter().map(emit_literal_value).collect();
            format!("[{}]", elements.join(", "))
        }
    }
}

/// Floats keep a fractional digit so `5.0` stays visibly a float.
fn format_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        v.to_string()
    }
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}
