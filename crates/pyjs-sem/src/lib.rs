//! pyjs-sem - Semantic analyzer.
//!
//! Walks the AST over a lexically scoped symbol table, checking
//! declared-before-use, single declaration per scope for functions and
//! parameters, and type compatibility over the shallow lattice in
//! [`types`]. Scoping is per-function: function bodies and `for` loops open
//! scopes, plain blocks do not, so a name bound anywhere in a function body
//! is the same variable throughout it.
//!
//! Diagnostics are collected rather than aborting at the first problem; the
//! analysis succeeds iff the collected list is empty.
//!
//! ```
//! use pyjs_lex::Lexer;
//! use pyjs_par::Parser;
//! use pyjs_sem::SemanticAnalyzer;
//!
//! let tokens = Lexer::new("x = y + 5").tokenize().unwrap();
//! let program = Parser::new(tokens).parse().unwrap();
//! let errors = SemanticAnalyzer::new().analyze(&program).unwrap_err();
//! assert_eq!(errors.len(), 1); // y is undefined
//! ```

pub mod scope;
pub mod types;

mod edge_cases;

use pyjs_par::ast::*;
use pyjs_util::Position;
use thiserror::Error;

pub use scope::{Symbol, SymbolKind, SymbolTable};

/// A semantic diagnostic. Collected, not fatal-on-first.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SemanticError {
    /// A name used before any binding on the scope chain.
    #[error("undefined variable '{name}'")]
    UndefinedVariable {
        /// The unresolved name.
        name: String,
        /// Position of the use.
        position: Position,
    },

    /// A second declaration of a name in the same scope.
    #[error("redeclaration of '{name}'")]
    Redeclaration {
        /// The doubly declared name.
        name: String,
        /// Position of the second declaration.
        position: Position,
    },

    /// Incompatible types at an operator, condition, assignment or return.
    #[error("type mismatch: expected {expected}, got {found}")]
    TypeMismatch {
        /// The type required by context.
        expected: DataType,
        /// The type actually found.
        found: DataType,
        /// Position of the offending construct.
        position: Position,
    },

    /// A unary operator applied to a type it does not support.
    #[error("invalid operation '{op}' for type '{operand_type}'")]
    InvalidOperation {
        /// The operator's source spelling.
        op: &'static str,
        /// The operand type.
        operand_type: DataType,
        /// Position of the operation.
        position: Position,
    },
}

impl SemanticError {
    /// Position of the diagnostic.
    pub fn position(&self) -> Position {
        match self {
            SemanticError::UndefinedVariable { position, .. }
            | SemanticError::Redeclaration { position, .. }
            | SemanticError::TypeMismatch { position, .. }
            | SemanticError::InvalidOperation { position, .. } => *position,
        }
    }

    /// Short kind label for the structured driver error.
    pub fn kind(&self) -> &'static str {
        match self {
            SemanticError::UndefinedVariable { .. } => "undefined variable",
            SemanticError::Redeclaration { .. } => "redeclaration",
            SemanticError::TypeMismatch { .. } => "type mismatch",
            SemanticError::InvalidOperation { .. } => "invalid operation",
        }
    }
}

/// The semantic analyzer. One per translation run.
pub struct SemanticAnalyzer {
    table: SymbolTable,
    errors: Vec<SemanticError>,
    current_return_type: Option<DataType>,
}

impl SemanticAnalyzer {
    /// Creates an analyzer whose module scope is pre-populated with the
    /// builtins every translation unit can see: `print`, `range`, `str`
    /// and the module variable `__name__`.
    pub fn new() -> Self {
        let mut table = SymbolTable::new();
        let builtins = [
            ("print", SymbolKind::Function, DataType::None),
            ("range", SymbolKind::Function, DataType::List),
            ("str", SymbolKind::Function, DataType::String),
            ("__name__", SymbolKind::Variable, DataType::String),
        ];
        for (name, kind, data_type) in builtins {
            table.declare(Symbol {
                name: name.to_string(),
                kind,
                data_type,
                position: Position::START,
            });
        }
        Self {
            table,
            errors: Vec::new(),
            current_return_type: None,
        }
    }

    /// Analyzes a whole program. Returns every collected diagnostic if any
    /// were produced.
    pub fn analyze(mut self, program: &Program) -> Result<(), Vec<SemanticError>> {
        for statement in &program.statements {
            self.visit_stmt(statement);
        }
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    // =========================================================================
    // STATEMENTS
    // =========================================================================

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::FunctionDecl(func) => self.visit_function_decl(func),
            Stmt::VariableDecl(decl) => self.visit_variable_decl(decl),
            Stmt::Assign(assign) => self.visit_assign(assign),
            Stmt::If(node) => self.visit_if(node),
            Stmt::While(node) => self.visit_while(node),
            Stmt::For(node) => self.visit_for(node),
            Stmt::Return(node) => self.visit_return(node),
            Stmt::Expression(node) => {
                self.visit_expr(&node.expression);
            }
            Stmt::Break(_) | Stmt::Continue(_) | Stmt::Import(_) => {}
        }
    }

    /// Blocks share the enclosing function (or module) scope.
    fn visit_block(&mut self, block: &Block) {
        for statement in &block.statements {
            self.visit_stmt(statement);
        }
    }

    fn visit_function_decl(&mut self, func: &FunctionDecl) {
        let declared = self.table.declare(Symbol {
            name: func.name.clone(),
            kind: SymbolKind::Function,
            data_type: func.return_type,
            position: func.position,
        });
        if !declared {
            self.errors.push(SemanticError::Redeclaration {
                name: func.name.clone(),
                position: func.position,
            });
            return;
        }

        self.table.enter_scope();
        let saved_return_type = self.current_return_type.replace(func.return_type);

        for param in &func.parameters {
            let ok = self.table.declare(Symbol {
                name: param.name.clone(),
                kind: SymbolKind::Parameter,
                data_type: DataType::Any,
                position: param.position,
            });
            if !ok {
                self.errors.push(SemanticError::Redeclaration {
                    name: param.name.clone(),
                    position: param.position,
                });
            }
        }

        self.visit_block(&func.body);

        self.table.exit_scope();
        self.current_return_type = saved_return_type;
    }

    fn visit_variable_decl(&mut self, decl: &VariableDecl) {
        let declared = self.table.declare(Symbol {
            name: decl.name.clone(),
            kind: SymbolKind::Variable,
            data_type: decl.declared_type,
            position: decl.position,
        });
        if !declared {
            self.errors.push(SemanticError::Redeclaration {
                name: decl.name.clone(),
                position: decl.position,
            });
        }
        if let Some(init) = &decl.init {
            let value_type = self.visit_expr(init);
            if decl.declared_type != DataType::Any
                && !types::are_compatible(decl.declared_type, value_type)
            {
                self.errors.push(SemanticError::TypeMismatch {
                    expected: decl.declared_type,
                    found: value_type,
                    position: decl.position,
                });
            }
        }
    }

    /// Assignment binds on first use and re-binds afterwards; only an
    /// existing binding with a concrete declared type is checked against
    /// the value.
    fn visit_assign(&mut self, assign: &Assign) {
        let value_type = self.visit_expr(&assign.value);

        let existing = self.table.lookup(&assign.target.name).map(|s| s.data_type);
        match existing {
            Some(declared) => {
                if !types::are_compatible(declared, value_type) {
                    self.errors.push(SemanticError::TypeMismatch {
                        expected: declared,
                        found: value_type,
                        position: assign.position,
                    });
                }
            }
            None => {
                self.table.declare(Symbol {
                    name: assign.target.name.clone(),
                    kind: SymbolKind::Variable,
                    data_type: DataType::Any,
                    position: assign.target.position,
                });
            }
        }
    }

    fn visit_if(&mut self, node: &IfStmt) {
        self.check_condition(&node.condition);
        self.visit_block(&node.then_branch);
        match &node.else_branch {
            Some(ElseBranch::Block(block)) => self.visit_block(block),
            Some(ElseBranch::If(nested)) => self.visit_if(nested),
            None => {}
        }
    }

    fn visit_while(&mut self, node: &WhileStmt) {
        self.check_condition(&node.condition);
        self.visit_block(&node.body);
    }

    /// A `for` loop opens a scope holding the loop variable.
    fn visit_for(&mut self, node: &ForStmt) {
        self.table.enter_scope();
        self.table.declare(Symbol {
            name: node.variable.name.clone(),
            kind: SymbolKind::Variable,
            data_type: DataType::Any,
            position: node.variable.position,
        });
        self.visit_expr(&node.iterable);
        self.visit_block(&node.body);
        self.table.exit_scope();
    }

    fn visit_return(&mut self, node: &ReturnStmt) {
        match &node.value {
            Some(value) => {
                let value_type = self.visit_expr(value);
                if let Some(declared) = self.current_return_type {
                    if !types::are_compatible(declared, value_type) {
                        self.errors.push(SemanticError::TypeMismatch {
                            expected: declared,
                            found: value_type,
                            position: node.position,
                        });
                    }
                }
            }
            None => {
                if let Some(declared) = self.current_return_type {
                    if !matches!(declared, DataType::None | DataType::Any) {
                        self.errors.push(SemanticError::TypeMismatch {
                            expected: declared,
                            found: DataType::None,
                            position: node.position,
                        });
                    }
                }
            }
        }
    }

    /// `if`/`while` conditions must be boolean (or `Any`).
    fn check_condition(&mut self, condition: &Expr) {
        let condition_type = self.visit_expr(condition);
        if !matches!(condition_type, DataType::Boolean | DataType::Any) {
            self.errors.push(SemanticError::TypeMismatch {
                expected: DataType::Boolean,
                found: condition_type,
                position: condition.position(),
            });
        }
    }

    // =========================================================================
    // EXPRESSIONS
    // =========================================================================

    /// Checks an expression and infers its type.
    fn visit_expr(&mut self, expr: &Expr) -> DataType {
        match expr {
            Expr::Literal(literal) => literal.ty,
            Expr::Identifier(ident) => match self.table.lookup(&ident.name) {
                Some(symbol) => symbol.data_type,
                None => {
                    self.errors.push(SemanticError::UndefinedVariable {
                        name: ident.name.clone(),
                        position: ident.position,
                    });
                    DataType::Any
                }
            },
            Expr::Binary(node) => {
                let left = self.visit_expr(&node.left);
                let right = self.visit_expr(&node.right);
                if !types::operands_compatible(node.op, left, right) {
                    self.errors.push(SemanticError::TypeMismatch {
                        expected: left,
                        found: right,
                        position: node.position,
                    });
                }
                types::binary_result(node.op, left, right)
            }
            Expr::Unary(node) => {
                let operand = self.visit_expr(&node.operand);
                match node.op {
                    UnaryOp::Not => {
                        if !matches!(operand, DataType::Boolean | DataType::Any) {
                            self.errors.push(SemanticError::InvalidOperation {
                                op: "not",
                                operand_type: operand,
                                position: node.position,
                            });
                        }
                        DataType::Boolean
                    }
                    UnaryOp::Plus | UnaryOp::Minus => {
                        if !operand.is_numeric() {
                            self.errors.push(SemanticError::InvalidOperation {
                                op: node.op.as_str(),
                                operand_type: operand,
                                position: node.position,
                            });
                        }
                        operand
                    }
                }
            }
            Expr::Call(call) => {
                let return_type = match self.table.lookup(&call.callee.name) {
                    Some(symbol) if symbol.kind == SymbolKind::Function => symbol.data_type,
                    _ => {
                        self.errors.push(SemanticError::UndefinedVariable {
                            name: call.callee.name.clone(),
                            position: call.position,
                        });
                        DataType::Any
                    }
                };
                for argument in &call.arguments {
                    self.visit_expr(argument);
                }
                return_type
            }
        }
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
