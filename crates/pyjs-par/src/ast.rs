//! AST node definitions.
//!
//! Nodes are immutable after construction and form a tree: every block is
//! reachable from exactly one parent. Each node carries the position of the
//! first character of its source text.

use std::fmt;

use pyjs_util::Position;

/// The shallow type lattice shared by literals, declarations and the
/// semantic analyzer. `Any` is compatible with everything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataType {
    Int,
    Float,
    String,
    Boolean,
    List,
    None,
    Any,
}

impl DataType {
    /// True for `Int`, `Float` and `Any`.
    pub fn is_numeric(self) -> bool {
        matches!(self, DataType::Int | DataType::Float | DataType::Any)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Int => "int",
            DataType::Float => "float",
            DataType::String => "str",
            DataType::Boolean => "bool",
            DataType::List => "list",
            DataType::None => "None",
            DataType::Any => "any",
        };
        f.write_str(name)
    }
}

/// Binary operator, spelled the way the source dialect spells it.
///
/// `Is` and `IsNot` are part of the closed operator set for the emitter's
/// sake but are never produced by the parser.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Eq,
    NotEq,
    Gt,
    Lt,
    GtEq,
    LtEq,
    And,
    Or,
    Is,
    IsNot,
}

impl BinOp {
    /// Canonical source-dialect spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Pow => "**",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::Gt => ">",
            BinOp::Lt => "<",
            BinOp::GtEq => ">=",
            BinOp::LtEq => "<=",
            BinOp::And => "and",
            BinOp::Or => "or",
            BinOp::Is => "is",
            BinOp::IsNot => "is not",
        }
    }

    /// Spelling in the target dialect.
    pub fn js_symbol(self) -> &'static str {
        match self {
            BinOp::And => "&&",
            BinOp::Or => "||",
            BinOp::Is => "===",
            BinOp::IsNot => "!==",
            other => other.as_str(),
        }
    }

    /// The shared precedence table driving both the expression ladder and
    /// the emitter's parenthesization. Higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinOp::Or => 0,
            BinOp::And => 1,
            BinOp::Eq
            | BinOp::NotEq
            | BinOp::Gt
            | BinOp::Lt
            | BinOp::GtEq
            | BinOp::LtEq
            | BinOp::Is
            | BinOp::IsNot => 2,
            BinOp::Add | BinOp::Sub => 3,
            BinOp::Mul | BinOp::Div | BinOp::Mod => 4,
            BinOp::Pow => 5,
        }
    }

    /// True for `and` / `or`.
    pub fn is_logical(self) -> bool {
        matches!(self, BinOp::And | BinOp::Or)
    }

    /// True for the six comparison operators.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinOp::Eq | BinOp::NotEq | BinOp::Gt | BinOp::Lt | BinOp::GtEq | BinOp::LtEq
        )
    }

    /// True for `+ - * / % **`.
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod | BinOp::Pow
        )
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unary operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
}

impl UnaryOp {
    /// Canonical source-dialect spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::Not => "not",
        }
    }

    /// Spelling in the target dialect.
    pub fn js_symbol(self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::Not => "!",
        }
    }
}

/// AST root: the ordered top-level statements of a translation unit.
#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

/// Statement.
#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    FunctionDecl(FunctionDecl),
    VariableDecl(VariableDecl),
    Assign(Assign),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Return(ReturnStmt),
    Break(Position),
    Continue(Position),
    Import(Import),
    Expression(ExprStmt),
}

/// Function declaration. The return type marker defaults to `Any`; the
/// source dialect has no return annotations.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub parameters: Vec<Ident>,
    pub body: Block,
    pub return_type: DataType,
    pub position: Position,
}

/// Variable declaration with a declared type marker and an optional
/// initializer. Not produced by the parser of the current subset, but part
/// of the AST surface consumed by the analyzer and the emitter.
#[derive(Clone, Debug, PartialEq)]
pub struct VariableDecl {
    pub name: String,
    pub declared_type: DataType,
    pub init: Option<Expr>,
    pub position: Position,
}

/// Assignment to an identifier. Compound assignments are expanded by the
/// parser, so `value` already contains the desugared right-hand side.
#[derive(Clone, Debug, PartialEq)]
pub struct Assign {
    pub target: Ident,
    pub value: Expr,
    pub position: Position,
}

/// `if` statement. An `elif` chain appears as a nested `IfStmt` in the
/// else-branch; the nesting is explicit and never flattened.
#[derive(Clone, Debug, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Block,
    pub else_branch: Option<ElseBranch>,
    pub position: Position,
}

/// The else-branch of an `if`: a plain block for `else:`, a nested `if`
/// for `elif ...:`.
#[derive(Clone, Debug, PartialEq)]
pub enum ElseBranch {
    Block(Block),
    If(Box<IfStmt>),
}

/// `while` loop.
#[derive(Clone, Debug, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Block,
    pub position: Position,
}

/// `for ... in ...` loop.
#[derive(Clone, Debug, PartialEq)]
pub struct ForStmt {
    pub variable: Ident,
    pub iterable: Expr,
    pub body: Block,
    pub position: Position,
}

/// `return`, with or without a value.
#[derive(Clone, Debug, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub position: Position,
}

/// `import m`, recorded by name only.
#[derive(Clone, Debug, PartialEq)]
pub struct Import {
    pub module: String,
    pub position: Position,
}

/// An expression used for its side effects.
#[derive(Clone, Debug, PartialEq)]
pub struct ExprStmt {
    pub expression: Expr,
    pub position: Position,
}

/// An ordered statement sequence. Blocks do not open scopes of their own;
/// scoping is per-function.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub position: Position,
}

/// Expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Binary(Box<BinaryExpr>),
    Unary(Box<UnaryExpr>),
    Identifier(Ident),
    Literal(Literal),
    Call(CallExpr),
}

impl Expr {
    /// Position of the first character of the expression.
    pub fn position(&self) -> Position {
        match self {
            Expr::Binary(node) => node.position,
            Expr::Unary(node) => node.position,
            Expr::Identifier(node) => node.position,
            Expr::Literal(node) => node.position,
            Expr::Call(node) => node.position,
        }
    }
}

/// Binary operation.
#[derive(Clone, Debug, PartialEq)]
pub struct BinaryExpr {
    pub left: Expr,
    pub op: BinOp,
    pub right: Expr,
    pub position: Position,
}

/// Unary operation.
#[derive(Clone, Debug, PartialEq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Expr,
    pub position: Position,
}

/// Identifier reference.
#[derive(Clone, Debug, PartialEq)]
pub struct Ident {
    pub name: String,
    pub position: Position,
}

/// Literal with its reduced value and literal-type tag.
#[derive(Clone, Debug, PartialEq)]
pub struct Literal {
    pub value: LiteralValue,
    pub ty: DataType,
    pub position: Position,
}

/// A literal value. List literals contain only values already reduced to
/// literal form; computed elements are rejected by the parser.
#[derive(Clone, Debug, PartialEq)]
pub enum LiteralValue {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    List(Vec<LiteralValue>),
    None,
}

/// Call of a named function.
#[derive(Clone, Debug, PartialEq)]
pub struct CallExpr {
    pub callee: Ident,
    pub arguments: Vec<Expr>,
    pub position: Position,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_ordering() {
        assert!(BinOp::Pow.precedence() > BinOp::Mul.precedence());
        assert!(BinOp::Mul.precedence() > BinOp::Add.precedence());
        assert!(BinOp::Add.precedence() > BinOp::Lt.precedence());
        assert!(BinOp::Lt.precedence() > BinOp::And.precedence());
        assert!(BinOp::And.precedence() > BinOp::Or.precedence());
    }

    #[test]
    fn test_js_symbols() {
        assert_eq!(BinOp::And.js_symbol(), "&&");
        assert_eq!(BinOp::Or.js_symbol(), "||");
        assert_eq!(BinOp::Is.js_symbol(), "===");
        assert_eq!(BinOp::IsNot.js_symbol(), "!==");
        assert_eq!(BinOp::Pow.js_symbol(), "**");
        assert_eq!(UnaryOp::Not.js_symbol(), "!");
    }

    #[test]
    fn test_canonical_spellings() {
        assert_eq!(BinOp::And.as_str(), "and");
        assert_eq!(BinOp::IsNot.as_str(), "is not");
        assert_eq!(BinOp::GtEq.as_str(), ">=");
        assert_eq!(UnaryOp::Not.as_str(), "not");
    }

    #[test]
    fn test_operator_classes() {
        assert!(BinOp::Eq.is_comparison());
        assert!(!BinOp::And.is_comparison());
        assert!(BinOp::And.is_logical());
        assert!(BinOp::Pow.is_arithmetic());
        assert!(!BinOp::Lt.is_arithmetic());
    }

    #[test]
    fn test_data_type_display() {
        assert_eq!(DataType::Int.to_string(), "int");
        assert_eq!(DataType::Boolean.to_string(), "bool");
        assert_eq!(DataType::None.to_string(), "None");
    }
}
