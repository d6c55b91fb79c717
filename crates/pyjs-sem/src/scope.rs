//! Scope tree for name resolution.
//!
//! Scopes live in an arena indexed by [`ScopeId`]; each scope holds its
//! bindings in declaration order and a link to its parent. The bottom scope
//! is the module scope. Per the source dialect's scoping model, scopes are
//! opened for function bodies and `for` loops only, never for plain blocks.

use indexmap::IndexMap;
use pyjs_par::ast::DataType;
use pyjs_util::Position;

/// What a name is bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Function,
    Parameter,
}

/// A symbol table entry. For functions, `data_type` is the return type.
#[derive(Clone, Debug, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub data_type: DataType,
    pub position: Position,
}

/// Index of a scope in the table's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScopeId(usize);

/// A single scope: bindings plus a parent link.
#[derive(Debug)]
struct Scope {
    symbols: IndexMap<String, Symbol>,
    parent: Option<ScopeId>,
}

/// The symbol table: an arena of scopes and the currently open one.
pub struct SymbolTable {
    scopes: Vec<Scope>,
    current: ScopeId,
}

impl SymbolTable {
    /// Creates a table containing only an empty module scope.
    pub fn new() -> Self {
        let root = Scope {
            symbols: IndexMap::new(),
            parent: None,
        };
        Self {
            scopes: vec![root],
            current: ScopeId(0),
        }
    }

    /// Opens a child of the current scope and makes it current.
    pub fn enter_scope(&mut self) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            symbols: IndexMap::new(),
            parent: Some(self.current),
        });
        self.current = id;
        id
    }

    /// Closes the current scope, returning to its parent. The module scope
    /// is never closed.
    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.scopes[self.current.0].parent {
            self.current = parent;
        }
    }

    /// Declares a symbol in the current scope. Returns false if the name
    /// already exists locally; the existing binding is left untouched.
    pub fn declare(&mut self, symbol: Symbol) -> bool {
        let scope = &mut self.scopes[self.current.0];
        if scope.symbols.contains_key(&symbol.name) {
            return false;
        }
        scope.symbols.insert(symbol.name.clone(), symbol);
        true
    }

    /// Resolves a name in the current scope, then its ancestors.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        let mut id = self.current;
        loop {
            let scope = &self.scopes[id.0];
            if let Some(symbol) = scope.symbols.get(name) {
                return Some(symbol);
            }
            id = scope.parent?;
        }
    }

    /// Resolves a name in the current scope only.
    pub fn lookup_local(&self, name: &str) -> Option<&Symbol> {
        self.scopes[self.current.0].symbols.get(name)
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
