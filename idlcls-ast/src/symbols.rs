//! Scoped symbol table shared by the front end and the generator.
//!
//! Scopes form a tree rooted at the unnamed file scope. Each scope owns
//! its symbols by simple name; type declarations open a child scope of
//! their own so nested declarations resolve lexically. Forward
//! declarations register a pending symbol that the full declaration
//! later replaces; a document that still carries pending symbols after
//! parsing is rejected before generation starts.

use std::collections::HashMap;

use idlcls_core::Literal;

use crate::error::SymbolError;

/// Index of a scope in the table arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

impl ScopeId {
    /// Returns the raw arena index.
    #[must_use]
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Index of a symbol in the table arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(u32);

impl SymbolId {
    /// Returns the raw arena index.
    #[must_use]
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// What a symbol names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    /// A module (reopenable).
    Module,
    /// A type declaration (owns a scope).
    Type,
    /// A constant.
    Const,
    /// An enum member.
    Enumerator,
}

#[derive(Debug)]
struct ScopeData {
    name: String,
    parent: Option<ScopeId>,
    children: HashMap<String, ScopeId>,
    symbols: HashMap<String, SymbolId>,
    /// True for scopes opened by a type declaration (as opposed to a
    /// module or the file scope).
    is_type_scope: bool,
}

#[derive(Debug)]
struct SymbolData {
    name: String,
    declared_in: ScopeId,
    kind: SymbolKind,
    /// Owned scope, for module and type symbols.
    scope: Option<ScopeId>,
    /// Constant or enumerator value, once evaluated.
    value: Option<Literal>,
    /// Forward-declared and not yet fully declared.
    pending: bool,
}

/// Arena-backed scope and symbol store for one compilation run.
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<ScopeData>,
    symbols: Vec<SymbolData>,
}

impl SymbolTable {
    /// Creates a table containing only the unnamed file scope.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scopes: vec![ScopeData {
                name: String::new(),
                parent: None,
                children: HashMap::new(),
                symbols: HashMap::new(),
                is_type_scope: false,
            }],
            symbols: Vec::new(),
        }
    }

    /// The unnamed file scope.
    #[must_use]
    pub fn top_scope(&self) -> ScopeId {
        ScopeId(0)
    }

    fn alloc_scope(&mut self, name: &str, parent: ScopeId, is_type_scope: bool) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(ScopeData {
            name: name.to_string(),
            parent: Some(parent),
            children: HashMap::new(),
            symbols: HashMap::new(),
            is_type_scope,
        });
        self.scopes[parent.0 as usize]
            .children
            .insert(name.to_string(), id);
        id
    }

    fn alloc_symbol(&mut self, data: SymbolData) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        let scope = data.declared_in;
        let name = data.name.clone();
        self.symbols.push(data);
        self.scopes[scope.0 as usize].symbols.insert(name, id);
        id
    }

    /// Declares (or reopens) a module and returns its scope.
    ///
    /// Redeclaring a module is legal; the existing scope is reused. Any
    /// other symbol already owning the name is a duplicate.
    pub fn declare_module(
        &mut self,
        scope: ScopeId,
        name: &str,
    ) -> Result<ScopeId, SymbolError> {
        if let Some(&existing) = self.scopes[scope.0 as usize].symbols.get(name) {
            let sym = &self.symbols[existing.0 as usize];
            if sym.kind == SymbolKind::Module {
                return Ok(sym.scope.unwrap_or_else(|| self.top_scope()));
            }
            return Err(SymbolError::duplicate(name, self.fully_qualified_scope(scope)));
        }
        let child = self.alloc_scope(name, scope, false);
        self.alloc_symbol(SymbolData {
            name: name.to_string(),
            declared_in: scope,
            kind: SymbolKind::Module,
            scope: Some(child),
            value: None,
            pending: false,
        });
        Ok(child)
    }

    /// Declares a type symbol and opens its scope.
    ///
    /// A pending forward declaration of the same name is completed in
    /// place; its scope is reused. Any other existing symbol is a
    /// duplicate.
    pub fn declare_type_symbol(
        &mut self,
        scope: ScopeId,
        name: &str,
    ) -> Result<SymbolId, SymbolError> {
        if let Some(&existing) = self.scopes[scope.0 as usize].symbols.get(name) {
            let sym = &mut self.symbols[existing.0 as usize];
            if sym.kind == SymbolKind::Type && sym.pending {
                sym.pending = false;
                return Ok(existing);
            }
            return Err(SymbolError::duplicate(name, self.fully_qualified_scope(scope)));
        }
        let child = self.alloc_scope(name, scope, true);
        Ok(self.alloc_symbol(SymbolData {
            name: name.to_string(),
            declared_in: scope,
            kind: SymbolKind::Type,
            scope: Some(child),
            value: None,
            pending: false,
        }))
    }

    /// Declares a forward type symbol; repeating a forward declaration
    /// is legal, as is forward-declaring an already complete type.
    pub fn declare_forward_symbol(
        &mut self,
        scope: ScopeId,
        name: &str,
    ) -> Result<SymbolId, SymbolError> {
        if let Some(&existing) = self.scopes[scope.0 as usize].symbols.get(name) {
            let sym = &self.symbols[existing.0 as usize];
            if sym.kind == SymbolKind::Type {
                return Ok(existing);
            }
            return Err(SymbolError::duplicate(name, self.fully_qualified_scope(scope)));
        }
        let child = self.alloc_scope(name, scope, true);
        Ok(self.alloc_symbol(SymbolData {
            name: name.to_string(),
            declared_in: scope,
            kind: SymbolKind::Type,
            scope: Some(child),
            value: None,
            pending: true,
        }))
    }

    /// Declares a constant symbol.
    pub fn declare_const_symbol(
        &mut self,
        scope: ScopeId,
        name: &str,
    ) -> Result<SymbolId, SymbolError> {
        if self.scopes[scope.0 as usize].symbols.contains_key(name) {
            return Err(SymbolError::duplicate(name, self.fully_qualified_scope(scope)));
        }
        Ok(self.alloc_symbol(SymbolData {
            name: name.to_string(),
            declared_in: scope,
            kind: SymbolKind::Const,
            scope: None,
            value: None,
            pending: false,
        }))
    }

    /// Declares an enum member symbol in the scope enclosing the enum.
    pub fn declare_enumerator(
        &mut self,
        scope: ScopeId,
        name: &str,
    ) -> Result<SymbolId, SymbolError> {
        if self.scopes[scope.0 as usize].symbols.contains_key(name) {
            return Err(SymbolError::duplicate(name, self.fully_qualified_scope(scope)));
        }
        Ok(self.alloc_symbol(SymbolData {
            name: name.to_string(),
            declared_in: scope,
            kind: SymbolKind::Enumerator,
            scope: None,
            value: None,
            pending: false,
        }))
    }

    /// Records the evaluated value of a constant or enumerator symbol.
    pub fn set_symbol_value(&mut self, symbol: SymbolId, value: Literal) {
        self.symbols[symbol.0 as usize].value = Some(value);
    }

    /// The recorded value of a symbol, if any.
    #[must_use]
    pub fn symbol_value(&self, symbol: SymbolId) -> Option<&Literal> {
        self.symbols[symbol.0 as usize].value.as_ref()
    }

    /// Looks up a name in exactly one scope, without walking parents.
    #[must_use]
    pub fn get_symbol(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        self.scopes[scope.0 as usize].symbols.get(name).copied()
    }

    /// The child scope a name opens in the given scope, if any.
    #[must_use]
    pub fn child_scope(&self, scope: ScopeId, name: &str) -> Option<ScopeId> {
        self.scopes[scope.0 as usize].children.get(name).copied()
    }

    /// The enclosing scope, or `None` for the file scope.
    #[must_use]
    pub fn parent_scope(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes[scope.0 as usize].parent
    }

    /// The scope owned by a module or type symbol.
    #[must_use]
    pub fn symbol_scope(&self, symbol: SymbolId) -> Option<ScopeId> {
        self.symbols[symbol.0 as usize].scope
    }

    /// The simple name of a scope.
    #[must_use]
    pub fn scope_name(&self, scope: ScopeId) -> &str {
        &self.scopes[scope.0 as usize].name
    }

    /// The simple name of a symbol.
    #[must_use]
    pub fn symbol_name(&self, symbol: SymbolId) -> &str {
        &self.symbols[symbol.0 as usize].name
    }

    /// The symbol's kind.
    #[must_use]
    pub fn symbol_kind(&self, symbol: SymbolId) -> SymbolKind {
        self.symbols[symbol.0 as usize].kind
    }

    /// The scope the symbol was declared in.
    #[must_use]
    pub fn declared_in(&self, symbol: SymbolId) -> ScopeId {
        self.symbols[symbol.0 as usize].declared_in
    }

    /// True for scopes opened by a type declaration.
    #[must_use]
    pub fn is_type_scope(&self, scope: ScopeId) -> bool {
        self.scopes[scope.0 as usize].is_type_scope
    }

    /// True while a type symbol is forward-declared only.
    #[must_use]
    pub fn is_pending(&self, symbol: SymbolId) -> bool {
        self.symbols[symbol.0 as usize].pending
    }

    /// Dot-joined qualified name of a scope, omitting the file scope.
    #[must_use]
    pub fn fully_qualified_scope(&self, scope: ScopeId) -> String {
        let mut parts = Vec::new();
        let mut current = Some(scope);
        while let Some(id) = current {
            let data = &self.scopes[id.0 as usize];
            if !data.name.is_empty() {
                parts.push(data.name.as_str());
            }
            current = data.parent;
        }
        parts.reverse();
        parts.join(".")
    }

    /// Dot-joined qualified name of a symbol.
    #[must_use]
    pub fn fully_qualified_name(&self, symbol: SymbolId) -> String {
        let data = &self.symbols[symbol.0 as usize];
        let scope = self.fully_qualified_scope(data.declared_in);
        if scope.is_empty() {
            data.name.clone()
        } else {
            format!("{scope}.{}", data.name)
        }
    }

    /// Repository id of a symbol in `IDL:<a>/<b>/<name>:1.0` form.
    #[must_use]
    pub fn repository_id(&self, symbol: SymbolId) -> String {
        let data = &self.symbols[symbol.0 as usize];
        let mut parts = Vec::new();
        let mut current = Some(data.declared_in);
        while let Some(id) = current {
            let scope = &self.scopes[id.0 as usize];
            if !scope.name.is_empty() {
                parts.push(scope.name.as_str());
            }
            current = scope.parent;
        }
        parts.reverse();
        parts.push(&data.name);
        format!("IDL:{}:1.0", parts.join("/"))
    }

    /// Scope for declarations nested in a non-class container.
    ///
    /// Type declarations that appear inside a module-like container
    /// with no matching class stay in that scope; declarations nested
    /// in an interface or value type that cannot hold them are placed
    /// in a sibling `<container>_package` scope, created on demand.
    pub fn scope_for_nested(&mut self, container: ScopeId) -> ScopeId {
        let parent = match self.scopes[container.0 as usize].parent {
            Some(parent) => parent,
            None => return container,
        };
        let package_name = format!("{}_package", self.scopes[container.0 as usize].name);
        if let Some(existing) = self.child_scope(parent, &package_name) {
            return existing;
        }
        self.alloc_scope(&package_name, parent, false)
    }

    /// Fails if any type symbol is still forward-declared only.
    pub fn check_all_forward_decls_complete(&self) -> Result<(), SymbolError> {
        for symbol in &self.symbols {
            if symbol.pending {
                let scope = self.fully_qualified_scope(symbol.declared_in);
                let name = if scope.is_empty() {
                    symbol.name.clone()
                } else {
                    format!("{scope}.{}", symbol.name)
                };
                return Err(SymbolError::incomplete_forward(name));
            }
        }
        Ok(())
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
