//! Type registry tracking the declaration state of every named IDL
//! entity across all documents of a run.
//!
//! Entries are keyed by the symbol's fully qualified name, which is
//! stable across documents (symbol ids are per-document). States only
//! move forward: unknown -> forward-declared -> fully declared, with
//! externally declared entries fixed from the start. Typedef aliases
//! are fully declared entries that point at the aliased descriptor.

use std::collections::HashMap;

use idlcls_core::{TypeDesc, TypeId};

use crate::error::{CodegenError, Result};

#[derive(Debug, Clone)]
enum Entry {
    /// Forward-declared in this run; the builder slot is reserved.
    Forward(TypeId),
    /// Fully declared in this run, or a typedef alias.
    Full(TypeDesc),
    /// Declared by a reference library.
    External(TypeDesc),
}

/// Declaration-state registry for one compilation run.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    entries: HashMap<String, Entry>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an externally declared type.
    ///
    /// # Errors
    /// Internal error if the name already has an entry.
    pub fn register_external(&mut self, name: impl Into<String>, desc: TypeDesc) -> Result<()> {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(CodegenError::internal(format!(
                "external type '{name}' registered twice"
            )));
        }
        self.entries.insert(name, Entry::External(desc));
        Ok(())
    }

    /// Records a forward declaration. Repeating a forward declaration,
    /// or forward-declaring an already declared type, is a no-op.
    pub fn register_forward_decl(&mut self, name: impl Into<String>, builder_id: TypeId) {
        self.entries
            .entry(name.into())
            .or_insert(Entry::Forward(builder_id));
    }

    /// Records a full declaration for a name with no prior entry.
    ///
    /// # Errors
    /// Internal error if the name already has an entry; skip checks
    /// must run before declaring.
    pub fn register_full_decl(&mut self, name: impl Into<String>, desc: TypeDesc) -> Result<()> {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(CodegenError::internal(format!(
                "type '{name}' declared twice without a skip check"
            )));
        }
        self.entries.insert(name, Entry::Full(desc));
        Ok(())
    }

    /// Moves a forward-declared entry to fully declared.
    ///
    /// # Errors
    /// Internal error if the entry is not in the forward state.
    pub fn complete_forward_decl(&mut self, name: &str, desc: TypeDesc) -> Result<()> {
        match self.entries.get_mut(name) {
            Some(entry @ Entry::Forward(_)) => {
                *entry = Entry::Full(desc);
                Ok(())
            }
            _ => Err(CodegenError::internal(format!(
                "completing '{name}', which was never forward-declared"
            ))),
        }
    }

    /// Records a typedef alias as a full declaration of the alias name.
    ///
    /// # Errors
    /// Same rules as [`Self::register_full_decl`].
    pub fn register_type_alias(&mut self, name: impl Into<String>, aliased: TypeDesc) -> Result<()> {
        self.register_full_decl(name, aliased)
    }

    /// True if the name is declared by a reference library.
    #[must_use]
    pub fn is_externally_declared(&self, name: &str) -> bool {
        matches!(self.entries.get(name), Some(Entry::External(_)))
    }

    /// True while the name is forward-declared only.
    #[must_use]
    pub fn is_forward_declared(&self, name: &str) -> bool {
        matches!(self.entries.get(name), Some(Entry::Forward(_)))
    }

    /// True once the name has a full in-run declaration.
    #[must_use]
    pub fn is_fully_declared(&self, name: &str) -> bool {
        matches!(self.entries.get(name), Some(Entry::Full(_)))
    }

    /// True if a new declaration of this name must be skipped: the
    /// reference assembly overrides re-generation, and a full in-run
    /// declaration makes re-processing idempotent.
    #[must_use]
    pub fn should_skip(&self, name: &str) -> bool {
        self.is_externally_declared(name) || self.is_fully_declared(name)
    }

    /// The builder slot of a forward-declared entry.
    #[must_use]
    pub fn forward_id(&self, name: &str) -> Option<TypeId> {
        match self.entries.get(name) {
            Some(Entry::Forward(id)) => Some(*id),
            _ => None,
        }
    }

    /// Resolves a name to a usable type descriptor. Forward-declared
    /// entries resolve to a reference to the reserved builder slot.
    ///
    /// # Errors
    /// `TypeNotSeenBefore` if the name has no entry.
    pub fn resolve(&self, name: &str) -> Result<TypeDesc> {
        match self.entries.get(name) {
            Some(Entry::Full(desc) | Entry::External(desc)) => Ok(desc.clone()),
            Some(Entry::Forward(id)) => Ok(TypeDesc::new(idlcls_core::ClsType::Named(*id))),
            None => Err(CodegenError::TypeNotSeenBefore {
                name: name.to_string(),
            }),
        }
    }

    /// Fails if any entry is still forward-declared only.
    ///
    /// # Errors
    /// `UnresolvedForwardDecl` naming the first dangling entry.
    pub fn assert_all_resolved(&self) -> Result<()> {
        for (name, entry) in &self.entries {
            if matches!(entry, Entry::Forward(_)) {
                return Err(CodegenError::UnresolvedForwardDecl { name: name.clone() });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idlcls_core::ClsType;

    fn desc(raw: u32) -> TypeDesc {
        TypeDesc::new(ClsType::Named(TypeId::from_raw(raw)))
    }

    #[test]
    fn test_forward_to_full_transition() {
        let mut registry = TypeRegistry::new();
        registry.register_forward_decl("A.If", TypeId::from_raw(0));
        assert!(registry.is_forward_declared("A.If"));
        assert!(!registry.should_skip("A.If"));
        registry.complete_forward_decl("A.If", desc(0)).unwrap();
        assert!(registry.is_fully_declared("A.If"));
        assert!(registry.should_skip("A.If"));
    }

    #[test]
    fn test_repeated_forward_is_noop() {
        let mut registry = TypeRegistry::new();
        registry.register_forward_decl("A.If", TypeId::from_raw(0));
        registry.register_forward_decl("A.If", TypeId::from_raw(9));
        assert_eq!(registry.forward_id("A.If"), Some(TypeId::from_raw(0)));
    }

    #[test]
    fn test_double_full_decl_is_internal_error() {
        let mut registry = TypeRegistry::new();
        registry.register_full_decl("A.S", desc(1)).unwrap();
        assert!(matches!(
            registry.register_full_decl("A.S", desc(1)),
            Err(CodegenError::Internal { .. })
        ));
    }

    #[test]
    fn test_completing_unknown_is_internal_error() {
        let mut registry = TypeRegistry::new();
        assert!(matches!(
            registry.complete_forward_decl("A.If", desc(0)),
            Err(CodegenError::Internal { .. })
        ));
    }

    #[test]
    fn test_resolve_unknown_not_seen_before() {
        let registry = TypeRegistry::new();
        assert!(matches!(
            registry.resolve("A.Nope"),
            Err(CodegenError::TypeNotSeenBefore { .. })
        ));
    }

    #[test]
    fn test_external_skips_and_resolves() {
        let mut registry = TypeRegistry::new();
        registry.register_external("Ext.T", desc(3)).unwrap();
        assert!(registry.should_skip("Ext.T"));
        assert_eq!(registry.resolve("Ext.T").unwrap(), desc(3));
    }

    #[test]
    fn test_assert_all_resolved_catches_dangling_forward() {
        let mut registry = TypeRegistry::new();
        registry.register_forward_decl("A.If", TypeId::from_raw(0));
        assert!(matches!(
            registry.assert_all_resolved(),
            Err(CodegenError::UnresolvedForwardDecl { .. })
        ));
        registry.complete_forward_decl("A.If", desc(0)).unwrap();
        assert!(registry.assert_all_resolved().is_ok());
    }
}
