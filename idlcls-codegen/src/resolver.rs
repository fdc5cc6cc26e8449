//! Type specification and scoped name resolution.
//!
//! Scoped names resolve against the current scope first and then each
//! lexical ancestor, innermost first. Scopes of inherited interfaces
//! are not searched. Base type specifications map through a fixed
//! table; unsigned IDL integers map to the same signed CLS integers as
//! their signed counterparts because the target type system has no
//! unsigned CLS-compliant integers.

use idlcls_ast::{ScopeId, ScopedName, SymbolId, SymbolKind, SymbolTable, TypeSpec};
use idlcls_core::{
    ClsType, ModuleBuilder, ObjectKind, TypeAnnotation, TypeDesc,
};
use tracing::warn;

use crate::error::{CodegenError, Result};
use crate::mapping::CustomMappingTable;
use crate::registry::TypeRegistry;

/// Resolves type specifications for one document.
pub struct TypeResolver<'a> {
    table: &'a SymbolTable,
    registry: &'a TypeRegistry,
    mappings: &'a CustomMappingTable,
    module: &'a ModuleBuilder,
}

impl<'a> TypeResolver<'a> {
    /// Creates a resolver over the given collaborators.
    #[must_use]
    pub fn new(
        table: &'a SymbolTable,
        registry: &'a TypeRegistry,
        mappings: &'a CustomMappingTable,
        module: &'a ModuleBuilder,
    ) -> Self {
        Self {
            table,
            registry,
            mappings,
            module,
        }
    }

    /// Resolves a type specification in the given scope to a target
    /// type descriptor.
    ///
    /// # Errors
    /// Unsupported-construct errors for long double and fixed point;
    /// name resolution errors for scoped specifications.
    pub fn resolve_type_spec(&self, scope: ScopeId, spec: &TypeSpec) -> Result<TypeDesc> {
        match spec {
            TypeSpec::Float => Ok(TypeDesc::new(ClsType::Single)),
            TypeSpec::Double => Ok(TypeDesc::new(ClsType::Double)),
            TypeSpec::LongDouble => Err(CodegenError::unsupported("long double type")),
            TypeSpec::Short | TypeSpec::UShort => Ok(TypeDesc::new(ClsType::Int16)),
            TypeSpec::Long | TypeSpec::ULong => Ok(TypeDesc::new(ClsType::Int32)),
            TypeSpec::LongLong | TypeSpec::ULongLong => Ok(TypeDesc::new(ClsType::Int64)),
            TypeSpec::Char => Ok(TypeDesc::with_annotations(
                ClsType::Char,
                vec![TypeAnnotation::WideChar(false)],
            )),
            TypeSpec::WChar => Ok(TypeDesc::with_annotations(
                ClsType::Char,
                vec![TypeAnnotation::WideChar(true)],
            )),
            TypeSpec::Boolean => Ok(TypeDesc::new(ClsType::Boolean)),
            TypeSpec::Octet => Ok(TypeDesc::new(ClsType::Byte)),
            TypeSpec::Any => Ok(TypeDesc::with_annotations(
                ClsType::Object,
                vec![TypeAnnotation::ObjectKind(ObjectKind::Any)],
            )),
            TypeSpec::Object => Ok(TypeDesc::new(ClsType::RemoteObject)),
            TypeSpec::ValueBase => Ok(TypeDesc::with_annotations(
                ClsType::Object,
                vec![TypeAnnotation::ObjectKind(ObjectKind::ValueBase)],
            )),
            TypeSpec::String => Ok(TypeDesc::with_annotations(
                ClsType::String,
                vec![TypeAnnotation::StringValue, TypeAnnotation::WideChar(false)],
            )),
            TypeSpec::WString => Ok(TypeDesc::with_annotations(
                ClsType::String,
                vec![TypeAnnotation::StringValue, TypeAnnotation::WideChar(true)],
            )),
            TypeSpec::Sequence { element, bound } => {
                if let Some(bound) = bound {
                    warn!(bound, "bounded sequence degraded to unbounded");
                }
                let element = self.resolve_type_spec(scope, element)?;
                Ok(TypeDesc::with_annotations(
                    ClsType::Array(Box::new(element.cls_type)),
                    vec![TypeAnnotation::IdlSequence],
                ))
            }
            TypeSpec::Fixed => Err(CodegenError::unsupported("fixed point type")),
            TypeSpec::Scoped(name) => self.resolve_named_type(scope, name),
        }
    }

    /// Resolves a scoped name to a symbol.
    ///
    /// The first part is looked up in the starting scope and then in
    /// each lexical ancestor; remaining parts descend through owned
    /// scopes. A file-scoped name starts at the top scope directly.
    ///
    /// # Errors
    /// `UnresolvableName` if any part fails to resolve.
    pub fn resolve_symbol(&self, scope: ScopeId, name: &ScopedName) -> Result<SymbolId> {
        let unresolvable =
            || CodegenError::unresolvable(name.to_idl(), self.table.fully_qualified_scope(scope));
        let first = name.parts.first().ok_or_else(unresolvable)?;

        let mut search = Some(if name.is_file_scoped {
            self.table.top_scope()
        } else {
            scope
        });
        let mut symbol = None;
        while let Some(current) = search {
            if let Some(found) = self.table.get_symbol(current, first) {
                symbol = Some(found);
                break;
            }
            search = self.table.parent_scope(current);
        }
        let mut symbol = symbol.ok_or_else(unresolvable)?;

        for part in &name.parts[1..] {
            symbol = self
                .table
                .symbol_scope(symbol)
                .and_then(|owned| self.table.get_symbol(owned, part))
                .ok_or_else(unresolvable)?;
        }
        Ok(symbol)
    }

    /// Resolves a scoped name to a type descriptor, applying custom
    /// mapping overrides.
    fn resolve_named_type(&self, scope: ScopeId, name: &ScopedName) -> Result<TypeDesc> {
        let symbol = self.resolve_symbol(scope, name)?;
        if self.table.symbol_kind(symbol) != SymbolKind::Type {
            return Err(CodegenError::unresolvable(
                name.to_idl(),
                self.table.fully_qualified_scope(scope),
            ));
        }
        let qualified = self.table.fully_qualified_name(symbol);
        let desc = self.registry.resolve(&qualified)?;
        self.apply_mapping(desc)
    }

    /// The recorded constant value of a symbol, if any.
    #[must_use]
    pub fn symbol_value(&self, symbol: SymbolId) -> Option<&idlcls_core::Literal> {
        self.table.symbol_value(symbol)
    }

    /// Dot-joined qualified name of a symbol, for diagnostics.
    #[must_use]
    pub fn qualified_symbol_name(&self, symbol: SymbolId) -> String {
        self.table.fully_qualified_name(symbol)
    }

    /// Substitutes a custom mapping target for a resolved descriptor,
    /// if one is registered for its compact CLS name.
    pub fn apply_mapping(&self, desc: TypeDesc) -> Result<TypeDesc> {
        let Some(id) = desc.named_id() else {
            return Ok(desc);
        };
        let cls_name = self.module.shape(id)?.name.clone();
        let Some(target) = self.mappings.target_for(&cls_name) else {
            return Ok(desc);
        };
        let target_id = self.module.lookup(target).ok_or_else(|| {
            CodegenError::internal(format!(
                "custom mapping target '{target}' is not in any reference library"
            ))
        })?;
        Ok(TypeDesc::new(ClsType::Named(target_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idlcls_core::{TypeId, TypeKind, TypeShape};

    struct Fixture {
        table: SymbolTable,
        registry: TypeRegistry,
        mappings: CustomMappingTable,
        module: ModuleBuilder,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                table: SymbolTable::new(),
                registry: TypeRegistry::new(),
                mappings: CustomMappingTable::new(),
                module: ModuleBuilder::new("out"),
            }
        }

        fn resolver(&self) -> TypeResolver<'_> {
            TypeResolver::new(&self.table, &self.registry, &self.mappings, &self.module)
        }
    }

    #[test]
    fn test_unsigned_integers_map_to_signed() {
        let fx = Fixture::new();
        let top = fx.table.top_scope();
        let resolver = fx.resolver();
        for (signed, unsigned) in [
            (TypeSpec::Short, TypeSpec::UShort),
            (TypeSpec::Long, TypeSpec::ULong),
            (TypeSpec::LongLong, TypeSpec::ULongLong),
        ] {
            assert_eq!(
                resolver.resolve_type_spec(top, &signed).unwrap(),
                resolver.resolve_type_spec(top, &unsigned).unwrap()
            );
        }
    }

    #[test]
    fn test_string_and_wstring_differ_by_width() {
        let fx = Fixture::new();
        let top = fx.table.top_scope();
        let resolver = fx.resolver();
        let narrow = resolver.resolve_type_spec(top, &TypeSpec::String).unwrap();
        let wide = resolver.resolve_type_spec(top, &TypeSpec::WString).unwrap();
        assert_eq!(narrow.cls_type, ClsType::String);
        assert!(narrow.has_annotation(&TypeAnnotation::WideChar(false)));
        assert!(wide.has_annotation(&TypeAnnotation::WideChar(true)));
        assert!(narrow.has_annotation(&TypeAnnotation::StringValue));
    }

    #[test]
    fn test_object_base_types() {
        let fx = Fixture::new();
        let top = fx.table.top_scope();
        let resolver = fx.resolver();
        let any = resolver.resolve_type_spec(top, &TypeSpec::Any).unwrap();
        assert_eq!(any.cls_type, ClsType::Object);
        assert!(any.has_annotation(&TypeAnnotation::ObjectKind(ObjectKind::Any)));
        let obj = resolver.resolve_type_spec(top, &TypeSpec::Object).unwrap();
        assert_eq!(obj.cls_type, ClsType::RemoteObject);
        let vb = resolver.resolve_type_spec(top, &TypeSpec::ValueBase).unwrap();
        assert!(vb.has_annotation(&TypeAnnotation::ObjectKind(ObjectKind::ValueBase)));
    }

    #[test]
    fn test_bounded_sequence_degrades_to_array() {
        let fx = Fixture::new();
        let top = fx.table.top_scope();
        let resolver = fx.resolver();
        let spec = TypeSpec::Sequence {
            element: Box::new(TypeSpec::Long),
            bound: Some(10),
        };
        let desc = resolver.resolve_type_spec(top, &spec).unwrap();
        assert_eq!(desc.cls_type, ClsType::Array(Box::new(ClsType::Int32)));
        assert!(desc.has_annotation(&TypeAnnotation::IdlSequence));
    }

    #[test]
    fn test_fixed_and_long_double_unsupported() {
        let fx = Fixture::new();
        let top = fx.table.top_scope();
        let resolver = fx.resolver();
        assert!(matches!(
            resolver.resolve_type_spec(top, &TypeSpec::Fixed),
            Err(CodegenError::Unsupported { .. })
        ));
        assert!(matches!(
            resolver.resolve_type_spec(top, &TypeSpec::LongDouble),
            Err(CodegenError::Unsupported { .. })
        ));
    }

    #[test]
    fn test_scoped_name_walks_lexical_ancestors() {
        let mut fx = Fixture::new();
        let top = fx.table.top_scope();
        let a = fx.table.declare_module(top, "A").unwrap();
        let b = fx.table.declare_module(a, "B").unwrap();
        let sym = fx.table.declare_type_symbol(a, "S").unwrap();
        fx.registry
            .register_full_decl("A.S", TypeDesc::new(ClsType::Named(TypeId::from_raw(0))))
            .unwrap();
        let _ = fx
            .module
            .define_type("A.S", TypeKind::Struct, None, Vec::new())
            .unwrap();
        let resolver = fx.resolver();
        // From A.B, the unqualified name S resolves in the ancestor A.
        let found = resolver.resolve_symbol(b, &ScopedName::simple("S")).unwrap();
        assert_eq!(found, sym);
        let desc = resolver
            .resolve_type_spec(b, &TypeSpec::Scoped(ScopedName::simple("S")))
            .unwrap();
        assert_eq!(desc.named_id(), Some(TypeId::from_raw(0)));
    }

    #[test]
    fn test_file_scoped_name_skips_inner_shadow() {
        let mut fx = Fixture::new();
        let top = fx.table.top_scope();
        let outer = fx.table.declare_type_symbol(top, "S").unwrap();
        let a = fx.table.declare_module(top, "A").unwrap();
        let _shadow = fx.table.declare_type_symbol(a, "S").unwrap();
        let resolver = fx.resolver();
        let file_scoped = ScopedName {
            is_file_scoped: true,
            parts: vec!["S".to_string()],
        };
        assert_eq!(resolver.resolve_symbol(a, &file_scoped).unwrap(), outer);
    }

    #[test]
    fn test_unresolvable_name() {
        let fx = Fixture::new();
        let top = fx.table.top_scope();
        let resolver = fx.resolver();
        assert!(matches!(
            resolver.resolve_type_spec(top, &TypeSpec::Scoped(ScopedName::simple("Nope"))),
            Err(CodegenError::UnresolvableName { .. })
        ));
    }

    #[test]
    fn test_custom_mapping_substitutes_external_type() {
        let mut fx = Fixture::new();
        let top = fx.table.top_scope();
        fx.table.declare_type_symbol(top, "NamedValue").unwrap();
        let generated = fx
            .module
            .define_type("NamedValue", TypeKind::ConcreteValueType, None, Vec::new())
            .unwrap();
        let external = fx
            .module
            .intern_external(TypeShape::new(
                "Ext.CustomNamedValue".to_string(),
                TypeKind::ConcreteValueType,
            ))
            .unwrap();
        fx.registry
            .register_full_decl("NamedValue", TypeDesc::new(ClsType::Named(generated)))
            .unwrap();
        fx.mappings
            .add_mapping("NamedValue", "Ext.CustomNamedValue");
        let resolver = fx.resolver();
        let desc = resolver
            .resolve_type_spec(top, &TypeSpec::Scoped(ScopedName::simple("NamedValue")))
            .unwrap();
        assert_eq!(desc.named_id(), Some(external));
    }
}
