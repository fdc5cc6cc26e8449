//! The metadata generator: drives one compilation run over parsed IDL
//! documents and produces the target type declarations.
//!
//! Each document is processed in two passes. The declaration pass
//! populates the symbol table (tolerant of names already declared by
//! earlier documents), after which forward-declaration completeness is
//! checked. The synthesis pass walks the definitions in declaration
//! order and builds types through the shared [`ModuleBuilder`],
//! consulting the registry to skip entities that are already declared
//! externally or by an earlier document.

use std::collections::HashMap;

use tracing::{debug, info};

use idlcls_ast::{
    AttrDcl, CaseLabel, ConstDcl, Declarator, Definition, EnumDcl, ExceptDcl, Export,
    InterfaceDcl, InterfaceForwardDcl, OpDcl, ScopeId, ScopedName, Specification, StructDcl,
    SymbolId, SymbolKind, SymbolTable, TypeDcl, TypedefDcl, UnionDcl, ValueAbsDcl, ValueBoxDcl,
    ValueDcl, ValueElement, ValueForwardDcl,
};
use idlcls_core::{
    ClsModule, ClsType, FieldDef, InterfaceCategory, Literal, MethodDef, ModuleBuilder, ParamDef,
    PropertyDef, TypeAnnotation, TypeDesc, TypeId, TypeKind, TypeShape, UnionCase, Visibility,
};

use crate::consts;
use crate::error::{CodegenError, Result};
use crate::flatten;
use crate::mapping::CustomMappingTable;
use crate::naming;
use crate::reflib::ReferenceLibrary;
use crate::registry::TypeRegistry;
use crate::resolver::TypeResolver;
use crate::union::DiscriminatorTracker;

/// Where the current definition is being built.
#[derive(Debug, Clone, Copy)]
struct BuildContext {
    /// Scope the definition's names resolve in.
    scope: ScopeId,
    /// Enclosing type under construction, if inside a body.
    container: Option<TypeId>,
}

/// Generates target type metadata from parsed IDL documents.
pub struct MetadataGenerator {
    module: ModuleBuilder,
    registry: TypeRegistry,
    mappings: CustomMappingTable,
    value_impls_needed: Vec<String>,
}

impl MetadataGenerator {
    /// Creates a generator for the named output module, pre-populating
    /// the registry from the given reference libraries.
    ///
    /// # Errors
    /// Internal error if a reference library is inconsistent (unknown
    /// interface names, duplicate type names).
    pub fn new(
        target_name: impl Into<String>,
        libraries: &[ReferenceLibrary],
        mappings: CustomMappingTable,
    ) -> Result<Self> {
        let mut module = ModuleBuilder::new(target_name);
        let mut registry = TypeRegistry::new();

        // External types are interned in listing order into the empty
        // builder, so their slots can be computed up front and interface
        // references within the libraries wired by name.
        let mut slots: HashMap<&str, TypeId> = HashMap::new();
        let mut next = 0u32;
        for library in libraries {
            for ty in &library.types {
                slots.insert(ty.cls_name.as_str(), TypeId::from_raw(next));
                next += 1;
            }
        }
        for library in libraries {
            for ty in &library.types {
                let mut shape = TypeShape::new(ty.cls_name.clone(), ty.kind);
                for iface in &ty.interfaces {
                    let slot = slots.get(iface.as_str()).ok_or_else(|| {
                        CodegenError::internal(format!(
                            "reference library '{}' names unknown interface '{iface}'",
                            library.name
                        ))
                    })?;
                    shape.interfaces.push(ClsType::Named(*slot));
                }
                shape.methods = ty.methods.clone();
                shape.properties = ty.properties.clone();
                let id = module.intern_external(shape)?;
                registry.register_external(&ty.cls_name, TypeDesc::new(ClsType::Named(id)))?;
            }
        }

        Ok(Self {
            module,
            registry,
            mappings,
            value_impls_needed: Vec::new(),
        })
    }

    /// The module builder holding everything generated so far.
    #[must_use]
    pub fn module(&self) -> &ModuleBuilder {
        &self.module
    }

    /// Processes one parsed document against the shared symbol table.
    ///
    /// The same table must be reused across the documents of one run
    /// so later documents can reference earlier declarations.
    ///
    /// # Errors
    /// Invalid-input, unsupported-construct or internal errors; on
    /// error the current document is abandoned but types completed
    /// before the failure stay valid.
    pub fn generate(&mut self, spec: &Specification, table: &mut SymbolTable) -> Result<()> {
        let top = table.top_scope();
        for definition in &spec.definitions {
            declare_definition(table, top, definition)?;
        }
        table.check_all_forward_decls_complete()?;

        let ctx = BuildContext {
            scope: top,
            container: None,
        };
        for definition in &spec.definitions {
            self.gen_definition(table, ctx, definition)?;
        }
        self.registry.assert_all_resolved()
    }

    /// Freezes the run into an immutable module and returns it together
    /// with the qualified names of concrete value types that need a
    /// hand-written implementation class.
    ///
    /// # Errors
    /// `UnresolvedForwardDecl` or internal errors if any type was left
    /// unfinished.
    pub fn finish(self) -> Result<(ClsModule, Vec<String>)> {
        self.registry.assert_all_resolved()?;
        let module = self.module.finish()?;
        if !self.value_impls_needed.is_empty() {
            info!(
                count = self.value_impls_needed.len(),
                "concrete value types need hand-written implementation classes"
            );
        }
        Ok((module, self.value_impls_needed))
    }

    fn resolver<'a>(&'a self, table: &'a SymbolTable) -> TypeResolver<'a> {
        TypeResolver::new(table, &self.registry, &self.mappings, &self.module)
    }

    fn resolve_spec(
        &self,
        table: &SymbolTable,
        scope: ScopeId,
        spec: &idlcls_ast::TypeSpec,
    ) -> Result<TypeDesc> {
        self.resolver(table).resolve_type_spec(scope, spec)
    }

    fn symbol_for(&self, table: &SymbolTable, ctx: BuildContext, name: &str) -> Result<SymbolId> {
        table
            .get_symbol(ctx.scope, name)
            .ok_or_else(|| CodegenError::internal(format!("no symbol for declaration '{name}'")))
    }

    /// Computes the CLS name and declaring type for a new declaration.
    ///
    /// Declarations inside a class-kind container become true nested
    /// types; declarations inside an interface-kind container land in
    /// the synthetic `<container>_package` namespace.
    fn placement(
        &self,
        table: &mut SymbolTable,
        ctx: BuildContext,
        name: &str,
    ) -> Result<(String, Option<TypeId>)> {
        let mapped = naming::cls_identifier(name);
        if let Some(container) = ctx.container {
            let shape = self.module.shape(container)?;
            if shape.kind.is_class_kind() {
                return Ok((format!("{}.{mapped}", shape.name), Some(container)));
            }
        }
        let scope = if table.is_type_scope(ctx.scope) {
            table.scope_for_nested(ctx.scope)
        } else {
            ctx.scope
        };
        let qualifier = table.fully_qualified_scope(scope);
        let cls_name = if qualifier.is_empty() {
            mapped
        } else {
            format!("{qualifier}.{mapped}")
        };
        Ok((cls_name, None))
    }

    fn define(
        &mut self,
        cls_name: String,
        kind: TypeKind,
        base: Option<ClsType>,
        interfaces: Vec<ClsType>,
        declaring: Option<TypeId>,
    ) -> Result<TypeId> {
        let id = match declaring {
            Some(outer) => self
                .module
                .define_nested_type(outer, cls_name, kind, base, interfaces)?,
            None => self.module.define_type(cls_name, kind, base, interfaces)?,
        };
        Ok(id)
    }

    /// Resolves an inheritance or support clause entry to a declared
    /// type.
    fn resolve_base(
        &self,
        table: &SymbolTable,
        ctx: BuildContext,
        heir: &str,
        name: &ScopedName,
    ) -> Result<(TypeId, TypeKind)> {
        let symbol = self.resolver(table).resolve_symbol(ctx.scope, name)?;
        let qualified = table.fully_qualified_name(symbol);
        if self.registry.is_forward_declared(&qualified) {
            return Err(CodegenError::InheritsForwardOnly {
                name: heir.to_string(),
                base: qualified,
            });
        }
        let desc = self.registry.resolve(&qualified)?;
        let id = desc.named_id().ok_or_else(|| CodegenError::InvalidInheritance {
            name: heir.to_string(),
            detail: format!("'{qualified}' is not a declared type"),
        })?;
        let kind = self.module.shape(id)?.kind;
        Ok((id, kind))
    }

    fn gen_definition(
        &mut self,
        table: &mut SymbolTable,
        ctx: BuildContext,
        definition: &Definition,
    ) -> Result<()> {
        match definition {
            Definition::Module(module) => {
                let child = table.child_scope(ctx.scope, &module.name).ok_or_else(|| {
                    CodegenError::internal(format!("module scope '{}' missing", module.name))
                })?;
                let inner = BuildContext {
                    scope: child,
                    container: None,
                };
                for definition in &module.definitions {
                    self.gen_definition(table, inner, definition)?;
                }
                Ok(())
            }
            Definition::Interface(dcl) => self.gen_interface(table, ctx, dcl),
            Definition::InterfaceForward(dcl) => self.gen_interface_forward(table, ctx, dcl),
            Definition::Value(dcl) => self.gen_concrete_value(table, ctx, dcl),
            Definition::ValueAbstract(dcl) => self.gen_abstract_value(table, ctx, dcl),
            Definition::ValueBox(dcl) => self.gen_value_box(table, ctx, dcl),
            Definition::ValueForward(dcl) => self.gen_value_forward(table, ctx, dcl),
            Definition::Type(dcl) => self.gen_type_dcl(table, ctx, dcl),
            Definition::Const(dcl) => self.gen_const(table, ctx, dcl),
            Definition::Except(dcl) => self.gen_except(table, ctx, dcl),
        }
    }

    fn gen_export(
        &mut self,
        table: &mut SymbolTable,
        ctx: BuildContext,
        owner: TypeId,
        export: &Export,
    ) -> Result<()> {
        match export {
            Export::Op(op) => self.gen_operation(table, ctx, owner, op),
            Export::Attr(attr) => self.gen_attribute(table, ctx, owner, attr),
            Export::Type(dcl) => self.gen_type_dcl(table, ctx, dcl),
            Export::Const(dcl) => self.gen_const(table, ctx, dcl),
            Export::Except(dcl) => self.gen_except(table, ctx, dcl),
        }
    }

    fn gen_operation(
        &mut self,
        table: &mut SymbolTable,
        ctx: BuildContext,
        owner: TypeId,
        op: &OpDcl,
    ) -> Result<()> {
        let return_ty = match &op.return_ty {
            None => TypeDesc::new(ClsType::Void),
            Some(spec) => self.resolve_spec(table, ctx.scope, spec)?,
        };
        let mut params = Vec::new();
        for param in &op.params {
            params.push(ParamDef {
                name: naming::cls_identifier(&param.name),
                ty: self.resolve_spec(table, ctx.scope, &param.ty)?,
                direction: param.direction,
            });
        }
        self.module.add_method(
            owner,
            MethodDef {
                name: naming::cls_identifier(&op.name),
                return_ty,
                params,
            },
        )?;
        Ok(())
    }

    fn gen_attribute(
        &mut self,
        table: &mut SymbolTable,
        ctx: BuildContext,
        owner: TypeId,
        attr: &AttrDcl,
    ) -> Result<()> {
        let ty = self.resolve_spec(table, ctx.scope, &attr.ty)?;
        for name in &attr.names {
            self.module.add_property(
                owner,
                PropertyDef {
                    name: naming::cls_identifier(name),
                    ty: ty.clone(),
                    has_setter: !attr.read_only,
                },
            )?;
        }
        Ok(())
    }

    fn gen_interface(
        &mut self,
        table: &mut SymbolTable,
        ctx: BuildContext,
        dcl: &InterfaceDcl,
    ) -> Result<()> {
        let symbol = self.symbol_for(table, ctx, &dcl.name)?;
        let qualified = table.fully_qualified_name(symbol);
        if self.registry.should_skip(&qualified) {
            debug!(name = %qualified, "skipping already declared interface");
            return Ok(());
        }
        let category = interface_category(&qualified, dcl.is_abstract, dcl.is_local)?;

        let mut bases = Vec::new();
        for base_name in &dcl.inherits {
            let (base_id, base_kind) = self.resolve_base(table, ctx, &qualified, base_name)?;
            match base_kind {
                TypeKind::Interface(base_category) => {
                    if dcl.is_abstract && base_category != InterfaceCategory::Abstract {
                        return Err(CodegenError::InvalidInheritance {
                            name: qualified,
                            detail: format!(
                                "abstract interface inherits non-abstract interface '{}'",
                                self.module.shape(base_id)?.name
                            ),
                        });
                    }
                }
                _ => {
                    return Err(CodegenError::InvalidInheritance {
                        name: qualified,
                        detail: format!(
                            "'{}' is not an interface",
                            self.module.shape(base_id)?.name
                        ),
                    });
                }
            }
            bases.push(ClsType::Named(base_id));
        }

        let forward = self.registry.forward_id(&qualified);
        let id = match forward {
            Some(id) => {
                for base in bases {
                    self.module.add_interface(id, base)?;
                }
                id
            }
            None => {
                let (cls_name, declaring) = self.placement(table, ctx, &dcl.name)?;
                let id = self.define(
                    cls_name,
                    TypeKind::Interface(category),
                    None,
                    bases,
                    declaring,
                )?;
                self.module.attach_annotation(
                    id,
                    TypeAnnotation::RepositoryId(table.repository_id(symbol)),
                )?;
                self.module
                    .attach_annotation(id, TypeAnnotation::InterfaceType(category))?;
                id
            }
        };

        let owned = table
            .symbol_scope(symbol)
            .ok_or_else(|| CodegenError::internal(format!("type '{qualified}' has no scope")))?;
        let body_ctx = BuildContext {
            scope: owned,
            container: Some(id),
        };
        for export in &dcl.body {
            self.gen_export(table, body_ctx, id, export)?;
        }

        self.module.complete_type(id)?;
        let desc = TypeDesc::new(ClsType::Named(id));
        if forward.is_some() {
            self.registry.complete_forward_decl(&qualified, desc)
        } else {
            self.registry.register_full_decl(qualified, desc)
        }
    }

    fn gen_interface_forward(
        &mut self,
        table: &mut SymbolTable,
        ctx: BuildContext,
        dcl: &InterfaceForwardDcl,
    ) -> Result<()> {
        let symbol = self.symbol_for(table, ctx, &dcl.name)?;
        let qualified = table.fully_qualified_name(symbol);
        if self.registry.should_skip(&qualified) || self.registry.is_forward_declared(&qualified) {
            return Ok(());
        }
        let category = interface_category(&qualified, dcl.is_abstract, dcl.is_local)?;
        let (cls_name, declaring) = self.placement(table, ctx, &dcl.name)?;
        let id = self.define(
            cls_name,
            TypeKind::Interface(category),
            None,
            Vec::new(),
            declaring,
        )?;
        self.module.attach_annotation(
            id,
            TypeAnnotation::RepositoryId(table.repository_id(symbol)),
        )?;
        self.module
            .attach_annotation(id, TypeAnnotation::InterfaceType(category))?;
        self.registry.register_forward_decl(qualified, id);
        Ok(())
    }

    fn gen_value_forward(
        &mut self,
        table: &mut SymbolTable,
        ctx: BuildContext,
        dcl: &ValueForwardDcl,
    ) -> Result<()> {
        let symbol = self.symbol_for(table, ctx, &dcl.name)?;
        let qualified = table.fully_qualified_name(symbol);
        if self.registry.should_skip(&qualified) || self.registry.is_forward_declared(&qualified) {
            return Ok(());
        }
        let kind = if dcl.is_abstract {
            TypeKind::AbstractValueType
        } else {
            TypeKind::ConcreteValueType
        };
        let (cls_name, declaring) = self.placement(table, ctx, &dcl.name)?;
        let id = self.define(cls_name, kind, None, Vec::new(), declaring)?;
        self.module.attach_annotation(
            id,
            TypeAnnotation::RepositoryId(table.repository_id(symbol)),
        )?;
        self.registry.register_forward_decl(qualified, id);
        Ok(())
    }

    fn gen_concrete_value(
        &mut self,
        table: &mut SymbolTable,
        ctx: BuildContext,
        dcl: &ValueDcl,
    ) -> Result<()> {
        let symbol = self.symbol_for(table, ctx, &dcl.name)?;
        let qualified = table.fully_qualified_name(symbol);
        if self.registry.should_skip(&qualified) {
            debug!(name = %qualified, "skipping already declared value type");
            return Ok(());
        }

        let mut base = None;
        let mut interfaces = Vec::new();
        for (index, base_name) in dcl.inherits.iter().enumerate() {
            let (base_id, base_kind) = self.resolve_base(table, ctx, &qualified, base_name)?;
            match base_kind {
                TypeKind::ConcreteValueType => {
                    if index != 0 {
                        return Err(CodegenError::InvalidInheritance {
                            name: qualified,
                            detail: "a concrete base value type must be first in the \
                                     inheritance list"
                                .to_string(),
                        });
                    }
                    base = Some(ClsType::Named(base_id));
                }
                TypeKind::AbstractValueType => interfaces.push(ClsType::Named(base_id)),
                _ => {
                    return Err(CodegenError::InvalidInheritance {
                        name: qualified,
                        detail: format!(
                            "'{}' is not a value type",
                            self.module.shape(base_id)?.name
                        ),
                    });
                }
            }
        }
        self.resolve_supports(table, ctx, &qualified, &dcl.supports, &mut interfaces)?;
        if dcl.is_custom {
            interfaces.push(ClsType::CustomMarshalled);
        }

        let forward = self.registry.forward_id(&qualified);
        let id = match forward {
            Some(id) => {
                if let Some(base) = base {
                    self.module.set_base(id, base)?;
                }
                for iface in interfaces {
                    self.module.add_interface(id, iface)?;
                }
                id
            }
            None => {
                let (cls_name, declaring) = self.placement(table, ctx, &dcl.name)?;
                let id = self.define(
                    cls_name,
                    TypeKind::ConcreteValueType,
                    base,
                    interfaces,
                    declaring,
                )?;
                self.module.attach_annotation(
                    id,
                    TypeAnnotation::RepositoryId(table.repository_id(symbol)),
                )?;
                id
            }
        };
        let impl_class = format!("{}Impl", self.module.shape(id)?.name);
        self.module
            .attach_annotation(id, TypeAnnotation::ImplClass(impl_class))?;
        self.module
            .attach_annotation(id, TypeAnnotation::Serializable)?;

        let owned = table
            .symbol_scope(symbol)
            .ok_or_else(|| CodegenError::internal(format!("type '{qualified}' has no scope")))?;
        let body_ctx = BuildContext {
            scope: owned,
            container: Some(id),
        };
        for element in &dcl.elements {
            match element {
                ValueElement::Export(export) => self.gen_export(table, body_ctx, id, export)?,
                ValueElement::State(state) => {
                    let ty = self.resolve_spec(table, body_ctx.scope, &state.ty)?;
                    for declarator in &state.declarators {
                        let ident = simple_ident(declarator)?;
                        let (name, visibility) = if state.is_private {
                            (naming::private_field_name(ident), Visibility::Family)
                        } else {
                            (naming::cls_identifier(ident), Visibility::Public)
                        };
                        self.module.add_field(
                            id,
                            FieldDef {
                                name,
                                ty: ty.clone(),
                                visibility,
                                is_static: false,
                                initializer: None,
                            },
                        )?;
                    }
                }
                ValueElement::Init { name } => {
                    return Err(CodegenError::unsupported(format!(
                        "value type constructor '{name}'"
                    )));
                }
            }
        }

        // The class must re-declare every operation and attribute of
        // its flattened interface closure as abstract members.
        let roots = self.module.shape(id)?.interfaces.clone();
        let (methods, properties) = flatten::collect_inherited_members(&self.module, &roots)?;
        for method in methods {
            if !self
                .module
                .shape(id)?
                .methods
                .iter()
                .any(|m| m.name == method.name)
            {
                self.module.add_method(id, method)?;
            }
        }
        for property in properties {
            if !self
                .module
                .shape(id)?
                .properties
                .iter()
                .any(|p| p.name == property.name)
            {
                self.module.add_property(id, property)?;
            }
        }

        self.value_impls_needed
            .push(self.module.shape(id)?.name.clone());
        self.module.complete_type(id)?;
        let desc = TypeDesc::new(ClsType::Named(id));
        if forward.is_some() {
            self.registry.complete_forward_decl(&qualified, desc)
        } else {
            self.registry.register_full_decl(qualified, desc)
        }
    }

    fn gen_abstract_value(
        &mut self,
        table: &mut SymbolTable,
        ctx: BuildContext,
        dcl: &ValueAbsDcl,
    ) -> Result<()> {
        let symbol = self.symbol_for(table, ctx, &dcl.name)?;
        let qualified = table.fully_qualified_name(symbol);
        if self.registry.should_skip(&qualified) {
            debug!(name = %qualified, "skipping already declared value type");
            return Ok(());
        }

        let mut interfaces = Vec::new();
        for base_name in &dcl.inherits {
            let (base_id, base_kind) = self.resolve_base(table, ctx, &qualified, base_name)?;
            if base_kind != TypeKind::AbstractValueType {
                return Err(CodegenError::InvalidInheritance {
                    name: qualified,
                    detail: format!(
                        "abstract value type inherits non-abstract '{}'",
                        self.module.shape(base_id)?.name
                    ),
                });
            }
            interfaces.push(ClsType::Named(base_id));
        }
        self.resolve_supports(table, ctx, &qualified, &dcl.supports, &mut interfaces)?;

        let forward = self.registry.forward_id(&qualified);
        let id = match forward {
            Some(id) => {
                for iface in interfaces {
                    self.module.add_interface(id, iface)?;
                }
                id
            }
            None => {
                let (cls_name, declaring) = self.placement(table, ctx, &dcl.name)?;
                let id = self.define(
                    cls_name,
                    TypeKind::AbstractValueType,
                    None,
                    interfaces,
                    declaring,
                )?;
                self.module.attach_annotation(
                    id,
                    TypeAnnotation::RepositoryId(table.repository_id(symbol)),
                )?;
                id
            }
        };

        let owned = table
            .symbol_scope(symbol)
            .ok_or_else(|| CodegenError::internal(format!("type '{qualified}' has no scope")))?;
        let body_ctx = BuildContext {
            scope: owned,
            container: Some(id),
        };
        for export in &dcl.body {
            self.gen_export(table, body_ctx, id, export)?;
        }

        self.module.complete_type(id)?;
        let desc = TypeDesc::new(ClsType::Named(id));
        if forward.is_some() {
            self.registry.complete_forward_decl(&qualified, desc)
        } else {
            self.registry.register_full_decl(qualified, desc)
        }
    }

    /// Resolves a support clause; only interfaces may be supported.
    fn resolve_supports(
        &self,
        table: &SymbolTable,
        ctx: BuildContext,
        heir: &str,
        supports: &[ScopedName],
        interfaces: &mut Vec<ClsType>,
    ) -> Result<()> {
        for name in supports {
            let (id, kind) = self.resolve_base(table, ctx, heir, name)?;
            match kind {
                TypeKind::Interface(_) => interfaces.push(ClsType::Named(id)),
                _ => {
                    return Err(CodegenError::InvalidInheritance {
                        name: heir.to_string(),
                        detail: format!(
                            "the support clause may only name interfaces, not '{}'",
                            self.module.shape(id)?.name
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    fn gen_value_box(
        &mut self,
        table: &mut SymbolTable,
        ctx: BuildContext,
        dcl: &ValueBoxDcl,
    ) -> Result<()> {
        let symbol = self.symbol_for(table, ctx, &dcl.name)?;
        let qualified = table.fully_qualified_name(symbol);
        if self.registry.should_skip(&qualified) {
            return Ok(());
        }
        let boxed = self.resolve_spec(table, ctx.scope, &dcl.boxed)?;
        let (cls_name, declaring) = self.placement(table, ctx, &dcl.name)?;
        let id = self.define(cls_name, TypeKind::BoxedValueType, None, Vec::new(), declaring)?;
        self.module.attach_annotation(
            id,
            TypeAnnotation::RepositoryId(table.repository_id(symbol)),
        )?;
        self.module
            .attach_annotation(id, TypeAnnotation::BoxedValue)?;
        self.module
            .attach_annotation(id, TypeAnnotation::Serializable)?;
        for annotation in &boxed.annotations {
            self.module.attach_annotation(id, annotation.clone())?;
        }
        self.module.add_field(
            id,
            FieldDef {
                name: "m_boxed".to_string(),
                ty: boxed,
                visibility: Visibility::Public,
                is_static: false,
                initializer: None,
            },
        )?;
        self.module.complete_type(id)?;
        self.registry
            .register_full_decl(qualified, TypeDesc::new(ClsType::Named(id)))
    }

    fn gen_type_dcl(
        &mut self,
        table: &mut SymbolTable,
        ctx: BuildContext,
        dcl: &TypeDcl,
    ) -> Result<()> {
        match dcl {
            TypeDcl::Struct(dcl) => self.gen_struct(table, ctx, dcl),
            TypeDcl::Union(dcl) => self.gen_union(table, ctx, dcl),
            TypeDcl::Enum(dcl) => self.gen_enum(table, ctx, dcl),
            TypeDcl::Typedef(dcl) => self.gen_typedef(table, ctx, dcl),
        }
    }

    fn gen_struct(
        &mut self,
        table: &mut SymbolTable,
        ctx: BuildContext,
        dcl: &StructDcl,
    ) -> Result<()> {
        let symbol = self.symbol_for(table, ctx, &dcl.name)?;
        let qualified = table.fully_qualified_name(symbol);
        if self.registry.should_skip(&qualified) {
            debug!(name = %qualified, "skipping already declared struct");
            return Ok(());
        }
        let (cls_name, declaring) = self.placement(table, ctx, &dcl.name)?;
        let id = self.define(cls_name, TypeKind::Struct, None, Vec::new(), declaring)?;
        self.module.attach_annotation(
            id,
            TypeAnnotation::RepositoryId(table.repository_id(symbol)),
        )?;
        self.module.attach_annotation(id, TypeAnnotation::IdlStruct)?;
        self.module
            .attach_annotation(id, TypeAnnotation::Serializable)?;
        self.add_members(table, ctx, id, &dcl.members)?;
        self.module.complete_type(id)?;
        self.registry
            .register_full_decl(qualified, TypeDesc::new(ClsType::Named(id)))
    }

    fn gen_except(
        &mut self,
        table: &mut SymbolTable,
        ctx: BuildContext,
        dcl: &ExceptDcl,
    ) -> Result<()> {
        let symbol = self.symbol_for(table, ctx, &dcl.name)?;
        let qualified = table.fully_qualified_name(symbol);
        if self.registry.should_skip(&qualified) {
            debug!(name = %qualified, "skipping already declared exception");
            return Ok(());
        }
        let (cls_name, declaring) = self.placement(table, ctx, &dcl.name)?;
        let id = self.define(
            cls_name,
            TypeKind::Exception,
            Some(ClsType::UserException),
            Vec::new(),
            declaring,
        )?;
        self.module.attach_annotation(
            id,
            TypeAnnotation::RepositoryId(table.repository_id(symbol)),
        )?;
        self.module
            .attach_annotation(id, TypeAnnotation::Serializable)?;
        self.add_members(table, ctx, id, &dcl.members)?;
        self.module.complete_type(id)?;
        self.registry
            .register_full_decl(qualified, TypeDesc::new(ClsType::Named(id)))
    }

    fn add_members(
        &mut self,
        table: &SymbolTable,
        ctx: BuildContext,
        id: TypeId,
        members: &[idlcls_ast::Member],
    ) -> Result<()> {
        for member in members {
            let ty = self.resolve_spec(table, ctx.scope, &member.ty)?;
            for declarator in &member.declarators {
                let ident = simple_ident(declarator)?;
                self.module.add_field(
                    id,
                    FieldDef::public(naming::cls_identifier(ident), ty.clone()),
                )?;
            }
        }
        Ok(())
    }

    fn gen_union(
        &mut self,
        table: &mut SymbolTable,
        ctx: BuildContext,
        dcl: &UnionDcl,
    ) -> Result<()> {
        let symbol = self.symbol_for(table, ctx, &dcl.name)?;
        let qualified = table.fully_qualified_name(symbol);
        if self.registry.should_skip(&qualified) {
            debug!(name = %qualified, "skipping already declared union");
            return Ok(());
        }
        let (cls_name, declaring) = self.placement(table, ctx, &dcl.name)?;
        let id = self.define(cls_name, TypeKind::Union, None, Vec::new(), declaring)?;
        self.module.attach_annotation(
            id,
            TypeAnnotation::RepositoryId(table.repository_id(symbol)),
        )?;
        self.module
            .attach_annotation(id, TypeAnnotation::Serializable)?;

        let discr_ty = self.resolve_spec(table, ctx.scope, &dcl.discriminator)?;
        let mut tracker = DiscriminatorTracker::new(&qualified, discr_ty, &self.module)?;
        for case in &dcl.cases {
            let mut labels = Vec::new();
            for label in &case.labels {
                match label {
                    CaseLabel::Default => labels.push(tracker.note_default()?),
                    CaseLabel::Value(expr) => {
                        let value = consts::evaluate(&self.resolver(table), ctx.scope, expr)?;
                        labels.push(tracker.check_value(value)?);
                    }
                }
            }
            let ty = self.resolve_spec(table, ctx.scope, &case.element_ty)?;
            let ident = simple_ident(&case.declarator)?;
            self.module.add_union_case(
                id,
                UnionCase {
                    field_name: naming::cls_identifier(ident),
                    ty,
                    labels,
                },
            )?;
        }
        self.module.set_discriminator(id, tracker.finish())?;
        self.module.complete_type(id)?;
        self.registry
            .register_full_decl(qualified, TypeDesc::new(ClsType::Named(id)))
    }

    fn gen_enum(
        &mut self,
        table: &mut SymbolTable,
        ctx: BuildContext,
        dcl: &EnumDcl,
    ) -> Result<()> {
        let symbol = self.symbol_for(table, ctx, &dcl.name)?;
        let qualified = table.fully_qualified_name(symbol);

        if self.registry.should_skip(&qualified) {
            // The generated type exists, but the enumerator symbols of
            // this document still need their literal values for later
            // constant expressions.
            let id = self.registry.resolve(&qualified)?.named_id().ok_or_else(|| {
                CodegenError::internal(format!("enum '{qualified}' resolved to a base type"))
            })?;
            self.update_enumerator_symbols(table, ctx, dcl, id)?;
            return Ok(());
        }

        let (cls_name, declaring) = self.placement(table, ctx, &dcl.name)?;
        let id = self.define(cls_name, TypeKind::Enum, None, Vec::new(), declaring)?;
        self.module.attach_annotation(
            id,
            TypeAnnotation::RepositoryId(table.repository_id(symbol)),
        )?;
        self.module.attach_annotation(id, TypeAnnotation::IdlEnum)?;
        for (index, name) in dcl.enumerators.iter().enumerate() {
            let value = enum_value(&qualified, index)?;
            self.module.add_enum_member(
                id,
                idlcls_core::EnumMemberDef {
                    name: naming::cls_identifier(name),
                    value,
                },
            )?;
        }
        self.update_enumerator_symbols(table, ctx, dcl, id)?;
        self.module.complete_type(id)?;
        self.registry
            .register_full_decl(qualified, TypeDesc::new(ClsType::Named(id)))
    }

    /// Stores the enumerated literal of each enumerator on its symbol.
    /// Enumerators live in the scope enclosing the enum.
    fn update_enumerator_symbols(
        &self,
        table: &mut SymbolTable,
        ctx: BuildContext,
        dcl: &EnumDcl,
        enum_type: TypeId,
    ) -> Result<()> {
        for (index, name) in dcl.enumerators.iter().enumerate() {
            let symbol = table.get_symbol(ctx.scope, name).ok_or_else(|| {
                CodegenError::internal(format!("no symbol for enumerator '{name}'"))
            })?;
            let value = enum_value(name, index)?;
            table.set_symbol_value(symbol, Literal::Enumerated { enum_type, value });
        }
        Ok(())
    }

    fn gen_typedef(
        &mut self,
        table: &mut SymbolTable,
        ctx: BuildContext,
        dcl: &TypedefDcl,
    ) -> Result<()> {
        let ty = self.resolve_spec(table, ctx.scope, &dcl.ty)?;
        for declarator in &dcl.declarators {
            let ident = simple_ident(declarator)?;
            let symbol = self.symbol_for(table, ctx, ident)?;
            let qualified = table.fully_qualified_name(symbol);
            if self.registry.should_skip(&qualified) {
                continue;
            }
            self.registry.register_type_alias(qualified, ty.clone())?;
        }
        Ok(())
    }

    fn gen_const(
        &mut self,
        table: &mut SymbolTable,
        ctx: BuildContext,
        dcl: &ConstDcl,
    ) -> Result<()> {
        let symbol = self.symbol_for(table, ctx, &dcl.name)?;
        let value = consts::evaluate(&self.resolver(table), ctx.scope, &dcl.value)?;
        table.set_symbol_value(symbol, value.clone());

        let ty = self.resolve_spec(table, ctx.scope, &dcl.ty)?;
        let (cls_name, declaring) = self.placement(table, ctx, &dcl.name)?;
        if self.module.lookup(&cls_name).is_some() {
            debug!(name = %cls_name, "skipping already declared constant");
            return Ok(());
        }
        let id = self.define(cls_name, TypeKind::ConstContainer, None, Vec::new(), declaring)?;
        self.module.add_field(
            id,
            FieldDef {
                name: "ConstVal".to_string(),
                ty,
                visibility: Visibility::Public,
                is_static: true,
                initializer: Some(value),
            },
        )?;
        self.module.complete_type(id)?;
        Ok(())
    }
}

fn interface_category(name: &str, is_abstract: bool, is_local: bool) -> Result<InterfaceCategory> {
    match (is_abstract, is_local) {
        (true, true) => Err(CodegenError::internal(format!(
            "interface '{name}' is both local and abstract"
        ))),
        (true, false) => Ok(InterfaceCategory::Abstract),
        (false, true) => Ok(InterfaceCategory::Local),
        (false, false) => Ok(InterfaceCategory::Concrete),
    }
}

fn simple_ident(declarator: &Declarator) -> Result<&str> {
    match declarator {
        Declarator::Simple(ident) => Ok(ident),
        Declarator::Complex(ident) => Err(CodegenError::unsupported(format!(
            "complex declarator '{ident}'"
        ))),
    }
}

fn enum_value(name: &str, index: usize) -> Result<i32> {
    i32::try_from(index)
        .map_err(|_| CodegenError::internal(format!("enum '{name}' has too many members")))
}

/// Declaration pass: populates the symbol table for one document.
/// Names already declared by an earlier document are reused.
fn declare_definition(
    table: &mut SymbolTable,
    scope: ScopeId,
    definition: &Definition,
) -> Result<()> {
    match definition {
        Definition::Module(module) => {
            let child = table.declare_module(scope, &module.name)?;
            for definition in &module.definitions {
                declare_definition(table, child, definition)?;
            }
            Ok(())
        }
        Definition::Interface(dcl) => {
            let symbol = declare_type(table, scope, &dcl.name)?;
            let owned = owned_scope(table, symbol, &dcl.name)?;
            for export in &dcl.body {
                declare_export(table, owned, export)?;
            }
            Ok(())
        }
        Definition::InterfaceForward(dcl) => {
            table.declare_forward_symbol(scope, &dcl.name)?;
            Ok(())
        }
        Definition::Value(dcl) => {
            let symbol = declare_type(table, scope, &dcl.name)?;
            let owned = owned_scope(table, symbol, &dcl.name)?;
            for element in &dcl.elements {
                if let ValueElement::Export(export) = element {
                    declare_export(table, owned, export)?;
                }
            }
            Ok(())
        }
        Definition::ValueAbstract(dcl) => {
            let symbol = declare_type(table, scope, &dcl.name)?;
            let owned = owned_scope(table, symbol, &dcl.name)?;
            for export in &dcl.body {
                declare_export(table, owned, export)?;
            }
            Ok(())
        }
        Definition::ValueBox(dcl) => {
            declare_type(table, scope, &dcl.name)?;
            Ok(())
        }
        Definition::ValueForward(dcl) => {
            table.declare_forward_symbol(scope, &dcl.name)?;
            Ok(())
        }
        Definition::Type(dcl) => declare_type_dcl(table, scope, dcl),
        Definition::Const(dcl) => {
            declare_const(table, scope, &dcl.name)?;
            Ok(())
        }
        Definition::Except(dcl) => {
            declare_type(table, scope, &dcl.name)?;
            Ok(())
        }
    }
}

fn declare_export(table: &mut SymbolTable, scope: ScopeId, export: &Export) -> Result<()> {
    match export {
        Export::Type(dcl) => declare_type_dcl(table, scope, dcl),
        Export::Const(dcl) => {
            declare_const(table, scope, &dcl.name)?;
            Ok(())
        }
        Export::Except(dcl) => {
            declare_type(table, scope, &dcl.name)?;
            Ok(())
        }
        Export::Attr(_) | Export::Op(_) => Ok(()),
    }
}

fn declare_type_dcl(table: &mut SymbolTable, scope: ScopeId, dcl: &TypeDcl) -> Result<()> {
    match dcl {
        TypeDcl::Struct(dcl) => {
            declare_type(table, scope, &dcl.name)?;
            Ok(())
        }
        TypeDcl::Union(dcl) => {
            declare_type(table, scope, &dcl.name)?;
            Ok(())
        }
        TypeDcl::Enum(dcl) => {
            declare_type(table, scope, &dcl.name)?;
            for enumerator in &dcl.enumerators {
                declare_enumerator(table, scope, enumerator)?;
            }
            Ok(())
        }
        TypeDcl::Typedef(dcl) => {
            for declarator in &dcl.declarators {
                declare_type(table, scope, declarator.ident())?;
            }
            Ok(())
        }
    }
}

fn declare_type(table: &mut SymbolTable, scope: ScopeId, name: &str) -> Result<SymbolId> {
    match table.get_symbol(scope, name) {
        Some(symbol)
            if table.symbol_kind(symbol) == SymbolKind::Type && !table.is_pending(symbol) =>
        {
            Ok(symbol)
        }
        _ => Ok(table.declare_type_symbol(scope, name)?),
    }
}

fn declare_const(table: &mut SymbolTable, scope: ScopeId, name: &str) -> Result<SymbolId> {
    match table.get_symbol(scope, name) {
        Some(symbol) if table.symbol_kind(symbol) == SymbolKind::Const => Ok(symbol),
        _ => Ok(table.declare_const_symbol(scope, name)?),
    }
}

fn declare_enumerator(table: &mut SymbolTable, scope: ScopeId, name: &str) -> Result<SymbolId> {
    match table.get_symbol(scope, name) {
        Some(symbol) if table.symbol_kind(symbol) == SymbolKind::Enumerator => Ok(symbol),
        _ => Ok(table.declare_enumerator(scope, name)?),
    }
}

fn owned_scope(table: &SymbolTable, symbol: SymbolId, name: &str) -> Result<ScopeId> {
    table
        .symbol_scope(symbol)
        .ok_or_else(|| CodegenError::internal(format!("type '{name}' has no scope")))
}
