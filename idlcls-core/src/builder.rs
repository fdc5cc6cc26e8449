//! Two-phase CLS module builder.
//!
//! Types are declared first (reserving name, kind and attribute slots),
//! mutated while in the building state, and then completed exactly
//! once. A completed shape is frozen; any further mutation is reported
//! as builder misuse. Externally known types (from reference libraries)
//! are interned as already-complete shapes so consumers can traverse
//! in-run and external types uniformly.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::member::{EnumMemberDef, FieldDef, MethodDef, PropertyDef, UnionCase};
use crate::types::{ClsType, TypeAnnotation, TypeDesc, TypeKind};

/// Identifier of a type declared in a [`ModuleBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    /// Creates an id from its raw value.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Discriminator information attached to a union type.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionDiscriminator {
    /// Discriminator type with annotations.
    pub ty: TypeDesc,
    /// Explicitly covered discriminator values (deduplicated).
    pub covered: Vec<crate::literal::Literal>,
    /// Whether a default case is present.
    pub has_default: bool,
}

/// The shape of a declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeShape {
    /// Fully qualified CLS name.
    pub name: String,
    /// Declaration kind.
    pub kind: TypeKind,
    /// Base class, if any.
    pub base: Option<ClsType>,
    /// Implemented interfaces (may include marker capabilities).
    pub interfaces: Vec<ClsType>,
    /// Type-level annotations.
    pub annotations: Vec<TypeAnnotation>,
    /// Fields in declaration order.
    pub fields: Vec<FieldDef>,
    /// Methods in declaration order.
    pub methods: Vec<MethodDef>,
    /// Properties in declaration order.
    pub properties: Vec<PropertyDef>,
    /// Enum members (enum kinds only).
    pub enum_members: Vec<EnumMemberDef>,
    /// Union discriminator (union kinds only).
    pub discriminator: Option<UnionDiscriminator>,
    /// Union cases (union kinds only).
    pub union_cases: Vec<UnionCase>,
    /// Enclosing type for true nested declarations.
    pub declaring_type: Option<TypeId>,
    /// The type came from a reference library, not this generation run.
    pub external: bool,
}

impl TypeShape {
    /// Creates an empty shape with the given name and kind.
    #[must_use]
    pub fn new(name: String, kind: TypeKind) -> Self {
        Self {
            name,
            kind,
            base: None,
            interfaces: Vec::new(),
            annotations: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            properties: Vec::new(),
            enum_members: Vec::new(),
            discriminator: None,
            union_cases: Vec::new(),
            declaring_type: None,
            external: false,
        }
    }
}

/// Build state of a declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypeState {
    /// Members and inheritance may still be added.
    Building,
    /// Frozen; mutation is builder misuse.
    Complete,
}

#[derive(Debug, Clone)]
struct TypeEntry {
    shape: TypeShape,
    state: TypeState,
}

/// Builder collecting all types generated into one output module.
///
/// Shared across all documents of a multi-document build.
#[derive(Debug, Clone)]
pub struct ModuleBuilder {
    name: String,
    entries: Vec<TypeEntry>,
    by_name: HashMap<String, TypeId>,
}

impl ModuleBuilder {
    /// Creates an empty module builder for the named output module.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Returns the output module name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declares a new top-level type in the building state.
    ///
    /// # Errors
    /// Returns `Error::DuplicateTypeName` if the name is taken.
    pub fn define_type(
        &mut self,
        name: impl Into<String>,
        kind: TypeKind,
        base: Option<ClsType>,
        interfaces: Vec<ClsType>,
    ) -> Result<TypeId> {
        let mut shape = TypeShape::new(name.into(), kind);
        shape.base = base;
        shape.interfaces = interfaces;
        self.insert(shape, TypeState::Building)
    }

    /// Declares a new type nested inside a class-kind declaring type.
    ///
    /// # Errors
    /// Returns `Error::DuplicateTypeName` if the name is taken, or
    /// `Error::UnknownType` if the declaring id is invalid.
    pub fn define_nested_type(
        &mut self,
        declaring: TypeId,
        name: impl Into<String>,
        kind: TypeKind,
        base: Option<ClsType>,
        interfaces: Vec<ClsType>,
    ) -> Result<TypeId> {
        self.entry(declaring)?;
        let mut shape = TypeShape::new(name.into(), kind);
        shape.base = base;
        shape.interfaces = interfaces;
        shape.declaring_type = Some(declaring);
        self.insert(shape, TypeState::Building)
    }

    /// Interns an externally declared type as an already-complete shape.
    ///
    /// # Errors
    /// Returns `Error::DuplicateTypeName` if the name is taken.
    pub fn intern_external(&mut self, mut shape: TypeShape) -> Result<TypeId> {
        shape.external = true;
        self.insert(shape, TypeState::Complete)
    }

    fn insert(&mut self, shape: TypeShape, state: TypeState) -> Result<TypeId> {
        if self.by_name.contains_key(&shape.name) {
            return Err(Error::DuplicateTypeName { name: shape.name });
        }
        let id = TypeId(u32::try_from(self.entries.len()).unwrap_or(u32::MAX));
        self.by_name.insert(shape.name.clone(), id);
        self.entries.push(TypeEntry { shape, state });
        Ok(id)
    }

    fn entry(&self, id: TypeId) -> Result<&TypeEntry> {
        self.entries
            .get(id.0 as usize)
            .ok_or(Error::UnknownType { id: id.0 })
    }

    /// Returns the shape under the given id, in any state.
    ///
    /// # Errors
    /// Returns `Error::UnknownType` for an invalid id.
    pub fn shape(&self, id: TypeId) -> Result<&TypeShape> {
        self.entry(id).map(|e| &e.shape)
    }

    /// Returns the mutable shape if the type is still building.
    ///
    /// # Errors
    /// Returns `Error::TypeAlreadyComplete` for a completed type and
    /// `Error::UnknownType` for an invalid id.
    pub fn building_mut(&mut self, id: TypeId) -> Result<&mut TypeShape> {
        let entry = self
            .entries
            .get_mut(id.0 as usize)
            .ok_or(Error::UnknownType { id: id.0 })?;
        match entry.state {
            TypeState::Building => Ok(&mut entry.shape),
            TypeState::Complete => Err(Error::TypeAlreadyComplete {
                name: entry.shape.name.clone(),
            }),
        }
    }

    /// Returns true once the type has been completed.
    ///
    /// # Errors
    /// Returns `Error::UnknownType` for an invalid id.
    pub fn is_complete(&self, id: TypeId) -> Result<bool> {
        Ok(self.entry(id)?.state == TypeState::Complete)
    }

    /// Looks up a type id by fully qualified name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    /// Adds a field to a building type.
    ///
    /// # Errors
    /// Builder misuse errors as for [`Self::building_mut`].
    pub fn add_field(&mut self, id: TypeId, field: FieldDef) -> Result<()> {
        self.building_mut(id)?.fields.push(field);
        Ok(())
    }

    /// Adds a method to a building type.
    ///
    /// # Errors
    /// Builder misuse errors as for [`Self::building_mut`].
    pub fn add_method(&mut self, id: TypeId, method: MethodDef) -> Result<()> {
        self.building_mut(id)?.methods.push(method);
        Ok(())
    }

    /// Adds a property to a building type.
    ///
    /// # Errors
    /// Builder misuse errors as for [`Self::building_mut`].
    pub fn add_property(&mut self, id: TypeId, property: PropertyDef) -> Result<()> {
        self.building_mut(id)?.properties.push(property);
        Ok(())
    }

    /// Adds an enum member to a building enum type.
    ///
    /// # Errors
    /// Builder misuse errors as for [`Self::building_mut`].
    pub fn add_enum_member(&mut self, id: TypeId, member: EnumMemberDef) -> Result<()> {
        self.building_mut(id)?.enum_members.push(member);
        Ok(())
    }

    /// Adds a union case to a building union type.
    ///
    /// # Errors
    /// Builder misuse errors as for [`Self::building_mut`].
    pub fn add_union_case(&mut self, id: TypeId, case: UnionCase) -> Result<()> {
        self.building_mut(id)?.union_cases.push(case);
        Ok(())
    }

    /// Sets the discriminator of a building union type.
    ///
    /// # Errors
    /// Builder misuse errors as for [`Self::building_mut`].
    pub fn set_discriminator(&mut self, id: TypeId, discr: UnionDiscriminator) -> Result<()> {
        self.building_mut(id)?.discriminator = Some(discr);
        Ok(())
    }

    /// Attaches a type-level annotation to a building type.
    ///
    /// # Errors
    /// Builder misuse errors as for [`Self::building_mut`].
    pub fn attach_annotation(&mut self, id: TypeId, annotation: TypeAnnotation) -> Result<()> {
        self.building_mut(id)?.annotations.push(annotation);
        Ok(())
    }

    /// Sets the base class of a building type (forward-decl completion).
    ///
    /// # Errors
    /// Builder misuse errors as for [`Self::building_mut`].
    pub fn set_base(&mut self, id: TypeId, base: ClsType) -> Result<()> {
        self.building_mut(id)?.base = Some(base);
        Ok(())
    }

    /// Adds an implemented interface to a building type, skipping
    /// duplicates.
    ///
    /// # Errors
    /// Builder misuse errors as for [`Self::building_mut`].
    pub fn add_interface(&mut self, id: TypeId, interface: ClsType) -> Result<()> {
        let shape = self.building_mut(id)?;
        if !shape.interfaces.contains(&interface) {
            shape.interfaces.push(interface);
        }
        Ok(())
    }

    /// Freezes a building type. Exactly-once transition.
    ///
    /// # Errors
    /// Returns `Error::TypeAlreadyComplete` if completed before.
    pub fn complete_type(&mut self, id: TypeId) -> Result<()> {
        let entry = self
            .entries
            .get_mut(id.0 as usize)
            .ok_or(Error::UnknownType { id: id.0 })?;
        if entry.state == TypeState::Complete {
            return Err(Error::TypeAlreadyComplete {
                name: entry.shape.name.clone(),
            });
        }
        entry.state = TypeState::Complete;
        Ok(())
    }

    /// Returns a displayable name for a type reference.
    #[must_use]
    pub fn display_name(&self, ty: &ClsType) -> String {
        match ty {
            ClsType::Void => "System.Void".to_string(),
            ClsType::Boolean => "System.Boolean".to_string(),
            ClsType::Byte => "System.Byte".to_string(),
            ClsType::Int16 => "System.Int16".to_string(),
            ClsType::Int32 => "System.Int32".to_string(),
            ClsType::Int64 => "System.Int64".to_string(),
            ClsType::Char => "System.Char".to_string(),
            ClsType::Single => "System.Single".to_string(),
            ClsType::Double => "System.Double".to_string(),
            ClsType::String => "System.String".to_string(),
            ClsType::Object => "System.Object".to_string(),
            ClsType::RemoteObject => "System.MarshalByRefObject".to_string(),
            ClsType::UserException => "AbstractUserException".to_string(),
            ClsType::CustomMarshalled => "ICustomMarshalled".to_string(),
            ClsType::Named(id) => self
                .shape(*id)
                .map_or_else(|_| format!("<unknown:{}>", id.0), |s| s.name.clone()),
            ClsType::Array(elem) => format!("{}[]", self.display_name(elem)),
        }
    }

    /// Returns the kind of a named type reference, if it is one.
    #[must_use]
    pub fn kind_of(&self, ty: &ClsType) -> Option<TypeKind> {
        ty.named_id().and_then(|id| self.shape(id).ok()).map(|s| s.kind)
    }

    /// Finalizes the module into an immutable [`ClsModule`].
    ///
    /// # Errors
    /// Returns `Error::IncompleteType` naming the first type that was
    /// never completed.
    pub fn finish(self) -> Result<ClsModule> {
        if let Some(entry) = self
            .entries
            .iter()
            .find(|e| e.state == TypeState::Building)
        {
            return Err(Error::IncompleteType {
                name: entry.shape.name.clone(),
            });
        }
        Ok(ClsModule {
            name: self.name,
            types: self.entries.into_iter().map(|e| e.shape).collect(),
            by_name: self.by_name,
        })
    }
}

/// Immutable, fully generated output module.
#[derive(Debug, Clone)]
pub struct ClsModule {
    name: String,
    types: Vec<TypeShape>,
    by_name: HashMap<String, TypeId>,
}

impl ClsModule {
    /// Returns the module name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the shape for a type id.
    #[must_use]
    pub fn get(&self, id: TypeId) -> Option<&TypeShape> {
        self.types.get(id.raw() as usize)
    }

    /// Looks up a type id by fully qualified name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    /// Iterates over all types, external imports included.
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &TypeShape)> {
        self.types
            .iter()
            .enumerate()
            .map(|(i, s)| (TypeId(u32::try_from(i).unwrap_or(u32::MAX)), s))
    }

    /// Number of types generated in this run (externals excluded).
    #[must_use]
    pub fn generated_count(&self) -> usize {
        self.types.iter().filter(|s| !s.external).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InterfaceCategory;

    fn builder() -> ModuleBuilder {
        ModuleBuilder::new("out")
    }

    #[test]
    fn test_define_and_complete() {
        let mut module = builder();
        let id = module
            .define_type("A.Foo", TypeKind::Struct, None, Vec::new())
            .unwrap();
        assert!(!module.is_complete(id).unwrap());
        module
            .add_field(id, FieldDef::public("x".into(), TypeDesc::new(ClsType::Int32)))
            .unwrap();
        module.complete_type(id).unwrap();
        assert!(module.is_complete(id).unwrap());
        assert_eq!(module.shape(id).unwrap().fields.len(), 1);
    }

    #[test]
    fn test_mutation_after_complete_is_error() {
        let mut module = builder();
        let id = module
            .define_type("A.Foo", TypeKind::Struct, None, Vec::new())
            .unwrap();
        module.complete_type(id).unwrap();
        let err = module
            .add_field(id, FieldDef::public("x".into(), TypeDesc::new(ClsType::Int32)))
            .unwrap_err();
        assert!(matches!(err, Error::TypeAlreadyComplete { .. }));
    }

    #[test]
    fn test_complete_twice_is_error() {
        let mut module = builder();
        let id = module
            .define_type("A.Foo", TypeKind::Enum, None, Vec::new())
            .unwrap();
        module.complete_type(id).unwrap();
        assert!(matches!(
            module.complete_type(id),
            Err(Error::TypeAlreadyComplete { .. })
        ));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut module = builder();
        module
            .define_type("A.Foo", TypeKind::Struct, None, Vec::new())
            .unwrap();
        assert!(matches!(
            module.define_type("A.Foo", TypeKind::Enum, None, Vec::new()),
            Err(Error::DuplicateTypeName { .. })
        ));
    }

    #[test]
    fn test_finish_rejects_incomplete() {
        let mut module = builder();
        module
            .define_type(
                "A.I",
                TypeKind::Interface(InterfaceCategory::Concrete),
                None,
                Vec::new(),
            )
            .unwrap();
        assert!(matches!(module.finish(), Err(Error::IncompleteType { .. })));
    }

    #[test]
    fn test_intern_external_is_complete() {
        let mut module = builder();
        let id = module
            .intern_external(TypeShape::new(
                "Refs.Known".to_string(),
                TypeKind::Interface(InterfaceCategory::Concrete),
            ))
            .unwrap();
        assert!(module.is_complete(id).unwrap());
        assert!(module.shape(id).unwrap().external);
        let out = module.finish().unwrap();
        assert_eq!(out.generated_count(), 0);
    }

    #[test]
    fn test_add_interface_dedupes() {
        let mut module = builder();
        let i = module
            .define_type(
                "A.I",
                TypeKind::Interface(InterfaceCategory::Concrete),
                None,
                Vec::new(),
            )
            .unwrap();
        let v = module
            .define_type("A.V", TypeKind::ConcreteValueType, None, Vec::new())
            .unwrap();
        module.add_interface(v, ClsType::Named(i)).unwrap();
        module.add_interface(v, ClsType::Named(i)).unwrap();
        assert_eq!(module.shape(v).unwrap().interfaces.len(), 1);
    }

    #[test]
    fn test_display_name() {
        let mut module = builder();
        let id = module
            .define_type("A.Foo", TypeKind::Struct, None, Vec::new())
            .unwrap();
        assert_eq!(module.display_name(&ClsType::Named(id)), "A.Foo");
        assert_eq!(
            module.display_name(&ClsType::Array(Box::new(ClsType::Int16))),
            "System.Int16[]"
        );
    }

    #[test]
    fn test_nested_type_records_declaring() {
        let mut module = builder();
        let outer = module
            .define_type("A.Outer", TypeKind::ConcreteValueType, None, Vec::new())
            .unwrap();
        let inner = module
            .define_nested_type(outer, "A.Outer.Inner", TypeKind::Struct, None, Vec::new())
            .unwrap();
        assert_eq!(module.shape(inner).unwrap().declaring_type, Some(outer));
    }
}
