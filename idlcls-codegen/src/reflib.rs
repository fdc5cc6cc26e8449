//! Reference libraries: previously generated or hand-written type
//! collections the current run builds against.
//!
//! Types found in a reference library override re-generation: an IDL
//! declaration whose qualified CLS name matches a reference type is
//! skipped, and usages resolve to the reference type. Interface
//! members are carried so the flattener can replicate them onto
//! concrete value types declared in this run.

use idlcls_core::{MethodDef, PropertyDef, TypeKind};

/// An externally declared type contributed by a reference library.
#[derive(Debug, Clone)]
pub struct ExternalType {
    /// Fully qualified CLS name.
    pub cls_name: String,
    /// Declaration kind.
    pub kind: TypeKind,
    /// Fully qualified names of implemented interfaces within the
    /// same or another reference library.
    pub interfaces: Vec<String>,
    /// Methods, for interface-kind types.
    pub methods: Vec<MethodDef>,
    /// Properties, for interface-kind types.
    pub properties: Vec<PropertyDef>,
}

impl ExternalType {
    /// Creates an external type with no members.
    #[must_use]
    pub fn new(cls_name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            cls_name: cls_name.into(),
            kind,
            interfaces: Vec::new(),
            methods: Vec::new(),
            properties: Vec::new(),
        }
    }
}

/// A named collection of externally declared types.
#[derive(Debug, Clone)]
pub struct ReferenceLibrary {
    /// Library display name, used in diagnostics.
    pub name: String,
    /// Contributed types.
    pub types: Vec<ExternalType>,
}

impl ReferenceLibrary {
    /// Creates an empty reference library.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: Vec::new(),
        }
    }

    /// Adds a type to the library.
    pub fn add_type(&mut self, ty: ExternalType) {
        self.types.push(ty);
    }
}
