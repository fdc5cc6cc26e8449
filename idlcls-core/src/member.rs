//! Member definitions added to types under construction.

use crate::literal::Literal;
use crate::types::TypeDesc;

/// Field visibility in the target type system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Publicly accessible.
    Public,
    /// Accessible to the type and derived types (protected). Used for
    /// private IDL state members.
    Family,
}

/// Direction of an operation parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamDirection {
    /// `in` parameter.
    In,
    /// `out` parameter.
    Out,
    /// `inout` parameter.
    InOut,
}

/// An operation parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDef {
    /// Parameter name (already mapped to a legal CLS identifier).
    pub name: String,
    /// Parameter type with annotations.
    pub ty: TypeDesc,
    /// Parameter direction.
    pub direction: ParamDirection,
}

/// A field on a type under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// Field name (already mapped to a legal CLS identifier).
    pub name: String,
    /// Field type with annotations.
    pub ty: TypeDesc,
    /// Field visibility.
    pub visibility: Visibility,
    /// Static (per-type) rather than per-instance.
    pub is_static: bool,
    /// Value assigned in the static initializer, for constant fields.
    pub initializer: Option<Literal>,
}

impl FieldDef {
    /// Creates a public instance field without initializer.
    #[must_use]
    pub const fn public(name: String, ty: TypeDesc) -> Self {
        Self {
            name,
            ty,
            visibility: Visibility::Public,
            is_static: false,
            initializer: None,
        }
    }
}

/// An abstract virtual method on a type under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDef {
    /// Method name (already mapped to a legal CLS identifier).
    pub name: String,
    /// Return type with annotations.
    pub return_ty: TypeDesc,
    /// Parameters in declaration order.
    pub params: Vec<ParamDef>,
}

/// An abstract property (IDL attribute) on a type under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDef {
    /// Property name (already mapped to a legal CLS identifier).
    pub name: String,
    /// Property type; its annotations are replicated to the accessor
    /// parameter and return positions.
    pub ty: TypeDesc,
    /// Whether a setter accessor is generated (read-write attribute).
    pub has_setter: bool,
}

/// A member of a generated enum type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMemberDef {
    /// Enumerator name.
    pub name: String,
    /// Assigned integral value (declaration order, starting at 0).
    pub value: i32,
}

/// A union case label: a concrete value or the default sentinel.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscriminatorValue {
    /// An explicit discriminator value.
    Value(Literal),
    /// The `default` case.
    Default,
}

impl DiscriminatorValue {
    /// Returns true for the default sentinel.
    #[must_use]
    pub const fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }
}

/// One case of a union: element field plus its labels.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionCase {
    /// Element field name.
    pub field_name: String,
    /// Element type with annotations.
    pub ty: TypeDesc,
    /// The labels selecting this case.
    pub labels: Vec<DiscriminatorValue>,
}
