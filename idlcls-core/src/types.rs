//! CLS type references, kinds and annotated type descriptors.
//!
//! A [`TypeDesc`] pairs a type reference with the metadata annotations
//! the IDL mapping attaches to it. Two descriptors for the same
//! underlying type but different annotations describe different IDL
//! constructs and must not compare equal.

use crate::builder::TypeId;

/// Reference to a CLS target type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClsType {
    /// No value (operation return only).
    Void,
    /// `System.Boolean`.
    Boolean,
    /// `System.Byte` (IDL octet).
    Byte,
    /// `System.Int16` (IDL short and unsigned short).
    Int16,
    /// `System.Int32` (IDL long and unsigned long).
    Int32,
    /// `System.Int64` (IDL long long and unsigned long long).
    Int64,
    /// `System.Char` (narrow or wide, distinguished by annotation).
    Char,
    /// `System.Single` (IDL float).
    Single,
    /// `System.Double` (IDL double).
    Double,
    /// `System.String` (narrow or wide, distinguished by annotation).
    String,
    /// `System.Object` (IDL any / ValueBase, distinguished by annotation).
    Object,
    /// `System.MarshalByRefObject` (IDL object reference base).
    RemoteObject,
    /// Base class of all generated user exceptions.
    UserException,
    /// Marker capability implemented by custom-marshalled value types.
    CustomMarshalled,
    /// A type declared in the module under construction or imported
    /// from a reference library.
    Named(TypeId),
    /// Array of the element type (IDL sequences map here).
    Array(Box<ClsType>),
}

impl ClsType {
    /// Returns true if this reference points at a declared type.
    #[must_use]
    pub const fn is_named(&self) -> bool {
        matches!(self, Self::Named(_))
    }

    /// Returns the declared type id, if any.
    #[must_use]
    pub const fn named_id(&self) -> Option<TypeId> {
        match self {
            Self::Named(id) => Some(*id),
            _ => None,
        }
    }
}

/// Interface category of an IDL interface declaration.
///
/// The categories are mutually exclusive; a local abstract interface
/// cannot be expressed in IDL and is rejected as an internal error by
/// the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterfaceCategory {
    /// Ordinary (concrete) interface.
    Concrete,
    /// `abstract interface`.
    Abstract,
    /// `local interface`.
    Local,
}

/// Distinguishes uses of `System.Object` in the mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// The IDL `any` type.
    Any,
    /// The IDL `ValueBase` type.
    ValueBase,
}

/// Metadata annotation attached to a generated type or to a type usage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeAnnotation {
    /// Stable cross-reference identifier (`IDL:...:1.0`).
    RepositoryId(String),
    /// Interface category marker.
    InterfaceType(InterfaceCategory),
    /// Narrow (`false`) or wide (`true`) character data.
    WideChar(bool),
    /// The string maps an IDL string rather than a wstring/char array.
    StringValue,
    /// The array maps an IDL sequence.
    IdlSequence,
    /// Which IDL construct a `System.Object` usage stands for.
    ObjectKind(ObjectKind),
    /// Name of the hand-written implementation class for a concrete
    /// value type.
    ImplClass(String),
    /// The type supports serialization.
    Serializable,
    /// The type maps an IDL struct.
    IdlStruct,
    /// The type maps an IDL enum.
    IdlEnum,
    /// The type is a boxed value wrapper.
    BoxedValue,
}

/// A resolved target type together with its attached annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDesc {
    /// The underlying CLS type.
    pub cls_type: ClsType,
    /// Annotations attached to this usage, in attachment order.
    pub annotations: Vec<TypeAnnotation>,
}

impl TypeDesc {
    /// Creates a descriptor with no annotations.
    #[must_use]
    pub const fn new(cls_type: ClsType) -> Self {
        Self {
            cls_type,
            annotations: Vec::new(),
        }
    }

    /// Creates a descriptor with the given annotations.
    #[must_use]
    pub const fn with_annotations(cls_type: ClsType, annotations: Vec<TypeAnnotation>) -> Self {
        Self {
            cls_type,
            annotations,
        }
    }

    /// Returns true if an annotation equal to `annotation` is attached.
    #[must_use]
    pub fn has_annotation(&self, annotation: &TypeAnnotation) -> bool {
        self.annotations.contains(annotation)
    }

    /// Returns the declared type id, if the underlying type is named.
    #[must_use]
    pub const fn named_id(&self) -> Option<TypeId> {
        self.cls_type.named_id()
    }
}

/// Kind of a declared target type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// IDL interface (concrete, abstract or local).
    Interface(InterfaceCategory),
    /// IDL abstract value type (interface-like, no state).
    AbstractValueType,
    /// IDL concrete value type (abstract class awaiting a hand-written
    /// implementation).
    ConcreteValueType,
    /// IDL boxed value type.
    BoxedValueType,
    /// IDL struct (sealed sequential-layout aggregate).
    Struct,
    /// IDL union.
    Union,
    /// IDL enum.
    Enum,
    /// IDL exception.
    Exception,
    /// Sealed container holding one constant value.
    ConstContainer,
}

impl TypeKind {
    /// Returns true for class-kind declarations, which may hold true
    /// nested types and receive flattened interface members.
    #[must_use]
    pub const fn is_class_kind(&self) -> bool {
        matches!(
            self,
            Self::ConcreteValueType
                | Self::BoxedValueType
                | Self::Struct
                | Self::Union
                | Self::Exception
                | Self::ConstContainer
        )
    }

    /// Returns true for interface-kind declarations.
    #[must_use]
    pub const fn is_interface_kind(&self) -> bool {
        matches!(self, Self::Interface(_) | Self::AbstractValueType)
    }

    /// Returns true for value-type declarations (concrete or abstract).
    #[must_use]
    pub const fn is_value_kind(&self) -> bool {
        matches!(self, Self::ConcreteValueType | Self::AbstractValueType)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descs_differ_by_annotation() {
        let narrow = TypeDesc::with_annotations(ClsType::Char, vec![TypeAnnotation::WideChar(false)]);
        let wide = TypeDesc::with_annotations(ClsType::Char, vec![TypeAnnotation::WideChar(true)]);
        assert_ne!(narrow, wide);
        assert_eq!(narrow.cls_type, wide.cls_type);
    }

    #[test]
    fn test_has_annotation() {
        let desc = TypeDesc::with_annotations(
            ClsType::Object,
            vec![TypeAnnotation::ObjectKind(ObjectKind::Any)],
        );
        assert!(desc.has_annotation(&TypeAnnotation::ObjectKind(ObjectKind::Any)));
        assert!(!desc.has_annotation(&TypeAnnotation::Serializable));
    }

    #[test]
    fn test_kind_predicates() {
        assert!(TypeKind::ConcreteValueType.is_class_kind());
        assert!(TypeKind::Struct.is_class_kind());
        assert!(!TypeKind::Interface(InterfaceCategory::Concrete).is_class_kind());
        assert!(TypeKind::AbstractValueType.is_interface_kind());
        assert!(TypeKind::AbstractValueType.is_value_kind());
        assert!(!TypeKind::Enum.is_value_kind());
    }

    #[test]
    fn test_named_id() {
        let id = TypeId::from_raw(3);
        assert_eq!(ClsType::Named(id).named_id(), Some(id));
        assert_eq!(ClsType::Boolean.named_id(), None);
    }
}
