//! AST node shapes for the supported IDL subset.
//!
//! The tree is a plain tagged-variant structure; each declaration kind
//! has its own struct and the generator matches exhaustively on the
//! enums. Constructs the compiler recognizes but does not support
//! (arrays, complex declarators, fixed point, long double, value type
//! constructors) are representable so the generator can reject them
//! with a dedicated unsupported-construct error instead of a parse
//! failure.

use idlcls_core::Literal;

/// One parsed IDL document.
#[derive(Debug, Clone, PartialEq)]
pub struct Specification {
    /// Top-level definitions in source order.
    pub definitions: Vec<Definition>,
}

/// A top-level or module-level definition.
#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    /// `module X { ... }`
    Module(ModuleDcl),
    /// Full interface declaration.
    Interface(InterfaceDcl),
    /// Interface forward declaration.
    InterfaceForward(InterfaceForwardDcl),
    /// Concrete value type declaration.
    Value(ValueDcl),
    /// Abstract value type declaration.
    ValueAbstract(ValueAbsDcl),
    /// Boxed value type declaration.
    ValueBox(ValueBoxDcl),
    /// Value type forward declaration.
    ValueForward(ValueForwardDcl),
    /// struct / union / enum / typedef.
    Type(TypeDcl),
    /// Constant declaration.
    Const(ConstDcl),
    /// Exception declaration.
    Except(ExceptDcl),
}

/// `module <ident> { <definitions> }`
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDcl {
    /// Module identifier.
    pub name: String,
    /// Contained definitions in source order.
    pub definitions: Vec<Definition>,
}

/// Full interface declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDcl {
    /// Interface identifier.
    pub name: String,
    /// `abstract interface`.
    pub is_abstract: bool,
    /// `local interface`.
    pub is_local: bool,
    /// Base interfaces from the inheritance spec.
    pub inherits: Vec<ScopedName>,
    /// Body exports in source order.
    pub body: Vec<Export>,
}

/// Interface forward declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceForwardDcl {
    /// Interface identifier.
    pub name: String,
    /// `abstract interface`.
    pub is_abstract: bool,
    /// `local interface`.
    pub is_local: bool,
}

/// Concrete value type declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueDcl {
    /// Value type identifier.
    pub name: String,
    /// `custom valuetype`.
    pub is_custom: bool,
    /// Value inheritance spec (base value types; a concrete base must
    /// be first).
    pub inherits: Vec<ScopedName>,
    /// `supports` clause (interfaces).
    pub supports: Vec<ScopedName>,
    /// Body elements in source order.
    pub elements: Vec<ValueElement>,
}

/// Abstract value type declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueAbsDcl {
    /// Value type identifier.
    pub name: String,
    /// Value inheritance spec (abstract value types only).
    pub inherits: Vec<ScopedName>,
    /// `supports` clause (interfaces).
    pub supports: Vec<ScopedName>,
    /// Body exports in source order.
    pub body: Vec<Export>,
}

/// Boxed value type declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueBoxDcl {
    /// Value type identifier.
    pub name: String,
    /// The boxed element type.
    pub boxed: TypeSpec,
}

/// Value type forward declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueForwardDcl {
    /// Value type identifier.
    pub name: String,
    /// `abstract valuetype`.
    pub is_abstract: bool,
}

/// struct / union / enum / typedef.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDcl {
    /// Struct declaration.
    Struct(StructDcl),
    /// Union declaration.
    Union(UnionDcl),
    /// Enum declaration.
    Enum(EnumDcl),
    /// Typedef declaration.
    Typedef(TypedefDcl),
}

/// A member of an interface or abstract value type body.
#[derive(Debug, Clone, PartialEq)]
pub enum Export {
    /// Nested type declaration.
    Type(TypeDcl),
    /// Nested constant.
    Const(ConstDcl),
    /// Nested exception.
    Except(ExceptDcl),
    /// Attribute declaration.
    Attr(AttrDcl),
    /// Operation declaration.
    Op(OpDcl),
}

/// A member of a concrete value type body.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueElement {
    /// An export as in interface bodies.
    Export(Export),
    /// A state member (field).
    State(StateMember),
    /// A constructor declaration (unsupported construct).
    Init {
        /// Constructor identifier.
        name: String,
    },
}

/// A value type state member.
#[derive(Debug, Clone, PartialEq)]
pub struct StateMember {
    /// `private` state member (maps to a protected prefixed field).
    pub is_private: bool,
    /// Member type.
    pub ty: TypeSpec,
    /// Declared identifiers.
    pub declarators: Vec<Declarator>,
}

/// Struct declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct StructDcl {
    /// Struct identifier.
    pub name: String,
    /// Members in declaration order.
    pub members: Vec<Member>,
}

/// A struct or exception member.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    /// Member type.
    pub ty: TypeSpec,
    /// Declared identifiers.
    pub declarators: Vec<Declarator>,
}

/// Union declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionDcl {
    /// Union identifier.
    pub name: String,
    /// Switch (discriminator) type.
    pub discriminator: TypeSpec,
    /// Cases in declaration order.
    pub cases: Vec<CaseDcl>,
}

/// One union case: labels plus element spec.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseDcl {
    /// Labels in declaration order.
    pub labels: Vec<CaseLabel>,
    /// Element type.
    pub element_ty: TypeSpec,
    /// Element declarator.
    pub declarator: Declarator,
}

/// A union case label.
#[derive(Debug, Clone, PartialEq)]
pub enum CaseLabel {
    /// `case <const_exp>:`
    Value(ConstExpr),
    /// `default:`
    Default,
}

/// Enum declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDcl {
    /// Enum identifier.
    pub name: String,
    /// Enumerator identifiers in declaration order.
    pub enumerators: Vec<String>,
}

/// Typedef declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedefDcl {
    /// The aliased type.
    pub ty: TypeSpec,
    /// Declared alias identifiers.
    pub declarators: Vec<Declarator>,
}

/// Constant declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstDcl {
    /// Constant type.
    pub ty: TypeSpec,
    /// Constant identifier.
    pub name: String,
    /// Constant expression.
    pub value: ConstExpr,
}

/// Exception declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ExceptDcl {
    /// Exception identifier.
    pub name: String,
    /// Members in declaration order.
    pub members: Vec<Member>,
}

/// Operation declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct OpDcl {
    /// Operation identifier.
    pub name: String,
    /// Return type; `None` is `void`.
    pub return_ty: Option<TypeSpec>,
    /// Parameters in declaration order.
    pub params: Vec<ParamDcl>,
    /// `raises` clause (accepted, not checked).
    pub raises: Vec<ScopedName>,
}

/// Operation parameter declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDcl {
    /// Parameter direction.
    pub direction: idlcls_core::ParamDirection,
    /// Parameter type.
    pub ty: TypeSpec,
    /// Parameter identifier.
    pub name: String,
}

/// Attribute declaration (one per readonly flag + type; may declare
/// several names).
#[derive(Debug, Clone, PartialEq)]
pub struct AttrDcl {
    /// `readonly attribute`.
    pub read_only: bool,
    /// Attribute type.
    pub ty: TypeSpec,
    /// Declared attribute identifiers.
    pub names: Vec<String>,
}

/// A declarator; complex (array) declarators are an unsupported
/// construct.
#[derive(Debug, Clone, PartialEq)]
pub enum Declarator {
    /// Plain identifier.
    Simple(String),
    /// Identifier with fixed array sizes.
    Complex(String),
}

impl Declarator {
    /// Returns the declared identifier regardless of declarator form.
    #[must_use]
    pub fn ident(&self) -> &str {
        match self {
            Self::Simple(ident) | Self::Complex(ident) => ident,
        }
    }
}

/// A type specification node.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeSpec {
    /// `float`
    Float,
    /// `double`
    Double,
    /// `long double` (unsupported construct).
    LongDouble,
    /// `short`
    Short,
    /// `long`
    Long,
    /// `long long`
    LongLong,
    /// `unsigned short`
    UShort,
    /// `unsigned long`
    ULong,
    /// `unsigned long long`
    ULongLong,
    /// `char`
    Char,
    /// `wchar`
    WChar,
    /// `boolean`
    Boolean,
    /// `octet`
    Octet,
    /// `any`
    Any,
    /// `Object`
    Object,
    /// `ValueBase`
    ValueBase,
    /// `string`
    String,
    /// `wstring`
    WString,
    /// `sequence<T>` / `sequence<T, bound>`
    Sequence {
        /// Element type.
        element: Box<TypeSpec>,
        /// Declared upper bound, if any (accepted with a warning,
        /// degraded to unbounded).
        bound: Option<u64>,
    },
    /// `fixed` (unsupported construct).
    Fixed,
    /// A scoped name referring to a declared type.
    Scoped(ScopedName),
}

/// A possibly file-scoped (`::`-prefixed) scoped name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopedName {
    /// Resolution starts at the top scope instead of the current one.
    pub is_file_scoped: bool,
    /// Name parts, outermost first.
    pub parts: Vec<String>,
}

impl ScopedName {
    /// Creates a relative single-part name.
    #[must_use]
    pub fn simple(name: impl Into<String>) -> Self {
        Self {
            is_file_scoped: false,
            parts: vec![name.into()],
        }
    }

    /// Creates a relative multi-part name.
    #[must_use]
    pub fn relative(parts: Vec<String>) -> Self {
        Self {
            is_file_scoped: false,
            parts,
        }
    }

    /// Renders the name in IDL `a::b::c` form for diagnostics.
    #[must_use]
    pub fn to_idl(&self) -> String {
        let joined = self.parts.join("::");
        if self.is_file_scoped {
            format!("::{joined}")
        } else {
            joined
        }
    }
}

/// A constant expression. Only literal-valued single-term expressions
/// (optionally signed) are supported.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstExpr {
    /// A literal value.
    Literal(Literal),
    /// A scoped name referring to a constant or enumerator symbol.
    Scoped(ScopedName),
    /// A unary operator application.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        operand: Box<ConstExpr>,
    },
    /// Any two-term operator application (unsupported construct).
    Binary {
        /// Operator token as written, for diagnostics.
        op: &'static str,
        /// Left operand.
        lhs: Box<ConstExpr>,
        /// Right operand.
        rhs: Box<ConstExpr>,
    },
}

/// Unary operators in constant expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `+` (no-op).
    Plus,
    /// `-` (sign inversion).
    Minus,
    /// `~` (unsupported construct).
    Negate,
}
