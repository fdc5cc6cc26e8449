//! Error types for metadata generation.
//!
//! Variants fall into three families the driver treats differently:
//! invalid compiler input (bad IDL semantics), recognized-but-
//! unsupported constructs, and internal invariant violations that
//! indicate a generator bug rather than bad input.

use idlcls_ast::SymbolError;
use thiserror::Error;

/// Error type for metadata generation.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// A scoped name did not resolve in the current scope or any
    /// lexical ancestor.
    #[error("cannot resolve name '{name}' from scope '{scope}'")]
    UnresolvableName {
        /// The scoped name as written.
        name: String,
        /// Fully qualified name of the scope resolution started in.
        scope: String,
    },

    /// A name resolved to a symbol with no declared type behind it.
    #[error("type '{name}' was used before any declaration was seen")]
    TypeNotSeenBefore {
        /// Fully qualified name of the symbol.
        name: String,
    },

    /// A type inherits from a base that is only forward-declared.
    #[error("type '{name}' inherits from '{base}', which is only forward-declared")]
    InheritsForwardOnly {
        /// The inheriting type.
        name: String,
        /// The forward-only base.
        base: String,
    },

    /// The inheritance or support clause of a declaration is illegal.
    #[error("invalid inheritance for '{name}': {detail}")]
    InvalidInheritance {
        /// The declaring type.
        name: String,
        /// What is wrong with the clause.
        detail: String,
    },

    /// A union discriminator type or case label is illegal.
    #[error("invalid discriminator for union '{union}': {detail}")]
    InvalidDiscriminatorValue {
        /// The union being built.
        union: String,
        /// Which rule the label or type violates.
        detail: String,
    },

    /// Two case labels of a union cover the same value.
    #[error("duplicate discriminator value {value} in union '{union}'")]
    DuplicateDiscriminatorValue {
        /// The union being built.
        union: String,
        /// Display form of the duplicated value.
        value: String,
    },

    /// A union declares more than one default case.
    #[error("union '{union}' has more than one default case")]
    MultipleDefaultCases {
        /// The union being built.
        union: String,
    },

    /// A constant expression referenced a symbol without a value.
    #[error("symbol '{name}' has no constant value")]
    NoValueForSymbol {
        /// Fully qualified name of the symbol.
        name: String,
    },

    /// A forward-declared type was never fully declared.
    #[error("type '{name}' is forward-declared but never defined")]
    UnresolvedForwardDecl {
        /// Fully qualified name of the type.
        name: String,
    },

    /// Symbol table construction or completeness check failed.
    #[error(transparent)]
    Symbol(#[from] SymbolError),

    /// The input uses an IDL construct this generator does not map.
    #[error("unsupported construct: {construct}")]
    Unsupported {
        /// The recognized construct.
        construct: String,
    },

    /// A generator invariant was violated; this is a bug, not bad
    /// input.
    #[error("internal error: {message}")]
    Internal {
        /// Description of the violated invariant.
        message: String,
    },
}

impl CodegenError {
    /// Creates an unsupported-construct error.
    pub fn unsupported(construct: impl Into<String>) -> Self {
        Self::Unsupported {
            construct: construct.into(),
        }
    }

    /// Creates an internal invariant error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Creates an unresolvable-name error.
    pub fn unresolvable(name: impl Into<String>, scope: impl Into<String>) -> Self {
        Self::UnresolvableName {
            name: name.into(),
            scope: scope.into(),
        }
    }
}

impl From<idlcls_core::Error> for CodegenError {
    fn from(err: idlcls_core::Error) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}

/// Result type alias for metadata generation.
pub type Result<T> = std::result::Result<T, CodegenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_misuse_maps_to_internal() {
        let core_err = idlcls_core::Error::UnknownType { id: 7 };
        let err: CodegenError = core_err.into();
        assert!(matches!(err, CodegenError::Internal { .. }));
    }

    #[test]
    fn test_display_forms() {
        let err = CodegenError::unresolvable("::A::B", "X");
        assert_eq!(
            err.to_string(),
            "cannot resolve name '::A::B' from scope 'X'"
        );
        let err = CodegenError::unsupported("fixed point type");
        assert_eq!(err.to_string(), "unsupported construct: fixed point type");
    }
}
