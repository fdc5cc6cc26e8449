//! Error types for the CLS module builder.

use thiserror::Error;

/// Core error type for module builder operations.
///
/// Every variant here indicates misuse of the builder by the caller,
/// not malformed compiler input.
#[derive(Debug, Error)]
pub enum Error {
    /// A type with the same fully qualified name was already declared.
    #[error("duplicate type name '{name}'")]
    DuplicateTypeName {
        /// The conflicting fully qualified name.
        name: String,
    },

    /// A type id did not refer to a declared type.
    #[error("unknown type id {id}")]
    UnknownType {
        /// The raw id value.
        id: u32,
    },

    /// A mutating operation was attempted on a completed type.
    #[error("type '{name}' is already complete and cannot be modified")]
    TypeAlreadyComplete {
        /// Fully qualified name of the completed type.
        name: String,
    },

    /// The module was finalized while a type was still building.
    #[error("type '{name}' was never completed")]
    IncompleteType {
        /// Fully qualified name of the incomplete type.
        name: String,
    },

    /// An operation was applied to a literal of an unsuitable kind.
    #[error("cannot apply {operation} to a {kind} literal")]
    InvalidLiteralOperation {
        /// The attempted operation.
        operation: &'static str,
        /// The literal kind it was applied to.
        kind: &'static str,
    },
}

/// Result type alias for module builder operations.
pub type Result<T> = std::result::Result<T, Error>;
