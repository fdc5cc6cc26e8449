//! Error types for symbol table construction and checks.

use thiserror::Error;

/// Error type for symbol table operations.
#[derive(Debug, Error)]
pub enum SymbolError {
    /// An identifier was declared twice in the same scope.
    #[error("identifier '{name}' already declared in scope '{scope}'")]
    DuplicateIdentifier {
        /// The duplicated identifier.
        name: String,
        /// Fully qualified name of the scope.
        scope: String,
    },

    /// A forward declaration was never followed by a full definition.
    #[error("forward declaration '{name}' has no full definition")]
    IncompleteForwardDecl {
        /// Fully qualified name of the forward-declared symbol.
        name: String,
    },
}

impl SymbolError {
    /// Creates a duplicate identifier error.
    pub fn duplicate(name: impl Into<String>, scope: impl Into<String>) -> Self {
        Self::DuplicateIdentifier {
            name: name.into(),
            scope: scope.into(),
        }
    }

    /// Creates an incomplete forward declaration error.
    pub fn incomplete_forward(name: impl Into<String>) -> Self {
        Self::IncompleteForwardDecl { name: name.into() }
    }
}
