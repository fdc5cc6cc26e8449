//! Typed literal values.
//!
//! Literals feed constant declarations, enum member values and union
//! discriminator labels. An enumerated literal carries the id of the
//! generated enum type so exact-type checks are possible.

use crate::builder::TypeId;
use crate::error::{Error, Result};

/// A typed literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Boolean literal.
    Boolean(bool),
    /// Integer literal (all IDL integer literals are held as i64).
    Integer(i64),
    /// Floating point literal.
    Float(f64),
    /// Character literal (narrow or wide).
    Char(char),
    /// String literal (narrow or wide).
    Str(String),
    /// A member of a generated enum type.
    Enumerated {
        /// The generated enum type.
        enum_type: TypeId,
        /// The member's integral value.
        value: i32,
    },
}

impl Literal {
    /// Returns a short name for the literal kind, used in diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Char(_) => "char",
            Self::Str(_) => "string",
            Self::Enumerated { .. } => "enumerated",
        }
    }

    /// Inverts the sign of a numeric literal (unary minus).
    ///
    /// # Errors
    /// Returns `Error::InvalidLiteralOperation` for non-numeric kinds.
    pub fn invert_sign(&mut self) -> Result<()> {
        match self {
            Self::Integer(v) => {
                *v = -*v;
                Ok(())
            }
            Self::Float(v) => {
                *v = -*v;
                Ok(())
            }
            other => Err(Error::InvalidLiteralOperation {
                operation: "sign inversion",
                kind: other.kind_name(),
            }),
        }
    }

    /// Returns the integer value, if this is an integer literal.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }
}
