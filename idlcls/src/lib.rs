//! # idlcls
//!
//! A compiler back end translating parsed OMG IDL into CLS-style type
//! metadata.
//!
//! idlcls consumes abstract syntax trees and a symbol table produced by
//! an IDL front end and generates the nominal type declarations the
//! IDL-to-CLS mapping prescribes: interfaces, value types, structs,
//! unions, enums, exceptions and constant containers, with repository
//! ids and mapping annotations attached.
//!
//! ## Quick Start
//!
//! ```ignore
//! use idlcls::prelude::*;
//!
//! let mut generator = MetadataGenerator::new(
//!     "MyModule",
//!     &reference_libraries,
//!     CustomMappingTable::new(),
//! )?;
//!
//! let mut table = SymbolTable::new();
//! for document in documents {
//!     generator.generate(&document, &mut table)?;
//! }
//! let (module, impls_needed) = generator.finish()?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`] - Target type model, literals and the module builder
//! - [`ast`] - IDL AST node shapes and the scope/symbol table
//! - [`codegen`] - The metadata generator and its collaborators

pub mod prelude;

/// Target type model and module builder.
pub mod core {
    pub use idlcls_core::*;
}

/// IDL AST node shapes and the symbol table.
pub mod ast {
    pub use idlcls_ast::*;
}

/// Metadata generation from parsed documents.
pub mod codegen {
    pub use idlcls_codegen::*;
}
