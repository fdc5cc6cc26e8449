//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types.
//!
//! ```ignore
//! use idlcls::prelude::*;
//! ```

// Target type model
pub use idlcls_core::{
    ClsModule, ClsType, Literal, ModuleBuilder, TypeAnnotation, TypeDesc, TypeId, TypeKind,
    TypeShape,
};

// Input side
pub use idlcls_ast::{Definition, ScopedName, Specification, SymbolTable, TypeSpec};

// Generation
pub use idlcls_codegen::{
    CodegenError, CustomMappingTable, ExternalType, MetadataGenerator, ReferenceLibrary,
    Result as CodegenResult,
};
