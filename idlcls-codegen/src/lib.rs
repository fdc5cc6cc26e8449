//! # idlcls Codegen
//!
//! Translates parsed IDL documents into CLS-style type metadata.
//!
//! This crate provides:
//! - The [`MetadataGenerator`] driving a multi-document compilation run
//! - A declaration-state registry with skip logic for reference
//!   libraries and re-processed documents
//! - Scoped name and type specification resolution with custom mapping
//!   overrides
//! - Constant expression evaluation, union discriminator validation
//!   and inheritance flattening
//!
//! The input side (ASTs and the symbol table) comes from `idlcls-ast`;
//! the produced module is built through the `idlcls-core` builder.

pub mod consts;
pub mod error;
pub mod flatten;
pub mod generator;
pub mod mapping;
pub mod naming;
pub mod reflib;
pub mod registry;
pub mod resolver;
pub mod union;

pub use error::{CodegenError, Result};
pub use generator::MetadataGenerator;
pub use mapping::CustomMappingTable;
pub use reflib::{ExternalType, ReferenceLibrary};
pub use registry::TypeRegistry;
pub use resolver::TypeResolver;
pub use union::DiscriminatorTracker;
