//! # idlcls Core
//!
//! CLS target type model shared by the idlcls compiler crates.
//!
//! This crate provides:
//! - Type references and descriptors with metadata annotations
//! - Typed literal values for constants and discriminators
//! - Member definitions (fields, methods, properties, union cases)
//! - A two-phase module builder (building -> complete type states)
//! - Error types for builder misuse

pub mod builder;
pub mod error;
pub mod literal;
pub mod member;
pub mod types;

pub use builder::{ClsModule, ModuleBuilder, TypeId, TypeShape, UnionDiscriminator};
pub use error::{Error, Result};
pub use literal::Literal;
pub use member::{
    DiscriminatorValue, EnumMemberDef, FieldDef, MethodDef, ParamDef, ParamDirection, PropertyDef,
    UnionCase, Visibility,
};
pub use types::{ClsType, InterfaceCategory, ObjectKind, TypeAnnotation, TypeDesc, TypeKind};
