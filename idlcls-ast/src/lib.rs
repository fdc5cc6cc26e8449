//! # idlcls AST
//!
//! Input-side definitions for the idlcls metadata generator.
//!
//! This crate provides:
//! - Tagged-variant AST node shapes for the supported IDL subset
//! - The hierarchical scope/symbol table queried during generation
//! - Forward-declaration completeness bookkeeping
//!
//! Producing these structures (lexing and parsing IDL text) is the job
//! of an external front end; the generator only consumes them.

pub mod ast;
pub mod error;
pub mod symbols;

pub use ast::{
    AttrDcl, CaseDcl, CaseLabel, ConstDcl, ConstExpr, Declarator, Definition, EnumDcl, ExceptDcl,
    Export, InterfaceDcl, InterfaceForwardDcl, Member, ModuleDcl, OpDcl, ParamDcl, ScopedName,
    Specification, StateMember, StructDcl, TypeDcl, TypeSpec, TypedefDcl, UnaryOp, UnionDcl,
    ValueAbsDcl, ValueBoxDcl, ValueDcl, ValueElement, ValueForwardDcl,
};
pub use error::SymbolError;
pub use symbols::{ScopeId, SymbolId, SymbolKind, SymbolTable};
