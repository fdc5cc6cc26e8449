//! Constant expression evaluation.
//!
//! Only single-term expressions are supported: a literal, a reference
//! to an already evaluated constant or enumerator, or a unary sign on
//! either. Multi-term arithmetic and bitwise negation are recognized
//! and rejected.

use idlcls_ast::{ConstExpr, ScopeId, UnaryOp};
use idlcls_core::Literal;

use crate::error::{CodegenError, Result};
use crate::resolver::TypeResolver;

/// Evaluates a constant expression in the given scope.
///
/// # Errors
/// `NoValueForSymbol` when a referenced symbol carries no value,
/// unsupported-construct errors for negation and multi-term
/// expressions, name resolution errors for scoped references.
pub fn evaluate(resolver: &TypeResolver<'_>, scope: ScopeId, expr: &ConstExpr) -> Result<Literal> {
    match expr {
        ConstExpr::Literal(literal) => Ok(literal.clone()),
        ConstExpr::Scoped(name) => {
            let symbol = resolver.resolve_symbol(scope, name)?;
            resolver
                .symbol_value(symbol)
                .cloned()
                .ok_or_else(|| CodegenError::NoValueForSymbol {
                    name: resolver.qualified_symbol_name(symbol),
                })
        }
        ConstExpr::Unary { op, operand } => {
            let mut value = evaluate(resolver, scope, operand)?;
            match op {
                UnaryOp::Plus => Ok(value),
                UnaryOp::Minus => {
                    value.invert_sign()?;
                    Ok(value)
                }
                UnaryOp::Negate => Err(CodegenError::unsupported(
                    "bitwise negation in constant expression",
                )),
            }
        }
        ConstExpr::Binary { op, .. } => Err(CodegenError::unsupported(format!(
            "multi-term constant expression (operator '{op}')"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idlcls_ast::{ScopedName, SymbolTable};
    use idlcls_core::ModuleBuilder;

    use crate::mapping::CustomMappingTable;
    use crate::registry::TypeRegistry;

    fn literal(value: i64) -> ConstExpr {
        ConstExpr::Literal(Literal::Integer(value))
    }

    struct Fixture {
        table: SymbolTable,
        registry: TypeRegistry,
        mappings: CustomMappingTable,
        module: ModuleBuilder,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                table: SymbolTable::new(),
                registry: TypeRegistry::new(),
                mappings: CustomMappingTable::new(),
                module: ModuleBuilder::new("out"),
            }
        }

        fn resolver(&self) -> TypeResolver<'_> {
            TypeResolver::new(&self.table, &self.registry, &self.mappings, &self.module)
        }
    }

    #[test]
    fn test_literal_passthrough() {
        let fx = Fixture::new();
        let top = fx.table.top_scope();
        let value = evaluate(&fx.resolver(), top, &literal(7)).unwrap();
        assert_eq!(value, Literal::Integer(7));
    }

    #[test]
    fn test_unary_signs() {
        let fx = Fixture::new();
        let top = fx.table.top_scope();
        let minus = ConstExpr::Unary {
            op: UnaryOp::Minus,
            operand: Box::new(literal(5)),
        };
        assert_eq!(evaluate(&fx.resolver(), top, &minus).unwrap(), Literal::Integer(-5));
        let plus = ConstExpr::Unary {
            op: UnaryOp::Plus,
            operand: Box::new(literal(5)),
        };
        assert_eq!(evaluate(&fx.resolver(), top, &plus).unwrap(), Literal::Integer(5));
    }

    #[test]
    fn test_negate_and_binary_unsupported() {
        let fx = Fixture::new();
        let top = fx.table.top_scope();
        let negate = ConstExpr::Unary {
            op: UnaryOp::Negate,
            operand: Box::new(literal(1)),
        };
        assert!(matches!(
            evaluate(&fx.resolver(), top, &negate),
            Err(CodegenError::Unsupported { .. })
        ));
        let binary = ConstExpr::Binary {
            op: "+",
            lhs: Box::new(literal(1)),
            rhs: Box::new(literal(2)),
        };
        assert!(matches!(
            evaluate(&fx.resolver(), top, &binary),
            Err(CodegenError::Unsupported { .. })
        ));
    }

    #[test]
    fn test_scoped_reference_reads_symbol_value() {
        let mut fx = Fixture::new();
        let top = fx.table.top_scope();
        let sym = fx.table.declare_const_symbol(top, "MAX").unwrap();
        fx.table.set_symbol_value(sym, Literal::Integer(64));
        let expr = ConstExpr::Scoped(ScopedName::simple("MAX"));
        assert_eq!(
            evaluate(&fx.resolver(), top, &expr).unwrap(),
            Literal::Integer(64)
        );
    }

    #[test]
    fn test_symbol_without_value() {
        let mut fx = Fixture::new();
        let top = fx.table.top_scope();
        fx.table.declare_const_symbol(top, "LATER").unwrap();
        let expr = ConstExpr::Scoped(ScopedName::simple("LATER"));
        assert!(matches!(
            evaluate(&fx.resolver(), top, &expr),
            Err(CodegenError::NoValueForSymbol { .. })
        ));
    }
}
