//! Union discriminator validation.
//!
//! A discriminator must be an integral type, char, boolean or a
//! generated enum. Case label values must be assignable to it: enum
//! labels must carry the exact enum type, short and long labels are
//! range-checked, long long, char and boolean labels must match
//! exactly. Each value may be covered once; at most one default case
//! is allowed.

use idlcls_core::{
    ClsType, DiscriminatorValue, Literal, ModuleBuilder, TypeDesc, TypeId, TypeKind,
    UnionDiscriminator,
};

use crate::error::{CodegenError, Result};

fn display_literal(literal: &Literal) -> String {
    match literal {
        Literal::Boolean(v) => v.to_string(),
        Literal::Integer(v) => v.to_string(),
        Literal::Float(v) => v.to_string(),
        Literal::Char(v) => format!("'{v}'"),
        Literal::Str(v) => format!("\"{v}\""),
        Literal::Enumerated { value, .. } => format!("enum member {value}"),
    }
}

/// Accumulates and validates the case labels of one union.
pub struct DiscriminatorTracker {
    union_name: String,
    ty: TypeDesc,
    enum_type: Option<TypeId>,
    covered: Vec<Literal>,
    has_default: bool,
}

impl DiscriminatorTracker {
    /// Creates a tracker for a union, validating the discriminator
    /// type itself.
    ///
    /// # Errors
    /// `InvalidDiscriminatorValue` if the type is not a legal
    /// discriminator type.
    pub fn new(union_name: &str, ty: TypeDesc, module: &ModuleBuilder) -> Result<Self> {
        let enum_type = match &ty.cls_type {
            ClsType::Int16 | ClsType::Int32 | ClsType::Int64 | ClsType::Char | ClsType::Boolean => {
                None
            }
            ClsType::Named(id) if module.kind_of(&ty.cls_type) == Some(TypeKind::Enum) => Some(*id),
            other => {
                return Err(CodegenError::InvalidDiscriminatorValue {
                    union: union_name.to_string(),
                    detail: format!(
                        "type {} is not a legal discriminator type",
                        module.display_name(other)
                    ),
                })
            }
        };
        Ok(Self {
            union_name: union_name.to_string(),
            ty,
            enum_type,
            covered: Vec::new(),
            has_default: false,
        })
    }

    fn assignable(&self, literal: &Literal) -> bool {
        if let Some(enum_type) = self.enum_type {
            return matches!(
                literal,
                Literal::Enumerated { enum_type: et, .. } if *et == enum_type
            );
        }
        match (&self.ty.cls_type, literal) {
            (ClsType::Int16, Literal::Integer(v)) => i16::try_from(*v).is_ok(),
            (ClsType::Int32, Literal::Integer(v)) => i32::try_from(*v).is_ok(),
            (ClsType::Int64, Literal::Integer(_)) => true,
            (ClsType::Char, Literal::Char(_)) => true,
            (ClsType::Boolean, Literal::Boolean(_)) => true,
            _ => false,
        }
    }

    /// Validates one explicit case label value and records it.
    ///
    /// # Errors
    /// `InvalidDiscriminatorValue` for non-assignable values and
    /// `DuplicateDiscriminatorValue` for repeated ones.
    pub fn check_value(&mut self, literal: Literal) -> Result<DiscriminatorValue> {
        if !self.assignable(&literal) {
            return Err(CodegenError::InvalidDiscriminatorValue {
                union: self.union_name.clone(),
                detail: format!(
                    "label {} is not assignable to the discriminator",
                    display_literal(&literal)
                ),
            });
        }
        if self.covered.contains(&literal) {
            return Err(CodegenError::DuplicateDiscriminatorValue {
                union: self.union_name.clone(),
                value: display_literal(&literal),
            });
        }
        self.covered.push(literal.clone());
        Ok(DiscriminatorValue::Value(literal))
    }

    /// Records the default case.
    ///
    /// # Errors
    /// `MultipleDefaultCases` on the second default.
    pub fn note_default(&mut self) -> Result<DiscriminatorValue> {
        if self.has_default {
            return Err(CodegenError::MultipleDefaultCases {
                union: self.union_name.clone(),
            });
        }
        self.has_default = true;
        Ok(DiscriminatorValue::Default)
    }

    /// Consumes the tracker into discriminator metadata for the union
    /// shape.
    #[must_use]
    pub fn finish(self) -> UnionDiscriminator {
        UnionDiscriminator {
            ty: self.ty,
            covered: self.covered,
            has_default: self.has_default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module() -> ModuleBuilder {
        ModuleBuilder::new("out")
    }

    fn tracker(module: &ModuleBuilder, ty: ClsType) -> DiscriminatorTracker {
        DiscriminatorTracker::new("U", TypeDesc::new(ty), module).unwrap()
    }

    #[test]
    fn test_short_labels_distinct_then_duplicate() {
        let module = module();
        let mut tracker = tracker(&module, ClsType::Int16);
        tracker.check_value(Literal::Integer(1)).unwrap();
        tracker.check_value(Literal::Integer(2)).unwrap();
        assert!(matches!(
            tracker.check_value(Literal::Integer(1)),
            Err(CodegenError::DuplicateDiscriminatorValue { .. })
        ));
    }

    #[test]
    fn test_short_range_check() {
        let module = module();
        let mut tracker = tracker(&module, ClsType::Int16);
        tracker.check_value(Literal::Integer(100)).unwrap();
        assert!(matches!(
            tracker.check_value(Literal::Integer(100_000)),
            Err(CodegenError::InvalidDiscriminatorValue { .. })
        ));
    }

    #[test]
    fn test_enum_labels_require_exact_type() {
        let mut module = module();
        let color = module
            .define_type("Color", TypeKind::Enum, None, Vec::new())
            .unwrap();
        let other = module
            .define_type("Shade", TypeKind::Enum, None, Vec::new())
            .unwrap();
        let mut tracker = DiscriminatorTracker::new(
            "U",
            TypeDesc::new(ClsType::Named(color)),
            &module,
        )
        .unwrap();
        tracker
            .check_value(Literal::Enumerated {
                enum_type: color,
                value: 0,
            })
            .unwrap();
        assert!(matches!(
            tracker.check_value(Literal::Enumerated {
                enum_type: other,
                value: 1,
            }),
            Err(CodegenError::InvalidDiscriminatorValue { .. })
        ));
        assert!(matches!(
            tracker.check_value(Literal::Integer(0)),
            Err(CodegenError::InvalidDiscriminatorValue { .. })
        ));
    }

    #[test]
    fn test_single_default_case() {
        let module = module();
        let mut tracker = tracker(&module, ClsType::Boolean);
        tracker.note_default().unwrap();
        assert!(matches!(
            tracker.note_default(),
            Err(CodegenError::MultipleDefaultCases { .. })
        ));
    }

    #[test]
    fn test_default_not_in_covered_set() {
        let module = module();
        let mut tracker = tracker(&module, ClsType::Boolean);
        tracker.check_value(Literal::Boolean(true)).unwrap();
        tracker.note_default().unwrap();
        let discr = tracker.finish();
        assert_eq!(discr.covered, vec![Literal::Boolean(true)]);
        assert!(discr.has_default);
    }

    #[test]
    fn test_illegal_discriminator_type() {
        let module = module();
        assert!(matches!(
            DiscriminatorTracker::new("U", TypeDesc::new(ClsType::String), &module),
            Err(CodegenError::InvalidDiscriminatorValue { .. })
        ));
    }
}
