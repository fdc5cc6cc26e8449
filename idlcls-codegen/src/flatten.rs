//! Inheritance flattening for concrete value types.
//!
//! The target type system gives a concrete value class its supported
//! interfaces and abstract value bases as plain interfaces; their
//! operations and attributes must be re-declared abstract on the class
//! itself. The closure walks the interface graph transitively,
//! deduplicated and order-preserving, and collects each member once.

use std::collections::VecDeque;

use idlcls_core::{ClsType, MethodDef, ModuleBuilder, PropertyDef, TypeId};

use crate::error::Result;

/// Transitive closure of interface-kind types reachable from the given
/// references, in first-visit order without duplicates. Non-named
/// references (marker capabilities) are skipped.
///
/// # Errors
/// Internal error if a reference points at an unknown builder slot.
pub fn interface_closure(module: &ModuleBuilder, roots: &[ClsType]) -> Result<Vec<TypeId>> {
    let mut order = Vec::new();
    let mut pending: VecDeque<TypeId> = roots.iter().filter_map(ClsType::named_id).collect();
    while let Some(id) = pending.pop_front() {
        if order.contains(&id) {
            continue;
        }
        let shape = module.shape(id)?;
        if !shape.kind.is_interface_kind() {
            continue;
        }
        order.push(id);
        pending.extend(shape.interfaces.iter().filter_map(ClsType::named_id));
    }
    Ok(order)
}

/// Collects the abstract methods and properties a concrete value class
/// must re-declare for the given interface references. Members sharing
/// a name are collected once, first occurrence wins.
///
/// # Errors
/// Internal error if a reference points at an unknown builder slot.
pub fn collect_inherited_members(
    module: &ModuleBuilder,
    roots: &[ClsType],
) -> Result<(Vec<MethodDef>, Vec<PropertyDef>)> {
    let mut methods: Vec<MethodDef> = Vec::new();
    let mut properties: Vec<PropertyDef> = Vec::new();
    for id in interface_closure(module, roots)? {
        let shape = module.shape(id)?;
        for method in &shape.methods {
            if !methods.iter().any(|m| m.name == method.name) {
                methods.push(method.clone());
            }
        }
        for property in &shape.properties {
            if !properties.iter().any(|p| p.name == property.name) {
                properties.push(property.clone());
            }
        }
    }
    Ok((methods, properties))
}

#[cfg(test)]
mod tests {
    use super::*;
    use idlcls_core::{InterfaceCategory, TypeDesc, TypeKind};

    fn iface(module: &mut ModuleBuilder, name: &str, bases: Vec<ClsType>) -> TypeId {
        module
            .define_type(name, TypeKind::Interface(InterfaceCategory::Concrete), None, bases)
            .unwrap()
    }

    fn method(name: &str) -> MethodDef {
        MethodDef {
            name: name.to_string(),
            return_ty: TypeDesc::new(ClsType::Void),
            params: Vec::new(),
        }
    }

    #[test]
    fn test_diamond_closure_has_no_duplicates() {
        let mut module = ModuleBuilder::new("out");
        let base = iface(&mut module, "Base", Vec::new());
        let left = iface(&mut module, "Left", vec![ClsType::Named(base)]);
        let right = iface(&mut module, "Right", vec![ClsType::Named(base)]);
        let roots = [ClsType::Named(left), ClsType::Named(right)];
        let order = interface_closure(&module, &roots).unwrap();
        assert_eq!(order.len(), 3);
        assert_eq!(order.iter().filter(|id| **id == base).count(), 1);
    }

    #[test]
    fn test_members_collected_without_duplicates() {
        let mut module = ModuleBuilder::new("out");
        let base = iface(&mut module, "Base", Vec::new());
        module.add_method(base, method("ping")).unwrap();
        let derived = iface(&mut module, "Derived", vec![ClsType::Named(base)]);
        module.add_method(derived, method("send")).unwrap();
        module
            .add_property(
                derived,
                PropertyDef {
                    name: "Status".to_string(),
                    ty: TypeDesc::new(ClsType::Int32),
                    has_setter: true,
                },
            )
            .unwrap();
        let roots = [ClsType::Named(derived), ClsType::Named(base)];
        let (methods, properties) = collect_inherited_members(&module, &roots).unwrap();
        assert_eq!(methods.len(), 2);
        assert_eq!(properties.len(), 1);
    }

    #[test]
    fn test_marker_capabilities_skipped() {
        let module = ModuleBuilder::new("out");
        let order = interface_closure(&module, &[ClsType::CustomMarshalled]).unwrap();
        assert!(order.is_empty());
    }
}
