//! Custom mapping overrides.
//!
//! A mapping replaces every usage of a generated type with a target
//! type from a reference library, keyed by the compact CLS name the
//! generated type would carry. The declaration itself is still
//! generated; only usages are redirected.

use std::collections::HashMap;

/// Table of custom mapping overrides for one compilation run.
#[derive(Debug, Clone, Default)]
pub struct CustomMappingTable {
    map: HashMap<String, String>,
}

impl CustomMappingTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an override from a generated CLS name to a reference
    /// library type name. A later mapping for the same source replaces
    /// the earlier one.
    pub fn add_mapping(&mut self, source: impl Into<String>, target: impl Into<String>) {
        self.map.insert(source.into(), target.into());
    }

    /// Returns the mapped target name for a generated CLS name, if any.
    #[must_use]
    pub fn target_for(&self, cls_name: &str) -> Option<&str> {
        self.map.get(cls_name).map(String::as_str)
    }

    /// Number of overrides in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if no overrides are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let mut table = CustomMappingTable::new();
        table.add_mapping("A.NamedValue", "Ext.CustomNamedValue");
        assert_eq!(table.target_for("A.NamedValue"), Some("Ext.CustomNamedValue"));
        assert_eq!(table.target_for("A.Other"), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_later_mapping_wins() {
        let mut table = CustomMappingTable::new();
        table.add_mapping("A.T", "Ext.First");
        table.add_mapping("A.T", "Ext.Second");
        assert_eq!(table.target_for("A.T"), Some("Ext.Second"));
    }
}
