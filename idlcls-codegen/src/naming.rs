//! Identifier mapping from IDL names to legal CLS names.

/// CLS/C# keywords an IDL identifier may collide with. Colliding
/// identifiers get an underscore prefix.
const RESERVED: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

/// Maps an IDL identifier to a legal CLS identifier.
#[must_use]
pub fn cls_identifier(name: &str) -> String {
    if RESERVED.contains(&name) {
        format!("_{name}")
    } else {
        name.to_string()
    }
}

/// Field name for a private state member. The `m_` prefix marks the
/// field as implementation state; it is not doubled if the IDL name
/// already carries it.
#[must_use]
pub fn private_field_name(name: &str) -> String {
    let mapped = cls_identifier(name);
    if mapped.starts_with("m_") {
        mapped
    } else {
        format!("m_{mapped}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinary_identifier_unchanged() {
        assert_eq!(cls_identifier("accountId"), "accountId");
    }

    #[test]
    fn test_keyword_gets_prefix() {
        assert_eq!(cls_identifier("lock"), "_lock");
        assert_eq!(cls_identifier("event"), "_event");
    }

    #[test]
    fn test_private_field_prefix() {
        assert_eq!(private_field_name("balance"), "m_balance");
        assert_eq!(private_field_name("m_balance"), "m_balance");
    }
}
