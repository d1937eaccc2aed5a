//! Schema scalars that map straight onto Rust types.

/// Rust type for a primitive schema scalar, `None` for anything that needs binding
#[must_use]
pub fn rust_primitive(name: &str) -> Option<&'static str> {
    let ty = match name {
        "ID" | "String" | "Password" => "String",
        "Boolean" => "bool",
        "Int" | "Int64" => "i64",
        "Float" => "f64",
        "DateTime" => "chrono::DateTime<chrono::Utc>",
        "Point" | "Polygon" | "MultiPolygon" => "serde_json::Value",
        _ => return None,
    };
    Some(ty)
}

#[cfg(test)]
mod tests {
    use super::rust_primitive;

    #[test]
    fn test_builtin_scalars_map() {
        assert_eq!(rust_primitive("ID"), Some("String"));
        assert_eq!(rust_primitive("Int64"), Some("i64"));
        assert_eq!(rust_primitive("Boolean"), Some("bool"));
        assert_eq!(rust_primitive("Polygon"), Some("serde_json::Value"));
    }

    #[test]
    fn test_custom_types_do_not_map() {
        assert_eq!(rust_primitive("User"), None);
        assert_eq!(rust_primitive("Email"), None);
        assert_eq!(rust_primitive("string"), None);
    }
}
