//! Identifier helpers for generated Rust code.

const KEYWORDS: &[&str] = &[
    "as", "break", "const", "continue", "else", "enum", "extern", "false", "fn", "for", "if",
    "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "static",
    "struct", "trait", "true", "type", "unsafe", "use", "where", "while", "async", "await", "dyn",
    "abstract", "become", "box", "do", "final", "macro", "override", "priv", "typeof", "unsized",
    "virtual", "yield", "try", "gen",
];

/// Keywords that cannot be written as raw identifiers
const RESERVED: &[&str] = &["self", "Self", "super", "crate", "_"];

/// Convert a camelCase or PascalCase name to snake_case
///
/// Acronyms stay together: `userID` becomes `user_id`, `HTTPMethod` becomes
/// `http_method`.
#[must_use]
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(char::is_lowercase),
                _ => false,
            };
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Make `name` usable as a Rust identifier
///
/// Invalid characters become underscores, a leading digit gets an underscore
/// prefix and keywords become raw identifiers.
#[must_use]
pub fn sanitize_rust_identifier(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if ident.is_empty() {
        ident.push('_');
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if RESERVED.contains(&ident.as_str()) {
        ident.push('_');
    } else if KEYWORDS.contains(&ident.as_str()) {
        ident.insert_str(0, "r#");
    }
    ident
}

/// snake_case Rust identifier for a schema field or argument
#[must_use]
pub fn field_ident(name: &str) -> String {
    sanitize_rust_identifier(&to_snake_case(name))
}

/// `///` doc comment lines for an optional description
#[must_use]
pub fn doc_lines(description: Option<&str>) -> Vec<String> {
    let Some(description) = description.map(str::trim).filter(|d| !d.is_empty()) else {
        return Vec::new();
    };
    description
        .lines()
        .map(|line| {
            let line = line.trim_end();
            if line.is_empty() {
                "///".to_string()
            } else {
                format!("/// {line}")
            }
        })
        .collect()
}
