//! Sub-parsers for annotations carried outside the directive grammar.
//!
//! Middleware is declared inside a field description, for example
//! `"""@middleware(["auth", "admin"])"""`. The payload is a JSON array of
//! names. Absent or malformed payloads yield an empty list; they never fail
//! the run.

use once_cell::sync::Lazy;
use regex::Regex;

use super::tree::LifecycleEvent;
use crate::schema::Directive;

#[allow(clippy::unwrap_used)]
static MIDDLEWARE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@middleware\(([^)]+)\)").unwrap());

/// Middleware names declared in a description, in order
///
/// Several `@middleware(...)` occurrences concatenate. A payload that is not a
/// JSON array of strings contributes nothing.
#[must_use]
pub fn parse_middleware(description: Option<&str>) -> Vec<String> {
    let Some(description) = description else {
        return Vec::new();
    };
    let mut names = Vec::new();
    for captures in MIDDLEWARE.captures_iter(description) {
        let payload = &captures[1];
        match serde_json::from_str::<Vec<String>>(payload) {
            Ok(found) => names.extend(found),
            Err(err) => {
                tracing::warn!(payload, error = %err, "ignoring malformed @middleware annotation");
            }
        }
    }
    names
}

/// Lifecycle events switched on by `@lambdaOnMutate`
///
/// Only arguments whose value is literally `true` count. The result is always
/// ordered add, update, delete.
#[must_use]
pub fn parse_lifecycle(directive: Option<&Directive>) -> Vec<LifecycleEvent> {
    let Some(directive) = directive else {
        return Vec::new();
    };
    [
        LifecycleEvent::Add,
        LifecycleEvent::Update,
        LifecycleEvent::Delete,
    ]
    .into_iter()
    .filter(|event| directive.argument(event.as_str()) == Some(&serde_json::Value::Bool(true)))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn on_mutate(args: &[(&str, Value)]) -> Directive {
        Directive {
            name: "lambdaOnMutate".into(),
            arguments: args
                .iter()
                .map(|(n, v)| ((*n).to_string(), v.clone()))
                .collect(),
        }
    }

    #[test]
    fn test_middleware_absent() {
        assert!(parse_middleware(None).is_empty());
        assert!(parse_middleware(Some("The user's display name")).is_empty());
    }

    #[test]
    fn test_middleware_in_order() {
        let names = parse_middleware(Some(r#"Admins only @middleware(["auth", "admin"])"#));
        assert_eq!(names, vec!["auth", "admin"]);
    }

    #[test]
    fn test_middleware_occurrences_concatenate() {
        let names = parse_middleware(Some(
            "@middleware([\"auth\"])\nand also\n@middleware([\"audit\"])",
        ));
        assert_eq!(names, vec!["auth", "audit"]);
    }

    #[test]
    fn test_middleware_malformed_is_empty() {
        assert!(parse_middleware(Some("@middleware(auth, admin)")).is_empty());
        assert!(parse_middleware(Some(r#"@middleware({"name": "auth"})"#)).is_empty());
        assert!(parse_middleware(Some("@middleware([1, 2])")).is_empty());
        assert!(parse_middleware(Some("@middleware()")).is_empty());
        assert!(parse_middleware(Some(r#"@middleware(["auth""#)).is_empty());
    }

    #[test]
    fn test_middleware_malformed_does_not_hide_valid() {
        let names = parse_middleware(Some(r#"@middleware(oops) @middleware(["auth"])"#));
        assert_eq!(names, vec!["auth"]);
    }

    #[test]
    fn test_lifecycle_only_true_flags() {
        let d = on_mutate(&[
            ("delete", Value::Bool(true)),
            ("add", Value::Bool(true)),
            ("update", Value::Bool(false)),
        ]);
        assert_eq!(
            parse_lifecycle(Some(&d)),
            vec![LifecycleEvent::Add, LifecycleEvent::Delete]
        );
    }

    #[test]
    fn test_lifecycle_non_boolean_ignored() {
        let d = on_mutate(&[("add", Value::String("true".into())), ("update", Value::Null)]);
        assert!(parse_lifecycle(Some(&d)).is_empty());
        assert!(parse_lifecycle(None).is_empty());
    }
}
