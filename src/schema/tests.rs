#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Unit tests for the schema loader

use super::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn load(sdl: &str) -> SchemaDocument {
    load_sources(&[Source::new("test.graphql", sdl)]).expect("schema loads")
}

#[test]
fn test_prelude_is_injected() {
    let doc = load("type User { id: ID! created: DateTime }");
    let date_time = doc.get("DateTime").expect("prelude scalar present");
    assert!(date_time.builtin);
    assert_eq!(date_time.kind, DefinitionKind::Scalar);

    let user = doc.get("User").unwrap();
    assert!(!user.builtin);
    assert_eq!(user.fields.len(), 2);
    assert_eq!(user.location.file, "test.graphql");
}

#[test]
fn test_query_root_synthesized_when_missing() {
    let doc = load("type User { id: ID! }");
    assert_eq!(doc.query_root(), "Query");
    let query = doc.get("Query").expect("synthesized query root");
    assert!(query.fields.is_empty());
    assert_eq!(doc.mutation_root(), None);
}

#[test]
fn test_schema_block_roots() {
    let doc = load(
        r#"
        schema { query: RootQuery mutation: RootMutation }
        type RootQuery { ping: String }
        type RootMutation { pong: String }
        "#,
    );
    assert_eq!(doc.query_root(), "RootQuery");
    assert_eq!(doc.mutation_root(), Some("RootMutation"));
    assert!(doc.is_operation_root("RootMutation"));
    assert!(!doc.is_operation_root("Query"));
}

#[test]
fn test_schema_block_missing_root_is_error() {
    let err = load_sources(&[Source::new("s.graphql", "schema { query: Nope }")]).unwrap_err();
    assert!(matches!(err, SchemaError::MissingRoot { root: "query", .. }));
}

#[test]
fn test_type_expressions() {
    let doc = load(
        r#"
        type Apple { id: ID! tags: [String!]! nested: [[Int]] price: Float }
        "#,
    );
    let apple = doc.get("Apple").unwrap();
    let by_name = |n: &str| apple.fields.iter().find(|f| f.name == n).unwrap().ty.clone();

    assert_eq!(
        by_name("id"),
        TypeExpr { name: "ID".into(), is_array: false, required: true }
    );
    assert_eq!(
        by_name("tags"),
        TypeExpr { name: "String".into(), is_array: true, required: true }
    );
    assert_eq!(
        by_name("nested"),
        TypeExpr { name: "Int".into(), is_array: true, required: false }
    );
    assert!(!by_name("price").required);
}

#[test]
fn test_directives_and_arguments() {
    let doc = load(
        r#"
        type User @lambdaOnMutate(add: true, update: false) {
          id: ID!
          rank: Int @lambda
        }
        "#,
    );
    let user = doc.get("User").unwrap();
    assert!(user.has_lambda());
    let on_mutate = user.directive(LAMBDA_ON_MUTATE_DIRECTIVE).unwrap();
    assert_eq!(on_mutate.argument("add"), Some(&serde_json::Value::Bool(true)));
    assert_eq!(on_mutate.argument("update"), Some(&serde_json::Value::Bool(false)));
    assert_eq!(on_mutate.argument("delete"), None);

    assert!(user.fields[1].has_lambda());
    assert!(!user.fields[0].has_lambda());
}

#[test]
fn test_duplicate_type_is_error() {
    let err = load_sources(&[
        Source::new("a.graphql", "type User { id: ID! }"),
        Source::new("b.graphql", "\n\ntype User { name: String }"),
    ])
    .unwrap_err();
    match err {
        SchemaError::DuplicateType { name, first, second } => {
            assert_eq!(name, "User");
            assert_eq!(first, "a.graphql:1");
            assert_eq!(second, "b.graphql:3");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_extend_appends_fields() {
    let doc = load_sources(&[
        Source::new("a.graphql", "type Query { a: String }"),
        Source::new("b.graphql", "extend type Query { b: String @lambda }"),
    ])
    .unwrap();
    let query = doc.get("Query").unwrap();
    let names: Vec<_> = query.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert!(query.has_lambda());
}

#[test]
fn test_user_may_redefine_builtin_scalar() {
    let doc = load("scalar DateTime");
    let date_time = doc.get("DateTime").unwrap();
    assert!(!date_time.builtin);
}

#[test]
fn test_unions_and_implementors() {
    let doc = load(
        r#"
        interface Fruit { id: ID! }
        type Apple implements Fruit { id: ID! }
        type Pear implements Fruit { id: ID! }
        union Snack = Apple | Candy
        type Candy { id: ID! }
        "#,
    );
    assert_eq!(doc.implementors("Fruit"), vec!["Apple", "Pear"]);
    assert_eq!(doc.unions_containing("Apple"), vec!["Snack"]);
    assert!(doc.unions_containing("Pear").is_empty());
    assert_eq!(doc.get("Snack").unwrap().members, vec!["Apple", "Candy"]);
}

#[test]
fn test_syntax_error_names_file() {
    let err = load_sources(&[Source::new("broken.graphql", "type User {")]).unwrap_err();
    match err {
        SchemaError::Syntax { file, .. } => assert_eq!(file, "broken.graphql"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_load_schema_from_files() {
    let mut file = NamedTempFile::with_suffix(".graphql").unwrap();
    file.write_all(b"type Hotel { id: ID! name: String! }").unwrap();
    file.flush().unwrap();

    let doc = load_schema(&[file.path().to_path_buf()]).unwrap();
    assert!(doc.get("Hotel").is_some());

    let err = load_schema(&[PathBuf::from("/definitely/not/here.graphql")]).unwrap_err();
    assert!(matches!(err, SchemaError::Read { .. }));
}
