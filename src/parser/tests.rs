#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Unit tests for the schema parser

use super::*;
use crate::schema::{load_sources, Source};

fn parse_sdl(sdl: &str) -> Result<Tree, ParseError> {
    let doc = load_sources(&[Source::new("test.graphql", sdl)]).expect("schema loads");
    parse(&doc)
}

fn tree(sdl: &str) -> Tree {
    parse_sdl(sdl).expect("schema parses")
}

#[test]
fn test_unannotated_types_are_skipped() {
    let t = tree(
        r#"
        type Apple { id: ID! name: String }
        type Pear { id: ID! }
        type Query { apples: [Apple] pears: [Pear] }
        "#,
    );
    assert!(t.models.types.is_empty());
    assert!(t.resolvers.queries.is_empty());
    assert!(t.resolvers.field_resolvers.is_empty());
}

#[test]
fn test_field_resolver_iff_lambda() {
    let t = tree(
        r#"
        type User {
          id: ID!
          name: String!
          active: Boolean @lambda
          rank: Int
        }
        "#,
    );
    let user = t.models.model("User").expect("User is a model");
    assert_eq!(user.fields.len(), 4);
    let keys: Vec<_> = t.resolvers.field_resolvers.keys().cloned().collect();
    assert_eq!(keys, vec!["User_active"]);

    let resolver = &t.resolvers.field_resolvers["User_active"];
    assert_eq!(resolver.parent, "User");
    assert_eq!(resolver.field.ty.name, "Boolean");
    assert!(!resolver.field.ty.required);
}

#[test]
fn test_operations_only_from_annotated_root_fields() {
    let t = tree(
        r#"
        type Apple { id: ID! price: Float }
        type Query {
          getApples(limit: Int!, tags: [String!]): [Apple!]! @lambda
          plainApples: [Apple]
        }
        type Mutation {
          addApple(price: Float!): Apple @lambda
        }
        "#,
    );
    assert_eq!(t.resolvers.queries.len(), 1);
    let query = &t.resolvers.queries["getApples"];
    assert_eq!(query.key(), "Query_getApples");
    assert!(query.ret.is_array);
    assert!(query.ret.required);
    assert_eq!(query.arguments.len(), 2);
    assert_eq!(query.arguments[0].name, "limit");
    assert!(!query.arguments[0].ty.is_array);
    assert!(query.arguments[1].ty.is_array);

    let mutation = &t.resolvers.mutations["addApple"];
    assert_eq!(mutation.key(), "Mutation_addApple");
    assert_eq!(mutation.ret.name, "Apple");

    assert!(t.models.model("Apple").is_some());
    assert!(t.models.get("Query").is_none());
    assert!(t.models.get("Mutation").is_none());
}

#[test]
fn test_field_tags() {
    let t = tree("type User { id: ID! name: String @lambda }");
    let user = t.models.model("User").unwrap();
    assert_eq!(user.fields[0].tag.json, "id");
    assert_eq!(user.fields[0].tag.predicate, "uid");
    assert_eq!(user.fields[1].tag.json, "name");
    assert_eq!(user.fields[1].tag.predicate, "User.name");
}

#[test]
fn test_middleware_set_dedup() {
    let t = tree(
        r#"
        type User {
          id: ID!
          """@middleware(["auth"])"""
          email: String @lambda
          """@middleware(["auth", "admin"])"""
          salary: Float @lambda
        }
        type Query {
          """@middleware(["auth"])"""
          me: User @lambda
        }
        "#,
    );
    assert_eq!(
        t.middleware.iter().cloned().collect::<Vec<_>>(),
        vec!["admin", "auth"]
    );
    assert_eq!(t.resolvers.field_resolvers["User_email"].middleware, vec!["auth"]);
    assert_eq!(
        t.resolvers.field_resolvers["User_salary"].middleware,
        vec!["auth", "admin"]
    );
    assert_eq!(t.resolvers.queries["me"].middleware, vec!["auth"]);
}

#[test]
fn test_malformed_middleware_is_ignored() {
    let t = tree(
        r#"
        type Query {
          """@middleware(auth)"""
          me: String @lambda
        }
        "#,
    );
    assert!(t.middleware.is_empty());
    assert!(t.resolvers.queries["me"].middleware.is_empty());
}

#[test]
fn test_mutual_reference_terminates() {
    let t = tree(
        r#"
        type Author { id: ID! posts: [Post] bio: String @lambda }
        type Post { id: ID! author: Author! }
        "#,
    );
    let models: Vec<_> = t.models.models().map(|m| m.name.as_str()).collect();
    assert_eq!(models, vec!["Author", "Post"]);
    assert_eq!(t.bindings["Author"], TypeBinding::unresolved("Author"));
}

#[test]
fn test_self_reference_terminates() {
    let t = tree("type Node { id: ID! next: Node children: [Node!] @lambda }");
    assert_eq!(t.models.models().count(), 1);
    assert!(t.resolvers.field_resolvers.contains_key("Node_children"));
}

#[test]
fn test_lifecycle_subscription() {
    let t = tree(
        r#"
        type User @lambdaOnMutate(add: true, update: false, delete: true) { id: ID! }
        type Plain { id: ID! other: User }
        "#,
    );
    let user = t.models.model("User").unwrap();
    assert_eq!(
        user.lambda_on_mutate,
        vec![LifecycleEvent::Add, LifecycleEvent::Delete]
    );
    assert!(t.models.model("Plain").is_none());
    assert_eq!(t.models.subscribed_models().count(), 1);
}

#[test]
fn test_enums_and_scalars_unconditional() {
    let t = tree(
        r#"
        enum Color { RED GREEN }
        scalar Email
        scalar DateTime
        "#,
    );
    match t.models.get("Color") {
        Some(ModelType::Enum(e)) => {
            let values: Vec<_> = e.values.iter().map(|v| v.name.as_str()).collect();
            assert_eq!(values, vec!["RED", "GREEN"]);
        }
        other => panic!("expected enum, got {other:?}"),
    }
    assert!(matches!(t.models.get("Email"), Some(ModelType::Scalar(_))));
    assert!(t.models.get("DateTime").is_none());
    assert!(t.bindings["DateTime"].primitive);
    assert!(t.models.get("DgraphIndex").is_none());
}

#[test]
fn test_primitives_resolved_at_parse_time() {
    let t = tree("type Query { now(zone: String): DateTime @lambda }");
    let now = &t.bindings["DateTime"];
    assert!(now.is_resolved());
    assert_eq!(now.qualified().as_deref(), Some("chrono::DateTime<chrono::Utc>"));
    assert_eq!(t.bindings["String"].ident, "String");
}

#[test]
fn test_interfaces_unions_and_conformance() {
    let t = tree(
        r#"
        interface Fruit { id: ID! ripe: Boolean @lambda }
        type Apple implements Fruit { id: ID! ripe: Boolean }
        type Pear implements Fruit { id: ID! ripe: Boolean }
        union Snack = Apple | Candy
        type Candy { id: ID! }
        "#,
    );
    match t.models.get("Fruit") {
        Some(ModelType::Interface(i)) => assert_eq!(i.kind, InterfaceKind::Interface),
        other => panic!("expected interface, got {other:?}"),
    }
    assert!(t.resolvers.field_resolvers.contains_key("Fruit_ripe"));
    let apple = t.models.model("Apple").expect("implementor walked");
    assert_eq!(apple.implements, vec!["Fruit", "Snack"]);
    assert!(t.models.model("Pear").is_some());
    match t.models.get("Snack") {
        Some(ModelType::Interface(u)) => assert_eq!(u.kind, InterfaceKind::Union),
        other => panic!("expected union, got {other:?}"),
    }
    assert!(t.models.model("Candy").is_some());
}

#[test]
fn test_input_objects_become_models() {
    let t = tree(
        r#"
        input AppleFilter { minPrice: Float }
        type Query { apples(filter: AppleFilter): [String] @lambda }
        "#,
    );
    assert!(t.models.model("AppleFilter").is_some());
}

#[test]
fn test_root_type_reused_is_error() {
    let err = parse_sdl(
        r#"
        type Query { me: String @lambda }
        type Session { id: ID! query: Query @lambda }
        "#,
    )
    .unwrap_err();
    match err {
        ParseError::RootTypeReused { name, referenced_by, .. } => {
            assert_eq!(name, "Query");
            assert_eq!(referenced_by, "Session.query");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unknown_type_is_error() {
    let err = parse_sdl("type Query { me: Ghost @lambda }").unwrap_err();
    match err {
        ParseError::UnknownType { name, referenced_by } => {
            assert_eq!(name, "Ghost");
            assert_eq!(referenced_by, "Query.me");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_synthesized_query_root_yields_no_operations() {
    let t = tree("type User { id: ID! name: String @lambda }");
    assert!(t.resolvers.queries.is_empty());
    assert!(t.models.get("Query").is_none());
}

#[test]
fn test_parse_is_repeatable() {
    let sdl = r#"
        type User @lambdaOnMutate(add: true) { id: ID! friends: [User] @lambda }
        type Query { me: User @lambda }
    "#;
    assert_eq!(tree(sdl), tree(sdl));
}

#[test]
fn test_references_cover_arguments_and_fields() {
    let t = tree(
        r#"
        type User { id: ID! name: String @lambda }
        type Query { user(id: ID!): User @lambda }
        "#,
    );
    let used_by: Vec<_> = t.references().into_iter().map(|(_, u)| u).collect();
    assert!(used_by.contains(&"User.name".to_string()));
    assert!(used_by.contains(&"Query.user".to_string()));
    assert!(used_by.contains(&"Query.user(id)".to_string()));
}
