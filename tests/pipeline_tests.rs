#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use common::workspace::{Workspace, CONFIG, EXEC_FILE, FIELD_FILE, MODELS_FILE, QUERY_FILE};
use lambdagen::error::{BindError, Error, ParseError, RewriteError};

const APPLES: &str = r#"
type Apple {
  id: ID!
  price: Float
  color: String @lambda
}

type Query {
  """All apples"""
  getApples: [Apple!]! @lambda
  getPear(id: ID!): String @lambda
}
"#;

const NO_APPLES: &str = r#"
type Apple {
  id: ID!
  price: Float
  color: String @lambda
}

type Query {
  getPear(id: ID!): String @lambda
}
"#;

const DEFAULT_BODY: &str = "\n    Err(LambdaError::unimplemented(\"Query_getApples\"))\n";
const CUSTOM_BODY: &str = "\n    // picked by hand {\n    let basket = vec![];\n    Ok(basket)\n";

const ALL_FILES: [&str; 8] = [
    MODELS_FILE,
    "src/lambda/resolvers/query_resolver.rs",
    "src/lambda/resolvers/mutation_resolver.rs",
    "src/lambda/resolvers/field_resolver.rs",
    "src/lambda/resolvers/middleware_resolver.rs",
    "src/lambda/resolvers/webhook_resolver.rs",
    EXEC_FILE,
    "src/lambda/resolvers/mod.rs",
];

fn snapshot(ws: &Workspace) -> Vec<String> {
    ALL_FILES.iter().map(|f| ws.read(f)).collect()
}

#[test]
fn test_first_run_writes_every_file() {
    let ws = Workspace::new(APPLES);
    let report = ws.generate();

    assert_eq!(report.written.len(), ALL_FILES.len());
    assert_eq!(report.preserved, 0);
    assert_eq!(report.deprecated, 0);
    for file in ALL_FILES {
        assert!(ws.root().join(file).exists(), "{file} missing");
    }

    let query = ws.read(QUERY_FILE);
    assert!(query.contains(&format!(
        "/// All apples\npub fn Query_getApples(auth_header: &AuthHeader) -> Result<Vec<crate::lambda::model::models_gen::Apple>, LambdaError> {{{DEFAULT_BODY}}}"
    )));
    assert!(ws.read(FIELD_FILE).contains("pub fn Apple_color("));
    assert!(ws.read(MODELS_FILE).contains("pub struct Apple {"));
    assert!(ws.read(EXEC_FILE).contains("\"Query.getPear\" => {"));

    let module_list = ws.read("src/lambda/resolvers/mod.rs");
    assert!(module_list.contains("pub mod query_resolver;\n"));
    assert!(module_list.contains("pub mod webhook_resolver;\n"));
}

#[test]
fn test_regeneration_is_idempotent() {
    let ws = Workspace::new(APPLES);
    ws.generate();
    let first = snapshot(&ws);

    let report = ws.generate();
    assert!(report.written.is_empty(), "rewrote {:?}", report.written);
    assert_eq!(report.unchanged.len(), ALL_FILES.len() - 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(snapshot(&ws), first);
}

#[test]
fn test_hand_written_body_survives() {
    let ws = Workspace::new(APPLES);
    ws.generate();
    ws.edit(QUERY_FILE, DEFAULT_BODY, CUSTOM_BODY);

    let report = ws.generate();
    assert_eq!(report.preserved, 3);
    let query = ws.read(QUERY_FILE);
    assert!(query.contains(&format!("LambdaError> {{{CUSTOM_BODY}}}")));
    assert!(!query.contains(DEFAULT_BODY));

    ws.generate();
    assert_eq!(ws.read(QUERY_FILE), query);
}

#[test]
fn test_signature_follows_schema_body_does_not() {
    let ws = Workspace::new(APPLES);
    ws.generate();
    ws.edit(QUERY_FILE, DEFAULT_BODY, CUSTOM_BODY);

    ws.set_schema(&APPLES.replace("getApples: [Apple!]!", "getApples(limit: Int): [Apple!]!"));
    ws.generate();

    let query = ws.read(QUERY_FILE);
    assert!(query.contains(&format!(
        "pub fn Query_getApples(limit: Option<i64>, auth_header: &AuthHeader) -> Result<Vec<crate::lambda::model::models_gen::Apple>, LambdaError> {{{CUSTOM_BODY}}}"
    )));
}

#[test]
fn test_removed_resolver_is_retained_as_deprecated() {
    let ws = Workspace::new(APPLES);
    ws.generate();
    ws.edit(QUERY_FILE, DEFAULT_BODY, CUSTOM_BODY);

    ws.set_schema(NO_APPLES);
    let report = ws.generate();
    assert_eq!(report.deprecated, 1);

    let query = ws.read(QUERY_FILE);
    assert!(!query.contains("\npub fn Query_getApples"));
    assert!(query.contains("// lambdagen:deprecated Query_getApples\n// /// All apples\n// pub fn Query_getApples("));
    assert!(query.contains("//     // picked by hand {\n//     let basket = vec![];\n//     Ok(basket)\n// }\n// lambdagen:end"));

    let report = ws.generate();
    assert_eq!(report.deprecated, 1);
    assert!(report.written.is_empty());
    assert_eq!(ws.read(QUERY_FILE), query);
}

#[test]
fn test_deprecated_body_restored_when_resolver_returns() {
    let ws = Workspace::new(APPLES);
    ws.generate();
    ws.edit(QUERY_FILE, DEFAULT_BODY, CUSTOM_BODY);
    ws.set_schema(NO_APPLES);
    ws.generate();

    ws.set_schema(APPLES);
    let report = ws.generate();
    assert_eq!(report.deprecated, 0);
    let query = ws.read(QUERY_FILE);
    assert!(query.contains(&format!("LambdaError> {{{CUSTOM_BODY}}}")));
    assert!(!query.contains("lambdagen:deprecated"));
}

#[test]
fn test_stray_helper_is_kept_commented_out() {
    let ws = Workspace::new(APPLES);
    ws.generate();
    let query = ws.read(QUERY_FILE);
    ws.write(QUERY_FILE, &format!("{query}\nfn pick() -> u8 {{\n    1\n}}\n"));

    ws.generate();
    let field = ws.read(FIELD_FILE);
    assert!(field.contains("// lambdagen:deprecated pick\n// fn pick() -> u8 {\n//     1\n// }\n// lambdagen:end"));
    assert!(!ws.read(QUERY_FILE).contains("fn pick"));
}

#[test]
fn test_hand_written_model_is_promoted() {
    let ws = Workspace::new(APPLES);
    ws.write(
        "src/lambda/model/apple.rs",
        "use serde::{Deserialize, Serialize};\n\n#[derive(Debug, Clone, Serialize, Deserialize)]\npub struct Apple {\n    pub id: String,\n}\n",
    );
    ws.generate();

    assert!(!ws.read(MODELS_FILE).contains("pub struct Apple"));
    assert!(ws
        .read(QUERY_FILE)
        .contains("Result<Vec<crate::lambda::model::apple::Apple>, LambdaError>"));
    assert!(ws
        .read(EXEC_FILE)
        .contains("let parents: Vec<crate::lambda::model::apple::Apple> = parents(request)?;"));
}

#[test]
fn test_model_written_after_generation_is_promoted() {
    let ws = Workspace::new(APPLES);
    ws.generate();
    assert!(ws.read(MODELS_FILE).contains("pub struct Apple {"));

    ws.write(
        "src/lambda/model/zebra.rs",
        "use serde::{Deserialize, Serialize};\n\n#[derive(Debug, Clone, Serialize, Deserialize)]\npub struct Apple {\n    pub id: String,\n}\n",
    );
    ws.generate();

    assert!(!ws.read(MODELS_FILE).contains("pub struct Apple"));
    assert!(ws
        .read(QUERY_FILE)
        .contains("Result<Vec<crate::lambda::model::zebra::Apple>, LambdaError>"));
    assert!(ws
        .read(FIELD_FILE)
        .contains("parents: &[crate::lambda::model::zebra::Apple]"));
}

#[test]
fn test_autobind_source_wins_over_generation() {
    let config = format!("{CONFIG}autobind:\n  - crate::orchard\n");
    let ws = Workspace::with_config(&config, APPLES);
    ws.write("src/orchard/mod.rs", "pub struct Apple;\npub struct Pear;\n");
    ws.generate();

    assert!(!ws.read(MODELS_FILE).contains("pub struct Apple"));
    assert!(ws
        .read(QUERY_FILE)
        .contains("Result<Vec<crate::orchard::Apple>, LambdaError>"));
}

#[test]
fn test_missing_autobind_source_is_fatal() {
    let config = format!("{CONFIG}autobind:\n  - crate::nowhere\n");
    let ws = Workspace::with_config(&config, APPLES);
    let err = ws.try_generate().unwrap_err();
    assert!(matches!(
        err,
        Error::Bind(BindError::SourceUnavailable { ref module, .. }) if module == "crate::nowhere"
    ));
    assert!(!ws.root().join(MODELS_FILE).exists());
}

#[test]
fn test_unknown_type_is_fatal() {
    let ws = Workspace::new("type Query { pears: [Pear] @lambda }");
    let err = ws.try_generate().unwrap_err();
    assert!(matches!(
        err,
        Error::Parse(ParseError::UnknownType { ref name, .. }) if name == "Pear"
    ));
}

#[test]
fn test_broken_resolver_file_aborts_without_writing() {
    let ws = Workspace::new(APPLES);
    ws.generate();
    let before = snapshot(&ws);

    let query = ws.read(QUERY_FILE);
    ws.write(QUERY_FILE, &format!("{query}\npub fn broken( {{\n"));
    let broken = ws.read(QUERY_FILE);
    ws.set_schema(NO_APPLES);

    let err = ws.try_generate().unwrap_err();
    assert!(matches!(err, Error::Rewrite(RewriteError::Parse { .. })));
    assert!(err.to_string().contains("query_resolver.rs"));
    assert_eq!(ws.read(QUERY_FILE), broken);
    assert_eq!(ws.read(MODELS_FILE), before[0]);
}
