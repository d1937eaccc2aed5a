#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

pub mod workspace {
    use std::fs;
    use std::path::{Path, PathBuf};

    use lambdagen::{Config, Error, Generated};
    use tempfile::TempDir;

    pub const CONFIG: &str = r#"
schema:
  - "schema/*.graphql"
exec:
  filename: src/lambda/generated/generated.rs
  module: crate::lambda::generated
model:
  filename: src/lambda/model/models_gen.rs
  module: crate::lambda::model
resolver:
  dir: src/lambda/resolvers
  module: crate::lambda::resolvers
"#;

    pub const QUERY_FILE: &str = "src/lambda/resolvers/query_resolver.rs";
    pub const FIELD_FILE: &str = "src/lambda/resolvers/field_resolver.rs";
    pub const MODELS_FILE: &str = "src/lambda/model/models_gen.rs";
    pub const EXEC_FILE: &str = "src/lambda/generated/generated.rs";

    /// A scratch project with a config and one schema file
    pub struct Workspace {
        pub dir: TempDir,
    }

    impl Workspace {
        pub fn new(schema: &str) -> Self {
            Self::with_config(CONFIG, schema)
        }

        pub fn with_config(config: &str, schema: &str) -> Self {
            let ws = Workspace {
                dir: TempDir::new().unwrap(),
            };
            ws.write("lambda.yaml", config);
            ws.set_schema(schema);
            ws
        }

        pub fn root(&self) -> &Path {
            self.dir.path()
        }

        pub fn config_path(&self) -> PathBuf {
            self.root().join("lambda.yaml")
        }

        pub fn set_schema(&self, schema: &str) {
            self.write("schema/schema.graphql", schema);
        }

        pub fn write(&self, rel: &str, content: &str) {
            let path = self.root().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }

        pub fn read(&self, rel: &str) -> String {
            fs::read_to_string(self.root().join(rel))
                .unwrap_or_else(|e| panic!("cannot read {rel}: {e}"))
        }

        pub fn try_generate(&self) -> Result<Generated, Error> {
            let config = Config::load(&self.config_path())?;
            lambdagen::generate(&config)
        }

        pub fn generate(&self) -> Generated {
            self.try_generate().expect("generation succeeds")
        }

        /// Replace the first occurrence of `from` in a generated file
        pub fn edit(&self, rel: &str, from: &str, to: &str) {
            let text = self.read(rel);
            assert!(text.contains(from), "{rel} does not contain {from:?}");
            self.write(rel, &text.replacen(from, to, 1));
        }
    }
}
