//! # lambdagen
//!
//! **lambdagen** generates the Rust scaffolding for a Dgraph lambda server from
//! an annotated GraphQL schema, and keeps doing so as the schema evolves without
//! ever discarding resolver code a developer has already written.
//!
//! ## Overview
//!
//! Fields and operations marked `@lambda`, and types marked `@lambdaOnMutate`,
//! need user code. For each of them the generator writes a resolver stub. On
//! every later run it reads the previous stubs back, keeps each function body
//! whose signature still exists and comments out the rest.
//!
//! ## Architecture
//!
//! - **[`config`]** - `lambda.yaml` loading and path layout
//! - **[`schema`]** - SDL loading with the Dgraph prelude injected
//! - **[`parser`]** - schema document → [`parser::Tree`] of models and resolvers
//! - **[`binder`]** - decides which Rust type satisfies every schema type
//! - **[`rewriter`]** - recovers hand-written bodies from previous output
//! - **[`generator`]** - Askama rendering of models, stubs and the dispatch layer
//! - **[`pipeline`]** - one run of all stages
//! - **[`cli`]** - `lambdagen generate` / `lambdagen init`
//!
//! ```text
//! lambda.yaml
//!     │
//!     ▼
//! schema::load_schema ──► parser::parse ──► Autobinder::bind ──► Rewriter::load
//!                                                                     │
//!                        generator::write_files ◄── generator::render_all
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! # fn main() -> Result<(), lambdagen::Error> {
//! let config = lambdagen::Config::load(Path::new("lambda.yaml"))?;
//! let report = lambdagen::generate(&config)?;
//! println!("{} bodies kept", report.preserved);
//! # Ok(())
//! # }
//! ```
//!
//! ## Generated code
//!
//! Resolvers are free functions named after what they resolve:
//!
//! ```rust,ignore
//! pub fn Query_getApples(auth_header: &AuthHeader) -> Result<Vec<Apple>, LambdaError> {
//!     // hand-written, survives regeneration
//! }
//! ```

pub mod binder;
pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod parser;
pub mod pipeline;
pub mod rewriter;
pub mod schema;

pub use config::Config;
pub use error::Error;
pub use pipeline::{generate, Generated};
