//! # CLI Module
//!
//! Command-line front end for the generator.
//!
//! ```bash
//! # write a starter lambda.yaml
//! lambdagen init
//!
//! # generate from ./lambda.yaml
//! lambdagen generate
//!
//! # generate from another config
//! lambdagen generate --config services/api/lambda.yaml
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

mod commands;


pub use commands::{run, run_cli, Cli, Commands};
