use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::{write_default_config, Config};
use crate::pipeline::generate;

/// Command-line interface for lambdagen
#[derive(Debug, Parser)]
#[command(name = "lambdagen", version)]
#[command(about = "Generate Dgraph lambda resolver scaffolding from a GraphQL schema", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate models, resolver stubs and the dispatch layer
    ///
    /// Existing resolver bodies are kept. Resolvers that no longer match the
    /// schema are retained as commented-out blocks.
    Generate {
        /// Path to the configuration file
        #[arg(short, long, default_value = "lambda.yaml", env = "LAMBDAGEN_CONFIG")]
        config: PathBuf,
    },
    /// Write a default configuration file
    Init {
        /// Where to write the configuration file
        #[arg(short, long, default_value = "lambda.yaml")]
        config: PathBuf,

        /// Overwrite an existing configuration file
        #[arg(short, long, default_value_t = false)]
        force: bool,
    },
}

/// Parse the process arguments and run the selected command
///
/// # Errors
///
/// Returns the command's error with its context chain.
pub fn run_cli() -> anyhow::Result<()> {
    run(Cli::parse())
}

/// Run an already parsed command line
///
/// # Errors
///
/// Returns an error if the config cannot be loaded, any generation stage
/// fails, or `init` would overwrite a file without `--force`.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate { config } => {
            let loaded = Config::load(&config)?;
            let report = generate(&loaded)
                .with_context(|| format!("generation failed for {}", config.display()))?;
            println!(
                "generated {} file(s), {} unchanged, {} resolver bodies kept, {} deprecated",
                report.written.len(),
                report.unchanged.len(),
                report.preserved,
                report.deprecated
            );
            Ok(())
        }
        Commands::Init { config, force } => write_default_config(&config, force),
    }
}
