//! groundcheck command line interface.
//!
//! Batch-scores JSONL prediction records, checks single answer/context
//! pairs, and prints extracted claims. Logs go to stderr so stdout stays
//! clean for JSON output; set `RUST_LOG` to adjust verbosity.

mod commands;
mod config;
mod records;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::EvalConfig;

#[derive(Parser)]
#[command(name = "groundcheck", version, about = "Claim-support scoring for LLM answers")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Score prediction records from a JSONL file
    Score {
        /// Input JSONL file of prediction records
        #[arg(long)]
        input: PathBuf,

        /// Output JSONL file; stdout when omitted
        #[arg(long)]
        output: Option<PathBuf>,

        /// Use the length-ratio heuristic instead of embedding metrics
        /// (works with no embedding backend compiled in)
        #[arg(long)]
        heuristic: bool,

        #[command(flatten)]
        overrides: ConfigArgs,
    },

    /// Score a single answer against a context and print metrics as JSON
    Check {
        /// Model answer to score
        #[arg(long)]
        answer: String,

        /// Context the answer should be grounded in
        #[arg(long)]
        context: Option<String>,

        #[command(flatten)]
        overrides: ConfigArgs,
    },

    /// Print the claims extracted from a text, one per line
    Claims {
        /// Text to split into claims
        #[arg(long)]
        text: String,
    },
}

#[derive(Args)]
struct ConfigArgs {
    /// Optional YAML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Embedding provider kind, e.g. "fastembed" or "hash"
    #[arg(long)]
    provider: Option<String>,

    /// Embedding model name
    #[arg(long)]
    model: Option<String>,

    /// Support threshold for the unsupported-claim rate
    #[arg(long)]
    threshold: Option<f32>,
}

impl ConfigArgs {
    /// Defaults, then the YAML file, then flags.
    fn resolve(self) -> Result<EvalConfig> {
        let base = match &self.config {
            Some(path) => EvalConfig::from_yaml_file(path)?,
            None => EvalConfig::default(),
        };
        Ok(base.with_overrides(self.provider, self.model, self.threshold)?)
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.cmd {
        Cmd::Score {
            input,
            output,
            heuristic,
            overrides,
        } => commands::run_score(&input, output.as_deref(), heuristic, overrides.resolve()?),
        Cmd::Check {
            answer,
            context,
            overrides,
        } => commands::run_check(&answer, context.as_deref(), overrides.resolve()?),
        Cmd::Claims { text } => commands::run_claims(&text),
    }
}
