//! CLI module for deepsearch
//!
//! Provides command-line interface parsing for the deepsearch binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod output;

use crate::research::effort::EffortLevel;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// deepsearch - iterative web research with cited answers
///
/// Searches the web in rounds, reflects on what is still missing, and writes
/// an answer that links every claim to its source.
#[derive(Parser, Debug)]
#[command(
    name = "deepsearch",
    version,
    about = "Iterative web research with cited answers",
    long_about = "Answers a question by generating search queries, running grounded web\n\
                  searches concurrently, reflecting on knowledge gaps and following up,\n\
                  then synthesizing a cited answer.",
    after_help = "EXAMPLES:\n    \
                  deepsearch ask \"What is new in Rust 1.91?\"      # Low effort research\n    \
                  deepsearch ask --effort high \"...\" --json       # Full report as JSON\n    \
                  deepsearch serve                                # HTTP API\n    \
                  deepsearch mcp                                  # MCP tool server on stdio"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "deepsearch.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Research a question and print a cited answer
    Ask {
        /// The question to research
        question: String,

        /// Research effort (query count, round limit, model tier)
        #[arg(short, long, value_enum, default_value_t = EffortLevel::Low)]
        effort: EffortLevel,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start the HTTP API server
    Serve,

    /// Serve the `deep_search` tool over MCP stdio
    #[cfg(feature = "mcp")]
    Mcp,

    /// Show configuration information
    Config {
        /// Validate the configuration file
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
