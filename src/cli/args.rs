//! CLI argument definitions using clap
//!
//! Commands:
//! - north-agent serve [--host H] [--port P]
//! - north-agent run [--input <path>]
//! - north-agent explain [--decision <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// North governance agent: fetch a policy decision and explain it
#[derive(Parser, Debug)]
#[command(name = "north-agent")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Start the HTTP service
    Serve {
        /// Bind host (overrides NORTH_AGENT_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides NORTH_AGENT_PORT)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run the pipeline once for a `{"change": {...}}` document and exit
    Run {
        /// Read the request from this file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Print the deterministic explanation for a decision document
    Explain {
        /// Read the decision from this file instead of stdin
        #[arg(long)]
        decision: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
