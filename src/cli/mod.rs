//! CLI module for the North agent
//!
//! Provides command-line interface for:
//! - serve: run the HTTP service
//! - run: one-shot pipeline run for a change document
//! - explain: offline deterministic explanation of a decision

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{explain, explain_document, run, run_command, run_document, run_once, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
