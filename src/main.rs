//! north-agent entry point
//!
//! Parses arguments and dispatches through `cli::run`. Failures are logged as
//! one structured line and the process exits non-zero.

use north_agent::cli;
use north_agent::observability::Logger;

fn main() {
    if let Err(e) = cli::run() {
        Logger::error(
            "COMMAND_FAILED",
            &[("code", e.code_str()), ("message", e.message())],
        );
        std::process::exit(1);
    }
}
