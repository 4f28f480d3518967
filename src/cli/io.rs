//! JSON I/O handling for CLI
//!
//! - Input: one JSON document, from a file or stdin
//! - Output: pretty JSON or plain text on stdout, UTF-8

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use super::errors::{CliError, CliResult};

/// Read a whole JSON document from `path`, or stdin when `None`
pub fn read_document(path: Option<&Path>) -> CliResult<Value> {
    let raw = match path {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| CliError::io_error(format!("{}: {}", path.display(), e)))?,
        None => {
            let mut buf = String::new();
            io::stdin().lock().read_to_string(&mut buf)?;
            buf
        }
    };

    parse_document(&raw)
}

/// Parse a non-empty JSON document
pub fn parse_document(raw: &str) -> CliResult<Value> {
    if raw.trim().is_empty() {
        return Err(CliError::invalid_input("Empty input"));
    }
    Ok(serde_json::from_str(raw)?)
}

/// Require a JSON object
pub fn into_object(value: Value, what: &str) -> CliResult<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(CliError::invalid_input(format!("{} must be a JSON object", what))),
    }
}

/// Write a value as pretty JSON to stdout
pub fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}

/// Write plain text to stdout
pub fn write_text(text: &str) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", text)?;
    stdout.flush()?;
    Ok(())
}
