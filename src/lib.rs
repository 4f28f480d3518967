//! north-agent - change-governance agent
//!
//! Fetches an authoritative policy decision from North for a proposed change,
//! then explains it: via a language model when one is configured, otherwise
//! (or on any model failure) with a deterministic report.

pub mod agent;
pub mod cli;
pub mod config;
pub mod explain;
pub mod http_server;
pub mod north;
pub mod observability;
pub mod orchestrator;
