//! # North Agent HTTP Server
//!
//! Axum server exposing the decision-and-explanation pipeline.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `POST /run` - Evaluate a change and explain the decision
//! - `GET /metrics` - Service counters

pub mod config;
pub mod observability_routes;
pub mod run_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use server::HttpServer;
