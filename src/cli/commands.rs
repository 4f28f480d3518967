//! CLI command implementations
//!
//! `serve` and `run` resolve configuration from the environment and build the
//! same [`Orchestrator`] the HTTP service uses. `explain` is fully offline.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::config::ServiceConfig;
use crate::explain::format_explanation;
use crate::http_server::HttpServer;
use crate::observability::{log_event, log_event_with_fields, Event};
use crate::orchestrator::{Orchestrator, RunRequest, RunResponse};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{into_object, read_document, write_json, write_text};

/// Parse CLI args, load `.env`, and dispatch
pub fn run() -> CliResult<()> {
    // A missing .env file is normal
    dotenvy::dotenv().ok();

    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { host, port } => serve(host, port),
        Command::Run { input } => run_once(input.as_deref()),
        Command::Explain { decision } => explain(decision.as_deref()),
    }
}

/// Resolve configuration and log what was loaded
fn load_config() -> CliResult<ServiceConfig> {
    let config = ServiceConfig::from_env()?;

    let timeout = config.north.timeout.as_secs().to_string();
    let model = if config.model_enabled() { "enabled" } else { "disabled" };
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("north_url", config.north.url.as_str()),
            ("north_timeout_secs", timeout.as_str()),
            ("model", model),
        ],
    );

    Ok(config)
}

fn runtime() -> CliResult<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))
}

/// Start the HTTP service
pub fn serve(host: Option<String>, port: Option<u16>) -> CliResult<()> {
    log_event(Event::BootStart);

    let mut config = load_config()?;
    if let Some(host) = host {
        config.http.host = host;
    }
    if let Some(port) = port {
        config.http.port = port;
    }

    let rt = runtime()?;

    rt.block_on(async {
        let orchestrator = Orchestrator::from_config(&config)?;
        let server = HttpServer::with_config(config.http.clone(), Arc::new(orchestrator))?;

        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Run the pipeline once and print the response
pub fn run_once(input: Option<&Path>) -> CliResult<()> {
    let document = read_document(input)?;
    let config = load_config()?;

    let rt = runtime()?;
    let response = rt.block_on(async {
        let orchestrator = Orchestrator::from_config(&config)?;
        run_document(&orchestrator, document).await
    })?;

    write_json(&response)
}

/// Run one `{"change": {...}}` document through `orchestrator`
pub async fn run_document(orchestrator: &Orchestrator, document: Value) -> CliResult<RunResponse> {
    let request: RunRequest = serde_json::from_value(document)?;
    let outcome = orchestrator.run(request.change).await?;
    Ok(outcome.into_response())
}

/// Print the deterministic explanation for a decision
pub fn explain(decision: Option<&Path>) -> CliResult<()> {
    let document = read_document(decision)?;
    write_text(&explain_document(document)?)
}

/// Deterministic explanation for a decision document
pub fn explain_document(document: Value) -> CliResult<String> {
    let decision = into_object(document, "decision")?;
    Ok(format_explanation(&decision))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentHandle, StubAgent};
    use crate::north::{Change, Decision, DecisionSource, EvaluationResult, RemoteEvaluationError};
    use async_trait::async_trait;
    use serde_json::json;

    struct FixedSource(EvaluationResult<Decision>);

    #[async_trait]
    impl DecisionSource for FixedSource {
        async fn evaluate(&self, _change: &Change) -> EvaluationResult<Decision> {
            self.0.clone()
        }
    }

    #[test]
    fn test_explain_document() {
        let text = explain_document(json!({
            "policy": {"decision": "AUTO", "riskScore": 5, "riskLevel": "LOW"}
        }))
        .unwrap();

        assert!(text.contains("Decisão: AUTO"));
        assert!(text.contains("Risk level: LOW"));
    }

    #[test]
    fn test_explain_document_requires_object() {
        let err = explain_document(json!("BLOCK")).unwrap_err();
        assert_eq!(err.code_str(), "NORTH_CLI_INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_run_document() {
        let decision = json!({"policy": {"decision": "APPROVAL"}}).as_object().cloned().unwrap();
        let agent: AgentHandle = Arc::new(StubAgent::replying("Requer aprovação."));
        let orchestrator = Orchestrator::new(Arc::new(FixedSource(Ok(decision))), Some(agent));

        let response = run_document(&orchestrator, json!({"change": {"env": "prod"}}))
            .await
            .unwrap();

        assert_eq!(response.agent_response, "Requer aprovação.");
        assert_eq!(response.north_decision["policy"]["decision"], "APPROVAL");
    }

    #[tokio::test]
    async fn test_run_document_rejects_missing_change() {
        let orchestrator = Orchestrator::new(Arc::new(FixedSource(Ok(Decision::new()))), None);

        let err = run_document(&orchestrator, json!({"action": "deploy"}))
            .await
            .unwrap_err();
        assert_eq!(err.code_str(), "NORTH_CLI_INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_run_document_evaluation_failure() {
        let source = FixedSource(Err(RemoteEvaluationError::Timeout {
            url: "http://north".into(),
            timeout_ms: 30_000,
        }));
        let orchestrator = Orchestrator::new(Arc::new(source), None);

        let err = run_document(&orchestrator, json!({"change": {}}))
            .await
            .unwrap_err();
        assert_eq!(err.code_str(), "NORTH_CLI_EVALUATION_FAILED");
        assert!(err.message().starts_with("Erro chamando EvaluateNorth"));
    }
}
