//! # Decision-and-Explanation Pipeline
//!
//! One request = one strictly sequential run:
//!
//! 1. fetch the decision from North (mandatory; failure aborts the run)
//! 2. resolve an explanation (best-effort; never fails)
//!
//! The [`Orchestrator`] is built once at startup and shared read-only across
//! requests. It owns the agent handle; nothing in it is mutated afterwards
//! except the atomic counters.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agent::{AgentHandle, AzureOpenAiAgent};
use crate::config::{ConfigResult, ServiceConfig};
use crate::explain::{self, Explanation, Resolution, GOVERNANCE_INSTRUCTIONS};
use crate::north::{
    Change, Decision, DecisionSource, EvaluationResult, NorthClient, PolicyView,
};
use crate::observability::{log_event_with_fields, Event, MetricsRegistry};

/// Body of a run request: `{"change": {...}}`
#[derive(Debug, Clone, Deserialize)]
pub struct RunRequest {
    pub change: Change,
}

/// Body of a successful run response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RunResponse {
    pub agent_response: String,
    pub north_decision: Decision,
    pub llm_error: Option<String>,
}

/// Everything a completed run produced
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub run_id: Uuid,
    pub decision: Decision,
    pub resolution: Resolution,
}

impl RunOutcome {
    pub fn into_response(self) -> RunResponse {
        RunResponse {
            llm_error: self.resolution.model_error.map(|e| e.to_string()),
            agent_response: self.resolution.explanation.into_text(),
            north_decision: self.decision,
        }
    }
}

/// Wires the decision source, the optional agent, and the counters
pub struct Orchestrator {
    source: Arc<dyn DecisionSource>,
    agent: Option<AgentHandle>,
    metrics: Arc<MetricsRegistry>,
}

impl Orchestrator {
    pub fn new(source: Arc<dyn DecisionSource>, agent: Option<AgentHandle>) -> Self {
        Self {
            source,
            agent,
            metrics: Arc::new(MetricsRegistry::new()),
        }
    }

    /// Build the production pipeline from configuration.
    ///
    /// A model agent that cannot be constructed is logged and left out; the
    /// service then runs deterministic-only. A North client that cannot be
    /// constructed fails startup.
    pub fn from_config(config: &ServiceConfig) -> ConfigResult<Self> {
        let north = NorthClient::new(config.north.url.clone(), config.north.timeout)?;

        let agent: Option<AgentHandle> = match &config.model {
            None => {
                let missing = config.missing_model_settings.join(",");
                log_event_with_fields(Event::AgentDisabled, &[("missing", &missing)]);
                None
            }
            Some(model) => match AzureOpenAiAgent::new(model, GOVERNANCE_INSTRUCTIONS) {
                Ok(agent) => {
                    log_event_with_fields(
                        Event::AgentConfigured,
                        &[
                            ("deployment", &model.deployment),
                            ("api_version", &model.api_version),
                        ],
                    );
                    Some(Arc::new(agent) as AgentHandle)
                }
                Err(e) => {
                    let reason = e.to_string();
                    log_event_with_fields(Event::AgentDisabled, &[("error", &reason)]);
                    None
                }
            },
        };

        Ok(Self::new(Arc::new(north), agent))
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    pub fn has_agent(&self) -> bool {
        self.agent.is_some()
    }

    /// Run the pipeline for one change.
    pub async fn run(&self, change: Change) -> EvaluationResult<RunOutcome> {
        let run_id = Uuid::new_v4();
        let run_id_str = run_id.to_string();
        let started = Instant::now();

        self.metrics.increment_runs_received();
        log_event_with_fields(
            Event::RunReceived,
            &[
                ("run_id", &run_id_str),
                ("change_fields", &change.len().to_string()),
            ],
        );

        let decision = match self.source.evaluate(&change).await {
            Ok(decision) => decision,
            Err(e) => {
                self.metrics.increment_evaluation_failures();
                log_event_with_fields(
                    Event::EvaluationFailed,
                    &[("run_id", &run_id_str), ("error", &e.to_string())],
                );
                return Err(e);
            }
        };

        self.metrics.increment_decisions_fetched();
        let outcome = render_outcome(&decision);
        log_event_with_fields(
            Event::EvaluationComplete,
            &[
                ("run_id", &run_id_str),
                ("decision", &outcome),
                ("elapsed_ms", &started.elapsed().as_millis().to_string()),
            ],
        );

        let resolution = explain::explain(self.agent.as_ref(), &decision, &change).await;
        self.record_resolution(&run_id_str, &resolution);

        log_event_with_fields(
            Event::RunComplete,
            &[
                ("run_id", &run_id_str),
                ("source", resolution.explanation.source()),
                ("elapsed_ms", &started.elapsed().as_millis().to_string()),
            ],
        );

        Ok(RunOutcome {
            run_id,
            decision,
            resolution,
        })
    }

    fn record_resolution(&self, run_id: &str, resolution: &Resolution) {
        match (&resolution.explanation, &resolution.model_error) {
            (Explanation::Model(_), _) => {
                self.metrics.increment_model_explanations();
                log_event_with_fields(Event::ModelExplanation, &[("run_id", run_id)]);
            }
            (Explanation::Deterministic(_), Some(err)) => {
                self.metrics.increment_model_failures();
                self.metrics.increment_deterministic_explanations();
                log_event_with_fields(
                    Event::ModelFallback,
                    &[("run_id", run_id), ("error", &err.to_string())],
                );
            }
            (Explanation::Deterministic(_), None) => {
                self.metrics.increment_deterministic_explanations();
                log_event_with_fields(Event::DeterministicExplanation, &[("run_id", run_id)]);
            }
        }
    }
}

fn render_outcome(decision: &Decision) -> String {
    PolicyView::of(decision)
        .decision()
        .map(|v| v.as_str().map(String::from).unwrap_or_else(|| v.to_string()))
        .unwrap_or_else(|| explain::ABSENT.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{ModelUnavailableError, StubAgent};
    use crate::config::ConfigError;
    use crate::north::RemoteEvaluationError;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct FixedSource(EvaluationResult<Decision>);

    #[async_trait]
    impl DecisionSource for FixedSource {
        async fn evaluate(&self, _change: &Change) -> EvaluationResult<Decision> {
            self.0.clone()
        }
    }

    fn decision(value: Value) -> Decision {
        value.as_object().cloned().unwrap()
    }

    fn blocking_source() -> Arc<dyn DecisionSource> {
        Arc::new(FixedSource(Ok(decision(json!({
            "policy": {
                "decision": "BLOCK",
                "riskScore": 87,
                "riskLevel": "HIGH",
                "confidence": 0.9,
                "riskBreakdown": {"irreversible": true},
                "summary": "Irreversible action without rollback"
            }
        })))))
    }

    fn change() -> Change {
        decision(json!({"action": "restart-service"}))
    }

    #[tokio::test]
    async fn test_run_without_agent() {
        let orchestrator = Orchestrator::new(blocking_source(), None);
        let response = orchestrator.run(change()).await.unwrap().into_response();

        assert!(response.agent_response.contains("Decisão: BLOCK"));
        assert!(response.agent_response.contains("Risk score: 87"));
        assert!(response.llm_error.is_none());
        assert_eq!(response.north_decision["policy"]["riskLevel"], json!("HIGH"));

        let snapshot = orchestrator.metrics().snapshot();
        assert_eq!(snapshot.runs_received, 1);
        assert_eq!(snapshot.decisions_fetched, 1);
        assert_eq!(snapshot.deterministic_explanations, 1);
    }

    #[tokio::test]
    async fn test_run_with_model() {
        let agent: AgentHandle = Arc::new(StubAgent::replying("Bloqueado: ação irreversível."));
        let orchestrator = Orchestrator::new(blocking_source(), Some(agent));
        assert!(orchestrator.has_agent());

        let response = orchestrator.run(change()).await.unwrap().into_response();

        assert_eq!(response.agent_response, "Bloqueado: ação irreversível.");
        assert!(response.llm_error.is_none());
        assert_eq!(orchestrator.metrics().snapshot().model_explanations, 1);
    }

    #[tokio::test]
    async fn test_run_with_failing_model_reports_error() {
        let agent: AgentHandle = Arc::new(StubAgent::failing(
            ModelUnavailableError::Transport("connection reset".into()),
        ));
        let orchestrator = Orchestrator::new(blocking_source(), Some(agent));

        let response = orchestrator.run(change()).await.unwrap().into_response();

        assert!(response.agent_response.contains("Mitigação sugerida:"));
        assert_eq!(
            response.llm_error.as_deref(),
            Some("model transport error: connection reset")
        );
        assert_eq!(orchestrator.metrics().snapshot().model_failures, 1);
    }

    #[tokio::test]
    async fn test_evaluation_failure_aborts_run() {
        let source = Arc::new(FixedSource(Err(RemoteEvaluationError::Status {
            status: 500,
            body: "down".into(),
        })));
        // The agent must not be consulted without a decision
        let agent: AgentHandle = Arc::new(StubAgent::replying("should not appear"));
        let orchestrator = Orchestrator::new(source, Some(agent));

        let err = orchestrator.run(change()).await.unwrap_err();

        assert!(matches!(err, RemoteEvaluationError::Status { status: 500, .. }));
        let snapshot = orchestrator.metrics().snapshot();
        assert_eq!(snapshot.evaluation_failures, 1);
        assert_eq!(snapshot.model_explanations, 0);
    }

    #[test]
    fn test_from_config_rejects_unusable_north_url() {
        let config =
            ServiceConfig::from_lookup(|key| (key == "NORTH_EVALUATE_URL").then(|| "north".into()))
                .unwrap();

        assert!(matches!(
            Orchestrator::from_config(&config),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_response_serializes_camel_case_with_null_error() {
        let response = RunResponse {
            agent_response: "ok".into(),
            north_decision: Decision::new(),
            llm_error: None,
        };
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["agentResponse"], "ok");
        assert_eq!(json["northDecision"], json!({}));
        assert!(json.get("llmError").unwrap().is_null());
    }

    #[test]
    fn test_render_outcome() {
        assert_eq!(render_outcome(&decision(json!({"policy": {"decision": "AUTO"}}))), "AUTO");
        assert_eq!(render_outcome(&Decision::new()), "N/A");
    }
}
