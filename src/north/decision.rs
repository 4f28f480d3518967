//! Change and Decision documents
//!
//! Both are open JSON objects passed through untouched. The only fields this
//! crate ever reads are the six under `policy`, through [`PolicyView`].

use serde_json::{Map, Value};

/// Caller-supplied description of a proposed operational change
pub type Change = Map<String, Value>;

/// Verdict returned by the North evaluator
pub type Decision = Map<String, Value>;

/// Outcome carried in `policy.decision`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyOutcome {
    Auto,
    Approval,
    Block,
    /// Any other string the evaluator may return
    Other(String),
    /// Missing, null, or not a string
    Absent,
}

impl PolicyOutcome {
    pub fn is_block(&self) -> bool {
        matches!(self, PolicyOutcome::Block)
    }
}

impl From<Option<&Value>> for PolicyOutcome {
    fn from(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("AUTO") => PolicyOutcome::Auto,
            Some("APPROVAL") => PolicyOutcome::Approval,
            Some("BLOCK") => PolicyOutcome::Block,
            Some(other) => PolicyOutcome::Other(other.to_string()),
            None => PolicyOutcome::Absent,
        }
    }
}

/// Read-only view over `decision.policy`
///
/// Never fails: a missing or non-object `policy` yields a view where every
/// field is absent.
#[derive(Debug, Clone, Copy)]
pub struct PolicyView<'a> {
    policy: Option<&'a Map<String, Value>>,
}

impl<'a> PolicyView<'a> {
    pub fn of(decision: &'a Decision) -> Self {
        Self {
            policy: decision.get("policy").and_then(Value::as_object),
        }
    }

    fn field(&self, key: &str) -> Option<&'a Value> {
        self.policy
            .and_then(|p| p.get(key))
            .filter(|v| !v.is_null())
    }

    pub fn is_present(&self) -> bool {
        self.policy.is_some()
    }

    pub fn decision(&self) -> Option<&'a Value> {
        self.field("decision")
    }

    pub fn outcome(&self) -> PolicyOutcome {
        PolicyOutcome::from(self.decision())
    }

    pub fn risk_score(&self) -> Option<&'a Value> {
        self.field("riskScore")
    }

    pub fn risk_level(&self) -> Option<&'a Value> {
        self.field("riskLevel")
    }

    pub fn confidence(&self) -> Option<&'a Value> {
        self.field("confidence")
    }

    pub fn risk_breakdown(&self) -> Option<&'a Value> {
        self.field("riskBreakdown")
    }

    pub fn summary(&self) -> Option<&'a Value> {
        self.field("summary")
    }
}
