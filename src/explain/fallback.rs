//! Deterministic explanation formatter
//!
//! Total over every decision object: missing or malformed `policy` fields
//! render as [`ABSENT`].

use serde_json::Value;

use crate::north::{Decision, PolicyView};

/// Placeholder for a missing or null field
pub const ABSENT: &str = "N/A";

/// Appended when the decision is BLOCK
pub const MITIGATION_CHECKLIST: &str = "Mitigação sugerida:\n\
- Reduzir blast radius (limitar escopo/targets)\n\
- Evitar ação irreversível (ou adicionar plano de rollback)\n\
- Exigir aprovação (APPROVAL) e anexar evidências\n\
- Completar governança/compliance (change ticket, CAB, etc.)\n";

/// Render a field: bare strings, literal scalars, compact JSON otherwise
fn render(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => ABSENT.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Format the fixed six-line report, plus the checklist for BLOCK
pub fn format_explanation(decision: &Decision) -> String {
    let policy = PolicyView::of(decision);
    let mut out = format!(
        "Decisão: {}\n\
         Risk score: {}\n\
         Risk level: {}\n\
         Confidence: {}\n\
         Risk breakdown: {}\n\
         Summary: {}",
        render(policy.decision()),
        render(policy.risk_score()),
        render(policy.risk_level()),
        render(policy.confidence()),
        render(policy.risk_breakdown()),
        render(policy.summary()),
    );

    if policy.outcome().is_block() {
        out.push_str("\n\n");
        out.push_str(MITIGATION_CHECKLIST);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decision(value: Value) -> Decision {
        value.as_object().cloned().unwrap()
    }

    fn block_decision() -> Decision {
        decision(json!({
            "policy": {
                "decision": "BLOCK",
                "riskScore": 87,
                "riskLevel": "HIGH",
                "confidence": 0.9,
                "riskBreakdown": {"irreversible": true},
                "summary": "Irreversible action without rollback"
            }
        }))
    }

    #[test]
    fn test_block_report() {
        let text = format_explanation(&block_decision());

        assert!(text.starts_with("Decisão: BLOCK\n"));
        assert!(text.contains("Risk score: 87\n"));
        assert!(text.contains("Risk level: HIGH\n"));
        assert!(text.contains("Confidence: 0.9\n"));
        assert!(text.contains("Risk breakdown: {\"irreversible\":true}\n"));
        assert!(text.contains("Summary: Irreversible action without rollback"));
        assert!(text.ends_with(MITIGATION_CHECKLIST));
    }

    #[test]
    fn test_non_block_has_no_checklist() {
        for outcome in [json!("AUTO"), json!("APPROVAL"), json!("block"), Value::Null] {
            let d = decision(json!({"policy": {"decision": outcome, "riskScore": 10}}));
            let text = format_explanation(&d);
            assert!(!text.contains("Mitigação sugerida"), "{text}");
        }
    }

    #[test]
    fn test_approval_report_lines() {
        let d = decision(json!({
            "policy": {
                "decision": "APPROVAL",
                "riskScore": 55,
                "riskLevel": "MEDIUM",
                "confidence": 0.75,
                "riskBreakdown": {"environment": 20, "total": 55},
                "summary": "Prod deploy needs approval"
            }
        }));

        let lines: Vec<_> = format_explanation(&d).lines().map(String::from).collect();
        assert_eq!(
            lines,
            vec![
                "Decisão: APPROVAL",
                "Risk score: 55",
                "Risk level: MEDIUM",
                "Confidence: 0.75",
                "Risk breakdown: {\"environment\":20,\"total\":55}",
                "Summary: Prod deploy needs approval",
            ]
        );
    }

    #[test]
    fn test_missing_policy_still_renders() {
        let text = format_explanation(&Decision::new());

        assert!(!text.is_empty());
        assert!(text.contains("Decisão: N/A"));
        assert!(text.contains("Summary: N/A"));
        assert!(!text.contains("Mitigação"));
    }

    #[test]
    fn test_malformed_policy_still_renders() {
        let d = decision(json!({"policy": ["BLOCK"]}));
        let text = format_explanation(&d);
        assert!(text.contains("Risk score: N/A"));

        let d = decision(json!({"policy": {"decision": 42, "riskScore": "high"}}));
        let text = format_explanation(&d);
        assert!(text.contains("Decisão: 42"));
        assert!(text.contains("Risk score: high"));
        assert!(!text.contains("Mitigação"));
    }
}
