//! Model instructions and prompt construction

use serde_json::{Map, Value};

/// Fixed system instructions for the governance agent (PT-BR output)
pub const GOVERNANCE_INSTRUCTIONS: &str = "Você é o NorthGovernanceAgent.\n\
O JSON do North é a fonte da verdade.\n\
Explique em PT-BR: decision, riskScore, riskLevel, confidence, riskBreakdown e summary.\n\
Se decision=BLOCK, sugira mitigação prática.\n\
Não invente dados.\n";

/// Build the user prompt embedding both documents verbatim.
///
/// Documents are pretty-printed with two-space indentation; non-ASCII text is
/// kept as-is.
pub fn build_prompt(decision: &Map<String, Value>, change: &Map<String, Value>) -> String {
    format!(
        "Use o JSON do North como fonte da verdade.\n\n\
         North decision JSON:\n{}\n\n\
         Change request:\n{}\n",
        pretty(decision),
        pretty(change)
    )
}

fn pretty(document: &Map<String, Value>) -> String {
    // A map of JSON values always serializes
    serde_json::to_string_pretty(document).unwrap_or_else(|_| "{}".to_string())
}
