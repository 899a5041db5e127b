//! Comparison prompt sent to the model.
//!
//! The JSON shape below is the contract with the model: the parser reads
//! exactly these field names.

const INSTRUCTIONS: &str = "You are a legal contract analysis AI. Compare the third-party contract \
against our standard contract and identify violations, deviations, and risks.";

const RESPONSE_SCHEMA: &str = r#"Analyze the third-party contract and provide a JSON response with the following structure (respond ONLY with valid JSON, no markdown):
{
  "summary": {
    "totalIssues": number,
    "criticalViolations": number,
    "moderateDeviations": number,
    "minorConcerns": number,
    "overallRisk": "HIGH" | "MEDIUM" | "LOW"
  },
  "violations": [
    {
      "category": "Payment Terms" | "Liability" | "Termination" | "IP Rights" | "Confidentiality" | "Warranties" | "Jurisdiction" | "Other",
      "severity": "CRITICAL" | "MODERATE" | "MINOR",
      "title": "Brief title of the issue",
      "standardClause": "Relevant clause from our standard contract",
      "candidateClause": "Relevant clause from the third-party contract",
      "violation": "Detailed explanation of how it violates or deviates",
      "recommendation": "Suggested action or amendment",
      "riskImpact": "Business/legal risk this poses"
    }
  ]
}"#;

/// Builds the single user message for one comparison. Both texts are
/// embedded verbatim; the result depends on nothing else.
pub fn build_comparison_prompt(standard: &str, candidate: &str) -> String {
    let mut prompt = String::with_capacity(
        INSTRUCTIONS.len() + RESPONSE_SCHEMA.len() + standard.len() + candidate.len() + 96,
    );
    prompt.push_str(INSTRUCTIONS);
    prompt.push_str("\n\nSTANDARD CONTRACT:\n");
    prompt.push_str(standard);
    prompt.push_str("\n\nTHIRD-PARTY CONTRACT TO ANALYZE:\n");
    prompt.push_str(candidate);
    prompt.push_str("\n\n");
    prompt.push_str(RESPONSE_SCHEMA);
    prompt
}
