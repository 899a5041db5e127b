//! Response validator: raw model text → [`FindingReport`].
//!
//! The model's output is untrusted. After a textual cleanup it goes through
//! `serde_json::Value` and an explicit coercion layer:
//! - `summary` (object) and `violations` (array) are mandatory
//! - every other field has a default (clauses `"N/A"`, strings `""`, counts `0`)
//! - unknown enum labels fall back to `Other` / `MINOR` / `UNKNOWN`
//! - non-object entries in `violations` are dropped with a warning

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{
    errors::MalformedResponse,
    report::{CLAUSE_NOT_AVAILABLE, Category, FindingReport, RiskLevel, Severity, Summary, Violation},
};

type Object = Map<String, Value>;

const FENCE: &str = "```";

/// Removes a leading ```` ``` ```` / ```` ```json ```` marker, the matching
/// closing marker and surrounding whitespace. Purely textual.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut t = raw.trim();
    if let Some(rest) = t.strip_prefix(FENCE) {
        // language tag of the opening fence (json, JSON, ...)
        let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
        t = match rest.rfind(FENCE) {
            Some(pos) => &rest[..pos],
            None => rest,
        };
    } else if let Some(rest) = t.strip_suffix(FENCE) {
        t = rest;
    }
    t.trim()
}

/// Parses one model response into a report.
///
/// # Errors
/// [`MalformedResponse`] if the cleaned text is not JSON, or lacks the
/// `summary` object or the `violations` array.
pub fn parse_finding_report(raw: &str) -> Result<FindingReport, MalformedResponse> {
    let cleaned = strip_code_fences(raw);
    if cleaned.is_empty() {
        return Err(MalformedResponse::new("empty response"));
    }

    let doc = parse_json(cleaned)?;
    let root = doc
        .as_object()
        .ok_or_else(|| MalformedResponse::new(format!("top level is {}", json_kind(&doc))))?;

    let summary = match root.get("summary") {
        Some(Value::Object(obj)) => coerce_summary(obj),
        Some(other) => {
            return Err(MalformedResponse::new(format!(
                "`summary` is {}, expected an object",
                json_kind(other)
            )));
        }
        None => return Err(MalformedResponse::new("missing `summary`")),
    };

    let entries = match root.get("violations") {
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(MalformedResponse::new(format!(
                "`violations` is {}, expected an array",
                json_kind(other)
            )));
        }
        None => return Err(MalformedResponse::new("missing `violations`")),
    };

    let violations: Vec<Violation> = entries
        .iter()
        .enumerate()
        .filter_map(|(idx, entry)| match entry {
            Value::Object(obj) => Some(coerce_violation(obj)),
            other => {
                warn!(idx, kind = json_kind(other), "skipping non-object violation entry");
                None
            }
        })
        .collect();

    debug!(
        violations = violations.len(),
        overall_risk = summary.overall_risk.label(),
        "finding report parsed"
    );

    Ok(FindingReport {
        summary,
        violations,
    })
}

/// Parses the cleaned text; if that fails and the text has prose around a
/// JSON object, retries with the outermost `{ ... }` slice.
fn parse_json(cleaned: &str) -> Result<Value, MalformedResponse> {
    let first = match serde_json::from_str::<Value>(cleaned) {
        Ok(v) => return Ok(v),
        Err(e) => e,
    };

    if let (Some(start), Some(end)) = (cleaned.find('{'), cleaned.rfind('}')) {
        if start < end && (start > 0 || end + 1 < cleaned.len()) {
            if let Ok(v) = serde_json::from_str::<Value>(&cleaned[start..=end]) {
                debug!(skipped_prefix = start, "parsed JSON object surrounded by prose");
                return Ok(v);
            }
        }
    }

    Err(MalformedResponse::new(format!("not valid JSON: {first}")))
}

fn coerce_summary(obj: &Object) -> Summary {
    Summary {
        total_issues: count_field(obj, "totalIssues"),
        critical_violations: count_field(obj, "criticalViolations"),
        moderate_deviations: count_field(obj, "moderateDeviations"),
        minor_concerns: count_field(obj, "minorConcerns"),
        overall_risk: RiskLevel::from_label(label_field(obj, "overallRisk")),
    }
}

fn coerce_violation(obj: &Object) -> Violation {
    Violation {
        category: Category::from_label(label_field(obj, "category")),
        severity: Severity::from_label(label_field(obj, "severity")),
        title: text_field(obj, &["title"], ""),
        standard_clause: text_field(obj, &["standardClause", "oraneClause"], CLAUSE_NOT_AVAILABLE),
        candidate_clause: text_field(
            obj,
            &["candidateClause", "thirdPartyClause"],
            CLAUSE_NOT_AVAILABLE,
        ),
        violation_detail: text_field(obj, &["violation", "violationDetail"], ""),
        recommendation: text_field(obj, &["recommendation"], ""),
        risk_impact: text_field(obj, &["riskImpact"], ""),
    }
}

/// First present, non-null key wins. Non-string scalars are rendered as JSON.
fn text_field(obj: &Object, keys: &[&str], default: &str) -> String {
    keys.iter()
        .find_map(|k| obj.get(*k).filter(|v| !v.is_null()))
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unwrap_or_else(|| default.to_string())
}

fn label_field<'a>(obj: &'a Object, key: &str) -> &'a str {
    obj.get(key).and_then(Value::as_str).unwrap_or_default()
}

/// Non-negative integer, a float (floored), or a numeric string; else `0`.
fn count_field(obj: &Object, key: &str) -> u32 {
    match obj.get(key) {
        Some(Value::Number(n)) => {
            if let Some(u) = n.as_u64() {
                u32::try_from(u).unwrap_or(u32::MAX)
            } else {
                match n.as_f64() {
                    Some(f) if f.is_finite() && f > 0.0 => f.floor() as u32,
                    _ => 0,
                }
            }
        }
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
