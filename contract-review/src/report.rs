//! Finding Report: the structured result of one comparison.
//!
//! Wire names are the ones the prompt asks the model for, so a serialized
//! report parses back through [`crate::parser::parse_finding_report`]
//! unchanged.

use serde::Serialize;

/// Clause text shown when the model gave no excerpt.
pub const CLAUSE_NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FindingReport {
    pub summary: Summary,
    pub violations: Vec<Violation>,
}

impl FindingReport {
    /// `true` when the model found nothing to flag. This is a real result,
    /// not a parse failure.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of findings listed with the given severity. May differ from
    /// the summary counters, which are taken as reported by the model.
    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_issues: u32,
    pub critical_violations: u32,
    pub moderate_deviations: u32,
    pub minor_concerns: u32,
    pub overall_risk: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub category: Category,
    pub severity: Severity,
    pub title: String,
    pub standard_clause: String,
    pub candidate_clause: String,
    #[serde(rename = "violation")]
    pub violation_detail: String,
    pub recommendation: String,
    pub risk_impact: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    #[serde(rename = "Payment Terms")]
    PaymentTerms,
    Liability,
    Termination,
    #[serde(rename = "IP Rights")]
    IpRights,
    Confidentiality,
    Warranties,
    Jurisdiction,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::PaymentTerms,
        Category::Liability,
        Category::Termination,
        Category::IpRights,
        Category::Confidentiality,
        Category::Warranties,
        Category::Jurisdiction,
        Category::Other,
    ];

    /// Lenient label match: case, spaces and punctuation are ignored, so
    /// `"Payment Terms"`, `"PAYMENT_TERMS"` and `"paymentTerms"` are the same.
    /// Anything unrecognized is [`Category::Other`].
    pub fn from_label(raw: &str) -> Self {
        match normalize(raw).as_str() {
            "paymentterms" | "payment" => Category::PaymentTerms,
            "liability" => Category::Liability,
            "termination" => Category::Termination,
            "iprights" | "ip" | "intellectualproperty" | "intellectualpropertyrights" => {
                Category::IpRights
            }
            "confidentiality" => Category::Confidentiality,
            "warranties" | "warranty" => Category::Warranties,
            "jurisdiction" => Category::Jurisdiction,
            _ => Category::Other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::PaymentTerms => "Payment Terms",
            Category::Liability => "Liability",
            Category::Termination => "Termination",
            Category::IpRights => "IP Rights",
            Category::Confidentiality => "Confidentiality",
            Category::Warranties => "Warranties",
            Category::Jurisdiction => "Jurisdiction",
            Category::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    Moderate,
    #[default]
    Minor,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Critical, Severity::Moderate, Severity::Minor];

    /// Unknown labels fall back to [`Severity::Minor`].
    pub fn from_label(raw: &str) -> Self {
        match normalize(raw).as_str() {
            "critical" => Severity::Critical,
            "moderate" => Severity::Moderate,
            _ => Severity::Minor,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::Moderate => "MODERATE",
            Severity::Minor => "MINOR",
        }
    }

    /// Colour marker used by text renderings of a finding.
    pub fn marker(self) -> &'static str {
        match self {
            Severity::Critical => "🔴",
            Severity::Moderate => "🟠",
            Severity::Minor => "🟡",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
    #[default]
    Unknown,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::High,
        RiskLevel::Medium,
        RiskLevel::Low,
        RiskLevel::Unknown,
    ];

    /// Unknown labels fall back to [`RiskLevel::Unknown`].
    pub fn from_label(raw: &str) -> Self {
        match normalize(raw).as_str() {
            "high" => RiskLevel::High,
            "medium" => RiskLevel::Medium,
            "low" => RiskLevel::Low,
            _ => RiskLevel::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::High => "HIGH",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::Low => "LOW",
            RiskLevel::Unknown => "UNKNOWN",
        }
    }
}

fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn serialized_labels_are_accepted_back() {
        for c in Category::ALL {
            let wire = serde_json::to_value(c).unwrap();
            assert_eq!(wire, c.label());
            assert_eq!(Category::from_label(c.label()), c);
        }
        for s in Severity::ALL {
            assert_eq!(serde_json::to_value(s).unwrap(), s.label());
            assert_eq!(Severity::from_label(s.label()), s);
        }
        for r in RiskLevel::ALL {
            assert_eq!(serde_json::to_value(r).unwrap(), r.label());
            assert_eq!(RiskLevel::from_label(r.label()), r);
        }
    }

    #[test]
    fn labels_are_matched_leniently() {
        assert_eq!(Category::from_label("PaymentTerms"), Category::PaymentTerms);
        assert_eq!(Category::from_label("ip_rights"), Category::IpRights);
        assert_eq!(Category::from_label("Intellectual Property"), Category::IpRights);
        assert_eq!(Category::from_label("Force Majeure"), Category::Other);
        assert_eq!(Severity::from_label(" critical "), Severity::Critical);
        assert_eq!(Severity::from_label("SEVERE"), Severity::Minor);
        assert_eq!(RiskLevel::from_label("Medium"), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_label(""), RiskLevel::Unknown);
    }

    #[test]
    fn violation_uses_wire_field_names() {
        let v = Violation {
            category: Category::PaymentTerms,
            severity: Severity::Critical,
            title: "t".into(),
            standard_clause: "a".into(),
            candidate_clause: "b".into(),
            violation_detail: "d".into(),
            recommendation: "r".into(),
            risk_impact: "i".into(),
        };
        assert_eq!(
            serde_json::to_value(&v).unwrap(),
            serde_json::json!({
                "category": "Payment Terms",
                "severity": "CRITICAL",
                "title": "t",
                "standardClause": "a",
                "candidateClause": "b",
                "violation": "d",
                "recommendation": "r",
                "riskImpact": "i"
            })
        );
    }

    #[test]
    fn clean_report_has_no_findings() {
        let report = FindingReport {
            summary: Summary::default(),
            violations: Vec::new(),
        };
        assert!(report.is_clean());
        assert_eq!(report.count_by_severity(Severity::Critical), 0);
        assert_eq!(Severity::Critical.marker(), "🔴");
    }
}
