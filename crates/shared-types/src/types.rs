use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity tier of a rule, copied onto every violation it raises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

/// Rule category; doubles as the dispatch tag for evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    Size,
    Location,
    Content,
    Safety,
    Administrative,
}

impl RuleCategory {
    pub const ALL: [RuleCategory; 5] = [
        RuleCategory::Size,
        RuleCategory::Location,
        RuleCategory::Content,
        RuleCategory::Safety,
        RuleCategory::Administrative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleCategory::Size => "size",
            RuleCategory::Location => "location",
            RuleCategory::Content => "content",
            RuleCategory::Safety => "safety",
            RuleCategory::Administrative => "administrative",
        }
    }
}

impl std::fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Violation-type tag stored with persisted violations
///
/// `Unauthorized`, `StructuralIssue` and `ExpiredPermit` are recorded by
/// inspectors; the rule engine only emits the per-category tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationType {
    Unauthorized,
    SizeViolation,
    LocationViolation,
    StructuralIssue,
    ContentViolation,
    ExpiredPermit,
    SafetyViolation,
    AdministrativeViolation,
}

impl ViolationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationType::Unauthorized => "unauthorized",
            ViolationType::SizeViolation => "size_violation",
            ViolationType::LocationViolation => "location_violation",
            ViolationType::StructuralIssue => "structural_issue",
            ViolationType::ContentViolation => "content_violation",
            ViolationType::ExpiredPermit => "expired_permit",
            ViolationType::SafetyViolation => "safety_violation",
            ViolationType::AdministrativeViolation => "administrative_violation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub rule_id: String, // e.g., "SIZE-COMM-001"
    #[serde(rename = "type")]
    pub violation_type: ViolationType,
    pub severity: Severity,
    pub message: String,
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl Violation {
    pub fn new(
        rule_id: impl Into<String>,
        violation_type: ViolationType,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            violation_type,
            severity,
            message: message.into(),
            details: serde_json::Map::new(),
        }
    }

    /// Attach a key to the details payload
    pub fn with_detail(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }
}

/// Outcome of evaluating one billboard against a rule set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceResult {
    pub billboard_id: String,
    pub is_compliant: bool,
    pub violations: Vec<Violation>,
    pub checked_at: DateTime<Utc>,
    /// Categories whose check failed and contributed no violations.
    /// A non-empty list means "compliance unknown" for those categories.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_categories: Vec<RuleCategory>,
}

impl ComplianceResult {
    pub fn new(
        billboard_id: impl Into<String>,
        violations: Vec<Violation>,
        skipped_categories: Vec<RuleCategory>,
        checked_at: DateTime<Utc>,
    ) -> Self {
        Self {
            billboard_id: billboard_id.into(),
            is_compliant: violations.is_empty(),
            violations,
            checked_at,
            skipped_categories,
        }
    }

    pub fn is_degraded(&self) -> bool {
        !self.skipped_categories.is_empty()
    }

    pub fn has_critical_violations(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.severity == Severity::Critical)
    }

    pub fn violations_of_type(&self, violation_type: ViolationType) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|v| v.violation_type == violation_type)
            .collect()
    }
}
