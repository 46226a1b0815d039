use crate::error::CheckError;
use crate::rules::{Rule, SafetyRequirements};
use shared_types::{BillboardSnapshot, Violation};

/// Check structural safety paperwork
pub fn check_safety(
    billboard: &BillboardSnapshot,
    rule: &Rule<SafetyRequirements>,
) -> Result<Vec<Violation>, CheckError> {
    let mut violations = Vec::new();

    if rule.limits.requires_structural_certificate && billboard.structural_certificate().is_none() {
        violations.push(rule.violation("Missing structural certificate"));
    }

    Ok(violations)
}
