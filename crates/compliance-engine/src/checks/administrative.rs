use crate::error::CheckError;
use crate::rules::{AdministrativeRequirements, Rule};
use chrono::NaiveDate;
use shared_types::{BillboardSnapshot, Violation};

/// Check permit paperwork
///
/// A missing permit and an expired permit date are independent findings;
/// both can be raised by the same rule.
pub fn check_administrative(
    billboard: &BillboardSnapshot,
    rule: &Rule<AdministrativeRequirements>,
    today: NaiveDate,
) -> Result<Vec<Violation>, CheckError> {
    let mut violations = Vec::new();

    if rule.limits.requires_permit && billboard.permit().is_none() {
        violations.push(rule.violation("Missing permit"));
    }

    if let Some(expiry) = billboard.permit_expiry_date {
        if expiry < today {
            violations.push(
                rule.violation("Permit expired")
                    .with_detail("permit_expiry_date", expiry.to_string()),
            );
        }
    }

    Ok(violations)
}
