use shared_types::{RuleCategory, ViolationType};

/// Map a rule category to the violation-type tag recorded with its violations
pub fn violation_type(category: RuleCategory) -> ViolationType {
    match category {
        RuleCategory::Size => ViolationType::SizeViolation,
        RuleCategory::Location => ViolationType::LocationViolation,
        RuleCategory::Content => ViolationType::ContentViolation,
        RuleCategory::Safety => ViolationType::SafetyViolation,
        RuleCategory::Administrative => ViolationType::AdministrativeViolation,
    }
}
