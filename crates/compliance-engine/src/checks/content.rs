use crate::error::CheckError;
use crate::rules::{ContentPolicy, Rule};
use shared_types::{ContentAnalysis, Violation};

/// Check detected content tags against a content rule
///
/// One violation per prohibited tag found. Required disclosure elements are
/// only checked when the analysis reports which elements it saw.
pub fn check_content(
    analysis: Option<&ContentAnalysis>,
    rule: &Rule<ContentPolicy>,
) -> Result<Vec<Violation>, CheckError> {
    let Some(analysis) = analysis else {
        return Ok(Vec::new());
    };
    let mut violations = Vec::new();

    for prohibited in &rule.limits.prohibited_content {
        if analysis.detected_content.contains(prohibited) {
            violations.push(
                rule.violation(format!("Prohibited content: {}", prohibited))
                    .with_detail("content_tag", prohibited.as_str()),
            );
        }
    }

    if let Some(ref disclosed) = analysis.disclosed_elements {
        for element in &rule.limits.required_elements {
            if !disclosed.contains(element) {
                violations.push(
                    rule.violation(format!("Missing required element: {}", element))
                        .with_detail("element", element.as_str()),
                );
            }
        }
    }

    Ok(violations)
}
