use super::measurement;
use crate::error::CheckError;
use crate::rules::{Rule, SizeLimits};
use shared_types::{BillboardSnapshot, Violation};

/// Check billboard dimensions against a size rule
///
/// Width, height and area are independent, so one rule can raise up to three
/// violations (four when a measured ground clearance is also too low).
pub fn check_size(
    billboard: &BillboardSnapshot,
    rule: &Rule<SizeLimits>,
) -> Result<Vec<Violation>, CheckError> {
    let width = measurement("width_meters", billboard.width_meters)?;
    let height = measurement("height_meters", billboard.height_meters)?;
    let clearance = billboard
        .ground_clearance_meters
        .map(|c| measurement("ground_clearance_meters", c))
        .transpose()?;
    let limits = &rule.limits;
    let mut violations = Vec::new();

    if width > limits.max_width_meters {
        violations.push(
            rule.violation("Width exceeds maximum allowed")
                .with_detail("measured", width)
                .with_detail("limit", limits.max_width_meters),
        );
    }

    if height > limits.max_height_meters {
        violations.push(
            rule.violation("Height exceeds maximum allowed")
                .with_detail("measured", height)
                .with_detail("limit", limits.max_height_meters),
        );
    }

    let area = width * height;
    if area > limits.max_area_sqm {
        violations.push(
            rule.violation("Area exceeds maximum allowed")
                .with_detail("measured", area)
                .with_detail("limit", limits.max_area_sqm),
        );
    }

    if let Some(clearance) = clearance {
        if clearance < limits.min_ground_clearance {
            violations.push(
                rule.violation("Ground clearance below minimum")
                    .with_detail("measured", clearance)
                    .with_detail("limit", limits.min_ground_clearance),
            );
        }
    }

    Ok(violations)
}
