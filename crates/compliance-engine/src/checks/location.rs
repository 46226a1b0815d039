use super::measurement;
use crate::error::CheckError;
use crate::rules::{LocationLimits, Rule};
use shared_types::{LocationMeasurements, Violation};

/// Check measured distances against a location rule
///
/// Without location data nothing is evaluated. Each individual distance is
/// only compared when it was actually measured.
pub fn check_location(
    location: Option<&LocationMeasurements>,
    rule: &Rule<LocationLimits>,
) -> Result<Vec<Violation>, CheckError> {
    let Some(location) = location else {
        return Ok(Vec::new());
    };
    let limits = &rule.limits;
    let mut violations = Vec::new();

    let distances = [
        (
            "distance_from_intersection",
            location.distance_from_intersection,
            limits.min_distance_from_intersection,
            "Too close to intersection",
        ),
        (
            "distance_from_pedestrian_path",
            location.distance_from_pedestrian_path,
            limits.min_distance_from_pedestrian_path,
            "Too close to pedestrian path",
        ),
        (
            "distance_from_road",
            location.distance_from_road,
            limits.min_distance_from_road,
            "Too close to road",
        ),
    ];

    for (field, measured, minimum, message) in distances {
        let Some(measured) = measured else {
            continue;
        };
        let measured = measurement(field, measured)?;
        if measured < minimum {
            violations.push(
                rule.violation(message)
                    .with_detail("measured", measured)
                    .with_detail("minimum", minimum),
            );
        }
    }

    for (place, minimum) in &limits.prohibited_nearby_places {
        let Some(&measured) = location.nearby_places.get(place) else {
            continue;
        };
        let measured = measurement(place, measured)?;
        if measured < *minimum {
            violations.push(
                rule.violation(format!("Too close to {}", place))
                    .with_detail("place_type", place.as_str())
                    .with_detail("measured", measured)
                    .with_detail("minimum", *minimum),
            );
        }
    }

    Ok(violations)
}
