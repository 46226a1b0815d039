//! Evaluation inputs: billboard snapshot and report context

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Read-only view of a billboard's physical and administrative attributes
///
/// `zone_type` and `billboard_type` are kept as the raw strings stored with
/// the billboard; classification happens at rule selection time so that a
/// typo surfaces as an error instead of an empty rule set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillboardSnapshot {
    pub id: String,
    pub width_meters: f64,
    pub height_meters: f64,
    #[serde(default)]
    pub ground_clearance_meters: Option<f64>,
    pub zone_type: String,
    pub billboard_type: String,
    #[serde(default)]
    pub permit_number: Option<String>,
    #[serde(default)]
    pub permit_expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub structural_certificate_id: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub address: Option<String>,
}

impl BillboardSnapshot {
    pub fn new(
        id: impl Into<String>,
        width_meters: f64,
        height_meters: f64,
        zone_type: impl Into<String>,
        billboard_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            width_meters,
            height_meters,
            ground_clearance_meters: None,
            zone_type: zone_type.into(),
            billboard_type: billboard_type.into(),
            permit_number: None,
            permit_expiry_date: None,
            structural_certificate_id: None,
            latitude: None,
            longitude: None,
            address: None,
        }
    }

    pub fn with_permit(mut self, number: impl Into<String>, expires: Option<NaiveDate>) -> Self {
        self.permit_number = Some(number.into());
        self.permit_expiry_date = expires;
        self
    }

    pub fn with_structural_certificate(mut self, id: impl Into<String>) -> Self {
        self.structural_certificate_id = Some(id.into());
        self
    }

    pub fn with_ground_clearance(mut self, meters: f64) -> Self {
        self.ground_clearance_meters = Some(meters);
        self
    }

    /// Permit number, treating blank strings as absent
    pub fn permit(&self) -> Option<&str> {
        non_blank(self.permit_number.as_deref())
    }

    /// Structural certificate id, treating blank strings as absent
    pub fn structural_certificate(&self) -> Option<&str> {
        non_blank(self.structural_certificate_id.as_deref())
    }

    pub fn area_sqm(&self) -> f64 {
        self.width_meters * self.height_meters
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// Supplementary data attached to a report
///
/// A missing section means the corresponding category is not evaluated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationMeasurements>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_analysis: Option<ContentAnalysis>,
}

impl ReportContext {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_location(mut self, location: LocationMeasurements) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_content(mut self, content: ContentAnalysis) -> Self {
        self.content_analysis = Some(content);
        self
    }
}

/// Distances (meters) measured on site or derived from the report's position
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationMeasurements {
    #[serde(default)]
    pub distance_from_intersection: Option<f64>,
    #[serde(default)]
    pub distance_from_pedestrian_path: Option<f64>,
    #[serde(default)]
    pub distance_from_road: Option<f64>,
    /// Place type (e.g. "schools") to distance of the closest such place
    #[serde(default)]
    pub nearby_places: BTreeMap<String, f64>,
}

impl LocationMeasurements {
    pub fn intersection(distance: f64) -> Self {
        Self {
            distance_from_intersection: Some(distance),
            ..Self::default()
        }
    }
}

/// Output of the content-analysis collaborator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentAnalysis {
    #[serde(default)]
    pub detected_content: BTreeSet<String>,
    /// Disclosure elements found on the billboard face; `None` when the
    /// analysis did not look for them.
    #[serde(default)]
    pub disclosed_elements: Option<BTreeSet<String>>,
}

impl ContentAnalysis {
    pub fn detected<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            detected_content: tags.into_iter().map(Into::into).collect(),
            disclosed_elements: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_permit_is_absent() {
        let mut billboard = BillboardSnapshot::new("1", 10.0, 3.0, "commercial", "gantry");
        assert_eq!(billboard.permit(), None);

        billboard.permit_number = Some("   ".to_string());
        assert_eq!(billboard.permit(), None);

        billboard.permit_number = Some("P-2024-17".to_string());
        assert_eq!(billboard.permit(), Some("P-2024-17"));
    }

    #[test]
    fn test_snapshot_deserializes_with_optional_fields_missing() {
        let json = r#"{
            "id": "42",
            "width_meters": 12.0,
            "height_meters": 4.0,
            "zone_type": "commercial",
            "billboard_type": "unipoles",
            "permit_expiry_date": "2025-06-30"
        }"#;
        let billboard: BillboardSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(billboard.structural_certificate(), None);
        assert_eq!(
            billboard.permit_expiry_date,
            NaiveDate::from_ymd_opt(2025, 6, 30)
        );
        assert_eq!(billboard.area_sqm(), 48.0);
    }

    #[test]
    fn test_context_sections_are_optional() {
        let ctx: ReportContext = serde_json::from_str("{}").unwrap();
        assert!(ctx.location.is_none());
        assert!(ctx.content_analysis.is_none());

        let ctx: ReportContext = serde_json::from_str(
            r#"{"content_analysis": {"detected_content": ["hate_speech"]}}"#,
        )
        .unwrap();
        let content = ctx.content_analysis.unwrap();
        assert!(content.detected_content.contains("hate_speech"));
        assert!(content.disclosed_elements.is_none());
    }
}
