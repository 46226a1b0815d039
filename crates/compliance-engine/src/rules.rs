//! Typed rule records
//!
//! Every rule shares the same header (id, description, severity and its
//! applicability scope). The category-specific limits live in the `S`
//! parameter of [`Rule`], which is flattened into the same JSON object.
//! [`RuleRef`] is the tagged view used wherever rules of different categories
//! are handled together.

use crate::classifier;
use serde::{Deserialize, Serialize};
use shared_types::{BillboardType, RuleCategory, Severity, Violation, ZoneType};
use std::collections::{BTreeMap, BTreeSet};

/// A compliance rule scoped to a set of zones and billboard types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule<S> {
    pub rule_id: String,
    pub description: String,
    pub severity: Severity,
    pub applicable_zones: BTreeSet<ZoneType>,
    pub applicable_billboard_types: BTreeSet<BillboardType>,
    #[serde(flatten)]
    pub limits: S,
}

/// Category-specific part of a rule
pub trait RuleSpec: Sized {
    const CATEGORY: RuleCategory;

    fn tag(rule: &Rule<Self>) -> RuleRef<'_>;

    /// Numeric limits that must be finite and non-negative
    fn numeric_limits(&self) -> Vec<(String, f64)>;
}

impl<S: RuleSpec> Rule<S> {
    pub fn new(
        rule_id: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
        zones: impl IntoIterator<Item = ZoneType>,
        billboard_types: impl IntoIterator<Item = BillboardType>,
        limits: S,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            description: description.into(),
            severity,
            applicable_zones: zones.into_iter().collect(),
            applicable_billboard_types: billboard_types.into_iter().collect(),
            limits,
        }
    }

    pub fn category(&self) -> RuleCategory {
        S::CATEGORY
    }

    /// Exact membership in both scopes; there are no wildcards
    pub fn applies_to(&self, zone: ZoneType, billboard_type: BillboardType) -> bool {
        self.applicable_zones.contains(&zone)
            && self.applicable_billboard_types.contains(&billboard_type)
    }

    pub fn as_tagged(&self) -> RuleRef<'_> {
        S::tag(self)
    }

    /// Build a violation raised by this rule
    pub fn violation(&self, message: impl Into<String>) -> Violation {
        Violation::new(
            self.rule_id.clone(),
            classifier::violation_type(S::CATEGORY),
            self.severity,
            message,
        )
        .with_detail("rule_description", self.description.clone())
        .with_detail("category", S::CATEGORY.as_str())
    }
}

// ============================================================================
// Size
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeLimits {
    pub max_width_meters: f64,
    pub max_height_meters: f64,
    pub max_area_sqm: f64,
    #[serde(default = "default_ground_clearance")]
    pub min_ground_clearance: f64,
}

fn default_ground_clearance() -> f64 {
    2.5
}

impl SizeLimits {
    pub fn new(max_width_meters: f64, max_height_meters: f64, max_area_sqm: f64) -> Self {
        Self {
            max_width_meters,
            max_height_meters,
            max_area_sqm,
            min_ground_clearance: default_ground_clearance(),
        }
    }
}

impl RuleSpec for SizeLimits {
    const CATEGORY: RuleCategory = RuleCategory::Size;

    fn tag(rule: &Rule<Self>) -> RuleRef<'_> {
        RuleRef::Size(rule)
    }

    fn numeric_limits(&self) -> Vec<(String, f64)> {
        vec![
            ("max_width_meters".to_string(), self.max_width_meters),
            ("max_height_meters".to_string(), self.max_height_meters),
            ("max_area_sqm".to_string(), self.max_area_sqm),
            ("min_ground_clearance".to_string(), self.min_ground_clearance),
        ]
    }
}

// ============================================================================
// Location
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationLimits {
    #[serde(default = "default_intersection_distance")]
    pub min_distance_from_intersection: f64,
    #[serde(default = "default_path_distance")]
    pub min_distance_from_pedestrian_path: f64,
    #[serde(default = "default_path_distance")]
    pub min_distance_from_road: f64,
    /// Place type to minimum distance in meters
    #[serde(default = "default_prohibited_nearby_places")]
    pub prohibited_nearby_places: BTreeMap<String, f64>,
}

fn default_intersection_distance() -> f64 {
    30.0
}

fn default_path_distance() -> f64 {
    1.0
}

fn default_prohibited_nearby_places() -> BTreeMap<String, f64> {
    [
        ("schools", 100.0),
        ("hospitals", 100.0),
        ("religious_places", 50.0),
        ("heritage_sites", 100.0),
    ]
    .into_iter()
    .map(|(place, distance)| (place.to_string(), distance))
    .collect()
}

impl Default for LocationLimits {
    fn default() -> Self {
        Self {
            min_distance_from_intersection: default_intersection_distance(),
            min_distance_from_pedestrian_path: default_path_distance(),
            min_distance_from_road: default_path_distance(),
            prohibited_nearby_places: default_prohibited_nearby_places(),
        }
    }
}

impl RuleSpec for LocationLimits {
    const CATEGORY: RuleCategory = RuleCategory::Location;

    fn tag(rule: &Rule<Self>) -> RuleRef<'_> {
        RuleRef::Location(rule)
    }

    fn numeric_limits(&self) -> Vec<(String, f64)> {
        let mut limits = vec![
            (
                "min_distance_from_intersection".to_string(),
                self.min_distance_from_intersection,
            ),
            (
                "min_distance_from_pedestrian_path".to_string(),
                self.min_distance_from_pedestrian_path,
            ),
            ("min_distance_from_road".to_string(), self.min_distance_from_road),
        ];
        limits.extend(
            self.prohibited_nearby_places
                .iter()
                .map(|(place, distance)| (format!("prohibited_nearby_places.{}", place), *distance)),
        );
        limits
    }
}

// ============================================================================
// Content
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPolicy {
    #[serde(default = "default_prohibited_content")]
    pub prohibited_content: Vec<String>,
    #[serde(default = "default_required_elements")]
    pub required_elements: Vec<String>,
}

fn default_prohibited_content() -> Vec<String> {
    [
        "obscene",
        "defamatory",
        "inciting_violence",
        "hate_speech",
        "unauthorized_political",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_required_elements() -> Vec<String> {
    ["permit_number", "owner_contact", "validity_date"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for ContentPolicy {
    fn default() -> Self {
        Self {
            prohibited_content: default_prohibited_content(),
            required_elements: default_required_elements(),
        }
    }
}

impl RuleSpec for ContentPolicy {
    const CATEGORY: RuleCategory = RuleCategory::Content;

    fn tag(rule: &Rule<Self>) -> RuleRef<'_> {
        RuleRef::Content(rule)
    }

    fn numeric_limits(&self) -> Vec<(String, f64)> {
        Vec::new()
    }
}

// ============================================================================
// Safety
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyRequirements {
    #[serde(default = "default_true")]
    pub requires_structural_certificate: bool,
    /// km/h
    #[serde(default)]
    pub max_wind_speed_rating: Option<f64>,
    #[serde(default)]
    pub required_illumination: Option<String>,
    #[serde(default)]
    pub fire_safety_requirements: Vec<String>,
}

impl Default for SafetyRequirements {
    fn default() -> Self {
        Self {
            requires_structural_certificate: true,
            max_wind_speed_rating: None,
            required_illumination: None,
            fire_safety_requirements: Vec::new(),
        }
    }
}

impl RuleSpec for SafetyRequirements {
    const CATEGORY: RuleCategory = RuleCategory::Safety;

    fn tag(rule: &Rule<Self>) -> RuleRef<'_> {
        RuleRef::Safety(rule)
    }

    fn numeric_limits(&self) -> Vec<(String, f64)> {
        self.max_wind_speed_rating
            .map(|rating| vec![("max_wind_speed_rating".to_string(), rating)])
            .unwrap_or_default()
    }
}

// ============================================================================
// Administrative
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdministrativeRequirements {
    #[serde(default = "default_true")]
    pub requires_permit: bool,
    #[serde(default = "default_renewal_years")]
    pub permit_renewal_years: u32,
    #[serde(default = "default_true")]
    pub required_insurance: bool,
    #[serde(default)]
    pub tax_requirements: Vec<String>,
}

fn default_renewal_years() -> u32 {
    1
}

impl Default for AdministrativeRequirements {
    fn default() -> Self {
        Self {
            requires_permit: true,
            permit_renewal_years: default_renewal_years(),
            required_insurance: true,
            tax_requirements: Vec::new(),
        }
    }
}

impl RuleSpec for AdministrativeRequirements {
    const CATEGORY: RuleCategory = RuleCategory::Administrative;

    fn tag(rule: &Rule<Self>) -> RuleRef<'_> {
        RuleRef::Administrative(rule)
    }

    fn numeric_limits(&self) -> Vec<(String, f64)> {
        Vec::new()
    }
}

fn default_true() -> bool {
    true
}

// ============================================================================
// Tagged view
// ============================================================================

/// A borrowed rule of any category
#[derive(Debug, Clone, Copy)]
pub enum RuleRef<'a> {
    Size(&'a Rule<SizeLimits>),
    Location(&'a Rule<LocationLimits>),
    Content(&'a Rule<ContentPolicy>),
    Safety(&'a Rule<SafetyRequirements>),
    Administrative(&'a Rule<AdministrativeRequirements>),
}

impl<'a> RuleRef<'a> {
    pub fn category(&self) -> RuleCategory {
        match self {
            RuleRef::Size(_) => RuleCategory::Size,
            RuleRef::Location(_) => RuleCategory::Location,
            RuleRef::Content(_) => RuleCategory::Content,
            RuleRef::Safety(_) => RuleCategory::Safety,
            RuleRef::Administrative(_) => RuleCategory::Administrative,
        }
    }

    pub fn rule_id(&self) -> &'a str {
        match self {
            RuleRef::Size(r) => &r.rule_id,
            RuleRef::Location(r) => &r.rule_id,
            RuleRef::Content(r) => &r.rule_id,
            RuleRef::Safety(r) => &r.rule_id,
            RuleRef::Administrative(r) => &r.rule_id,
        }
    }

    pub fn description(&self) -> &'a str {
        match self {
            RuleRef::Size(r) => &r.description,
            RuleRef::Location(r) => &r.description,
            RuleRef::Content(r) => &r.description,
            RuleRef::Safety(r) => &r.description,
            RuleRef::Administrative(r) => &r.description,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            RuleRef::Size(r) => r.severity,
            RuleRef::Location(r) => r.severity,
            RuleRef::Content(r) => r.severity,
            RuleRef::Safety(r) => r.severity,
            RuleRef::Administrative(r) => r.severity,
        }
    }

    pub fn applicable_zones(&self) -> &'a BTreeSet<ZoneType> {
        match self {
            RuleRef::Size(r) => &r.applicable_zones,
            RuleRef::Location(r) => &r.applicable_zones,
            RuleRef::Content(r) => &r.applicable_zones,
            RuleRef::Safety(r) => &r.applicable_zones,
            RuleRef::Administrative(r) => &r.applicable_zones,
        }
    }

    pub fn applicable_billboard_types(&self) -> &'a BTreeSet<BillboardType> {
        match self {
            RuleRef::Size(r) => &r.applicable_billboard_types,
            RuleRef::Location(r) => &r.applicable_billboard_types,
            RuleRef::Content(r) => &r.applicable_billboard_types,
            RuleRef::Safety(r) => &r.applicable_billboard_types,
            RuleRef::Administrative(r) => &r.applicable_billboard_types,
        }
    }

    pub fn numeric_limits(&self) -> Vec<(String, f64)> {
        match self {
            RuleRef::Size(r) => r.limits.numeric_limits(),
            RuleRef::Location(r) => r.limits.numeric_limits(),
            RuleRef::Content(r) => r.limits.numeric_limits(),
            RuleRef::Safety(r) => r.limits.numeric_limits(),
            RuleRef::Administrative(r) => r.limits.numeric_limits(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_types::ViolationType;

    fn size_rule() -> Rule<SizeLimits> {
        Rule::new(
            "SIZE-COMM-001",
            "Maximum size for commercial zone billboards",
            Severity::High,
            [ZoneType::Commercial],
            [BillboardType::Unipoles, BillboardType::Gantry],
            SizeLimits::new(12.0, 4.0, 48.0),
        )
    }

    #[test]
    fn test_applicability_requires_both_scopes() {
        let rule = size_rule();
        assert!(rule.applies_to(ZoneType::Commercial, BillboardType::Gantry));
        assert!(!rule.applies_to(ZoneType::Commercial, BillboardType::Kiosk));
        assert!(!rule.applies_to(ZoneType::Residential, BillboardType::Gantry));
    }

    #[test]
    fn test_violation_copies_rule_header() {
        let violation = size_rule().violation("Width exceeds maximum allowed");
        assert_eq!(violation.rule_id, "SIZE-COMM-001");
        assert_eq!(violation.violation_type, ViolationType::SizeViolation);
        assert_eq!(violation.severity, Severity::High);
        assert_eq!(
            violation.details["rule_description"],
            "Maximum size for commercial zone billboards"
        );
    }

    #[test]
    fn test_flattened_json_uses_defaults() {
        let json = r#"{
            "rule_id": "LOC-002",
            "description": "Distance from intersections",
            "severity": "critical",
            "applicable_zones": ["residential"],
            "applicable_billboard_types": ["kiosk"],
            "min_distance_from_intersection": 15.0
        }"#;
        let rule: Rule<LocationLimits> = serde_json::from_str(json).unwrap();
        assert_eq!(rule.limits.min_distance_from_intersection, 15.0);
        assert_eq!(rule.limits.min_distance_from_road, 1.0);
        assert_eq!(rule.limits.prohibited_nearby_places["religious_places"], 50.0);
    }

    #[test]
    fn test_tagged_view_reports_category() {
        let rule = size_rule();
        let tagged = rule.as_tagged();
        assert_eq!(tagged.category(), RuleCategory::Size);
        assert_eq!(tagged.rule_id(), "SIZE-COMM-001");
        assert_eq!(tagged.numeric_limits().len(), 4);
    }
}
