//! Property-based tests for rule selection and evaluation
//!
//! Uses proptest over generated rule scopes, billboard dimensions and report
//! contexts.

use chrono::{NaiveDate, TimeZone, Utc};
use compliance_engine::{ComplianceChecker, ComplianceConfig, ContentPolicy, Rule};
use proptest::prelude::*;
use shared_types::{
    BillboardSnapshot, BillboardType, ContentAnalysis, LocationMeasurements, ReportContext,
    Severity, ViolationType, ZoneType,
};
use std::sync::Arc;

// ============================================================
// Strategies
// ============================================================

fn zone_strategy() -> impl Strategy<Value = ZoneType> {
    prop::sample::select(ZoneType::ALL.to_vec())
}

fn billboard_type_strategy() -> impl Strategy<Value = BillboardType> {
    prop::sample::select(BillboardType::ALL.to_vec())
}

fn zone_scope() -> impl Strategy<Value = Vec<ZoneType>> {
    prop::sample::subsequence(ZoneType::ALL.to_vec(), 1..=ZoneType::ALL.len())
}

fn type_scope() -> impl Strategy<Value = Vec<BillboardType>> {
    prop::sample::subsequence(BillboardType::ALL.to_vec(), 1..=BillboardType::ALL.len())
}

/// Content rules with random scopes, ids CONT-000, CONT-001, ...
fn scoped_config() -> impl Strategy<Value = ComplianceConfig> {
    prop::collection::vec((zone_scope(), type_scope()), 1..8).prop_map(|scopes| {
        let mut config = ComplianceConfig::default_config();
        config.content_restrictions = scopes
            .into_iter()
            .enumerate()
            .map(|(i, (zones, types))| {
                Rule::new(
                    format!("CONT-{:03}", i),
                    "Generated content rule",
                    Severity::Medium,
                    zones,
                    types,
                    ContentPolicy::default(),
                )
            })
            .collect();
        config
    })
}

fn context_strategy() -> impl Strategy<Value = ReportContext> {
    let location = prop::option::of((0.0f64..200.0).prop_map(LocationMeasurements::intersection));
    let content = prop::option::of(
        prop::sample::subsequence(
            vec!["obscene", "hate_speech", "defamatory", "logo", "brand"],
            0..=5,
        )
        .prop_map(ContentAnalysis::detected),
    );
    (location, content).prop_map(|(location, content_analysis)| ReportContext {
        location,
        content_analysis,
    })
}

fn checker() -> ComplianceChecker {
    ComplianceChecker::new(Arc::new(ComplianceConfig::default_config()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ============================================================
    // Selection
    // ============================================================

    #[test]
    fn selected_rules_always_cover_zone_and_type(
        config in scoped_config(),
        zone in zone_strategy(),
        billboard_type in billboard_type_strategy(),
    ) {
        prop_assert!(config.validate().is_ok());
        let rules = config.rules_for(zone, billboard_type);

        for rule in rules.iter() {
            prop_assert!(rule.applicable_zones().contains(&zone));
            prop_assert!(rule.applicable_billboard_types().contains(&billboard_type));
        }

        // Nothing that applies is left out
        let expected = config
            .content_restrictions
            .iter()
            .filter(|r| r.applicable_zones.contains(&zone)
                && r.applicable_billboard_types.contains(&billboard_type))
            .count();
        prop_assert_eq!(rules.content.len(), expected);
    }

    #[test]
    fn unknown_zone_strings_never_evaluate(zone in "[a-z]{3,12}") {
        prop_assume!(ZoneType::parse(&zone).is_none());
        let billboard = BillboardSnapshot::new("1", 5.0, 2.0, zone, "gantry");
        prop_assert!(checker().evaluate(&billboard, &ReportContext::empty()).is_err());
    }

    // ============================================================
    // Evaluation
    // ============================================================

    #[test]
    fn evaluation_is_idempotent(
        width in 0.0f64..30.0,
        height in 0.0f64..10.0,
        zone in zone_strategy(),
        billboard_type in billboard_type_strategy(),
        context in context_strategy(),
    ) {
        let billboard = BillboardSnapshot::new("7", width, height, zone.as_str(), billboard_type.as_str());
        let now = Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap();
        let checker = checker();

        let first = checker.evaluate_at(&billboard, &context, now).unwrap();
        let second = checker.evaluate_at(&billboard, &context, now).unwrap();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.is_compliant, first.violations.is_empty());
    }

    #[test]
    fn size_violation_count_matches_limits(width in 0.0f64..30.0, height in 0.0f64..10.0) {
        let billboard = BillboardSnapshot::new("8", width, height, "commercial", "unipoles")
            .with_permit("P-1", NaiveDate::from_ymd_opt(2030, 1, 1))
            .with_structural_certificate("SC-1");

        let result = checker().evaluate(&billboard, &ReportContext::empty()).unwrap();
        let expected = usize::from(width > 12.0)
            + usize::from(height > 4.0)
            + usize::from(width * height > 48.0);

        prop_assert_eq!(result.violations.len(), expected);
        prop_assert_eq!(
            result.violations_of_type(ViolationType::SizeViolation).len(),
            expected
        );
    }

    #[test]
    fn missing_location_never_raises_location_violations(
        width in 0.0f64..30.0,
        zone in zone_strategy(),
    ) {
        let billboard = BillboardSnapshot::new("9", width, 3.0, zone.as_str(), "gantry");
        let result = checker().evaluate(&billboard, &ReportContext::empty()).unwrap();
        prop_assert!(result.violations_of_type(ViolationType::LocationViolation).is_empty());
    }
}
