//! Evaluate a billboard against a rule catalog

use crate::checks;
use crate::config::ComplianceConfig;
use crate::error::{CheckError, ComplianceError};
use chrono::{DateTime, Utc};
use shared_types::{BillboardSnapshot, ComplianceResult, ReportContext, RuleCategory, Violation};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Compliance evaluator bound to one config snapshot
///
/// Evaluation holds no mutable state, so a checker (or clones of it) can be
/// shared freely across request handlers.
#[derive(Debug, Clone)]
pub struct ComplianceChecker {
    config: Arc<ComplianceConfig>,
}

impl ComplianceChecker {
    pub fn new(config: Arc<ComplianceConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ComplianceConfig {
        &self.config
    }

    /// Evaluate at the current time
    pub fn evaluate(
        &self,
        billboard: &BillboardSnapshot,
        context: &ReportContext,
    ) -> Result<ComplianceResult, ComplianceError> {
        self.evaluate_at(billboard, context, Utc::now())
    }

    /// Evaluate as of `now`; permit expiry is compared against `now`'s date
    ///
    /// An unrecognized zone or billboard type fails the whole call. A failing
    /// category is logged, contributes no violations, and is listed in
    /// `skipped_categories`.
    pub fn evaluate_at(
        &self,
        billboard: &BillboardSnapshot,
        context: &ReportContext,
        now: DateTime<Utc>,
    ) -> Result<ComplianceResult, ComplianceError> {
        let rules = self
            .config
            .applicable_rules(&billboard.zone_type, &billboard.billboard_type)
            .inspect_err(|err| {
                error!(billboard_id = %billboard.id, error = %err, "Compliance check failed");
            })?;

        debug!(
            billboard_id = %billboard.id,
            jurisdiction = %self.config.jurisdiction,
            rules = rules.len(),
            "Selected applicable rules"
        );

        let today = now.date_naive();
        let mut collector = Collector::new(&billboard.id);

        collector.collect(
            RuleCategory::Size,
            rules.size.iter().map(|r| checks::check_size(billboard, r)),
        );
        collector.collect(
            RuleCategory::Location,
            rules
                .location
                .iter()
                .map(|r| checks::check_location(context.location.as_ref(), r)),
        );
        collector.collect(
            RuleCategory::Content,
            rules
                .content
                .iter()
                .map(|r| checks::check_content(context.content_analysis.as_ref(), r)),
        );
        collector.collect(
            RuleCategory::Safety,
            rules.safety.iter().map(|r| checks::check_safety(billboard, r)),
        );
        collector.collect(
            RuleCategory::Administrative,
            rules
                .administrative
                .iter()
                .map(|r| checks::check_administrative(billboard, r, today)),
        );

        let result = collector.finish(now);
        info!(
            billboard_id = %result.billboard_id,
            compliant = result.is_compliant,
            violations = result.violations.len(),
            skipped = result.skipped_categories.len(),
            "Compliance check complete"
        );
        Ok(result)
    }
}

struct Collector<'a> {
    billboard_id: &'a str,
    violations: Vec<Violation>,
    skipped: Vec<RuleCategory>,
}

impl<'a> Collector<'a> {
    fn new(billboard_id: &'a str) -> Self {
        Self {
            billboard_id,
            violations: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Keep a category's violations only if every rule in it evaluated cleanly
    fn collect<I>(&mut self, category: RuleCategory, results: I)
    where
        I: IntoIterator<Item = Result<Vec<Violation>, CheckError>>,
    {
        match results.into_iter().collect::<Result<Vec<_>, _>>() {
            Ok(batches) => self.violations.extend(batches.into_iter().flatten()),
            Err(err) => {
                warn!(
                    billboard_id = %self.billboard_id,
                    category = %category,
                    error = %err,
                    "Compliance category skipped"
                );
                self.skipped.push(category);
            }
        }
    }

    fn finish(self, checked_at: DateTime<Utc>) -> ComplianceResult {
        ComplianceResult::new(self.billboard_id, self.violations, self.skipped, checked_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use pretty_assertions::assert_eq;
    use shared_types::{ContentAnalysis, LocationMeasurements, ViolationType};

    fn checker() -> ComplianceChecker {
        ComplianceChecker::new(Arc::new(ComplianceConfig::default_config()))
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    /// Commercial unipole with every document in order
    fn compliant_billboard() -> BillboardSnapshot {
        BillboardSnapshot::new("101", 10.0, 4.0, "commercial", "unipoles")
            .with_permit("P-2024-001", NaiveDate::from_ymd_opt(2025, 1, 1))
            .with_structural_certificate("SC-881")
    }

    fn messages(result: &ComplianceResult) -> Vec<&str> {
        result.violations.iter().map(|v| v.message.as_str()).collect()
    }

    #[test]
    fn test_compliant_billboard() {
        let result = checker()
            .evaluate_at(&compliant_billboard(), &ReportContext::empty(), now())
            .unwrap();

        assert!(result.is_compliant);
        assert!(result.violations.is_empty());
        assert!(result.skipped_categories.is_empty());
        assert_eq!(result.billboard_id, "101");
        assert_eq!(result.checked_at, now());
    }

    #[test]
    fn test_width_only_violation() {
        let mut billboard = compliant_billboard();
        billboard.width_meters = 15.0;
        billboard.height_meters = 3.0;

        let result = checker()
            .evaluate_at(&billboard, &ReportContext::empty(), now())
            .unwrap();
        assert!(!result.is_compliant);
        assert_eq!(messages(&result), vec!["Width exceeds maximum allowed"]);
        assert_eq!(result.violations[0].rule_id, "SIZE-COMM-001");
    }

    #[test]
    fn test_three_size_violations() {
        let mut billboard = compliant_billboard();
        billboard.width_meters = 13.0;
        billboard.height_meters = 5.0;

        let result = checker()
            .evaluate_at(&billboard, &ReportContext::empty(), now())
            .unwrap();
        assert_eq!(result.violations_of_type(ViolationType::SizeViolation).len(), 3);
    }

    #[test]
    fn test_location_and_content_from_context() {
        let context = ReportContext::empty()
            .with_location(LocationMeasurements::intersection(10.0))
            .with_content(ContentAnalysis::detected(["hate_speech"]));

        let result = checker()
            .evaluate_at(&compliant_billboard(), &context, now())
            .unwrap();
        assert_eq!(
            messages(&result),
            vec!["Too close to intersection", "Prohibited content: hate_speech"]
        );
        assert_eq!(
            result.violations[0].violation_type,
            ViolationType::LocationViolation
        );
    }

    #[test]
    fn test_missing_permit_and_expired_permit() {
        let mut billboard = compliant_billboard();
        billboard.permit_number = None;
        billboard.permit_expiry_date = NaiveDate::from_ymd_opt(2024, 1, 31);

        let result = checker()
            .evaluate_at(&billboard, &ReportContext::empty(), now())
            .unwrap();
        assert_eq!(messages(&result), vec!["Missing permit", "Permit expired"]);
        assert!(result
            .violations
            .iter()
            .all(|v| v.violation_type == ViolationType::AdministrativeViolation));
    }

    #[test]
    fn test_unknown_zone_fails_evaluation() {
        let mut billboard = compliant_billboard();
        billboard.zone_type = "nowhere".to_string();

        let err = checker()
            .evaluate_at(&billboard, &ReportContext::empty(), now())
            .unwrap_err();
        assert_eq!(
            err,
            ComplianceError::InvalidClassification {
                field: "zone_type",
                value: "nowhere".to_string(),
            }
        );
    }

    #[test]
    fn test_failing_category_is_skipped_not_fatal() {
        let mut billboard = compliant_billboard();
        billboard.width_meters = f64::INFINITY;
        billboard.structural_certificate_id = None;

        let result = checker()
            .evaluate_at(&billboard, &ReportContext::empty(), now())
            .unwrap();
        assert_eq!(result.skipped_categories, vec![RuleCategory::Size]);
        assert_eq!(messages(&result), vec!["Missing structural certificate"]);
        assert!(result.is_degraded());
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let checker = checker();
        let mut billboard = compliant_billboard();
        billboard.height_meters = 6.0;
        let context =
            ReportContext::empty().with_content(ContentAnalysis::detected(["obscene", "defamatory"]));

        let first = checker.evaluate_at(&billboard, &context, now()).unwrap();
        let second = checker.evaluate_at(&billboard, &context, now()).unwrap();
        assert_eq!(first, second);
    }
}
