//! Data retention planning for citizen reports and audit entries
//!
//! The planner only decides what is due; the persistence layer carries out
//! the anonymization and deletions it lists.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RetentionError {
    #[error("retention period {0} must be at least one day")]
    ZeroPeriod(&'static str),

    #[error("{shorter} ({shorter_days} days) must not exceed {longer} ({longer_days} days)")]
    Inconsistent {
        shorter: &'static str,
        shorter_days: u32,
        longer: &'static str,
        longer_days: u32,
    },
}

/// Retention periods in days
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    pub report_retention_days: u32,
    pub anonymize_reports_after_days: u32,
    pub delete_original_images_after_days: u32,
    pub keep_processed_data_days: u32,
    pub audit_log_retention_days: u32,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            report_retention_days: 365,
            anonymize_reports_after_days: 30,
            delete_original_images_after_days: 30,
            keep_processed_data_days: 90,
            audit_log_retention_days: 365 * 2,
        }
    }
}

/// The fields of a stored report that retention decisions depend on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_anonymized: bool,
    #[serde(default)]
    pub has_original_image: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionPlan {
    pub anonymize: Vec<i64>,
    pub delete: Vec<i64>,
    pub delete_original_images: Vec<i64>,
    /// Processed data (no images) created before this instant may be purged
    pub processed_data_cutoff: DateTime<Utc>,
    /// Audit entries older than this instant may be purged
    pub audit_cutoff: DateTime<Utc>,
}

impl RetentionPlan {
    pub fn is_empty(&self) -> bool {
        self.anonymize.is_empty() && self.delete.is_empty() && self.delete_original_images.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionSummary {
    pub policy: RetentionPolicy,
    pub last_run: DateTime<Utc>,
    pub next_run: DateTime<Utc>,
}

impl RetentionPolicy {
    pub fn validate(&self) -> Result<(), RetentionError> {
        let periods = [
            ("report_retention_days", self.report_retention_days),
            ("anonymize_reports_after_days", self.anonymize_reports_after_days),
            (
                "delete_original_images_after_days",
                self.delete_original_images_after_days,
            ),
            ("keep_processed_data_days", self.keep_processed_data_days),
            ("audit_log_retention_days", self.audit_log_retention_days),
        ];
        if let Some(&(name, _)) = periods.iter().find(|(_, days)| *days == 0) {
            return Err(RetentionError::ZeroPeriod(name));
        }

        // Everything derived from a report has to go no later than the report itself
        for &(shorter, shorter_days) in &periods[1..4] {
            if shorter_days > self.report_retention_days {
                return Err(RetentionError::Inconsistent {
                    shorter,
                    shorter_days,
                    longer: "report_retention_days",
                    longer_days: self.report_retention_days,
                });
            }
        }

        Ok(())
    }

    /// Decide which reports are due for anonymization or deletion as of `now`
    ///
    /// Deletion wins: a report past the retention period is never also
    /// listed for anonymization.
    pub fn plan(
        &self,
        now: DateTime<Utc>,
        reports: &[ReportRecord],
    ) -> Result<RetentionPlan, RetentionError> {
        self.validate()?;

        let anonymize_before = now - days(self.anonymize_reports_after_days);
        let delete_before = now - days(self.report_retention_days);
        let images_before = now - days(self.delete_original_images_after_days);

        let mut plan = RetentionPlan {
            anonymize: Vec::new(),
            delete: Vec::new(),
            delete_original_images: Vec::new(),
            processed_data_cutoff: now - days(self.keep_processed_data_days),
            audit_cutoff: now - days(self.audit_log_retention_days),
        };

        for report in reports {
            if report.created_at < delete_before {
                plan.delete.push(report.id);
                if report.has_original_image {
                    plan.delete_original_images.push(report.id);
                }
                continue;
            }
            if report.created_at < anonymize_before && !report.is_anonymized {
                plan.anonymize.push(report.id);
            }
            if report.created_at < images_before && report.has_original_image {
                plan.delete_original_images.push(report.id);
            }
        }

        Ok(plan)
    }

    pub fn summary(&self, now: DateTime<Utc>) -> RetentionSummary {
        RetentionSummary {
            policy: self.clone(),
            last_run: now,
            next_run: now + Duration::days(1),
        }
    }
}

fn days(n: u32) -> Duration {
    Duration::days(i64::from(n))
}
