//! Billboard compliance rule engine
//!
//! A [`ComplianceConfig`] holds a jurisdiction's rules per category (size,
//! location, content, safety, administrative). [`ComplianceChecker`] selects
//! the rules that apply to a billboard's zone and type and evaluates them
//! against the billboard snapshot and the report context, producing a
//! [`ComplianceResult`](shared_types::ComplianceResult).

pub mod checker;
pub mod checks;
pub mod classifier;
pub mod config;
pub mod error;
pub mod retention;
pub mod rules;
pub mod selector;
pub mod store;

pub use checker::ComplianceChecker;
pub use config::ComplianceConfig;
pub use error::{CheckError, ComplianceError, ConfigError};
pub use retention::{ReportRecord, RetentionPlan, RetentionPolicy};
pub use rules::{
    AdministrativeRequirements, ContentPolicy, LocationLimits, Rule, RuleRef, SafetyRequirements,
    SizeLimits,
};
pub use selector::ApplicableRules;
pub use store::ConfigStore;
