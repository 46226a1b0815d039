//! Rule catalog for a jurisdiction
//!
//! A `ComplianceConfig` is loaded once (built-in default or JSON file),
//! validated, and then treated as immutable. Updates go through
//! [`crate::store::ConfigStore`], which swaps whole configs.

use crate::error::ConfigError;
use crate::rules::{
    AdministrativeRequirements, ContentPolicy, LocationLimits, Rule, RuleRef, SafetyRequirements,
    SizeLimits,
};
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use shared_types::{BillboardType, Severity, ZoneType};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

lazy_static! {
    /// Rule ids look like "SIZE-COMM-001" or "LOC-001"
    static ref RULE_ID_PATTERN: Regex = Regex::new(r"^[A-Z0-9]+(?:-[A-Z0-9]+)*$").unwrap();
}

/// Complete compliance configuration for a jurisdiction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceConfig {
    pub jurisdiction: String,
    pub effective_date: NaiveDate,
    /// One size rule per zone
    #[serde(default)]
    pub size_restrictions: BTreeMap<ZoneType, Rule<SizeLimits>>,
    #[serde(default)]
    pub location_restrictions: Vec<Rule<LocationLimits>>,
    #[serde(default)]
    pub content_restrictions: Vec<Rule<ContentPolicy>>,
    #[serde(default)]
    pub safety_requirements: Vec<Rule<SafetyRequirements>>,
    #[serde(default)]
    pub administrative_requirements: Vec<Rule<AdministrativeRequirements>>,
}

impl ComplianceConfig {
    /// Built-in rule set for the example municipal corporation
    pub fn default_config() -> Self {
        let all_zones = ZoneType::ALL;
        let sited_zones: Vec<ZoneType> = ZoneType::ALL
            .into_iter()
            .filter(|z| *z != ZoneType::Prohibited)
            .collect();
        let all_types = BillboardType::ALL;
        let poles = [BillboardType::Unipoles, BillboardType::Gantry];

        let mut size_restrictions = BTreeMap::new();
        size_restrictions.insert(
            ZoneType::Commercial,
            Rule::new(
                "SIZE-COMM-001",
                "Maximum size for commercial zone billboards",
                Severity::High,
                [ZoneType::Commercial],
                poles,
                SizeLimits::new(12.0, 4.0, 48.0),
            ),
        );

        Self {
            jurisdiction: "Example City Municipal Corporation".to_string(),
            effective_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            size_restrictions,
            location_restrictions: vec![Rule::new(
                "LOC-001",
                "Minimum distance from intersections",
                Severity::Critical,
                [ZoneType::Permitted, ZoneType::Commercial],
                poles,
                LocationLimits::default(),
            )],
            content_restrictions: vec![Rule::new(
                "CONT-001",
                "Prohibited content",
                Severity::High,
                all_zones,
                all_types,
                ContentPolicy::default(),
            )],
            safety_requirements: vec![Rule::new(
                "SAFE-001",
                "Structural safety requirements",
                Severity::Critical,
                sited_zones.clone(),
                all_types,
                SafetyRequirements {
                    max_wind_speed_rating: Some(120.0),
                    ..SafetyRequirements::default()
                },
            )],
            administrative_requirements: vec![Rule::new(
                "ADMIN-001",
                "Permit requirements",
                Severity::High,
                sited_zones,
                all_types,
                AdministrativeRequirements::default(),
            )],
        }
    }

    /// Parse and validate a rule set from JSON
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a rule set file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Every rule in catalog order: size (by zone), location, content,
    /// safety, administrative
    pub fn all_rules(&self) -> impl Iterator<Item = RuleRef<'_>> {
        self.size_restrictions
            .values()
            .map(Rule::as_tagged)
            .chain(self.location_restrictions.iter().map(Rule::as_tagged))
            .chain(self.content_restrictions.iter().map(Rule::as_tagged))
            .chain(self.safety_requirements.iter().map(Rule::as_tagged))
            .chain(self.administrative_requirements.iter().map(Rule::as_tagged))
    }

    pub fn rule_count(&self) -> usize {
        self.all_rules().count()
    }

    /// Fail on the first configuration defect
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.defects().into_iter().next() {
            Some(defect) => Err(defect),
            None => Ok(()),
        }
    }

    /// Collect every configuration defect
    pub fn defects(&self) -> Vec<ConfigError> {
        let mut defects = Vec::new();

        if self.jurisdiction.trim().is_empty() {
            defects.push(ConfigError::MissingJurisdiction);
        }

        for (zone, rule) in &self.size_restrictions {
            if !rule.applicable_zones.is_empty() && !rule.applicable_zones.contains(zone) {
                defects.push(ConfigError::SizeZoneMismatch {
                    rule_id: rule.rule_id.clone(),
                    zone: *zone,
                });
            }
        }

        let mut seen = HashSet::new();
        for rule in self.all_rules() {
            let rule_id = rule.rule_id();

            if !RULE_ID_PATTERN.is_match(rule_id) {
                defects.push(ConfigError::MalformedRuleId(rule_id.to_string()));
            }
            if !seen.insert(rule_id) {
                defects.push(ConfigError::DuplicateRuleId(rule_id.to_string()));
            }
            if rule.applicable_zones().is_empty() {
                defects.push(ConfigError::EmptyApplicability {
                    rule_id: rule_id.to_string(),
                    field: "zones",
                });
            }
            if rule.applicable_billboard_types().is_empty() {
                defects.push(ConfigError::EmptyApplicability {
                    rule_id: rule_id.to_string(),
                    field: "billboard types",
                });
            }
            for (field, value) in rule.numeric_limits() {
                if !value.is_finite() || value < 0.0 {
                    defects.push(ConfigError::InvalidLimit {
                        rule_id: rule_id.to_string(),
                        field,
                        value,
                    });
                }
            }
        }

        defects
    }
}
