//! Narrow a rule catalog to the rules that apply to one billboard

use crate::config::ComplianceConfig;
use crate::error::ComplianceError;
use crate::rules::{
    AdministrativeRequirements, ContentPolicy, LocationLimits, Rule, RuleRef, SafetyRequirements,
    SizeLimits,
};
use shared_types::{BillboardType, RuleCategory, ZoneType};

/// Rules applicable to a (zone, billboard type) pair, per category
///
/// List categories keep catalog order. The size category holds at most the
/// single rule keyed by the zone.
#[derive(Debug, Clone)]
pub struct ApplicableRules<'a> {
    pub size: Option<&'a Rule<SizeLimits>>,
    pub location: Vec<&'a Rule<LocationLimits>>,
    pub content: Vec<&'a Rule<ContentPolicy>>,
    pub safety: Vec<&'a Rule<SafetyRequirements>>,
    pub administrative: Vec<&'a Rule<AdministrativeRequirements>>,
}

impl<'a> ApplicableRules<'a> {
    pub fn len(&self) -> usize {
        usize::from(self.size.is_some())
            + self.location.len()
            + self.content.len()
            + self.safety.len()
            + self.administrative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn count(&self, category: RuleCategory) -> usize {
        match category {
            RuleCategory::Size => usize::from(self.size.is_some()),
            RuleCategory::Location => self.location.len(),
            RuleCategory::Content => self.content.len(),
            RuleCategory::Safety => self.safety.len(),
            RuleCategory::Administrative => self.administrative.len(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = RuleRef<'a>> + '_ {
        self.size
            .map(Rule::as_tagged)
            .into_iter()
            .chain(self.location.iter().copied().map(Rule::as_tagged))
            .chain(self.content.iter().copied().map(Rule::as_tagged))
            .chain(self.safety.iter().copied().map(Rule::as_tagged))
            .chain(self.administrative.iter().copied().map(Rule::as_tagged))
    }
}

/// Parse a zone string against the closed enumeration
pub fn parse_zone(value: &str) -> Result<ZoneType, ComplianceError> {
    ZoneType::parse(value).ok_or_else(|| ComplianceError::InvalidClassification {
        field: "zone_type",
        value: value.to_string(),
    })
}

/// Parse a billboard type string against the closed enumeration
pub fn parse_billboard_type(value: &str) -> Result<BillboardType, ComplianceError> {
    BillboardType::parse(value).ok_or_else(|| ComplianceError::InvalidClassification {
        field: "billboard_type",
        value: value.to_string(),
    })
}

impl ComplianceConfig {
    /// Rules applicable to a billboard described by raw zone/type strings
    ///
    /// Unrecognized values fail instead of producing an empty selection, so a
    /// typo can never read as "fully compliant".
    pub fn applicable_rules(
        &self,
        zone: &str,
        billboard_type: &str,
    ) -> Result<ApplicableRules<'_>, ComplianceError> {
        let zone = parse_zone(zone)?;
        let billboard_type = parse_billboard_type(billboard_type)?;
        Ok(self.rules_for(zone, billboard_type))
    }

    pub fn rules_for(&self, zone: ZoneType, billboard_type: BillboardType) -> ApplicableRules<'_> {
        ApplicableRules {
            size: self
                .size_restrictions
                .get(&zone)
                .filter(|r| r.applies_to(zone, billboard_type)),
            location: select(&self.location_restrictions, zone, billboard_type),
            content: select(&self.content_restrictions, zone, billboard_type),
            safety: select(&self.safety_requirements, zone, billboard_type),
            administrative: select(&self.administrative_requirements, zone, billboard_type),
        }
    }
}

fn select<S: crate::rules::RuleSpec>(
    rules: &[Rule<S>],
    zone: ZoneType,
    billboard_type: BillboardType,
) -> Vec<&Rule<S>> {
    rules
        .iter()
        .filter(|r| r.applies_to(zone, billboard_type))
        .collect()
}
