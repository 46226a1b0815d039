//! Active rule set with atomic replacement
//!
//! Readers clone the current `Arc` and evaluate against that snapshot, so a
//! reload never exposes a half-updated rule set to an in-flight evaluation.

use crate::checker::ComplianceChecker;
use crate::config::ComplianceConfig;
use crate::error::ConfigError;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

#[derive(Debug)]
pub struct ConfigStore {
    current: RwLock<Arc<ComplianceConfig>>,
}

impl ConfigStore {
    pub fn new(config: ComplianceConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            current: RwLock::new(Arc::new(config)),
        })
    }

    /// Snapshot of the active config
    pub fn current(&self) -> Arc<ComplianceConfig> {
        // The lock only guards an Arc, so a poisoned lock still holds a valid value
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Checker bound to the active config
    pub fn checker(&self) -> ComplianceChecker {
        ComplianceChecker::new(self.current())
    }

    /// Validate `config` and make it active, returning the previous config
    ///
    /// An invalid config is rejected and the active one stays in place.
    pub fn replace(&self, config: ComplianceConfig) -> Result<Arc<ComplianceConfig>, ConfigError> {
        config.validate()?;
        let next = Arc::new(config);
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let previous = std::mem::replace(&mut *guard, Arc::clone(&next));
        drop(guard);

        info!(
            from = %previous.jurisdiction,
            to = %next.jurisdiction,
            rules = next.rule_count(),
            "Compliance rule set replaced"
        );
        Ok(previous)
    }

    /// Load a rule set file and make it active
    pub fn reload_from_path(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<Arc<ComplianceConfig>, ConfigError> {
        let config = ComplianceConfig::from_path(path)?;
        self.replace(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use shared_types::{BillboardSnapshot, ReportContext};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn rule_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_replace_swaps_whole_config() {
        let store = ConfigStore::new(ComplianceConfig::default_config()).unwrap();
        let before = store.current();

        let mut next = ComplianceConfig::default_config();
        next.jurisdiction = "Riverside Borough".to_string();
        next.effective_date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        let previous = store.replace(next).unwrap();
        assert!(Arc::ptr_eq(&before, &previous));
        assert_eq!(store.current().jurisdiction, "Riverside Borough");
        // Snapshots taken before the swap are unaffected
        assert_eq!(before.jurisdiction, "Example City Municipal Corporation");
    }

    #[test]
    fn test_invalid_replacement_keeps_active_config() {
        let store = ConfigStore::new(ComplianceConfig::default_config()).unwrap();

        let mut broken = ComplianceConfig::default_config();
        broken.content_restrictions[0].applicable_billboard_types.clear();

        assert!(store.replace(broken).is_err());
        assert!(store.current().validate().is_ok());
        assert_eq!(store.current().content_restrictions[0].applicable_billboard_types.len(), 8);
    }

    #[test]
    fn test_checker_keeps_its_snapshot_across_reload() {
        let store = ConfigStore::new(ComplianceConfig::default_config()).unwrap();
        let checker = store.checker();

        let mut relaxed = ComplianceConfig::default_config();
        relaxed.safety_requirements.clear();
        relaxed.administrative_requirements.clear();
        store.replace(relaxed).unwrap();

        let billboard = BillboardSnapshot::new("5", 4.0, 2.0, "residential", "kiosk");
        let old = checker.evaluate(&billboard, &ReportContext::empty()).unwrap();
        let new = store
            .checker()
            .evaluate(&billboard, &ReportContext::empty())
            .unwrap();

        assert_eq!(old.violations.len(), 2);
        assert!(new.is_compliant);
    }

    #[test]
    fn test_reload_from_path_activates_file() {
        let store = ConfigStore::new(ComplianceConfig::default_config()).unwrap();

        let mut next = ComplianceConfig::default_config();
        next.jurisdiction = "Harbour District".to_string();
        next.location_restrictions.clear();
        let file = rule_file(&next.to_json().unwrap());

        let previous = store.reload_from_path(file.path()).unwrap();
        assert_eq!(previous.jurisdiction, "Example City Municipal Corporation");
        assert_eq!(*store.current(), next);
    }

    #[test]
    fn test_reload_from_bad_file_keeps_active_config() {
        let store = ConfigStore::new(ComplianceConfig::default_config()).unwrap();

        let garbled = rule_file("{ \"jurisdiction\": ");
        assert!(matches!(
            store.reload_from_path(garbled.path()),
            Err(ConfigError::Parse(_))
        ));

        let mut invalid = ComplianceConfig::default_config();
        invalid.jurisdiction = "  ".to_string();
        let invalid = rule_file(&invalid.to_json().unwrap());
        assert!(matches!(
            store.reload_from_path(invalid.path()),
            Err(ConfigError::MissingJurisdiction)
        ));

        let missing = std::env::temp_dir().join("billboard-rules-that-do-not-exist.json");
        assert!(matches!(
            store.reload_from_path(&missing),
            Err(ConfigError::Io { .. })
        ));

        assert_eq!(*store.current(), ComplianceConfig::default_config());
    }

    #[test]
    fn test_concurrent_readers_see_complete_configs() {
        let store = Arc::new(ConfigStore::new(ComplianceConfig::default_config()).unwrap());

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        let config = store.current();
                        assert!(config.validate().is_ok());
                    }
                })
            })
            .collect();

        for i in 0..50 {
            let mut next = ComplianceConfig::default_config();
            next.jurisdiction = format!("Ward {}", i);
            store.replace(next).unwrap();
        }

        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(store.current().jurisdiction, "Ward 49");
    }
}
