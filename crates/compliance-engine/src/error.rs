use shared_types::ZoneType;
use std::path::PathBuf;
use thiserror::Error;

/// Defects in a rule set, reported when it is loaded
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read rule set {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid rule set JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("jurisdiction name is empty")]
    MissingJurisdiction,

    #[error("rule {rule_id} has no applicable {field}")]
    EmptyApplicability {
        rule_id: String,
        field: &'static str,
    },

    #[error("rule id {0} is used more than once")]
    DuplicateRuleId(String),

    #[error("rule id {0:?} is malformed (expected e.g. SIZE-COMM-001)")]
    MalformedRuleId(String),

    #[error("size rule {rule_id} is keyed under zone {zone} but does not apply to it")]
    SizeZoneMismatch { rule_id: String, zone: ZoneType },

    #[error("rule {rule_id} has invalid {field}: {value}")]
    InvalidLimit {
        rule_id: String,
        field: String,
        value: f64,
    },
}

/// Errors that fail a whole evaluation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComplianceError {
    #[error("unrecognized {field}: {value:?}")]
    InvalidClassification { field: &'static str, value: String },
}

/// Failure inside a single category's check; recovered by the checker
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CheckError {
    #[error("measurement {field} is not a valid distance or dimension: {value}")]
    InvalidMeasurement { field: String, value: f64 },
}
