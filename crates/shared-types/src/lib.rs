pub mod audit;
pub mod billboard;
pub mod classification;
pub mod types;

pub use billboard::{BillboardSnapshot, ContentAnalysis, LocationMeasurements, ReportContext};
pub use classification::{BillboardType, ContentCategory, ZoneType};
pub use types::{ComplianceResult, RuleCategory, Severity, Violation, ViolationType};
