//! Per-category rule checks
//!
//! Each check evaluates one rule against the billboard snapshot and report
//! context. A check returns `Err` only when its inputs cannot be evaluated;
//! the checker then drops the whole category for that billboard.

pub mod administrative;
pub mod content;
pub mod location;
pub mod safety;
pub mod size;

pub use administrative::check_administrative;
pub use content::check_content;
pub use location::check_location;
pub use safety::check_safety;
pub use size::check_size;

use crate::error::CheckError;

/// Accept a dimension or distance only if it is finite and non-negative
pub(crate) fn measurement(field: &str, value: f64) -> Result<f64, CheckError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(CheckError::InvalidMeasurement {
            field: field.to_string(),
            value,
        })
    }
}
