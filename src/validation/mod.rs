//! Cross-field validation
//!
//! Every format record implements [`Validate`]. Rules run in a fixed order
//! (range checks, structural consistency, format/encoding coupling,
//! advisory checks) so reports are deterministic and diffable.
//!
//! Validation never mutates the record and never fails for a
//! representable value: problems become [`Issue`]s in the returned
//! [`ValidationReport`].

pub mod options;
pub mod report;
pub(crate) mod rules;

pub use options::ValidationOptions;
pub use report::{Issue, Severity, ValidationReport};

use crate::core::error::{MetaError, MetaResult};

/// Trait for records that can be checked against their format rules
pub trait Validate {
    /// Validate with explicit advisory thresholds
    fn validate_with(&self, options: &ValidationOptions) -> ValidationReport;

    /// Validate with the default advisory thresholds
    fn validate(&self) -> ValidationReport {
        self.validate_with(&ValidationOptions::default())
    }
}

/// Validate a record that may be missing
///
/// # Returns
///
/// * `Ok(ValidationReport)` for a present record
/// * `Err(MetaError::MissingRecord)` when `record` is `None`
pub fn validate_record<R: Validate + ?Sized>(record: Option<&R>) -> MetaResult<ValidationReport> {
    record
        .map(|r| r.validate())
        .ok_or(MetaError::MissingRecord)
}
