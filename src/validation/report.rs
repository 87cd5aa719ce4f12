//! Validation reports
//!
//! A [`ValidationReport`] is an ordered list of [`Issue`]s. Errors mean the
//! metadata is internally inconsistent or breaks a hard format limit;
//! warnings mean it is legal but probably unintended. Only errors affect
//! [`ValidationReport::is_valid`].

use std::fmt;

use log::trace;

/// Issue severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    /// Blocks downstream use of the metadata
    Error,
    /// Informational only
    Warning,
}

impl Severity {
    /// Check if this severity blocks downstream use.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }
}

/// One validation finding
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Issue {
    /// Severity level
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
}

impl Issue {
    /// Create an error issue
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    /// Create a warning issue
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

/// Ordered outcome of validating one record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationReport {
    issues: Vec<Issue>,
}

impl ValidationReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an issue
    pub fn push(&mut self, issue: Issue) {
        trace!("validation {:?}: {}", issue.severity, issue.message);
        self.issues.push(issue);
    }

    /// Append an error
    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Issue::error(message));
    }

    /// Append a warning
    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Issue::warning(message));
    }

    /// Append every issue of `other`, keeping its order
    pub fn merge(&mut self, other: ValidationReport) {
        self.issues.extend(other.issues);
    }

    /// All issues in the order they were found
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Error messages in order
    pub fn errors(&self) -> Vec<&str> {
        self.messages(Severity::Error)
    }

    /// Warning messages in order
    pub fn warnings(&self) -> Vec<&str> {
        self.messages(Severity::Warning)
    }

    /// Number of errors
    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|i| i.severity.is_error()).count()
    }

    /// Number of warnings
    pub fn warning_count(&self) -> usize {
        self.issues.len() - self.error_count()
    }

    /// `true` when the report holds no errors; warnings are ignored
    pub fn is_valid(&self) -> bool {
        self.error_count() == 0
    }

    /// `true` when the report holds at least one warning
    pub fn has_warnings(&self) -> bool {
        self.warning_count() > 0
    }

    /// `true` when the report holds no issues at all
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Whether any issue message contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.issues.iter().any(|i| i.message.contains(needle))
    }

    /// Multi-line human-readable summary
    ///
    /// ```text
    /// Errors (1):
    ///   - Invalid width: 0. Width must be greater than 0.
    /// Warnings (1):
    ///   - Image has zero-duration animation frames.
    /// ```
    ///
    /// A section with no entries is omitted. An empty report renders as
    /// `No validation issues found.`
    pub fn summary(&self) -> String {
        if self.issues.is_empty() {
            return "No validation issues found.".to_string();
        }

        let mut sections = Vec::new();
        for (title, severity) in [("Errors", Severity::Error), ("Warnings", Severity::Warning)] {
            let messages = self.messages(severity);
            if messages.is_empty() {
                continue;
            }
            let mut section = format!("{} ({}):", title, messages.len());
            for message in messages {
                section.push_str("\n  - ");
                section.push_str(message);
            }
            sections.push(section);
        }
        sections.join("\n")
    }

    fn messages(&self, severity: Severity) -> Vec<&str> {
        self.issues
            .iter()
            .filter(|i| i.severity == severity)
            .map(|i| i.message.as_str())
            .collect()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}
