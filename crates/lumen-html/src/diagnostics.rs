//! Parser diagnostics.

use serde::Serialize;
use strum_macros::Display;

/// How bad a recoverable anomaly is. Neither severity aborts parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
pub enum Severity {
    /// Content was dropped or could not be interpreted.
    #[strum(serialize = "ERROR")]
    Error,
    /// Content was interpreted leniently.
    #[strum(serialize = "WARNING")]
    Warning,
}

/// One recorded anomaly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Error or warning.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
    /// Character offset in the source where the anomaly starts.
    pub position: usize,
}

impl Diagnostic {
    /// Whether this is an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Whether this is a warning.
    #[must_use]
    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}: {}", self.severity, self.position, self.message)
    }
}
