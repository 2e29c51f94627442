//! Non-fatal findings collected during a run and reported together at the end.

use serde::Serialize;
use std::fmt;

use crate::source::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Malformed citation or definition syntax; the occurrence was skipped
    ParseWarning,
    /// Citation target is not a known label; the edge was dropped
    UnresolvedReference,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::ParseWarning => write!(f, "parse warning"),
            DiagnosticKind::UnresolvedReference => write!(f, "unresolved reference"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub location: Location,
    pub message: String,
}

impl Diagnostic {
    pub fn parse_warning(location: Location, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::ParseWarning,
            location,
            message: message.into(),
        }
    }

    pub fn unresolved(location: Location, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::UnresolvedReference,
            location,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.location, self.kind, self.message)
    }
}
