//! Fatal analysis errors.
//!
//! Anything here aborts the pipeline before later stages run. Non-fatal
//! findings are [`Diagnostic`]s instead.

use std::fmt;
use thiserror::Error;

use crate::diagnostics::Diagnostic;
use crate::order::Position;
use crate::source::Location;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("duplicate label definitions:\n{}", list(.0))]
    DuplicateLabel(Vec<LabelConflict>),

    #[error("labels share a numbered position:\n{}", list(.0))]
    DuplicatePosition(Vec<PositionConflict>),

    #[error("{} unresolved reference(s):\n{}", .0.len(), list(.0))]
    UnresolvedReferences(Vec<Diagnostic>),

    #[error("invalid macro pattern: {0}")]
    Regex(#[from] regex::Error),
}

/// One label name defined more than once, with every definition site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelConflict {
    pub name: String,
    pub locations: Vec<Location>,
}

impl fmt::Display for LabelConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sites: Vec<String> = self.locations.iter().map(|l| l.to_string()).collect();
        write!(f, "{} defined at {}", self.name, sites.join(", "))
    }
}

/// Labels that resolved to the same numbered position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionConflict {
    pub position: Position,
    pub labels: Vec<String>,
}

impl fmt::Display for PositionConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is held by {}", self.position, self.labels.join(", "))
    }
}

fn list<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| format!("  {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}
