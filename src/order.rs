//! Order resolution: map every label to its authoritative document position.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::aux::Numbering;
use crate::domain::Label;
use crate::error::{AnalysisError, PositionConflict};

/// Totally ordered position of a label in the document.
///
/// Every numbered position sorts before every unnumbered one, so labels that
/// have not been assigned a real number yet come last, in source order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// Hierarchical counters from the compiled numbering, e.g. `[2, 3]`
    Numbered(Vec<u32>),
    /// First-occurrence ordinal over the concatenated inputs
    Unnumbered(usize),
}

impl Position {
    pub fn is_numbered(&self) -> bool {
        matches!(self, Position::Numbered(_))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Numbered(parts) => {
                let dotted: Vec<String> = parts.iter().map(u32::to_string).collect();
                write!(f, "{}", dotted.join("."))
            }
            Position::Unnumbered(ordinal) => write!(f, "?{}", ordinal + 1),
        }
    }
}

/// Parse the numeric prefix of a numbering string.
///
/// Only the leading run of digits and dots counts: `1a` is `[1]`, `2.3b` is
/// `[2, 3]`. Strings without a numeric prefix (`A.1`, `iv`) yield `None`.
pub fn parse_number(raw: &str) -> Option<Vec<u32>> {
    let raw = raw.trim();
    let prefix_len = raw
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(raw.len());
    let prefix = raw[..prefix_len].trim_end_matches('.');
    if prefix.is_empty() {
        return None;
    }

    prefix
        .split('.')
        .map(|part| part.parse::<u32>().ok())
        .collect()
}

/// Assign a [`Position`] to each label, in the same order as `labels`.
///
/// `labels` must be in first-occurrence order and free of duplicate names;
/// an unnumbered label's ordinal is its index. Two labels sharing a numbered
/// position is a fatal [`AnalysisError::DuplicatePosition`].
pub fn resolve_positions(
    labels: &[Label],
    numbering: Option<&Numbering>,
) -> Result<Vec<Position>, AnalysisError> {
    let positions: Vec<Position> = labels
        .iter()
        .enumerate()
        .map(|(ordinal, label)| {
            let raw = numbering.and_then(|n| n.get(&label.name));
            match raw.map(|raw| (raw, parse_number(raw))) {
                Some((_, Some(parts))) => Position::Numbered(parts),
                Some((raw, None)) => {
                    tracing::debug!(label = %label.name, number = %raw, "Number has no numeric prefix");
                    Position::Unnumbered(ordinal)
                }
                None => Position::Unnumbered(ordinal),
            }
        })
        .collect();

    let mut holders: BTreeMap<&Position, Vec<String>> = BTreeMap::new();
    for (label, position) in labels.iter().zip(&positions) {
        if position.is_numbered() {
            holders.entry(position).or_default().push(label.name.clone());
        }
    }
    let conflicts: Vec<PositionConflict> = holders
        .into_iter()
        .filter(|(_, names)| names.len() > 1)
        .map(|(position, labels)| PositionConflict {
            position: position.clone(),
            labels,
        })
        .collect();
    if !conflicts.is_empty() {
        return Err(AnalysisError::DuplicatePosition(conflicts));
    }

    let numbered = positions.iter().filter(|p| p.is_numbered()).count();
    tracing::debug!(
        numbered,
        unnumbered = positions.len() - numbered,
        "Resolved positions"
    );
    Ok(positions)
}
