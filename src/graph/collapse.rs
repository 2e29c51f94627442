//! Section-level view of the dependency graph.
//!
//! Labels are grouped by the first `depth` components of their numbered
//! position; unnumbered labels share one group. Edges between different groups
//! are counted.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::DependencyGraph;
use crate::order::Position;

/// A group of labels sharing a numbering prefix.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Numbered(Vec<u32>),
    Unnumbered,
}

impl Section {
    fn of(position: &Position, depth: usize) -> Self {
        match position {
            Position::Numbered(parts) => {
                Section::Numbered(parts.iter().copied().take(depth).collect())
            }
            Position::Unnumbered(_) => Section::Unnumbered,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Numbered(parts) => {
                let dotted: Vec<String> = parts.iter().map(u32::to_string).collect();
                write!(f, "{}", dotted.join("."))
            }
            Section::Unnumbered => write!(f, "unnumbered"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionEdge {
    pub source: Section,
    pub target: Section,
    /// Label edges between the two sections
    pub count: usize,
    /// How many of those are forward references
    pub forward: usize,
}

/// Collapse the graph to section granularity. `depth` must be at least 1.
pub fn collapse(graph: &DependencyGraph, positions: &[Position], depth: usize) -> Vec<SectionEdge> {
    let sections: Vec<Section> = positions.iter().map(|p| Section::of(p, depth)).collect();

    let mut counts: BTreeMap<(&Section, &Section), (usize, usize)> = BTreeMap::new();
    for edge in graph.edges() {
        let (source, target) = (&sections[edge.source], &sections[edge.target]);
        if source == target {
            continue;
        }
        let entry = counts.entry((source, target)).or_default();
        entry.0 += 1;
        if edge.forward {
            entry.1 += 1;
        }
    }

    counts
        .into_iter()
        .map(|((source, target), (count, forward))| SectionEdge {
            source: source.clone(),
            target: target.clone(),
            count,
            forward,
        })
        .collect()
}
