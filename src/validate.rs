//! Order validation: compare the graph against the resolved positions.

use serde::Serialize;

use crate::domain::dependency::detect_cycles;
use crate::graph::DependencyGraph;
use crate::order::Position;
use crate::source::Location;

/// An ordinary citation whose target is not placed strictly before its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub source: String,
    pub target: String,
    pub source_position: Position,
    pub target_position: Position,
    pub location: Location,
}

/// Labels that depend on each other through ordinary citations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cycle {
    /// Closed path starting at the earliest member; each label cites the next
    /// and the last cites the first
    pub path: Vec<String>,
    /// Every label of the strongly connected component, in position order
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub violations: Vec<Violation>,
    pub cycles: Vec<Cycle>,
    /// True when the ordinary subgraph has a cycle and no order can satisfy it
    pub unresolvable: bool,
}

impl Validation {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty() && self.cycles.is_empty()
    }
}

/// Sort keys shared by cycle reporting and order suggestion: position, then
/// name.
pub(crate) fn node_keys<'a>(
    graph: &'a DependencyGraph,
    positions: &'a [Position],
) -> Vec<(&'a Position, &'a str)> {
    positions
        .iter()
        .enumerate()
        .map(|(idx, position)| (position, graph.name(idx)))
        .collect()
}

/// Check every ordinary edge against `positions` and look for cycles among
/// ordinary edges. Forward edges take part in neither check.
pub fn validate(graph: &DependencyGraph, positions: &[Position]) -> Validation {
    let mut violations: Vec<Violation> = graph
        .edges()
        .iter()
        .filter(|edge| !edge.forward)
        .filter(|edge| positions[edge.target] >= positions[edge.source])
        .map(|edge| Violation {
            source: graph.name(edge.source).to_string(),
            target: graph.name(edge.target).to_string(),
            source_position: positions[edge.source].clone(),
            target_position: positions[edge.target].clone(),
            location: edge.location.clone(),
        })
        .collect();
    violations.sort_by(|a, b| {
        (&a.source_position, &a.target_position).cmp(&(&b.source_position, &b.target_position))
    });

    let keys = node_keys(graph, positions);
    let names = |nodes: &[usize]| -> Vec<String> {
        nodes.iter().map(|&idx| graph.name(idx).to_string()).collect()
    };
    let cycles: Vec<Cycle> = detect_cycles(&graph.ordinary_deps(), &keys)
        .into_iter()
        .map(|cycle| Cycle {
            path: names(&cycle.path),
            members: names(&cycle.members),
        })
        .collect();

    for cycle in &cycles {
        tracing::debug!(members = ?cycle.members, "Dependency cycle");
    }
    tracing::debug!(
        violations = violations.len(),
        cycles = cycles.len(),
        "Validated order"
    );

    Validation {
        unresolvable: !cycles.is_empty(),
        violations,
        cycles,
    }
}
