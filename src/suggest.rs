//! Suggested order: a topological order of the ordinary subgraph that stays as
//! close to the current positions as the dependencies allow.

use crate::domain::dependency::stable_topological_sort;
use crate::graph::DependencyGraph;
use crate::order::Position;
use crate::validate::{node_keys, Validation};

/// Labels in suggested order, dependencies first. `None` when the graph
/// has an ordinary cycle.
pub fn suggest_order(
    graph: &DependencyGraph,
    positions: &[Position],
    validation: &Validation,
) -> Option<Vec<String>> {
    if validation.unresolvable {
        return None;
    }

    let keys = node_keys(graph, positions);
    match stable_topological_sort(&graph.ordinary_deps(), &keys) {
        Ok(order) => Some(order.into_iter().map(|idx| graph.name(idx).to_string()).collect()),
        Err(stuck) => {
            tracing::warn!(stuck = stuck.len(), "Cycle left undetected by validation");
            None
        }
    }
}

/// Positions that place every label at its index in `order`. Labels missing
/// from `order` keep their relative order after it.
pub fn positions_from_order(graph: &DependencyGraph, order: &[String]) -> Vec<Position> {
    let mut positions: Vec<Position> = (0..graph.len())
        .map(|idx| Position::Unnumbered(order.len() + idx))
        .collect();
    for (rank, name) in order.iter().enumerate() {
        if let Some(idx) = graph.index_of(name) {
            positions[idx] = Position::Numbered(vec![rank as u32 + 1]);
        }
    }
    positions
}
