//! Dependency graph construction.
//!
//! Nodes live in an arena addressed by index, in first-occurrence order.
//! Edges point from the citing label to the cited one and are kept
//! deduplicated and sorted by (source, target).

use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::UnresolvedPolicy;
use crate::diagnostics::Diagnostic;
use crate::domain::{Citation, Label};
use crate::error::{AnalysisError, LabelConflict};
use crate::extract::MacroConfig;
use crate::order::Position;
use crate::source::Location;

pub mod collapse;

/// `source` cites `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
    /// True only when every citation behind the edge was a future reference
    pub forward: bool,
    /// A citation behind the edge; an ordinary one when any exists
    pub location: Location,
}

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: Vec<Label>,
    index: BTreeMap<String, usize>,
    edges: Vec<Edge>,
}

impl DependencyGraph {
    pub fn nodes(&self) -> &[Label] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn name(&self, idx: usize) -> &str {
        &self.nodes[idx].name
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adjacency lists of the non-forward subgraph: `deps[i]` holds the
    /// labels `i` cites with an ordinary citation, in index order.
    pub fn ordinary_deps(&self) -> Vec<Vec<usize>> {
        let mut deps = vec![Vec::new(); self.nodes.len()];
        for edge in self.edges.iter().filter(|e| !e.forward) {
            deps[edge.source].push(edge.target);
        }
        deps
    }

    /// Whether the node has no incident edge of either kind.
    pub fn is_isolated(&self, idx: usize) -> bool {
        !self
            .edges
            .iter()
            .any(|e| e.source == idx || e.target == idx)
    }

    /// Read-only export for renderers, with positions attached.
    pub fn export(&self, positions: &[Position], include_isolated: bool) -> GraphExport {
        let nodes = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(idx, _)| include_isolated || !self.is_isolated(*idx))
            .map(|(idx, label)| NodeExport {
                name: label.name.clone(),
                category: label.category.clone(),
                position: positions[idx].clone(),
                location: label.location.clone(),
            })
            .collect();
        let edges = self
            .edges
            .iter()
            .map(|edge| EdgeExport {
                source: self.name(edge.source).to_string(),
                target: self.name(edge.target).to_string(),
                forward: edge.forward,
            })
            .collect();
        GraphExport { nodes, edges }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeExport {
    pub name: String,
    pub category: String,
    pub position: Position,
    pub location: Location,
}

#[derive(Debug, Clone, Serialize)]
pub struct EdgeExport {
    pub source: String,
    pub target: String,
    pub forward: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphExport {
    pub nodes: Vec<NodeExport>,
    pub edges: Vec<EdgeExport>,
}

/// Graph plus the unresolved-reference warnings produced while building it.
#[derive(Debug, Clone)]
pub struct GraphBuild {
    pub graph: DependencyGraph,
    pub warnings: Vec<Diagnostic>,
}

/// Build the dependency graph from extracted labels and citations.
///
/// Fails with [`AnalysisError::DuplicateLabel`] before looking at any
/// citation when a name is defined more than once, and with
/// [`AnalysisError::UnresolvedReferences`] under [`UnresolvedPolicy::Error`].
pub fn build_graph(
    labels: Vec<Label>,
    citations: &[Citation],
    config: &MacroConfig,
    policy: UnresolvedPolicy,
) -> Result<GraphBuild, AnalysisError> {
    check_duplicates(&labels)?;

    let index: BTreeMap<String, usize> = labels
        .iter()
        .enumerate()
        .map(|(idx, label)| (label.name.clone(), idx))
        .collect();

    let mut edges: BTreeMap<(usize, usize), (bool, Location)> = BTreeMap::new();
    let mut unresolved = Vec::new();

    for citation in citations {
        let Some(enclosing) = &citation.enclosing else {
            tracing::trace!(target_label = %citation.target, location = %citation.location, "Citation outside any label span");
            continue;
        };
        if config.is_excluded(&citation.target) {
            tracing::trace!(target_label = %citation.target, "Citation of excluded label dropped");
            continue;
        }
        let Some(&target) = index.get(&citation.target) else {
            match policy {
                UnresolvedPolicy::Ignore => {
                    tracing::debug!(target_label = %citation.target, location = %citation.location, "Unresolved reference ignored");
                }
                UnresolvedPolicy::Warn | UnresolvedPolicy::Error => {
                    unresolved.push(Diagnostic::unresolved(
                        citation.location.clone(),
                        format!(
                            "\\{}{{{}}} in {} does not name a known label",
                            citation.macro_name, citation.target, enclosing
                        ),
                    ));
                }
            }
            continue;
        };
        let Some(&source) = index.get(enclosing) else {
            continue;
        };
        if source == target {
            continue;
        }

        let forward = citation.class.is_forward();
        edges
            .entry((source, target))
            .and_modify(|(edge_forward, location)| {
                if *edge_forward && !forward {
                    *edge_forward = false;
                    *location = citation.location.clone();
                }
            })
            .or_insert_with(|| (forward, citation.location.clone()));
    }

    if policy == UnresolvedPolicy::Error && !unresolved.is_empty() {
        return Err(AnalysisError::UnresolvedReferences(unresolved));
    }

    let edges: Vec<Edge> = edges
        .into_iter()
        .map(|((source, target), (forward, location))| Edge {
            source,
            target,
            forward,
            location,
        })
        .collect();

    tracing::debug!(
        nodes = labels.len(),
        edges = edges.len(),
        forward = edges.iter().filter(|e| e.forward).count(),
        unresolved = unresolved.len(),
        "Built dependency graph"
    );

    Ok(GraphBuild {
        graph: DependencyGraph {
            nodes: labels,
            index,
            edges,
        },
        warnings: unresolved,
    })
}

fn check_duplicates(labels: &[Label]) -> Result<(), AnalysisError> {
    let mut sites: BTreeMap<&str, Vec<&Label>> = BTreeMap::new();
    for label in labels {
        sites.entry(label.name.as_str()).or_default().push(label);
    }

    let mut conflicts: Vec<LabelConflict> = sites
        .into_iter()
        .filter(|(_, defs)| defs.len() > 1)
        .map(|(name, defs)| LabelConflict {
            name: name.to_string(),
            locations: defs.iter().map(|l| l.location.clone()).collect(),
        })
        .collect();

    if conflicts.is_empty() {
        return Ok(());
    }
    conflicts.sort_by(|a, b| a.locations[0].cmp(&b.locations[0]));
    Err(AnalysisError::DuplicateLabel(conflicts))
}
