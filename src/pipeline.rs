//! The full analysis: extract, build, resolve, validate, suggest.

use serde::Serialize;

use crate::aux::Numbering;
use crate::config::UnresolvedPolicy;
use crate::diagnostics::Diagnostic;
use crate::error::AnalysisError;
use crate::extract::{extract, MacroConfig};
use crate::graph::{build_graph, DependencyGraph};
use crate::order::{resolve_positions, Position};
use crate::source::SourceFile;
use crate::suggest::suggest_order;
use crate::validate::{validate, Cycle, Validation, Violation};

/// Result of one run over a set of sources.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub graph: DependencyGraph,
    /// Indexed like the graph's nodes
    pub positions: Vec<Position>,
    pub validation: Validation,
    pub suggestion: Option<Vec<String>>,
    /// Parse warnings, then unresolved references
    pub warnings: Vec<Diagnostic>,
}

/// Serializable summary of an [`Analysis`].
#[derive(Debug, Clone, Serialize)]
pub struct Report<'a> {
    pub labels: usize,
    pub edges: usize,
    pub violations: &'a [Violation],
    pub cycles: &'a [Cycle],
    pub unresolvable: bool,
    pub suggested_order: Option<Vec<SuggestedEntry<'a>>>,
    pub warnings: &'a [Diagnostic],
}

#[derive(Debug, Clone, Serialize)]
pub struct SuggestedEntry<'a> {
    pub label: &'a str,
    pub current: &'a Position,
}

impl Analysis {
    pub fn position_of(&self, name: &str) -> Option<&Position> {
        self.graph.index_of(name).map(|idx| &self.positions[idx])
    }

    pub fn report(&self) -> Report<'_> {
        let suggested_order = self.suggestion.as_ref().map(|order| {
            order
                .iter()
                .filter_map(|name| {
                    self.position_of(name).map(|current| SuggestedEntry {
                        label: name.as_str(),
                        current,
                    })
                })
                .collect()
        });

        Report {
            labels: self.graph.len(),
            edges: self.graph.edges().len(),
            violations: &self.validation.violations,
            cycles: &self.validation.cycles,
            unresolvable: self.validation.unresolvable,
            suggested_order,
            warnings: &self.warnings,
        }
    }
}

/// Run every stage in order. Fatal conditions stop the run before later
/// stages; everything else is collected in the returned [`Analysis`].
pub fn analyze(
    sources: &[SourceFile],
    numbering: Option<&Numbering>,
    config: &MacroConfig,
    unresolved: UnresolvedPolicy,
) -> Result<Analysis, AnalysisError> {
    let extraction = extract(sources, config)?;
    let mut warnings = extraction.warnings;

    let built = build_graph(extraction.labels, &extraction.citations, config, unresolved)?;
    warnings.extend(built.warnings);
    let graph = built.graph;

    let positions = resolve_positions(graph.nodes(), numbering)?;
    let validation = validate(&graph, &positions);
    let suggestion = suggest_order(&graph, &positions, &validation);

    tracing::info!(
        labels = graph.len(),
        violations = validation.violations.len(),
        cycles = validation.cycles.len(),
        warnings = warnings.len(),
        "Analysis complete"
    );

    Ok(Analysis {
        graph,
        positions,
        validation,
        suggestion,
        warnings,
    })
}
