//! Label and citation extraction.
//!
//! Runs in two passes per file: [`scan`] collects the ordered boundaries
//! (labels, environments, sectioning commands) and macro invocations, then
//! [`span`] derives each label's span from that list. Citations are attributed
//! to the innermost span that contains them.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::Config;
use crate::diagnostics::Diagnostic;
use crate::domain::{category_of, Citation, Label, MacroClass};
use crate::error::AnalysisError;
use crate::source::{mask_comments, LineIndex, SourceFile};

mod scan;
mod span;

use scan::{LabelDef, Scanner};

/// Macro configuration for one run. Names carry no leading backslash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroConfig {
    pub references: BTreeSet<String>,
    pub future_references: BTreeSet<String>,
    pub label_macros: BTreeSet<String>,
    pub excluded_types: BTreeSet<String>,
    pub env_map: BTreeMap<String, BTreeSet<String>>,
    pub theorem_labels: BTreeSet<String>,
    pub proof_environments: BTreeSet<String>,
}

impl Default for MacroConfig {
    fn default() -> Self {
        Config::default().macros()
    }
}

impl MacroConfig {
    pub fn classify(&self, macro_name: &str) -> MacroClass {
        if self.future_references.contains(macro_name) && !self.references.contains(macro_name) {
            MacroClass::Future
        } else {
            MacroClass::Ordinary
        }
    }

    pub fn is_excluded(&self, label_name: &str) -> bool {
        self.excluded_types.contains(category_of(label_name))
    }
}

/// Everything the extractor found.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Non-excluded label definitions in first-occurrence order. Duplicate
    /// names are kept; the graph builder reports them.
    pub labels: Vec<Label>,
    pub citations: Vec<Citation>,
    pub warnings: Vec<Diagnostic>,
}

/// Extract labels and citations from `sources`, in file order.
pub fn extract(sources: &[SourceFile], config: &MacroConfig) -> Result<Extraction, AnalysisError> {
    let scanner = Scanner::new(config)?;
    let mut extraction = Extraction::default();

    for (file, source) in sources.iter().enumerate() {
        let masked = mask_comments(&source.text);
        let scan = scanner.scan(&masked);
        let lines = LineIndex::new(&source.text);
        let locate = |offset: usize| lines.locate(file, &source.path, &source.text, offset);

        extraction.warnings.extend(
            scan.warnings
                .iter()
                .map(|(offset, message)| Diagnostic::parse_warning(locate(*offset), message)),
        );

        let (kept, excluded): (Vec<&LabelDef>, Vec<&LabelDef>) =
            scan.labels.iter().partition(|l| !config.is_excluded(&l.name));
        for label in &excluded {
            tracing::trace!(label = %label.name, "Skipping excluded label");
        }

        let spans = span::compute_spans(file, &kept, &scan, masked.len(), config);
        let first_label = extraction.labels.len();
        extraction
            .labels
            .extend(kept.iter().zip(spans).map(|(def, span)| Label {
                name: def.name.clone(),
                category: category_of(&def.name).to_string(),
                location: locate(def.offset),
                span,
            }));
        let mut by_start: Vec<&Label> = extraction.labels[first_label..].iter().collect();
        by_start.sort_by_key(|l| l.span.start);

        for macro_use in &scan.macro_uses {
            // Innermost span wins: the latest start among those containing it
            let opened = by_start.partition_point(|l| l.span.start <= macro_use.offset);
            let enclosing = by_start[..opened]
                .iter()
                .rev()
                .find(|l| l.span.contains(file, macro_use.offset))
                .map(|l| l.name.clone());
            let class = config.classify(&macro_use.macro_name);

            for target in &macro_use.targets {
                extraction.citations.push(Citation {
                    macro_name: macro_use.macro_name.clone(),
                    target: target.clone(),
                    class,
                    location: locate(macro_use.offset),
                    enclosing: enclosing.clone(),
                });
            }
        }

        tracing::debug!(
            path = %source.path.display(),
            labels = kept.len(),
            excluded = excluded.len(),
            citations = scan.macro_uses.len(),
            warnings = scan.warnings.len(),
            "Scanned source"
        );
    }

    Ok(extraction)
}
