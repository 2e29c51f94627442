//! Second pass: derive each label's span from the ordered boundary list.
//!
//! A label whose category maps to environments in `env_map` spans the
//! innermost such environment around it. Any other label spans from its
//! definition to the next label, sectioning command, end of its enclosing
//! environment or end of file, whichever comes first. Theorem-like labels
//! then swallow a proof environment that follows with no label or section
//! in between.

use super::scan::{Environment, FileScan, LabelDef};
use super::MacroConfig;
use crate::domain::{category_of, Span};

/// Environment that wraps a whole document and never bounds a span.
const DOCUMENT_ENV: &str = "document";

/// Compute spans for `labels` (the non-excluded definitions of one file, in
/// offset order).
pub(crate) fn compute_spans(
    file: usize,
    labels: &[&LabelDef],
    scan: &FileScan,
    text_len: usize,
    config: &MacroConfig,
) -> Vec<Span> {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let next_label = labels.get(i + 1).map(|l| l.offset);
            let (start, nominal_end) =
                nominal_span(label, next_label, scan, text_len, config);

            let category = category_of(&label.name);
            let end = if config.theorem_labels.contains(category) {
                extend_over_proof(nominal_end, labels, scan, config).unwrap_or(nominal_end)
            } else {
                nominal_end
            };

            Span { file, start, end }
        })
        .collect()
}

/// Innermost environment around `offset` satisfying `accept`.
fn innermost_env<'a>(
    scan: &'a FileScan,
    offset: usize,
    accept: impl Fn(&Environment) -> bool,
) -> Option<&'a Environment> {
    // Sorted by begin, so the last enclosing one is the innermost
    scan.environments
        .iter()
        .filter(|env| env.encloses(offset) && accept(env))
        .last()
}

fn nominal_span(
    label: &LabelDef,
    next_label: Option<usize>,
    scan: &FileScan,
    text_len: usize,
    config: &MacroConfig,
) -> (usize, usize) {
    let category = category_of(&label.name);

    if let Some(env_names) = config.env_map.get(category) {
        if let Some(env) = innermost_env(scan, label.offset, |env| env_names.contains(&env.name)) {
            return (env.begin, env.end);
        }
    }

    let next_section = scan.sections.iter().copied().find(|&s| s > label.offset);
    let env_end =
        innermost_env(scan, label.offset, |env| env.name != DOCUMENT_ENV).map(|env| env.end);

    let end = [next_label, next_section, env_end]
        .into_iter()
        .flatten()
        .fold(text_len, usize::min);

    (label.offset, end)
}

/// If the first environment opened at or after `from` is a proof, with no
/// label definition or sectioning command before it, return the proof's end.
fn extend_over_proof(
    from: usize,
    labels: &[&LabelDef],
    scan: &FileScan,
    config: &MacroConfig,
) -> Option<usize> {
    let next_env = scan.environments.iter().find(|env| env.begin >= from)?;
    if !config.proof_environments.contains(&next_env.name) {
        return None;
    }

    let between = |offset: usize| from <= offset && offset < next_env.begin;
    if labels.iter().any(|l| between(l.offset)) || scan.sections.iter().any(|&s| between(s)) {
        return None;
    }

    Some(next_env.end)
}
