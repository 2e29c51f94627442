//! Output formatters for analysis results
//!
//! Text output is built line by line and joined; JSON output goes through the
//! serializable report types.

use colored::Colorize;

use crate::graph::collapse::SectionEdge;
use crate::order::Position;
use crate::pipeline::Analysis;
use crate::ui::{self, colors, format};
use crate::validate::{Cycle, Violation};

/// Format an analysis as a multi-section text report.
///
/// Cycles come first since they make a suggestion impossible. In quiet mode
/// only findings are printed.
pub fn format_check_report(analysis: &Analysis, quiet: bool) -> String {
    let mut output = Vec::new();

    if !quiet {
        output.push(colors::heading("texdag check").to_string());
        output.push("============".to_string());
        output.push(format_counts(analysis));
        output.push(String::new());
    }

    let cycles = &analysis.validation.cycles;
    if !cycles.is_empty() {
        let [title, rule] = format::underlined(&format!("Cycles ({})", cycles.len()));
        output.push(title.red().bold().to_string());
        output.push(rule);
        output.extend(cycles.iter().map(format_cycle));
        output.push(String::new());
    }

    let violations = &analysis.validation.violations;
    if !violations.is_empty() {
        let [title, rule] = format::underlined(&format!("Violations ({})", violations.len()));
        output.push(colors::heading(&title).to_string());
        output.push(rule);
        output.extend(violations.iter().map(format_violation));
        output.push(String::new());
    }

    if !analysis.warnings.is_empty() {
        let [title, rule] = format::underlined(&format!("Warnings ({})", analysis.warnings.len()));
        output.push(colors::heading(&title).to_string());
        output.push(rule);
        for warning in &analysis.warnings {
            output.push(format!(
                "  {} {} {}",
                ui::diagnostic_icon(warning.kind),
                colors::secondary(&warning.location.to_string()),
                warning.message
            ));
        }
        output.push(String::new());
    }

    if !quiet {
        output.extend(format_suggestion(analysis));
        output.push(String::new());
    }

    output.push(format_summary(analysis));
    output.join("\n")
}

fn format_counts(analysis: &Analysis) -> String {
    let graph = &analysis.graph;
    let forward = graph.edges().iter().filter(|e| e.forward).count();
    let numbered = analysis.positions.iter().filter(|p| p.is_numbered()).count();

    format!(
        "  {:<12} {} ({} numbered)\n  {:<12} {} ({} forward)",
        "Labels:",
        graph.len(),
        numbered,
        "Citations:",
        graph.edges().len(),
        forward,
    )
}

fn format_cycle(cycle: &Cycle) -> String {
    let mut path: Vec<String> = cycle
        .path
        .iter()
        .map(|name| colors::identifier(name).to_string())
        .collect();
    if let Some(first) = path.first().cloned() {
        path.push(first);
    }

    let mut line = format!("  {} {}", ui::fail_icon(), path.join(" → "));
    if cycle.members.len() > cycle.path.len() {
        line.push_str(&format!(
            "\n    {}",
            colors::secondary(&format!("component: {}", cycle.members.join(", ")))
        ));
    }
    line
}

fn format_violation(violation: &Violation) -> String {
    format!(
        "  {} {} ({}) cites {} ({})  {}",
        ui::fail_icon(),
        colors::identifier(&violation.source),
        violation.source_position,
        colors::identifier(&violation.target),
        violation.target_position,
        colors::secondary(&violation.location.to_string())
    )
}

fn format_suggestion(analysis: &Analysis) -> Vec<String> {
    let [title, rule] = format::underlined("Suggested order");
    let mut output = vec![colors::heading(&title).to_string(), rule];

    let Some(order) = &analysis.suggestion else {
        output.push(
            colors::secondary("  (none: the citations above form a cycle)").to_string(),
        );
        return output;
    };

    let current = current_order(analysis);
    let width = order.len().to_string().len();
    for (rank, name) in order.iter().enumerate() {
        let position = analysis
            .position_of(name)
            .map(Position::to_string)
            .unwrap_or_default();
        let moved = current.get(rank).is_some_and(|c| *c != name.as_str());
        let marker = if moved {
            colors::warning("moved").to_string()
        } else {
            String::new()
        };
        output.push(
            format!(
                "  {:>width$}. {}  {}  {}",
                rank + 1,
                colors::identifier(name),
                colors::secondary(&position),
                marker,
                width = width
            )
            .trim_end()
            .to_string(),
        );
    }
    output
}

/// Label names sorted by their current position.
fn current_order(analysis: &Analysis) -> Vec<&str> {
    let mut names: Vec<(&Position, &str)> = analysis
        .positions
        .iter()
        .zip(analysis.graph.nodes())
        .map(|(position, label)| (position, label.name.as_str()))
        .collect();
    names.sort();
    names.into_iter().map(|(_, name)| name).collect()
}

fn format_summary(analysis: &Analysis) -> String {
    let validation = &analysis.validation;
    if validation.unresolvable {
        format!(
            "{} {} cycle(s), {} violation(s): no valid order exists",
            ui::fail_icon(),
            validation.cycles.len(),
            validation.violations.len()
        )
    } else if !validation.violations.is_empty() {
        format!(
            "{} {} violation(s)",
            ui::fail_icon(),
            validation.violations.len()
        )
    } else if !analysis.warnings.is_empty() {
        format!(
            "{} No ordering violations, {} warning(s)",
            ui::ok_icon(),
            analysis.warnings.len()
        )
    } else {
        format!("{} No ordering violations", ui::ok_icon())
    }
}

/// Format section-level dependencies, one line per pair of sections.
pub fn format_sections(edges: &[SectionEdge], depth: usize) -> String {
    let [title, rule] = format::underlined(&format!("Section dependencies (depth {})", depth));
    let mut output = vec![colors::heading(&title).to_string(), rule];

    if edges.is_empty() {
        output.push(colors::secondary("  (no citations between sections)").to_string());
        return output.join("\n");
    }

    let width = edges
        .iter()
        .map(|e| e.source.to_string().len())
        .max()
        .unwrap_or(0);
    for edge in edges {
        let mut line = format!(
            "  {:>width$} → {}  {} citation(s)",
            edge.source.to_string(),
            edge.target,
            edge.count,
            width = width
        );
        if edge.forward > 0 {
            line.push_str(&colors::secondary(&format!(", {} forward", edge.forward)).to_string());
        }
        output.push(line);
    }
    output.join("\n")
}
