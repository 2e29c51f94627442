//! Centralized UI formatting and color utilities
//!
//! Colors are turned off by `colored` itself when `NO_COLOR` is set or stdout
//! is not a terminal.

use colored::{ColoredString, Colorize};

use crate::config::QUIET_ENV;
use crate::diagnostics::DiagnosticKind;

/// Check if quiet mode is enabled via environment variable or --quiet flag
pub fn is_quiet() -> bool {
    std::env::var(QUIET_ENV)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Icon for a non-fatal finding.
///
/// - ParseWarning: ⚠ (yellow)
/// - UnresolvedReference: ? (yellow)
pub fn diagnostic_icon(kind: DiagnosticKind) -> ColoredString {
    match kind {
        DiagnosticKind::ParseWarning => "⚠".yellow(),
        DiagnosticKind::UnresolvedReference => "?".yellow(),
    }
}

pub fn ok_icon() -> ColoredString {
    "✓".green()
}

pub fn fail_icon() -> ColoredString {
    "✗".red()
}

/// Color scheme for report text
pub mod colors {
    use colored::{ColoredString, Colorize};

    pub fn warning(text: &str) -> ColoredString {
        text.yellow()
    }

    /// Cyan for label names
    pub fn identifier(text: &str) -> ColoredString {
        text.cyan()
    }

    /// Dimmed for secondary text (positions, locations)
    pub fn secondary(text: &str) -> ColoredString {
        text.dimmed()
    }

    pub fn heading(text: &str) -> ColoredString {
        text.bold()
    }
}

/// Common text formatting patterns
pub mod format {
    /// Format a separator line for sections
    pub fn separator(width: usize) -> String {
        "─".repeat(width)
    }

    /// Heading text with an underline of matching width
    pub fn underlined(title: &str) -> [String; 2] {
        [title.to_string(), separator(title.chars().count())]
    }
}
