//! Validation logic for configuration and policy enums.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::{normalize_macro, Config};

/// What to do with a citation whose target is not a known label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedPolicy {
    /// Drop the edge, log at debug level only
    Ignore,
    /// Drop the edge and report a warning
    #[default]
    Warn,
    /// Collect every unresolved reference, then fail the run
    Error,
}

impl fmt::Display for UnresolvedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnresolvedPolicy::Ignore => write!(f, "ignore"),
            UnresolvedPolicy::Warn => write!(f, "warn"),
            UnresolvedPolicy::Error => write!(f, "error"),
        }
    }
}

impl FromStr for UnresolvedPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ignore" => Ok(UnresolvedPolicy::Ignore),
            "warn" | "warning" => Ok(UnresolvedPolicy::Warn),
            "error" | "fatal" => Ok(UnresolvedPolicy::Error),
            _ => anyhow::bail!(
                "Invalid unresolved policy '{}'. Valid options: ignore, warn, error",
                s
            ),
        }
    }
}

/// A macro name is letters (and `@`, as in package internals) after the
/// optional leading backslash.
fn is_valid_macro_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphabetic() || c == '@')
}

impl Config {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.references.is_empty() && self.future_references.is_empty() {
            anyhow::bail!("references and future_references are both empty; nothing to scan for");
        }

        if self.label_macros.is_empty() {
            anyhow::bail!("label_macros must name at least one macro");
        }

        for (field, names) in [
            ("references", &self.references),
            ("future_references", &self.future_references),
            ("label_macros", &self.label_macros),
        ] {
            for name in names {
                if !is_valid_macro_name(&normalize_macro(name)) {
                    anyhow::bail!("{} contains an invalid macro name '{}'", field, name);
                }
            }
        }

        let ordinary: BTreeSet<String> =
            self.references.iter().map(|m| normalize_macro(m)).collect();
        let both: Vec<String> = self
            .future_references
            .iter()
            .map(|m| normalize_macro(m))
            .filter(|m| ordinary.contains(m))
            .map(|m| format!("\\{}", m))
            .collect();
        if !both.is_empty() {
            anyhow::bail!(
                "macro(s) listed in both references and future_references: {}",
                both.join(", ")
            );
        }

        if self.proof_environments.iter().any(|e| e.trim().is_empty()) {
            anyhow::bail!("proof_environments contains an empty environment name");
        }

        for (category, envs) in &self.env_map {
            if envs.is_empty() {
                anyhow::bail!("env_map entry '{}' lists no environments", category);
            }
        }

        Ok(())
    }
}
