//! Configuration management for texdag.
//!
//! Configuration lives in markdown files with YAML frontmatter (the body is
//! free-form notes), plain `.yaml`/`.yml` files, or `.json` macro files.
//! Merge order, later overriding earlier:
//!
//! 1. Global config (`~/.config/texdag/config.md`)
//! 2. Project config (`texdag.md`, or the file given with `--config`)
//! 3. Command-line overrides

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::extract::MacroConfig;

pub mod defaults;
pub mod validation;

pub use defaults::*;
pub use validation::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Ordinary reference macros; citations through them must point backwards
    #[serde(default = "default_references")]
    pub references: Vec<String>,
    /// Forward-reference macros, exempt from ordering checks
    #[serde(default)]
    pub future_references: Vec<String>,
    /// Macros that define labels
    #[serde(default = "default_label_macros")]
    pub label_macros: Vec<String>,
    /// Label categories that never become graph nodes
    #[serde(default = "default_excluded_types")]
    pub excluded_types: Vec<String>,
    /// Category → environments whose extent is the label's span
    #[serde(default)]
    pub env_map: BTreeMap<String, Vec<String>>,
    /// Categories whose span swallows a directly following proof
    #[serde(default)]
    pub theorem_labels: Vec<String>,
    #[serde(default = "default_proof_environments")]
    pub proof_environments: Vec<String>,
    #[serde(default)]
    pub unresolved: UnresolvedPolicy,
    /// Path to the compiled `.aux` file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aux: Option<String>,
    /// Glob patterns for the `.tex` sources, in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            references: default_references(),
            future_references: Vec::new(),
            label_macros: default_label_macros(),
            excluded_types: default_excluded_types(),
            env_map: BTreeMap::new(),
            theorem_labels: Vec::new(),
            proof_environments: default_proof_environments(),
            unresolved: UnresolvedPolicy::default(),
            aux: None,
            sources: Vec::new(),
        }
    }
}

/// Values given on the command line. Empty lists and `None` leave the
/// configured value alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub references: Vec<String>,
    pub future_references: Vec<String>,
    pub excluded_types: Vec<String>,
    pub unresolved: Option<UnresolvedPolicy>,
}

/// Strip surrounding whitespace and one leading backslash: `\reflem` → `reflem`.
pub fn normalize_macro(name: &str) -> String {
    let name = name.trim();
    name.strip_prefix('\\').unwrap_or(name).to_string()
}

impl Config {
    /// Load the merged configuration: global config, then the explicit config
    /// file or `texdag.md` in the working directory when present.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let project = match explicit {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file {} does not exist", path.display());
                }
                Some(path.to_path_buf())
            }
            None => {
                let path = PathBuf::from(PROJECT_CONFIG_FILE);
                path.exists().then_some(path)
            }
        };

        Self::load_merged_from(global_config_path().as_deref(), project.as_deref())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config = PartialConfig::default().merge_with(PartialConfig::load_from(path)?);
        config.validate()?;
        Ok(config)
    }

    /// Parse a markdown config with YAML frontmatter.
    pub fn parse(content: &str) -> Result<Self> {
        let parsed = PartialConfig::parse(content, ConfigFormat::Frontmatter)?;
        let config = PartialConfig::default().merge_with(parsed);
        config.validate()?;
        Ok(config)
    }

    /// Load merged configuration from specified global and project config paths.
    /// A missing global file is skipped; a given project file must exist.
    pub fn load_merged_from(
        global_path: Option<&Path>,
        project_path: Option<&Path>,
    ) -> Result<Self> {
        let global_config = global_path
            .filter(|p| p.exists())
            .map(PartialConfig::load_from)
            .transpose()?
            .unwrap_or_default();

        let project_config = project_path
            .map(PartialConfig::load_from)
            .transpose()?
            .unwrap_or_default();

        let config = global_config.merge_with(project_config);
        config.validate()?;
        tracing::debug!(
            global = ?global_path,
            project = ?project_path,
            references = config.references.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if !overrides.references.is_empty() {
            self.references = overrides.references;
        }
        if !overrides.future_references.is_empty() {
            self.future_references = overrides.future_references;
        }
        if !overrides.excluded_types.is_empty() {
            self.excluded_types = overrides.excluded_types;
        }
        if let Some(policy) = overrides.unresolved {
            self.unresolved = policy;
        }
        self
    }

    /// The immutable macro configuration handed to the extractor.
    pub fn macros(&self) -> MacroConfig {
        let normalized = |names: &[String]| -> BTreeSet<String> {
            names.iter().map(|n| normalize_macro(n)).collect()
        };
        let trimmed = |names: &[String]| -> BTreeSet<String> {
            names.iter().map(|n| n.trim().to_string()).collect()
        };

        MacroConfig {
            references: normalized(&self.references),
            future_references: normalized(&self.future_references),
            label_macros: normalized(&self.label_macros),
            excluded_types: trimmed(&self.excluded_types),
            env_map: self
                .env_map
                .iter()
                .map(|(category, envs)| (category.trim().to_string(), trimmed(envs)))
                .collect(),
            theorem_labels: trimmed(&self.theorem_labels),
            proof_environments: trimmed(&self.proof_environments),
        }
    }

    /// Path of the `.aux` file, with `~` expanded.
    pub fn aux_path(&self) -> Option<PathBuf> {
        self.aux
            .as_deref()
            .map(|p| PathBuf::from(shellexpand::tilde(p).to_string()))
    }

    /// Expand the configured source patterns in order. Each pattern's matches
    /// are sorted; a pattern without matches is kept literally so that reading
    /// it reports a proper error.
    pub fn source_paths(&self) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for pattern in &self.sources {
            let expanded = shellexpand::tilde(pattern).to_string();
            let mut matches: Vec<PathBuf> = glob::glob(&expanded)
                .with_context(|| format!("Invalid source pattern '{}'", pattern))?
                .filter_map(|entry| entry.ok())
                .collect();
            if matches.is_empty() {
                paths.push(PathBuf::from(expanded));
                continue;
            }
            matches.sort();
            for path in matches {
                if !paths.contains(&path) {
                    paths.push(path);
                }
            }
        }
        Ok(paths)
    }
}

/// Returns the path to the global config file at ~/.config/texdag/config.md
pub fn global_config_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".config/texdag/config.md"))
}

/// Split content into frontmatter and body.
///
/// If the content starts with `---`, returns the YAML between the first and
/// second `---` delimiters and the body after. Otherwise returns `None` and
/// the whole content.
pub fn split_frontmatter(content: &str) -> (Option<String>, &str) {
    let content = content.trim();

    let Some(rest) = content.strip_prefix("---") else {
        return (None, content);
    };
    match rest.find("\n---") {
        Some(end) => {
            let frontmatter = rest[..end].to_string();
            let body = rest[end + 4..].trim_start();
            (Some(frontmatter), body)
        }
        None => (None, content),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Frontmatter,
    Yaml,
    Json,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => ConfigFormat::Json,
            Some("yaml") | Some("yml") => ConfigFormat::Yaml,
            _ => ConfigFormat::Frontmatter,
        }
    }
}

/// Partial config for merging - all fields optional
#[derive(Debug, Deserialize, Default)]
struct PartialConfig {
    pub references: Option<Vec<String>>,
    pub future_references: Option<Vec<String>>,
    pub label_macros: Option<Vec<String>>,
    pub excluded_types: Option<Vec<String>>,
    pub env_map: Option<BTreeMap<String, Vec<String>>>,
    pub theorem_labels: Option<Vec<String>>,
    pub proof_environments: Option<Vec<String>>,
    pub unresolved: Option<UnresolvedPolicy>,
    pub aux: Option<String>,
    pub sources: Option<Vec<String>>,
}

impl PartialConfig {
    fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        Self::parse(&content, ConfigFormat::from_path(path))
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        match format {
            ConfigFormat::Json => {
                serde_json::from_str(content).context("Failed to parse JSON config")
            }
            ConfigFormat::Yaml => Self::parse_yaml(content),
            ConfigFormat::Frontmatter => {
                let (frontmatter, _body) = split_frontmatter(content);
                let frontmatter =
                    frontmatter.context("Failed to extract frontmatter from config")?;
                Self::parse_yaml(&frontmatter)
            }
        }
    }

    fn parse_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).context("Failed to parse config YAML")
    }

    /// Merge this global config with a project config, returning the merged result.
    /// Values from the project config take precedence over global.
    fn merge_with(self, project: PartialConfig) -> Config {
        Config {
            references: project
                .references
                .or(self.references)
                .unwrap_or_else(default_references),
            future_references: project
                .future_references
                .or(self.future_references)
                .unwrap_or_default(),
            label_macros: project
                .label_macros
                .or(self.label_macros)
                .unwrap_or_else(default_label_macros),
            excluded_types: project
                .excluded_types
                .or(self.excluded_types)
                .unwrap_or_else(default_excluded_types),
            env_map: project.env_map.or(self.env_map).unwrap_or_default(),
            theorem_labels: project
                .theorem_labels
                .or(self.theorem_labels)
                .unwrap_or_default(),
            proof_environments: project
                .proof_environments
                .or(self.proof_environments)
                .unwrap_or_else(default_proof_environments),
            unresolved: project.unresolved.or(self.unresolved).unwrap_or_default(),
            // Input paths belong to a document, never inherited from global
            aux: project.aux,
            sources: project.sources.unwrap_or_default(),
        }
    }
}
