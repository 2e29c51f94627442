//! Command module structure for the texdag CLI

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::path::{Path, PathBuf};

use texdag::aux::{load_aux, Numbering};
use texdag::config::{normalize_macro, Config, Overrides, UnresolvedPolicy};
use texdag::source::{load_sources, SourceFile};

pub mod check;
pub mod config;
pub mod graph;
pub mod sections;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Inputs shared by every analysis command.
#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// The compiled .aux file (optional) followed by the .tex sources, in
    /// document order. Falls back to `aux` and `sources` from the config.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
    /// Config file (markdown with frontmatter, .yaml or .json)
    #[arg(long, short, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Ordinary reference macros, replacing the configured ones
    #[arg(long, value_name = "MACRO", value_delimiter = ',')]
    pub refs: Vec<String>,
    /// Forward-reference macros exempt from ordering checks
    #[arg(long, value_name = "MACRO", value_delimiter = ',')]
    pub future_refs: Vec<String>,
    /// Label categories that never become graph nodes (e.g. fig,eq)
    #[arg(long, value_name = "CATEGORY", value_delimiter = ',')]
    pub exclude: Vec<String>,
    /// What to do with citations of unknown labels (ignore, warn, error)
    #[arg(long, value_name = "POLICY")]
    pub unresolved: Option<UnresolvedPolicy>,
}

/// Everything an analysis needs, read from disk.
pub struct Inputs {
    pub config: Config,
    pub sources: Vec<SourceFile>,
    pub numbering: Option<Numbering>,
}

impl InputArgs {
    fn overrides(&self) -> Overrides {
        let macros = |names: &[String]| -> Vec<String> {
            names
                .iter()
                .map(|n| format!("\\{}", normalize_macro(n)))
                .collect()
        };
        Overrides {
            references: macros(&self.refs),
            future_references: macros(&self.future_refs),
            excluded_types: self.exclude.iter().map(|c| c.trim().to_string()).collect(),
            unresolved: self.unresolved,
        }
    }

    /// Load configuration, sources and numbering.
    pub fn load(&self) -> Result<Inputs> {
        let config = Config::load(self.config.as_deref())?.with_overrides(self.overrides());
        config
            .validate()
            .context("Invalid configuration after command-line overrides")?;

        let (aux, tex) = split_files(&self.files)?;
        let aux = aux.or_else(|| config.aux_path());
        let tex = if tex.is_empty() {
            config.source_paths()?
        } else {
            tex
        };
        if tex.is_empty() {
            anyhow::bail!(
                "No source files given. Pass .tex files or set `sources` in {}",
                texdag::config::PROJECT_CONFIG_FILE
            );
        }

        let sources = load_sources(&tex)?;
        let numbering = aux.as_deref().map(load_aux).transpose()?;
        if numbering.is_none() {
            tracing::info!("No aux file given, positions follow source order");
        }

        Ok(Inputs {
            config,
            sources,
            numbering,
        })
    }
}

/// Separate the `.aux` file from the sources. At most one aux file is allowed.
fn split_files(files: &[PathBuf]) -> Result<(Option<PathBuf>, Vec<PathBuf>)> {
    let (aux, tex): (Vec<&PathBuf>, Vec<&PathBuf>) = files.iter().partition(|p| is_aux(p));
    if aux.len() > 1 {
        anyhow::bail!("Only one .aux file may be given, found {}", aux.len());
    }
    Ok((
        aux.first().map(|p| p.to_path_buf()),
        tex.into_iter().cloned().collect(),
    ))
}

fn is_aux(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "aux")
}
