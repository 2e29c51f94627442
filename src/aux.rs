//! Authoritative numbering read from LaTeX `.aux` files.
//!
//! Only `\newlabel{name}{{number}...}` records matter. Numbers stay raw
//! strings here; [`crate::order`] decides how much of each is usable.

use anyhow::{Context, Result};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Label name → raw number string, e.g. `lem:zorn` → `2.3`.
pub type Numbering = BTreeMap<String, String>;

fn newlabel_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\\newlabel\{([^{}]+)\}\{\{([^{}]*)\}").expect("valid newlabel pattern")
    })
}

fn input_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\\@input\{([^{}]+)\}").expect("valid input pattern"))
}

/// Parse every `\newlabel` record in `content`. Later records for the same
/// name replace earlier ones; names containing `@` (cleveref shadows such as
/// `lem:a@cref`) are skipped.
pub fn parse_aux(content: &str) -> Numbering {
    let mut numbering = Numbering::new();
    for caps in newlabel_re().captures_iter(content) {
        let name = caps[1].trim();
        if name.contains('@') {
            continue;
        }
        numbering.insert(name.to_string(), caps[2].trim().to_string());
    }
    numbering
}

/// Read an `.aux` file and every file it pulls in with `\@input{...}`.
///
/// Child paths are relative to the parent's directory. Each file is read at
/// most once; missing children (chapters not compiled yet) are skipped.
pub fn load_aux(path: &Path) -> Result<Numbering> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read aux file {}", path.display()))?;

    let mut numbering = Numbering::new();
    let mut visited = BTreeSet::new();
    visited.insert(path.to_path_buf());
    collect(path, &content, &mut numbering, &mut visited)?;

    tracing::debug!(path = %path.display(), labels = numbering.len(), "Loaded aux numbering");
    Ok(numbering)
}

fn collect(
    path: &Path,
    content: &str,
    numbering: &mut Numbering,
    visited: &mut BTreeSet<PathBuf>,
) -> Result<()> {
    numbering.extend(parse_aux(content));

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    for caps in input_re().captures_iter(content) {
        let child = base.join(caps[1].trim());
        if !visited.insert(child.clone()) {
            continue;
        }
        if !child.exists() {
            tracing::warn!(path = %child.display(), "Included aux file not found, skipping");
            continue;
        }
        let child_content = fs::read_to_string(&child)
            .with_context(|| format!("Failed to read aux file {}", child.display()))?;
        collect(&child, &child_content, numbering, visited)?;
    }
    Ok(())
}
