//! Source texts, file identities and locations.
//!
//! Sources are kept in the order they were supplied; that order is the
//! tie-break for unnumbered positions and for span extraction.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// One input text together with the path it was read from.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Read a source file from disk. The file must be valid UTF-8.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read source {}", path.display()))?;
        Ok(Self::new(path, text))
    }
}

/// Load every path in order.
pub fn load_sources(paths: &[PathBuf]) -> Result<Vec<SourceFile>> {
    paths.iter().map(|p| SourceFile::load(p)).collect()
}

/// A point in one of the sources.
///
/// Ordering is by file index, then byte offset, which is the order of the
/// concatenated input.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Location {
    /// Index of the file in the supplied source order
    pub file: usize,
    /// Byte offset into the file
    pub offset: usize,
    pub path: PathBuf,
    /// 1-based line
    pub line: usize,
    /// 1-based column, counted in characters
    pub column: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path.display(), self.line, self.column)
    }
}

/// Byte offsets of every line start, for offset → line/column lookups.
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { starts }
    }

    /// Build a [`Location`] for `offset` in `text`.
    pub fn locate(&self, file: usize, path: &Path, text: &str, offset: usize) -> Location {
        let line = match self.starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let line_start = self.starts[line];
        let column = text
            .get(line_start..offset)
            .map(|s| s.chars().count())
            .unwrap_or(0)
            + 1;

        Location {
            file,
            offset,
            path: path.to_path_buf(),
            line: line + 1,
            column,
        }
    }
}

/// Replace `%` comments with spaces, keeping every byte offset intact.
///
/// A `%` is a comment start unless it is escaped by an odd number of
/// backslashes (`\%` is a literal percent, `\\%` is a line break followed by
/// a comment).
pub fn mask_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut backslashes = 0usize;
    let mut in_comment = false;

    for ch in text.chars() {
        if in_comment {
            if ch == '\n' {
                in_comment = false;
                out.push(ch);
            } else {
                out.extend(std::iter::repeat(' ').take(ch.len_utf8()));
            }
            continue;
        }

        if ch == '%' && backslashes % 2 == 0 {
            in_comment = true;
            out.push(' ');
            backslashes = 0;
            continue;
        }

        backslashes = if ch == '\\' { backslashes + 1 } else { 0 };
        out.push(ch);
    }

    out
}
