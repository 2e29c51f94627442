//! Core value types shared by every analysis stage, plus the pure graph
//! algorithms in [`dependency`].

use serde::Serialize;
use std::fmt;

use crate::source::Location;

pub mod dependency;

/// Byte range in one source file over which citations are attributed to a
/// label. `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub file: usize,
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn contains(&self, file: usize, offset: usize) -> bool {
        self.file == file && self.start <= offset && offset < self.end
    }
}

/// A named, categorized entity defined in the document (`\label{lem:zorn}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Label {
    /// Full label text, e.g. `lem:zorn`
    pub name: String,
    /// Prefix before the first `:`; empty when the label has none
    pub category: String,
    pub location: Location,
    pub span: Span,
}

/// Split a label name into its category prefix.
///
/// `lem:zorn` has category `lem`; `intro` has the empty category.
pub fn category_of(name: &str) -> &str {
    name.split_once(':').map(|(cat, _)| cat).unwrap_or("")
}

/// Whether a citation macro demands strict ordering or is an announced
/// forward reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MacroClass {
    Ordinary,
    Future,
}

impl MacroClass {
    pub fn is_forward(self) -> bool {
        self == MacroClass::Future
    }
}

impl fmt::Display for MacroClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MacroClass::Ordinary => write!(f, "ordinary"),
            MacroClass::Future => write!(f, "future"),
        }
    }
}

/// One reference to a label by name through a configured macro.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Citation {
    /// Macro name without the backslash, e.g. `reflem`
    pub macro_name: String,
    pub target: String,
    pub class: MacroClass,
    pub location: Location,
    /// Label whose span contains the citation, if any
    pub enclosing: Option<String>,
}
