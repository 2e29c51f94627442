//! # texdag - cross-reference order checking for LaTeX documents
//!
//! texdag reads a document's sources and its compiled `.aux` numbering, builds
//! the graph of "cites" relations between labelled statements, and reports
//! every citation of a statement that has not been established yet.
//!
//! ## Pipeline
//!
//! Each stage is a pure function of the previous one's output:
//!
//! - [`extract`] - labels, citations and label spans from the source text
//! - [`graph`] - the dependency graph, with duplicate-name checks
//! - [`order`] - authoritative positions from the numbering
//! - [`validate`] - ordering violations and dependency cycles
//! - [`suggest`] - a minimally perturbed order that satisfies the graph
//!
//! [`pipeline::analyze`] runs all of them.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use texdag::aux::load_aux;
//! use texdag::config::Config;
//! use texdag::pipeline::analyze;
//! use texdag::source::SourceFile;
//!
//! let config = Config::load(None).expect("Failed to load config");
//! let numbering = load_aux(Path::new("main.aux")).expect("Failed to read aux");
//! let sources = vec![SourceFile::load(Path::new("main.tex")).expect("Failed to read source")];
//!
//! let analysis = analyze(&sources, Some(&numbering), &config.macros(), config.unresolved)
//!     .expect("Analysis failed");
//! for violation in &analysis.validation.violations {
//!     println!("{} cites {}", violation.source, violation.target);
//! }
//! ```

pub mod aux;
pub mod config;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod extract;
pub mod formatters;
pub mod graph;
pub mod logging;
pub mod order;
pub mod pipeline;
pub mod source;
pub mod suggest;
pub mod ui;
pub mod validate;
