//! End-to-end analysis through the library API

use crate::support::builders::DocumentBuilder;
use crate::support::fixtures::load_fixture;

use pretty_assertions::assert_eq;
use texdag::aux::parse_aux;
use texdag::config::{Config, UnresolvedPolicy};
use texdag::error::AnalysisError;
use texdag::extract::MacroConfig;
use texdag::order::Position;
use texdag::pipeline::{analyze, Analysis};
use texdag::source::SourceFile;
use texdag::suggest::positions_from_order;
use texdag::validate::validate;

fn theorem_macros() -> MacroConfig {
    let config = Config {
        theorem_labels: vec!["lem".to_string(), "thm".to_string()],
        ..Config::default()
    };
    config.macros()
}

fn run(doc: &DocumentBuilder, macros: &MacroConfig) -> Analysis {
    let numbering = parse_aux(doc.aux());
    analyze(
        &[SourceFile::new("doc.tex", doc.tex())],
        Some(&numbering),
        macros,
        UnresolvedPolicy::Warn,
    )
    .expect("analysis failed")
}

fn names(order: &Option<Vec<String>>) -> Option<Vec<&str>> {
    order
        .as_ref()
        .map(|o| o.iter().map(String::as_str).collect())
}

#[test]
fn test_abc_scenario_in_order() {
    let doc = DocumentBuilder::new()
        .statement("defn", "def:A", "1.1", "A thing.")
        .statement("lemma", "lem:B", "1.2", "A lemma.")
        .proof(r"By \refdef{def:A}.")
        .statement("theorem", "thm:C", "1.3", r"Using \reflem{lem:B}.");

    let analysis = run(&doc, &theorem_macros());
    assert!(analysis.validation.violations.is_empty());
    assert!(!analysis.validation.unresolvable);
    assert_eq!(
        names(&analysis.suggestion),
        Some(vec!["def:A", "lem:B", "thm:C"])
    );
}

#[test]
fn test_abc_scenario_mutated() {
    let doc = DocumentBuilder::new()
        .statement("defn", "def:A", "1.1", "A thing.")
        .statement("lemma", "lem:B", "1.2", "A lemma.")
        .proof(r"By \refdef{def:A} and \refthm{thm:C}.")
        .statement("theorem", "thm:C", "1.3", "Standalone.");

    let analysis = run(&doc, &theorem_macros());
    let violations = &analysis.validation.violations;
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].source, "lem:B");
    assert_eq!(violations[0].target, "thm:C");
    assert_eq!(violations[0].source_position, Position::Numbered(vec![1, 2]));
    assert_eq!(violations[0].target_position, Position::Numbered(vec![1, 3]));
    assert_eq!(
        names(&analysis.suggestion),
        Some(vec!["def:A", "thm:C", "lem:B"])
    );
}

#[test]
fn test_three_cycle_has_no_suggestion() {
    let doc = DocumentBuilder::new()
        .statement("lemma", "lem:A", "1", r"See \reflem{lem:B}.")
        .statement("lemma", "lem:B", "2", r"See \reflem{lem:C}.")
        .statement("lemma", "lem:C", "3", r"See \reflem{lem:A}.");

    let analysis = run(&doc, &MacroConfig::default());
    assert!(analysis.validation.unresolvable);
    assert_eq!(analysis.validation.cycles.len(), 1);
    assert_eq!(
        analysis.validation.cycles[0].members,
        vec!["lem:A", "lem:B", "lem:C"]
    );
    assert_eq!(analysis.suggestion, None);
}

#[test]
fn test_forward_macro_exempts_citation() {
    let macros = MacroConfig {
        future_references: ["fref".to_string()].into_iter().collect(),
        ..MacroConfig::default()
    };
    let doc = DocumentBuilder::new()
        .statement("defn", "def:A", "1", r"Compare \fref{def:B}.")
        .statement("defn", "def:B", "2", r"Builds on \ref{def:A}.");

    let analysis = run(&doc, &macros);
    assert!(analysis.validation.is_clean());
    let forward: Vec<bool> = analysis.graph.edges().iter().map(|e| e.forward).collect();
    assert_eq!(forward, vec![true, false]);
}

#[test]
fn test_excluded_category_never_becomes_node() {
    let doc = DocumentBuilder::new()
        .statement("lemma", "lem:A", "1", r"As plotted in \ref{fig:plot}.")
        .statement("figure", "fig:plot", "1", "");

    let analysis = run(&doc, &MacroConfig::default());
    assert!(analysis.graph.index_of("fig:plot").is_none());
    assert!(analysis.warnings.is_empty());
    assert!(analysis.validation.is_clean());
}

#[test]
fn test_no_violations_iff_position_order_is_topological() {
    // Without forward edges, a clean validation means the current order is
    // already a valid suggestion.
    let doc = DocumentBuilder::new()
        .statement("defn", "def:a", "1", "")
        .statement("lemma", "lem:b", "2", r"\ref{def:a}")
        .statement("lemma", "lem:c", "3", r"\ref{def:a} \reflem{lem:b}")
        .statement("theorem", "thm:d", "4", r"\reflem{lem:c}");

    let analysis = run(&doc, &MacroConfig::default());
    assert!(analysis.validation.violations.is_empty());
    assert_eq!(
        names(&analysis.suggestion),
        Some(vec!["def:a", "lem:b", "lem:c", "thm:d"])
    );

    // Conversely, positions that are not a topological order of the same
    // graph produce violations
    let position = |name: &str| analysis.graph.index_of(name).unwrap();
    let mut swapped = analysis.positions.clone();
    swapped.swap(position("lem:b"), position("lem:c"));
    let found: Vec<(String, String)> = validate(&analysis.graph, &swapped)
        .violations
        .into_iter()
        .map(|v| (v.source, v.target))
        .collect();
    assert_eq!(found, vec![("lem:c".to_string(), "lem:b".to_string())]);

    let mut reversed = analysis.positions.clone();
    reversed.reverse();
    assert_eq!(validate(&analysis.graph, &reversed).violations.len(), 4);
}

#[test]
fn test_suggested_order_is_a_fixpoint() {
    let doc = DocumentBuilder::new()
        .statement("theorem", "thm:main", "1", r"\reflem{lem:x} \reflem{lem:y}")
        .statement("lemma", "lem:y", "2", r"\reflem{lem:x} \refdef{def:z}")
        .statement("lemma", "lem:x", "3", "")
        .statement("defn", "def:z", "4", "");

    let analysis = run(&doc, &MacroConfig::default());
    assert_eq!(analysis.validation.violations.len(), 4);
    let order = analysis.suggestion.clone().expect("no cycle here");
    assert_eq!(order, vec!["lem:x", "def:z", "lem:y", "thm:main"]);

    let reordered = positions_from_order(&analysis.graph, &order);
    assert!(validate(&analysis.graph, &reordered).violations.is_empty());
}

#[test]
fn test_analysis_is_deterministic() {
    let sources = vec![SourceFile::new("paper.tex", load_fixture("paper.tex"))];
    let numbering = parse_aux(&load_fixture("paper.aux"));
    let config = Config::parse(&load_fixture("texdag.md")).unwrap();

    let render = || {
        let analysis = analyze(
            &sources,
            Some(&numbering),
            &config.macros(),
            config.unresolved,
        )
        .unwrap();
        (
            serde_json::to_string(&analysis.report()).unwrap(),
            serde_json::to_string(&analysis.graph.export(&analysis.positions, true)).unwrap(),
        )
    };
    assert_eq!(render(), render());
}

#[test]
fn test_full_document_fixture() {
    let sources = vec![SourceFile::new("paper.tex", load_fixture("paper.tex"))];
    let numbering = parse_aux(&load_fixture("paper.aux"));
    let config = Config::parse(&load_fixture("texdag.md")).unwrap();
    let analysis = analyze(
        &sources,
        Some(&numbering),
        &config.macros(),
        config.unresolved,
    )
    .unwrap();

    let edges: Vec<(&str, &str, bool)> = analysis
        .graph
        .edges()
        .iter()
        .map(|e| {
            (
                analysis.graph.name(e.source),
                analysis.graph.name(e.target),
                e.forward,
            )
        })
        .collect();
    for expected in [
        ("cor:back1", "def:1", false),
        ("thm:back3", "def:3", false),
        ("prop:backcor", "cor:back1", false),
        ("lem:bar", "def:2", false),
        ("lem:foo", "lem:bar", false),
        ("def:2", "def:4", true),
    ] {
        assert!(edges.contains(&expected), "missing edge {:?}", expected);
    }
    assert_eq!(edges.len(), 6);

    let violations: Vec<(&str, &str)> = analysis
        .validation
        .violations
        .iter()
        .map(|v| (v.source.as_str(), v.target.as_str()))
        .collect();
    assert_eq!(violations, vec![("prop:backcor", "cor:back1")]);

    let order = analysis.suggestion.as_ref().unwrap();
    let rank = |name: &str| order.iter().position(|n| n == name).unwrap();
    assert!(rank("cor:back1") < rank("prop:backcor"));
    assert!(analysis.warnings.is_empty());
}

#[test]
fn test_self_reference_is_not_a_cycle() {
    let doc = DocumentBuilder::new().statement("lemma", "lem:self", "1", r"\reflem{lem:self}");
    let analysis = run(&doc, &MacroConfig::default());
    assert!(analysis.graph.edges().is_empty());
    assert_eq!(names(&analysis.suggestion), Some(vec!["lem:self"]));
}

#[test]
fn test_duplicate_definition_across_files() {
    let sources = vec![
        SourceFile::new("ch1.tex", "\\label{lem:a}\n"),
        SourceFile::new("ch2.tex", "text\n\\label{lem:a}\n"),
    ];
    let err = analyze(&sources, None, &MacroConfig::default(), UnresolvedPolicy::Warn)
        .unwrap_err();
    let message = err.to_string();
    assert!(matches!(err, AnalysisError::DuplicateLabel(_)));
    assert!(message.contains("ch1.tex:1:1"), "{}", message);
    assert!(message.contains("ch2.tex:2:1"), "{}", message);
}

#[test]
fn test_unnumbered_labels_follow_numbered_ones() {
    let doc = DocumentBuilder::new()
        .unnumbered("lemma", "lem:new", r"\reflem{lem:old}")
        .statement("lemma", "lem:old", "1", "");
    let analysis = run(&doc, &MacroConfig::default());
    assert_eq!(analysis.position_of("lem:new"), Some(&Position::Unnumbered(0)));
    assert!(analysis.validation.violations.is_empty());
}
