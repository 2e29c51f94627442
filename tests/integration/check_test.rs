//! `texdag check` end to end

use crate::common::{assert_exit, json, stderr, stdout};
use crate::support::builders::DocumentBuilder;
use crate::support::harness::TestHarness;

const PAPER: &[&str] = &["paper.tex", "paper.aux", "texdag.md"];

#[test]
fn test_check_reports_backward_violation() {
    let harness = TestHarness::with_fixtures(PAPER);
    let output = harness.run(&["check", "paper.aux", "paper.tex"]);

    assert_exit(&output, 1);
    let out = stdout(&output);
    assert!(
        out.contains("prop:backcor (8) cites cor:back1 (9)"),
        "missing violation:\n{}",
        out
    );
    assert!(out.contains("Violations (1)"));
    assert!(out.contains("✗ 1 violation(s)"));
    assert!(!out.contains("fig:plot"));
    assert!(!out.contains("lem:old"));
}

#[test]
fn test_check_json_report() {
    let harness = TestHarness::with_fixtures(PAPER);
    let output = harness.run(&["check", "paper.aux", "paper.tex", "--format", "json"]);

    assert_exit(&output, 1);
    let report = json(&output);
    assert_eq!(report["labels"], 9);
    assert_eq!(report["edges"], 6);
    assert_eq!(report["unresolvable"], false);

    let violations = report["violations"].as_array().unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0]["source"], "prop:backcor");
    assert_eq!(violations[0]["target"], "cor:back1");
    assert_eq!(violations[0]["location"]["line"], 76);

    let order: Vec<&str> = report["suggested_order"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["label"].as_str().unwrap())
        .collect();
    assert_eq!(
        order,
        vec![
            "def:1",
            "def:2",
            "def:3",
            "def:4",
            "lem:bar",
            "lem:foo",
            "thm:back3",
            "cor:back1",
            "prop:backcor",
        ]
    );
}

#[test]
fn test_check_output_is_deterministic() {
    let harness = TestHarness::with_fixtures(PAPER);
    let args = ["check", "paper.aux", "paper.tex", "--format", "json"];
    let first = harness.run(&args);
    let second = harness.run(&args);
    assert_eq!(first.stdout, second.stdout);

    let text_args = ["check", "paper.aux", "paper.tex"];
    assert_eq!(harness.run(&text_args).stdout, harness.run(&text_args).stdout);
}

#[test]
fn test_check_clean_document_passes() {
    let harness = TestHarness::new();
    DocumentBuilder::new()
        .statement("defn", "def:a", "1", "A thing.")
        .statement("lemma", "lem:b", "2", r"Uses \ref{def:a}.")
        .write_to(harness.path(), "main");

    let output = harness.run(&["check", "main.aux", "main.tex"]);
    assert_exit(&output, 0);
    assert!(stdout(&output).contains("✓ No ordering violations"));
}

#[test]
fn test_check_cycle_is_unresolvable() {
    let harness = TestHarness::new();
    DocumentBuilder::new()
        .statement("lemma", "lem:a", "1", r"\reflem{lem:b}")
        .statement("lemma", "lem:b", "2", r"\reflem{lem:c}")
        .statement("lemma", "lem:c", "3", r"\reflem{lem:a}")
        .write_to(harness.path(), "main");

    let output = harness.run(&["check", "main.aux", "main.tex", "--format", "json"]);
    assert_exit(&output, 1);
    let report = json(&output);
    assert_eq!(report["unresolvable"], true);
    assert!(report["suggested_order"].is_null());
    assert_eq!(report["cycles"][0]["members"].as_array().unwrap().len(), 3);

    let text = harness.run(&["check", "main.aux", "main.tex"]);
    let out = stdout(&text);
    assert!(out.contains("Cycles (1)"));
    assert!(out.contains("lem:a → lem:b → lem:c → lem:a"), "{}", out);
    assert!(out.contains("no valid order exists"));
}

#[test]
fn test_check_unresolved_policies() {
    let harness = TestHarness::new();
    DocumentBuilder::new()
        .statement("lemma", "lem:a", "1", r"See \ref{lem:missing}.")
        .write_to(harness.path(), "main");

    let warn = harness.run(&["check", "main.aux", "main.tex"]);
    assert_exit(&warn, 0);
    assert!(stdout(&warn).contains("Warnings (1)"));
    assert!(stdout(&warn).contains("lem:missing"));

    let strict = harness.run(&["check", "main.aux", "main.tex", "--strict"]);
    assert_exit(&strict, 1);

    let ignore = harness.run(&["check", "main.aux", "main.tex", "--unresolved", "ignore", "--strict"]);
    assert_exit(&ignore, 0);
    assert!(!stdout(&ignore).contains("lem:missing"));

    let error = harness.run(&["check", "main.aux", "main.tex", "--unresolved", "error"]);
    assert!(!error.status.success());
    let err = stderr(&error);
    assert!(err.contains("1 unresolved reference(s)"), "{}", err);
    assert!(err.contains("lem:missing"), "{}", err);
}

#[test]
fn test_check_duplicate_label_is_fatal() {
    let harness = TestHarness::new();
    harness.write("a.tex", "\\label{lem:x}\n");
    harness.write("b.tex", "\n\\label{lem:x}\n");

    let output = harness.run(&["check", "a.tex", "b.tex"]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("duplicate label definitions"), "{}", err);
    assert!(err.contains("lem:x defined at a.tex:1:1, b.tex:2:1"), "{}", err);
}

#[test]
fn test_check_quiet_prints_findings_only() {
    let harness = TestHarness::with_fixtures(PAPER);
    let output = harness.run(&["-q", "check", "paper.aux", "paper.tex"]);

    assert_exit(&output, 1);
    let out = stdout(&output);
    assert!(!out.contains("texdag check"));
    assert!(!out.contains("Suggested order"));
    assert!(out.contains("prop:backcor (8) cites cor:back1 (9)"));
}

#[test]
fn test_check_without_aux_uses_source_order() {
    let harness = TestHarness::with_fixtures(PAPER);
    let output = harness.run(&["check", "paper.tex", "--format", "json"]);

    // In source order cor:back1 precedes prop:backcor, so only the
    // forward reference remains and it is exempt
    assert_exit(&output, 0);
    let report = json(&output);
    assert!(report["violations"].as_array().unwrap().is_empty());
}

#[test]
fn test_check_with_json_macro_config() {
    let harness = TestHarness::with_fixtures(&["paper.tex", "paper.aux", "macros.json"]);
    let output = harness.run(&[
        "check",
        "--config",
        "macros.json",
        "paper.aux",
        "paper.tex",
        "--format",
        "json",
    ]);

    assert_exit(&output, 1);
    let report = json(&output);
    assert_eq!(report["violations"].as_array().unwrap().len(), 1);
}

#[test]
fn test_check_future_refs_from_command_line() {
    let harness = TestHarness::new();
    DocumentBuilder::new()
        .statement("defn", "def:a", "1", r"See \later{def:b}.")
        .statement("defn", "def:b", "2", "")
        .write_to(harness.path(), "main");

    let ordinary = harness.run(&["check", "main.aux", "main.tex", "--refs", "ref,later"]);
    assert_exit(&ordinary, 1);

    let forward = harness.run(&[
        "check",
        "main.aux",
        "main.tex",
        "--refs",
        "ref",
        "--future-refs",
        r"\later",
    ]);
    assert_exit(&forward, 0);
}

#[test]
fn test_check_sources_from_config() {
    let harness = TestHarness::with_fixtures(&["paper.tex", "paper.aux"]);
    harness.write(
        "texdag.md",
        "---\nreferences: ['\\ref', '\\reflem']\nfuture_references: ['\\fref']\ntheorem_labels: [lem, thm, prop, cor]\naux: paper.aux\nsources: ['*.tex']\n---\n",
    );

    let output = harness.run(&["check", "--format", "json"]);
    assert_exit(&output, 1);
    assert_eq!(json(&output)["violations"][0]["target"], "cor:back1");
}

#[test]
fn test_check_requires_sources() {
    let harness = TestHarness::new();
    let output = harness.run(&["check"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("No source files given"));
}
