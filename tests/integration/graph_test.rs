//! `texdag graph` and `texdag sections`

use serde_json::json;

use crate::common::{assert_exit, json, stderr, stdout};
use crate::support::builders::DocumentBuilder;
use crate::support::harness::TestHarness;

#[test]
fn test_graph_export_of_paper() {
    let harness = TestHarness::with_fixtures(&["paper.tex", "paper.aux", "texdag.md"]);
    let output = harness.run(&["graph", "paper.aux", "paper.tex"]);

    assert_exit(&output, 0);
    let graph = json(&output);
    let nodes: Vec<&str> = graph["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["name"].as_str().unwrap())
        .collect();
    assert_eq!(nodes.len(), 9);
    assert!(!nodes.contains(&"fig:plot"));

    let edges = graph["edges"].as_array().unwrap();
    assert_eq!(edges.len(), 6);
    assert!(edges.contains(&json!({"source": "def:2", "target": "def:4", "forward": true})));
    assert!(edges.contains(
        &json!({"source": "prop:backcor", "target": "cor:back1", "forward": false})
    ));

    let backcor = graph["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .find(|n| n["name"] == "prop:backcor")
        .unwrap();
    assert_eq!(backcor["category"], "prop");
    assert_eq!(backcor["position"], json!({"numbered": [8]}));
}

#[test]
fn test_graph_isolated_labels() {
    let harness = TestHarness::new();
    DocumentBuilder::new()
        .statement("defn", "def:a", "1", "")
        .statement("lemma", "lem:b", "2", r"\ref{def:a}")
        .statement("remark", "rem:c", "3", "Nothing cited here.")
        .write_to(harness.path(), "main");

    let names = |output: &std::process::Output| -> Vec<String> {
        json(output)["nodes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n["name"].as_str().unwrap().to_string())
            .collect()
    };

    let default = harness.run(&["graph", "main.aux", "main.tex"]);
    assert_exit(&default, 0);
    assert_eq!(names(&default), vec!["def:a", "lem:b"]);

    let all = harness.run(&["graph", "main.aux", "main.tex", "--include-isolated"]);
    assert_eq!(names(&all), vec!["def:a", "lem:b", "rem:c"]);
}

#[test]
fn test_graph_fails_on_duplicate_position() {
    let harness = TestHarness::new();
    harness.write("main.tex", "\\label{lem:a}\n\\label{lem:b}\n");
    harness.write(
        "main.aux",
        "\\newlabel{lem:a}{{2.1}{3}}\n\\newlabel{lem:b}{{2.1}{3}}\n",
    );

    let output = harness.run(&["graph", "main.aux", "main.tex"]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("2.1 is held by lem:a, lem:b"), "{}", err);
}

fn two_chapters(harness: &TestHarness) {
    DocumentBuilder::new()
        .statement("defn", "def:a", "1.1", "")
        .statement("defn", "def:b", "1.2", r"\fref{thm:d}")
        .statement("lemma", "lem:c", "2.1", r"\ref{def:a} \ref{def:b}")
        .statement("theorem", "thm:d", "2.2", r"\reflem{lem:c} \ref{def:a}")
        .write_to(harness.path(), "book");
}

#[test]
fn test_sections_text() {
    let harness = TestHarness::new();
    two_chapters(&harness);

    let output = harness.run(&["sections", "book.aux", "book.tex", "--future-refs", "fref"]);
    assert_exit(&output, 0);
    let out = stdout(&output);
    assert!(out.contains("Section dependencies (depth 1)"), "{}", out);
    assert!(out.contains("2 → 1  3 citation(s)"), "{}", out);
    assert!(out.contains("1 → 2  1 citation(s), 1 forward"), "{}", out);
}

#[test]
fn test_sections_json_at_depth_two() {
    let harness = TestHarness::new();
    two_chapters(&harness);

    let output = harness.run(&[
        "sections",
        "book.aux",
        "book.tex",
        "--future-refs",
        "fref",
        "--depth",
        "2",
        "--format",
        "json",
    ]);
    assert_exit(&output, 0);
    let edges = json(&output);
    // Every label is its own section at full depth
    assert_eq!(edges.as_array().unwrap().len(), 5);
    assert_eq!(
        edges[0],
        json!({
            "source": {"numbered": [1, 2]},
            "target": {"numbered": [2, 2]},
            "count": 1,
            "forward": 1
        })
    );
}

#[test]
fn test_sections_without_aux_warns() {
    let harness = TestHarness::new();
    harness.write("main.tex", "\\label{lem:a} \\ref{lem:b}\n\\label{lem:b}\n");

    let output = harness.run(&["sections", "main.tex"]);
    assert_exit(&output, 0);
    assert!(stderr(&output).contains("no aux file given"));
    assert!(stdout(&output).contains("(no citations between sections)"));
}
