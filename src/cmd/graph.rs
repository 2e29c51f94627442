//! Graph command: export the dependency graph for renderers

use anyhow::{Context, Result};

use texdag::pipeline::analyze;

use super::InputArgs;

/// Print the dependency graph as JSON. Nodes without any incident edge are
/// left out unless `include_isolated` is set.
pub fn cmd_graph(input: &InputArgs, include_isolated: bool) -> Result<()> {
    let inputs = input.load()?;
    let analysis = analyze(
        &inputs.sources,
        inputs.numbering.as_ref(),
        &inputs.config.macros(),
        inputs.config.unresolved,
    )?;

    let export = analysis
        .graph
        .export(&analysis.positions, include_isolated);
    println!(
        "{}",
        serde_json::to_string_pretty(&export).context("Failed to serialize graph")?
    );
    Ok(())
}
