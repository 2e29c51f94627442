//! Sections command: which sections lean on which

use anyhow::{Context, Result};

use texdag::formatters::format_sections;
use texdag::graph::collapse::collapse;
use texdag::pipeline::analyze;

use super::{InputArgs, OutputFormat};

pub fn cmd_sections(input: &InputArgs, depth: usize, format: OutputFormat) -> Result<()> {
    let inputs = input.load()?;
    if inputs.numbering.is_none() {
        eprintln!("warning: no aux file given, every label is unnumbered");
    }
    let analysis = analyze(
        &inputs.sources,
        inputs.numbering.as_ref(),
        &inputs.config.macros(),
        inputs.config.unresolved,
    )?;

    let edges = collapse(&analysis.graph, &analysis.positions, depth);
    match format {
        OutputFormat::Text => println!("{}", format_sections(&edges, depth)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&edges).context("Failed to serialize sections")?
        ),
    }
    Ok(())
}
