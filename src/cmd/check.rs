//! Check command: report ordering violations, cycles and a suggested order

use anyhow::{Context, Result};

use texdag::formatters::format_check_report;
use texdag::pipeline::{analyze, Analysis};

use super::{InputArgs, OutputFormat};

/// Run the full analysis and print the report. Exits with status 1 when
/// violations or cycles were found, or any warning under `--strict`.
pub fn cmd_check(input: &InputArgs, format: OutputFormat, strict: bool, quiet: bool) -> Result<()> {
    let inputs = input.load()?;
    let analysis = analyze(
        &inputs.sources,
        inputs.numbering.as_ref(),
        &inputs.config.macros(),
        inputs.config.unresolved,
    )?;

    match format {
        OutputFormat::Text => println!("{}", format_check_report(&analysis, quiet)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&analysis.report())
                .context("Failed to serialize report")?
        ),
    }

    if !passes(&analysis, strict) {
        std::process::exit(1);
    }
    Ok(())
}

fn passes(analysis: &Analysis, strict: bool) -> bool {
    analysis.validation.is_clean() && !(strict && !analysis.warnings.is_empty())
}
