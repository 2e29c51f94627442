//! Config command for showing and validating texdag configuration

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use texdag::config::Config;

/// Print the merged configuration as YAML frontmatter.
pub fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;
    let yaml = serde_yaml::to_string(&config).context("Failed to serialize config")?;
    println!("---\n{}---", yaml);
    Ok(())
}

/// Validate config semantically and report issues
pub fn cmd_config_validate(config_path: Option<&Path>) -> Result<()> {
    println!("{}", "Validating texdag configuration...".bold());
    println!();

    let config = match Config::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("  {} {:#}", "✗".red(), e);
            println!();
            println!("{} Found 1 error(s)", "✗".red());
            std::process::exit(1);
        }
    };
    println!("  {} macros and categories are well-formed", "✓".green());

    let mut warnings = 0;
    warnings += check_aux(&config);
    warnings += check_sources(&config)?;

    println!();
    if warnings == 0 {
        println!("{} Configuration is valid", "✓".green());
    } else {
        println!(
            "{} Configuration valid with {} warning(s)",
            "✓".green(),
            warnings
        );
    }

    Ok(())
}

/// Check the configured aux file exists
fn check_aux(config: &Config) -> usize {
    let Some(aux) = config.aux_path() else {
        println!(
            "  {} no aux file configured, positions will follow source order",
            "ℹ".blue()
        );
        return 0;
    };
    if aux.exists() {
        println!("  {} {} (aux)", "✓".green(), aux.display());
        0
    } else {
        println!(
            "  {} {} not found (aux) - compile the document first",
            "⚠".yellow(),
            aux.display()
        );
        1
    }
}

/// Check every configured source pattern resolves to existing files
fn check_sources(config: &Config) -> Result<usize> {
    if config.sources.is_empty() {
        println!(
            "  {} no sources configured, pass .tex files on the command line",
            "ℹ".blue()
        );
        return Ok(0);
    }

    let mut warnings = 0;
    for path in config.source_paths()? {
        if path.exists() {
            println!("  {} {} (source)", "✓".green(), path.display());
        } else {
            println!("  {} {} not found (source)", "⚠".yellow(), path.display());
            warnings += 1;
        }
    }
    Ok(warnings)
}
