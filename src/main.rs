//! CLI entry point and command handlers for texdag.

mod cmd;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

use cmd::{InputArgs, OutputFormat};

#[derive(Parser)]
#[command(name = "texdag")]
#[command(version)]
#[command(about = "Check that LaTeX cross-references respect the document's dependency order", long_about = None)]
#[command(
    after_help = "GETTING STARTED:\n    texdag check main.aux main.tex    Check citations against the compiled numbering\n    texdag config --validate          Validate texdag.md in the current directory"
)]
struct Cli {
    /// Print findings only
    #[arg(long, short, global = true)]
    quiet: bool,
    /// Increase log output on stderr (-v debug, -vv trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check citations against the document order
    Check {
        #[command(flatten)]
        input: InputArgs,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
        /// Treat warnings (unresolved references, parse problems) as failures
        #[arg(long)]
        strict: bool,
    },
    /// Print the dependency graph as JSON
    Graph {
        #[command(flatten)]
        input: InputArgs,
        /// Keep labels that neither cite nor are cited
        #[arg(long)]
        include_isolated: bool,
    },
    /// Summarize dependencies between numbered sections
    Sections {
        #[command(flatten)]
        input: InputArgs,
        /// Number of leading position components that identify a section
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u16).range(1..))]
        depth: u16,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Show the merged configuration
    Config {
        /// Config file instead of texdag.md
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,
        /// Validate config semantically (check macros, aux and source paths)
        #[arg(long)]
        validate: bool,
    },
    /// Show version information (with --verbose, build information too)
    Version,
    /// Generate shell completion script
    Completion {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    // Deeply nested documents recurse in cycle detection; give the work
    // thread the 8 MB Linux default on every platform.
    const STACK_SIZE: usize = 8 * 1024 * 1024; // 8 MB

    let thread = std::thread::Builder::new()
        .stack_size(STACK_SIZE)
        .spawn(run)
        .expect("failed to spawn main thread");

    match thread.join() {
        Ok(result) => result,
        Err(payload) => std::panic::resume_unwind(payload),
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    texdag::logging::init(cli.verbose);
    let quiet = cli.quiet || texdag::ui::is_quiet();

    match cli.command {
        Commands::Check {
            input,
            format,
            strict,
        } => cmd::check::cmd_check(&input, format, strict, quiet),
        Commands::Graph {
            input,
            include_isolated,
        } => cmd::graph::cmd_graph(&input, include_isolated),
        Commands::Sections {
            input,
            depth,
            format,
        } => cmd::sections::cmd_sections(&input, usize::from(depth), format),
        Commands::Config { config, validate } => {
            if validate {
                cmd::config::cmd_config_validate(config.as_deref())
            } else {
                cmd::config::cmd_config_show(config.as_deref())
            }
        }
        Commands::Version => cmd_version(cli.verbose > 0),
        Commands::Completion { shell } => cmd_completion(shell),
    }
}

fn cmd_version(verbose: bool) -> Result<()> {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    println!("texdag {}", VERSION);

    if verbose {
        const GIT_SHA: &str = env!("GIT_SHA");
        const BUILD_DATE: &str = env!("BUILD_DATE");
        println!("commit: {}", GIT_SHA);
        println!("built: {}", BUILD_DATE);
    }

    Ok(())
}

fn cmd_completion(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "texdag", &mut io::stdout());
    Ok(())
}
