//! Command-line interface module for doctidy.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Configuration loading
//! - Dispatching to a real or dry run
//! - Printing the final report

use crate::category::CategoryRegistry;
use crate::config::Config;
use crate::error::ReorgError;
use crate::output::OutputFormatter;
use crate::reorganize::Reorganizer;
use crate::report::RunReport;
use clap::Parser;
use std::path::{Path, PathBuf};

/// Consolidate docs/ into the decorated category directories of the container.
///
/// Run without arguments from the workspace root.
#[derive(Debug, Clone, Parser)]
#[command(name = "doctidy", version, about)]
pub struct Cli {
    /// Workspace root holding the source and container directories
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Configuration file (defaults to .doctidyrc.toml, then ~/.config/doctidy/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Show what would be moved without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run report as JSON instead of the text summary
    #[arg(long)]
    pub json: bool,
}

/// Represents a CLI command to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorgCommand {
    /// Reorganize the workspace.
    Reorganize {
        /// If true, simulate the operation without making changes.
        dry_run: bool,
    },
}

impl Cli {
    pub fn command(&self) -> ReorgCommand {
        ReorgCommand::Reorganize {
            dry_run: self.dry_run,
        }
    }
}

/// Runs the CLI application for parsed arguments.
///
/// Per-document failures do not make this fail; they are counted in the
/// returned report. With `--json`, a report that cannot be serialized is
/// an error.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use doctidy::cli::{Cli, run_cli};
///
/// let cli = Cli::parse_from(["doctidy", "--dry-run"]);
/// match run_cli(&cli) {
///     Ok(report) => println!("{} documents", report.moved_count),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(cli: &Cli) -> Result<RunReport, ReorgError> {
    let output = if cli.json {
        OutputFormatter::quiet()
    } else {
        OutputFormatter::new()
    };

    let report = run_cli_with_config(cli.command(), &cli.root, cli.config.as_deref(), output)?;

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        print_summary(&report, output);
    }

    Ok(report)
}

/// Runs a command against `root` with an optional configuration file.
///
/// # Arguments
///
/// * `command` - The command to execute
/// * `root` - The workspace root
/// * `config_path` - Optional path to configuration file
/// * `output` - Where progress is printed
pub fn run_cli_with_config(
    command: ReorgCommand,
    root: &Path,
    config_path: Option<&Path>,
    output: OutputFormatter,
) -> Result<RunReport, ReorgError> {
    let config = Config::load(config_path, root)?;
    let registry = CategoryRegistry::builtin();
    let reorganizer = Reorganizer::new(root, &config, &registry, output)?;

    match command {
        ReorgCommand::Reorganize { dry_run: true } => reorganizer.dry_run(),
        ReorgCommand::Reorganize { dry_run: false } => reorganizer.run(),
    }
}

/// Prints the final counts. Always includes the error count.
fn print_summary(report: &RunReport, output: OutputFormatter) {
    if report.dry_run {
        return;
    }
    let summary = report.summary();

    output.banner("Consolidation Complete!");
    output.plain(&format!("  Moved:            {}", summary.moved));
    output.plain(&format!("  Errors:           {}", summary.errors));
    output.plain(&format!("  Renamed dirs:     {}", summary.renamed_dirs));
    output.plain(&format!("  Pruned dirs:      {}", summary.pruned_dirs));
    output.plain(&format!(
        "  Source removed:   {}",
        if summary.root_removed { "yes" } else { "no" }
    ));

    if summary.errors > 0 {
        output.warning("Some items could not be processed. Please review errors above.");
        for failure in &report.failures {
            output.error(&failure.reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_uses_defaults() {
        let cli = Cli::parse_from(["doctidy"]);
        assert_eq!(cli.root, PathBuf::from("."));
        assert!(cli.config.is_none());
        assert_eq!(cli.command(), ReorgCommand::Reorganize { dry_run: false });
        assert!(!cli.json);
    }

    #[test]
    fn test_flags_parse() {
        let cli = Cli::parse_from([
            "doctidy",
            "--root",
            "/srv/repo",
            "--config",
            "tidy.toml",
            "--dry-run",
            "--json",
        ]);
        assert_eq!(cli.root, PathBuf::from("/srv/repo"));
        assert_eq!(cli.config, Some(PathBuf::from("tidy.toml")));
        assert_eq!(cli.command(), ReorgCommand::Reorganize { dry_run: true });
        assert!(cli.json);
    }
}
