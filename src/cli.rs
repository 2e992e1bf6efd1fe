//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::history::Cadence;

/// Top-level CLI parser for `archdrift`.
#[derive(Debug, Parser)]
#[command(
    name = "archdrift",
    version,
    about = "Track architectural complexity of a service across its git history"
)]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Re-scan a repository at historical commits and emit a CSV time
    /// series of dependencies, endpoints, and cross-service calls.
    Analyze {
        /// Path to the service repository (must be a git work tree).
        repo_path: PathBuf,
        /// Path of the CSV file to write.
        output_path: PathBuf,
        /// Snapshot cadence.
        #[arg(long, value_enum, default_value_t = Cadence::Monthly)]
        frequency: Cadence,
        /// Number of period boundaries to walk back.
        #[arg(long, default_value_t = 24, value_parser = clap::value_parser!(u32).range(1..))]
        periods: u32,
        /// Collapse adjacent periods that resolve to the same commit into
        /// one row.
        #[arg(long)]
        collapse_duplicates: bool,
        /// Rewrite `{id}`, `:id`, and `<id>` path placeholders to one
        /// canonical token before endpoints are deduplicated.
        #[arg(long)]
        normalize_path_params: bool,
    },
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Command};
    use crate::history::Cadence;

    #[test]
    fn parses_analyze_with_defaults() {
        let cli = Cli::parse_from(["archdrift", "analyze", "/svc", "out.csv"]);
        let Command::Analyze { frequency, periods, collapse_duplicates, .. } = cli.command;
        assert_eq!(frequency, Cadence::Monthly);
        assert_eq!(periods, 24);
        assert!(!collapse_duplicates);
    }

    #[test]
    fn parses_weekly_frequency_and_periods() {
        let cli = Cli::parse_from([
            "archdrift",
            "analyze",
            "/svc",
            "out.csv",
            "--frequency",
            "weekly",
            "--periods",
            "4",
        ]);
        let Command::Analyze { frequency, periods, .. } = cli.command;
        assert_eq!(frequency, Cadence::Weekly);
        assert_eq!(periods, 4);
    }

    #[test]
    fn rejects_zero_periods() {
        let result =
            Cli::try_parse_from(["archdrift", "analyze", "/svc", "out.csv", "--periods", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_missing_output_path() {
        let result = Cli::try_parse_from(["archdrift", "analyze", "/svc"]);
        assert!(result.is_err());
    }
}
