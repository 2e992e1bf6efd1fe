//! Core library for the `archdrift` CLI.
//!
//! Measures how the architectural complexity of a single service evolves
//! over time: historical commits are selected at a fixed cadence,
//! materialized one at a time into the working tree, and statically
//! scanned for declared dependencies, exposed API endpoints, and
//! outbound cross-service calls.

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod context;
pub mod emit;
pub mod error;
pub mod extract;
pub mod history;
pub mod ports;
pub mod registry;
pub mod snapshot;

use error::AnalyzeError;

/// Run the parsed command.
///
/// # Errors
///
/// Returns an [`AnalyzeError`] when the command fails; the caller maps
/// it to the process exit code.
pub fn run(command: &cli::Command) -> Result<(), AnalyzeError> {
    commands::dispatch(command)
}
