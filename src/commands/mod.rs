//! Command dispatch and handlers.

pub mod analyze;

use crate::cli::Command;
use crate::context::ServiceContext;
use crate::error::AnalyzeError;

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns the handler's [`AnalyzeError`] unchanged so the binary can
/// map it to its exit code.
pub fn dispatch(command: &Command) -> Result<(), AnalyzeError> {
    match command {
        Command::Analyze {
            repo_path,
            output_path,
            frequency,
            periods,
            collapse_duplicates,
            normalize_path_params,
        } => {
            let ctx = ServiceContext::live(repo_path);
            let options = analyze::AnalyzeOptions {
                repo_path: repo_path.clone(),
                output_path: output_path.clone(),
                frequency: *frequency,
                periods: *periods,
                collapse_duplicates: *collapse_duplicates,
                normalize_path_params: *normalize_path_params,
            };
            analyze::run(&ctx, &options)
        }
    }
}
