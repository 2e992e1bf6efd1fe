//! Error taxonomy for an analysis run.
//!
//! Fatal conditions abort the whole run before any output is written and
//! each carries a distinct process exit code. Recoverable conditions
//! (a malformed manifest, an unreadable source file) never reach this
//! type: they are absorbed at per-file scope by the extractors.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error type returned across port boundaries.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;

/// Fatal errors that abort an analysis run.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The repository path does not exist on disk.
    #[error("repository path not found: {0}")]
    RepoNotFound(PathBuf),

    /// The repository path exists but is not a git work tree.
    #[error("not a git repository: {0}")]
    NotARepository(PathBuf),

    /// None of the candidate branch names exist in the repository.
    #[error("no candidate branch found (tried: {})", .tried.join(", "))]
    BranchNotFound {
        /// Branch names that were tried, in preference order.
        tried: Vec<String>,
    },

    /// The resolved branch has no commits.
    #[error("branch '{0}' has no commits")]
    EmptyHistory(String),

    /// Checking out a selected commit failed; the working tree can no
    /// longer be trusted for this run.
    #[error("failed to check out {commit}: {reason}")]
    CheckoutFailed {
        /// Commit hash that could not be checked out.
        commit: String,
        /// Underlying git failure.
        reason: PortError,
    },

    /// Restoring the original reference failed; the working tree is left
    /// in an unexpected state.
    #[error("failed to restore original ref '{reference}': {reason}")]
    RestoreFailed {
        /// Reference recorded before the first checkout.
        reference: String,
        /// Underlying git failure.
        reason: PortError,
    },

    /// A git query (branch resolution, commit listing) failed.
    #[error("git command failed: {0}")]
    Git(PortError),

    /// Writing the output file failed.
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing a CSV row failed.
    #[error("failed to write output: {0}")]
    Csv(#[from] csv::Error),

    /// The run was interrupted by a signal before completing.
    #[error("interrupted before completion; no output written")]
    Interrupted,
}

impl AnalyzeError {
    /// Process exit code for this error.
    ///
    /// Codes are stable so callers can script against them. Code 2 is
    /// reserved for argument parsing (clap's default).
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::RepoNotFound(_) => 10,
            Self::NotARepository(_) => 11,
            Self::BranchNotFound { .. } => 12,
            Self::EmptyHistory(_) => 13,
            Self::CheckoutFailed { .. } => 14,
            Self::RestoreFailed { .. } => 15,
            Self::Git(_) => 16,
            Self::Io(_) | Self::Csv(_) => 17,
            Self::Interrupted => 18,
        }
    }
}

/// A manifest that could not be parsed.
///
/// Always absorbed at the scope of the one manifest file: the ecosystem
/// contributes an empty dependency set for that snapshot and extraction
/// continues.
#[derive(Debug, Error)]
pub enum ManifestParseError {
    /// The manifest could not be read from disk.
    #[error("unreadable manifest: {0}")]
    Io(#[from] std::io::Error),

    /// The manifest is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The manifest is structurally malformed for its format.
    #[error("malformed manifest: {0}")]
    Malformed(String),
}
