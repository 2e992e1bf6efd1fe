//! Git repository port for version-control operations.
//!
//! The version-control tool is an external collaborator: it can list
//! commits on a branch, check out a tree, and report the current ref.
//! Abstracting it behind a trait keeps the selection and checkout logic
//! testable without a real repository.

use chrono::{DateTime, Utc};

use crate::error::PortError;

/// One commit on a branch: hash plus committer date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// Full commit hash.
    pub hash: String,
    /// Committer date in UTC.
    pub date: DateTime<Utc>,
}

/// Provides access to a git repository.
pub trait GitRepo: Send + Sync {
    /// Returns `true` if the adapter's root is inside a git work tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the git command itself cannot be run.
    fn is_repository(&self) -> Result<bool, PortError>;

    /// Returns `true` if the named branch exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the git command itself cannot be run.
    fn branch_exists(&self, name: &str) -> Result<bool, PortError>;

    /// Lists all commits reachable from the named branch, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be read or its output cannot
    /// be parsed.
    fn list_commits(&self, branch: &str) -> Result<Vec<CommitInfo>, PortError>;

    /// Returns the current ref: the short branch name when HEAD is on a
    /// branch, otherwise the detached commit hash.
    ///
    /// # Errors
    ///
    /// Returns an error if HEAD cannot be resolved.
    fn current_ref(&self) -> Result<String, PortError>;

    /// Checks out the given reference into the working tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the checkout fails; the working tree state is
    /// then undefined and the caller must treat the failure as fatal.
    fn checkout(&self, reference: &str) -> Result<(), PortError>;
}
