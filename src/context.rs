//! Service context bundling the port trait objects.

use std::path::Path;

use crate::adapters::live::clock::LiveClock;
use crate::adapters::live::git::LiveGitRepo;
use crate::ports::clock::Clock;
use crate::ports::git::GitRepo;

/// Bundles the port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations.
pub struct ServiceContext {
    /// Clock for obtaining the current time.
    pub clock: Box<dyn Clock>,
    /// Git repository for version-control operations.
    pub git: Box<dyn GitRepo>,
}

impl ServiceContext {
    /// Creates a live context with the system clock and a git adapter
    /// rooted at the given repository path.
    #[must_use]
    pub fn live(repo_root: &Path) -> Self {
        Self { clock: Box::new(LiveClock), git: Box::new(LiveGitRepo::new(repo_root)) }
    }

    /// Creates a context from explicit adapters; used by tests to
    /// substitute fakes.
    #[must_use]
    pub fn with_adapters(clock: Box<dyn Clock>, git: Box<dyn GitRepo>) -> Self {
        Self { clock, git }
    }
}
