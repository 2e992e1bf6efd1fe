//! Live git adapter using `git` CLI commands.

use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Utc};

use crate::error::PortError;
use crate::ports::git::{CommitInfo, GitRepo};

/// Live git adapter that shells out to the `git` CLI against a fixed
/// repository root.
pub struct LiveGitRepo {
    root: PathBuf,
}

impl LiveGitRepo {
    /// Creates an adapter rooted at the given repository path.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self { root: root.to_path_buf() }
    }

    /// Runs `git -C <root> <args>` and returns trimmed stdout on success.
    fn git(&self, args: &[&str]) -> Result<String, PortError> {
        let output = Command::new("git").arg("-C").arg(&self.root).args(args).output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("git {} failed: {}", args.join(" "), stderr.trim()).into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Runs a git command where a non-zero exit means "no", not failure.
    fn git_probe(&self, args: &[&str]) -> Result<bool, PortError> {
        let output = Command::new("git").arg("-C").arg(&self.root).args(args).output()?;
        Ok(output.status.success())
    }
}

impl GitRepo for LiveGitRepo {
    fn is_repository(&self) -> Result<bool, PortError> {
        self.git_probe(&["rev-parse", "--git-dir"])
    }

    fn branch_exists(&self, name: &str) -> Result<bool, PortError> {
        self.git_probe(&["rev-parse", "--verify", "--quiet", &format!("refs/heads/{name}")])
    }

    fn list_commits(&self, branch: &str) -> Result<Vec<CommitInfo>, PortError> {
        let stdout = self.git(&["log", "--format=%H\t%cI", branch])?;
        let mut commits = Vec::new();
        for line in stdout.lines().filter(|l| !l.is_empty()) {
            let (hash, date) = line
                .split_once('\t')
                .ok_or_else(|| format!("unexpected git log line: {line}"))?;
            let date = DateTime::parse_from_rfc3339(date)
                .map_err(|e| format!("unparsable commit date '{date}': {e}"))?
                .with_timezone(&Utc);
            commits.push(CommitInfo { hash: hash.to_string(), date });
        }
        Ok(commits)
    }

    fn current_ref(&self) -> Result<String, PortError> {
        // Prefer the branch name so restoration reattaches HEAD.
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.root)
            .args(["symbolic-ref", "--quiet", "--short", "HEAD"])
            .output()?;
        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).trim().to_string());
        }
        self.git(&["rev-parse", "HEAD"])
    }

    fn checkout(&self, reference: &str) -> Result<(), PortError> {
        self.git(&["checkout", "--quiet", reference])?;
        Ok(())
    }
}
