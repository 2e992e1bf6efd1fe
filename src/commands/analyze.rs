//! `archdrift analyze` command: the snapshot loop.
//!
//! Validates the repository, resolves the branch, selects commits, then
//! walks them strictly sequentially: check out, extract, aggregate. The
//! CSV is written only after the final snapshot, so a fatal error or an
//! interrupt never leaves a partial output file.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::info;

use crate::context::ServiceContext;
use crate::emit;
use crate::error::AnalyzeError;
use crate::extract::{extract_tree, ExtractOptions};
use crate::history::{select_commits, Cadence, CheckoutGuard};
use crate::ports::git::GitRepo;
use crate::snapshot::Snapshot;

/// Branch names tried in preference order.
const BRANCH_CANDIDATES: [&str; 3] = ["main", "master", "develop"];

/// Resolved options for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Path to the service repository.
    pub repo_path: PathBuf,
    /// Path of the CSV file to write.
    pub output_path: PathBuf,
    /// Snapshot cadence.
    pub frequency: Cadence,
    /// Number of period boundaries to walk back.
    pub periods: u32,
    /// Collapse adjacent periods resolving to the same commit.
    pub collapse_duplicates: bool,
    /// Unify path-placeholder syntaxes before endpoint dedup.
    pub normalize_path_params: bool,
}

/// Executes the analysis run.
///
/// # Errors
///
/// Returns an [`AnalyzeError`] for every fatal condition in the spec's
/// taxonomy; no output file exists on any error path.
pub fn run(ctx: &ServiceContext, options: &AnalyzeOptions) -> Result<(), AnalyzeError> {
    if !options.repo_path.exists() {
        return Err(AnalyzeError::RepoNotFound(options.repo_path.clone()));
    }
    if !ctx.git.is_repository().map_err(AnalyzeError::Git)? {
        return Err(AnalyzeError::NotARepository(options.repo_path.clone()));
    }

    let branch = resolve_branch(ctx.git.as_ref())?;
    let commits = ctx.git.list_commits(&branch).map_err(AnalyzeError::Git)?;
    if commits.is_empty() {
        return Err(AnalyzeError::EmptyHistory(branch));
    }

    let selections = select_commits(
        &commits,
        options.frequency,
        options.periods,
        ctx.clock.now(),
        options.collapse_duplicates,
    );
    info!(branch = %branch, periods = options.periods, selected = selections.len(), "selected commits");

    let interrupted = install_interrupt_flag()?;
    let extract_options =
        ExtractOptions { normalize_path_params: options.normalize_path_params };

    let guard = CheckoutGuard::acquire(ctx.git.as_ref())?;
    let mut snapshots = Vec::with_capacity(selections.len());
    for selection in &selections {
        if interrupted.load(Ordering::Relaxed) {
            guard.restore()?;
            return Err(AnalyzeError::Interrupted);
        }

        guard.checkout(&selection.commit.hash)?;
        let extraction = extract_tree(&options.repo_path, extract_options);
        info!(
            commit = %selection.commit.hash,
            date = %selection.commit.date,
            dependencies = extraction.dependencies.len(),
            endpoints = extraction.endpoints.len(),
            calls = extraction.calls.len(),
            "snapshot"
        );
        snapshots.push(Snapshot {
            commit_hash: selection.commit.hash.clone(),
            commit_date: selection.commit.date,
            dependencies: extraction.dependencies,
            endpoints: extraction.endpoints,
            calls: extraction.calls,
        });
    }
    guard.restore()?;

    if interrupted.load(Ordering::Relaxed) {
        return Err(AnalyzeError::Interrupted);
    }

    emit::write_csv(&options.output_path, &snapshots)?;
    info!(rows = snapshots.len(), output = %options.output_path.display(), "analysis complete");
    Ok(())
}

/// First existing branch from the candidate list.
fn resolve_branch(git: &dyn GitRepo) -> Result<String, AnalyzeError> {
    for name in BRANCH_CANDIDATES {
        if git.branch_exists(name).map_err(AnalyzeError::Git)? {
            return Ok(name.to_string());
        }
    }
    Err(AnalyzeError::BranchNotFound {
        tried: BRANCH_CANDIDATES.iter().map(ToString::to_string).collect(),
    })
}

/// Registers SIGINT/SIGTERM handlers that set a flag checked between
/// commits, so an interrupted run still restores the original ref.
fn install_interrupt_flag() -> Result<Arc<AtomicBool>, AnalyzeError> {
    let flag = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&flag))?;
    signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&flag))?;
    Ok(flag)
}
