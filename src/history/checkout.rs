//! Scoped checkout of the shared working tree.
//!
//! The working tree is a single shared mutable resource: one commit
//! checked out at a time, restored to the original ref on every exit
//! path. The guard records the original ref on acquisition; the happy
//! path calls [`CheckoutGuard::restore`] so a restore failure can
//! propagate as fatal, and `Drop` restores as a backstop on early error
//! or panic exits.

use tracing::{error, info};

use crate::error::AnalyzeError;
use crate::ports::git::GitRepo;

/// Guard owning the working tree's state for the duration of a run.
pub struct CheckoutGuard<'a> {
    git: &'a dyn GitRepo,
    original: String,
    restored: bool,
}

impl<'a> CheckoutGuard<'a> {
    /// Records the current ref and takes ownership of tree state.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError::Git`] if the current ref cannot be
    /// resolved.
    pub fn acquire(git: &'a dyn GitRepo) -> Result<Self, AnalyzeError> {
        let original = git.current_ref().map_err(AnalyzeError::Git)?;
        Ok(Self { git, original, restored: false })
    }

    /// The ref recorded at acquisition.
    #[must_use]
    pub fn original_ref(&self) -> &str {
        &self.original
    }

    /// Materializes one commit into the working tree.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError::CheckoutFailed`]; the whole run must abort
    /// because a corrupted tree invalidates every subsequent snapshot.
    pub fn checkout(&self, commit: &str) -> Result<(), AnalyzeError> {
        self.git.checkout(commit).map_err(|reason| AnalyzeError::CheckoutFailed {
            commit: commit.to_string(),
            reason,
        })
    }

    /// Restores the original ref and disarms the drop backstop.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError::RestoreFailed`]; the working tree is left
    /// in an unexpected state the user must repair by hand.
    pub fn restore(mut self) -> Result<(), AnalyzeError> {
        self.restored = true;
        self.git.checkout(&self.original).map_err(|reason| AnalyzeError::RestoreFailed {
            reference: self.original.clone(),
            reason,
        })
    }
}

impl Drop for CheckoutGuard<'_> {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        match self.git.checkout(&self.original) {
            Ok(()) => info!(reference = %self.original, "restored original ref"),
            Err(err) => {
                error!(
                    reference = %self.original,
                    %err,
                    "failed to restore original ref; working tree left checked out"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::PortError;
    use crate::ports::git::CommitInfo;

    /// Fake that records checkout calls and can fail on request.
    struct FakeGit {
        head: String,
        checkouts: Mutex<Vec<String>>,
        fail_checkout_of: Option<String>,
    }

    impl FakeGit {
        fn new(head: &str) -> Self {
            Self {
                head: head.to_string(),
                checkouts: Mutex::new(Vec::new()),
                fail_checkout_of: None,
            }
        }
    }

    impl GitRepo for FakeGit {
        fn is_repository(&self) -> Result<bool, PortError> {
            Ok(true)
        }

        fn branch_exists(&self, _name: &str) -> Result<bool, PortError> {
            Ok(true)
        }

        fn list_commits(&self, _branch: &str) -> Result<Vec<CommitInfo>, PortError> {
            Ok(Vec::new())
        }

        fn current_ref(&self) -> Result<String, PortError> {
            Ok(self.head.clone())
        }

        fn checkout(&self, reference: &str) -> Result<(), PortError> {
            if self.fail_checkout_of.as_deref() == Some(reference) {
                return Err("simulated checkout failure".into());
            }
            self.checkouts.lock().unwrap().push(reference.to_string());
            Ok(())
        }
    }

    #[test]
    fn restore_reinstates_the_original_ref() {
        let git = FakeGit::new("main");
        let guard = CheckoutGuard::acquire(&git).unwrap();
        guard.checkout("abc123").unwrap();
        guard.restore().unwrap();

        let checkouts = git.checkouts.lock().unwrap();
        assert_eq!(*checkouts, vec!["abc123", "main"]);
    }

    #[test]
    fn drop_restores_when_not_explicitly_restored() {
        let git = FakeGit::new("main");
        {
            let guard = CheckoutGuard::acquire(&git).unwrap();
            guard.checkout("abc123").unwrap();
            // Guard dropped here without restore(), as on an error path.
        }
        let checkouts = git.checkouts.lock().unwrap();
        assert_eq!(*checkouts, vec!["abc123", "main"]);
    }

    #[test]
    fn explicit_restore_disarms_the_drop_backstop() {
        let git = FakeGit::new("main");
        let guard = CheckoutGuard::acquire(&git).unwrap();
        guard.restore().unwrap();

        let checkouts = git.checkouts.lock().unwrap();
        assert_eq!(*checkouts, vec!["main"]);
    }

    #[test]
    fn checkout_failure_maps_to_fatal_error() {
        let mut git = FakeGit::new("main");
        git.fail_checkout_of = Some("broken".to_string());
        let guard = CheckoutGuard::acquire(&git).unwrap();

        let err = guard.checkout("broken").unwrap_err();
        assert!(matches!(err, AnalyzeError::CheckoutFailed { .. }));
        assert_eq!(err.exit_code(), 14);
        drop(guard);
    }
}
