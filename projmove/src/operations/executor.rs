//! Plan execution engine.
//!
//! This module implements the executor that takes operation plans and
//! applies them to the workspace through a [`MutationExecutor`].

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::FailurePolicy;
use crate::error::{Error, Result};

use super::mutation::{ExecutionMode, MutationExecutor, MutationRecord};
use super::plan::{OperationPlan, PlanAction};

/// Result of executing a plan.
///
/// This struct provides information about what happened during execution,
/// including whether it was a staged run and every mutation attempted.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    /// Whether every attempted mutation succeeded.
    pub success: bool,

    /// Whether this was a staged run (no actual changes made).
    pub staged: bool,

    /// Content change lines from manifest rewrites.
    pub changes: Vec<String>,

    /// Attempted mutations, in execution order.
    pub records: Vec<MutationRecord>,

    /// Warnings from the plan.
    pub warnings: Vec<String>,

    /// Set when a failure stopped the batch under the rollback policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rolled_back: Option<RollbackSummary>,
}

/// What happened when a batch was rolled back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollbackSummary {
    /// Description of the failed mutation.
    pub failed: String,
    /// Number of completed changes that were undone.
    pub restored: usize,
}

impl ExecutionResult {
    /// The mode the plan ran in.
    #[must_use]
    pub fn mode(&self) -> ExecutionMode {
        if self.staged {
            ExecutionMode::Plan
        } else {
            ExecutionMode::Apply
        }
    }

    /// Number of mutations that failed.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.records.iter().filter(|r| !r.success).count()
    }

    /// Converts a rolled-back run into an error.
    ///
    /// Failures under the best-effort policy are reported in the records
    /// only and do not make this fail.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RolledBack`] if the batch was rolled back.
    pub fn check(&self) -> Result<()> {
        match &self.rolled_back {
            Some(summary) => Err(Error::RolledBack {
                failed: summary.failed.clone(),
                restored: summary.restored,
            }),
            None => Ok(()),
        }
    }
}

/// Executes operation plans against the workspace.
///
/// The executor can run in normal mode (applying changes) or staged mode
/// (running every check without changes).
///
/// # Examples
///
/// ```no_run
/// use projmove::operations::{OperationPlan, PlanAction, PlanExecutor};
/// use std::path::{Path, PathBuf};
///
/// let plan = OperationPlan::new("Rename App").add_action(PlanAction::MoveFile {
///     from: PathBuf::from("/repo/App/App.csproj"),
///     to: PathBuf::from("/repo/App/Api.csproj"),
/// });
///
/// // Staged execution
/// let result = PlanExecutor::new(Path::new("/repo")).staged().execute(&plan);
/// assert!(result.staged);
///
/// // Normal execution
/// let result = PlanExecutor::new(Path::new("/repo")).execute(&plan);
/// assert!(result.success);
/// ```
#[derive(Debug, Clone)]
pub struct PlanExecutor {
    working_dir: PathBuf,
    mode: ExecutionMode,
    policy: FailurePolicy,
}

impl PlanExecutor {
    /// Creates a plan executor that applies changes, reporting paths
    /// relative to `working_dir`.
    #[must_use]
    pub fn new(working_dir: &Path) -> Self {
        Self {
            working_dir: working_dir.to_path_buf(),
            mode: ExecutionMode::Apply,
            policy: FailurePolicy::BestEffort,
        }
    }

    /// Sets the executor to staged mode.
    ///
    /// In staged mode, the executor runs the same checks but does not
    /// modify the filesystem.
    #[must_use]
    pub fn staged(self) -> Self {
        self.with_mode(ExecutionMode::Plan)
    }

    /// Sets the execution mode explicitly.
    #[must_use]
    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the failure policy.
    #[must_use]
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Executes the given plan.
    ///
    /// Actions run in order. Under the best-effort policy a failed action is
    /// recorded and execution continues. Under the rollback policy the first
    /// failure stops the batch and undoes every completed change.
    #[must_use]
    pub fn execute(&self, plan: &OperationPlan) -> ExecutionResult {
        log::debug!("executing plan: {}", plan.description);
        let mut mutations =
            MutationExecutor::new(self.mode, &self.working_dir).with_policy(self.policy);

        for action in &plan.actions {
            if mutations.is_halted() {
                log::debug!("skipping {action:?} after failure");
                continue;
            }
            Self::execute_action(&mut mutations, action);
        }

        let rolled_back = match mutations.finish() {
            Ok(()) => None,
            Err(Error::RolledBack { failed, restored }) => Some(RollbackSummary { failed, restored }),
            Err(e) => Some(RollbackSummary {
                failed: e.to_string(),
                restored: 0,
            }),
        };

        let records = mutations.take_records();
        ExecutionResult {
            success: records.iter().all(|r| r.success) && rolled_back.is_none(),
            staged: self.mode == ExecutionMode::Plan,
            changes: plan.changes(),
            records,
            warnings: plan.warnings.clone(),
            rolled_back,
        }
    }

    /// Executes a single action.
    fn execute_action(mutations: &mut MutationExecutor, action: &PlanAction) {
        match action {
            PlanAction::RewriteSolution { path, contents, .. }
            | PlanAction::UpdateProject { path, contents, .. } => {
                mutations.try_write_file(path, contents);
            }
            PlanAction::DeleteDirectory(path) => {
                mutations.try_delete_directory(path);
            }
            PlanAction::MoveDirectory { from, to } => {
                mutations.try_move_directory(from, to);
            }
            PlanAction::MoveFile { from, to } => {
                mutations.try_move_file(from, to, false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("Old")).unwrap();
        fs::write(temp.path().join("Old/Old.csproj"), "<Project />").unwrap();
        fs::write(temp.path().join("All.sln"), "old").unwrap();
        temp
    }

    fn plan(root: &Path) -> OperationPlan {
        OperationPlan::new("Move Old")
            .add_action(PlanAction::RewriteSolution {
                path: root.join("All.sln"),
                contents: "new".to_string(),
                changes: vec!["Replace project \"Old\\Old.csproj\" => \"New\\New.csproj\"".to_string()],
            })
            .add_action(PlanAction::MoveDirectory {
                from: root.join("Old"),
                to: root.join("New"),
            })
            .add_action(PlanAction::MoveFile {
                from: root.join("New/Old.csproj"),
                to: root.join("New/New.csproj"),
            })
            .add_warning("heads up")
    }

    #[test]
    fn test_execute_applies_actions_in_order() {
        let temp = setup();
        let result = PlanExecutor::new(temp.path()).execute(&plan(temp.path()));

        assert!(result.success);
        assert!(!result.staged);
        assert_eq!(result.records.len(), 3);
        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.warnings, vec!["heads up"]);
        assert_eq!(fs::read_to_string(temp.path().join("All.sln")).unwrap(), "new");
        assert!(temp.path().join("New/New.csproj").is_file());
        result.check().unwrap();
    }

    #[test]
    fn test_staged_does_not_modify_tree() {
        let temp = setup();
        let result = PlanExecutor::new(temp.path())
            .staged()
            .execute(&plan(temp.path()));

        assert!(result.success);
        assert!(result.staged);
        assert_eq!(result.records.len(), 3);
        assert_eq!(fs::read_to_string(temp.path().join("All.sln")).unwrap(), "old");
        assert!(temp.path().join("Old/Old.csproj").is_file());
        assert!(!temp.path().join("New").exists());
    }

    #[test]
    fn test_best_effort_continues_after_failure() {
        let temp = setup();
        fs::create_dir_all(temp.path().join("New")).unwrap();

        let result = PlanExecutor::new(temp.path()).execute(&plan(temp.path()));
        assert!(!result.success);
        assert_eq!(result.failure_count(), 1);
        // The file move finds nothing at New/Old.csproj and is skipped.
        assert_eq!(result.records.len(), 2);
        assert!(result.check().is_ok());
        assert_eq!(fs::read_to_string(temp.path().join("All.sln")).unwrap(), "new");
    }

    #[test]
    fn test_rollback_policy_undoes_and_fails() {
        let temp = setup();
        fs::create_dir_all(temp.path().join("New")).unwrap();

        let result = PlanExecutor::new(temp.path())
            .with_policy(FailurePolicy::Rollback)
            .execute(&plan(temp.path()));

        assert!(!result.success);
        let summary = result.rolled_back.clone().unwrap();
        assert_eq!(summary.restored, 1);
        assert!(matches!(result.check(), Err(Error::RolledBack { .. })));
        assert_eq!(fs::read_to_string(temp.path().join("All.sln")).unwrap(), "old");
    }

    #[test]
    fn test_empty_plan() {
        let temp = setup();
        let result = PlanExecutor::new(temp.path()).execute(&OperationPlan::new("Nothing"));
        assert!(result.success);
        assert!(result.records.is_empty());
    }
}
