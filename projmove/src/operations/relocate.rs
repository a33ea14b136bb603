//! Move-projects operation.
//!
//! A batch of moves is planned in four steps:
//!
//! 1. Validate the batch with [`MoveSetPlanner`].
//! 2. Rewrite member entries in every workspace solution.
//! 3. Rewrite project references invalidated by the batch.
//! 4. Move project directories and rename manifests.
//!
//! Steps 2 and 3 only produce text. Nothing on disk changes until the plan
//! is executed.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::{Config, FailurePolicy};
use crate::error::Result;
use crate::path::same_path;
use crate::workspace::{ProjectGraphLoader, Workspace};

use super::executor::{ExecutionResult, PlanExecutor};
use super::moves::{Move, MoveSet, MoveSetPlanner};
use super::mutation::ExecutionMode;
use super::plan::{OperationPlan, PlanAction};
use super::references::ReferenceFixupEngine;
use super::solution::SolutionManifestRewriter;

/// Options for a move batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOptions {
    /// Replace destination directories that already exist.
    pub force: bool,
    /// Whether to apply changes or only report them.
    pub mode: ExecutionMode,
    /// What happens after the first failed mutation.
    pub failure_policy: FailurePolicy,
}

impl Default for MoveOptions {
    fn default() -> Self {
        Self {
            force: false,
            mode: ExecutionMode::Apply,
            failure_policy: FailurePolicy::BestEffort,
        }
    }
}

impl MoveOptions {
    /// Default options: apply, no force, best effort.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether existing destination directories are replaced.
    #[must_use]
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Sets staged mode.
    #[must_use]
    pub fn staged(mut self, staged: bool) -> Self {
        self.mode = if staged {
            ExecutionMode::Plan
        } else {
            ExecutionMode::Apply
        };
        self
    }

    /// Sets the failure policy.
    #[must_use]
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}

/// Outcome of a move batch.
#[derive(Debug, Clone, Serialize)]
pub struct MoveReport {
    /// Moves in the validated batch, carried moves included.
    pub moves: Vec<Move>,
    /// What the executor did.
    #[serde(flatten)]
    pub execution: ExecutionResult,
}

impl MoveReport {
    /// Returns `true` if the batch had nothing to do.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

/// Plan builder for a move batch.
///
/// # Examples
///
/// ```no_run
/// use projmove::config::Config;
/// use projmove::operations::{Move, MoveOptions, RelocationPlan};
/// use projmove::workspace::WorkspaceResolver;
/// use std::path::Path;
///
/// let config = Config::default();
/// let workspace = WorkspaceResolver::new(&config).resolve(None, Path::new("/repo")).unwrap();
/// let moves = vec![Move::new(Path::new("/repo/Old/Old.csproj"), Path::new("/repo/New/New.csproj"))];
///
/// let (set, plan) = RelocationPlan::new(&config, &workspace, MoveOptions::new())
///     .build_plan(moves)
///     .unwrap();
/// for action in &plan.actions {
///     println!("{}", action.description(&workspace.working_dir));
/// }
/// # let _ = set;
/// ```
#[derive(Debug)]
pub struct RelocationPlan<'a> {
    config: &'a Config,
    workspace: &'a Workspace,
    options: MoveOptions,
}

impl<'a> RelocationPlan<'a> {
    /// Creates a plan builder for moves inside `workspace`.
    #[must_use]
    pub fn new(config: &'a Config, workspace: &'a Workspace, options: MoveOptions) -> Self {
        Self {
            config,
            workspace,
            options,
        }
    }

    /// Validates `moves` and builds the plan that carries them out.
    ///
    /// Manifest rewrites come before physical moves, so each rewrite is
    /// written while the file is still at its old location.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch fails validation or a manifest cannot
    /// be read.
    pub fn build_plan(&self, moves: Vec<Move>) -> Result<(MoveSet, OperationPlan)> {
        let mut paths = self.workspace.projects.clone();
        for mv in &moves {
            if mv.old_path.is_file() && !paths.iter().any(|p| same_path(p, &mv.old_path)) {
                paths.push(mv.old_path.clone());
            }
        }
        let mut graph = ProjectGraphLoader::new().load(&paths)?;

        let set = MoveSetPlanner::new(self.config, self.workspace).plan(
            moves,
            &graph,
            self.options.force,
        )?;

        let mut plan = OperationPlan::new(self.describe(&set));
        for warning in set.warnings() {
            plan = plan.add_warning(warning.clone());
        }
        if set.is_empty() {
            return Ok((set, plan));
        }

        for solution in &self.workspace.solutions {
            if let Some(action) = SolutionManifestRewriter.rewrite(solution, &set)? {
                plan = plan.add_action(action);
            }
        }
        for action in ReferenceFixupEngine.fix(&mut graph, &set) {
            plan = plan.add_action(action);
        }
        for action in self.physical_actions(&set) {
            plan = plan.add_action(action);
        }

        log::debug!("planned {} action(s) for {} move(s)", plan.len(), set.len());
        Ok((set, plan))
    }

    /// Directory and file moves, in batch order.
    fn physical_actions(&self, set: &MoveSet) -> Vec<PlanAction> {
        let mut actions = Vec::new();
        for mv in set.moves().iter().filter(|m| !m.carried) {
            let new_dir = mv.new_directory();

            if mv.changes_directory() {
                if self.options.force && new_dir.exists() {
                    actions.push(PlanAction::DeleteDirectory(new_dir.to_path_buf()));
                }
                actions.push(PlanAction::MoveDirectory {
                    from: mv.old_directory().to_path_buf(),
                    to: new_dir.to_path_buf(),
                });
            }

            let staged_file: PathBuf = match mv.old_path.file_name() {
                Some(name) => new_dir.join(name),
                None => continue,
            };
            if !same_path(&staged_file, &mv.new_path) || !names_match(&staged_file, &mv.new_path) {
                actions.push(PlanAction::MoveFile {
                    from: staged_file,
                    to: mv.new_path.clone(),
                });
            }
        }
        actions
    }

    fn describe(&self, set: &MoveSet) -> String {
        let primary: Vec<_> = set.moves().iter().filter(|m| !m.carried).collect();
        match primary.as_slice() {
            [] => "Nothing to move".to_string(),
            [mv] => format!(
                "Move project {} to {}",
                self.workspace.relative(&mv.old_path),
                self.workspace.relative(&mv.new_path)
            ),
            many => format!("Move {} projects", many.len()),
        }
    }
}

/// Returns `true` if both paths end in the same spelling of the file name.
fn names_match(a: &Path, b: &Path) -> bool {
    a.file_name() == b.file_name()
}

/// Plans and executes a move batch.
///
/// # Errors
///
/// Returns an error if the batch fails validation or a manifest cannot be
/// read. Failed mutations are reported in the returned records; under the
/// rollback policy callers should also consult
/// [`ExecutionResult::check`].
pub fn execute_moves(
    config: &Config,
    workspace: &Workspace,
    moves: Vec<Move>,
    options: MoveOptions,
) -> Result<MoveReport> {
    let (set, plan) = RelocationPlan::new(config, workspace, options).build_plan(moves)?;

    let execution = PlanExecutor::new(&workspace.working_dir)
        .with_mode(options.mode)
        .with_policy(options.failure_policy)
        .execute(&plan);

    Ok(MoveReport {
        moves: set.moves().to_vec(),
        execution,
    })
}
