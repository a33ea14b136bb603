//! Plan types for workspace operations.
//!
//! This module defines the plan structures that describe what actions
//! will be taken during an operation, without actually performing them.

use std::path::PathBuf;

use serde::Serialize;

use crate::path::relative_path;

/// A single action to be taken during plan execution.
///
/// Actions are executed in the order they were added. Move operations add
/// manifest rewrites first and physical moves last, so every rewrite is
/// written to the location the file still has at that point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum PlanAction {
    /// Write the new text of a solution manifest.
    RewriteSolution {
        /// Solution path.
        path: PathBuf,
        /// Full new text.
        #[serde(skip)]
        contents: String,
        /// One line per substituted member entry.
        changes: Vec<String>,
    },

    /// Write the new text of a project manifest.
    UpdateProject {
        /// Project path (before any physical move).
        path: PathBuf,
        /// Full new text.
        #[serde(skip)]
        contents: String,
        /// One line per edited or removed reference.
        changes: Vec<String>,
    },

    /// Delete a directory tree that is in the way of a forced move.
    DeleteDirectory(PathBuf),

    /// Move a project directory.
    MoveDirectory {
        /// Current location.
        from: PathBuf,
        /// New location.
        to: PathBuf,
    },

    /// Move or rename a project manifest.
    MoveFile {
        /// Current location.
        from: PathBuf,
        /// New location.
        to: PathBuf,
    },
}

impl PlanAction {
    /// Returns a human-readable description of this action, with paths
    /// relative to `working_dir`.
    #[must_use]
    pub fn description(&self, working_dir: &std::path::Path) -> String {
        let rel = |p: &PathBuf| relative_path(working_dir, p);
        match self {
            Self::RewriteSolution { path, changes, .. } => {
                format!("Rewrite solution {} ({} change(s))", rel(path), changes.len())
            }
            Self::UpdateProject { path, changes, .. } => {
                format!("Update project {} ({} change(s))", rel(path), changes.len())
            }
            Self::DeleteDirectory(path) => format!("Delete directory {}", rel(path)),
            Self::MoveDirectory { from, to } => {
                format!("Move directory {} to {}", rel(from), rel(to))
            }
            Self::MoveFile { from, to } => format!("Move file {} to {}", rel(from), rel(to)),
        }
    }

    /// Content change lines carried by manifest rewrites.
    #[must_use]
    pub fn changes(&self) -> &[String] {
        match self {
            Self::RewriteSolution { changes, .. } | Self::UpdateProject { changes, .. } => changes,
            _ => &[],
        }
    }
}

/// A complete operation plan describing all actions to be taken.
///
/// Plans are generated during the planning phase and can be inspected,
/// logged, or executed. They include a description, a sequence of actions,
/// and any warnings that should be communicated to the user.
#[derive(Debug, Clone, Serialize)]
pub struct OperationPlan {
    /// A human-readable description of the operation.
    pub description: String,

    /// The sequence of actions to perform.
    pub actions: Vec<PlanAction>,

    /// Warnings to communicate to the user.
    pub warnings: Vec<String>,
}

impl OperationPlan {
    /// Creates a new operation plan with the given description.
    ///
    /// # Examples
    ///
    /// ```
    /// use projmove::operations::OperationPlan;
    ///
    /// let plan = OperationPlan::new("Move project App");
    /// assert_eq!(plan.description, "Move project App");
    /// assert!(plan.is_empty());
    /// ```
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            actions: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Adds an action to the plan.
    ///
    /// # Examples
    ///
    /// ```
    /// use projmove::operations::{OperationPlan, PlanAction};
    /// use std::path::PathBuf;
    ///
    /// let plan = OperationPlan::new("Test").add_action(PlanAction::MoveDirectory {
    ///     from: PathBuf::from("/repo/Old"),
    ///     to: PathBuf::from("/repo/New"),
    /// });
    ///
    /// assert_eq!(plan.actions.len(), 1);
    /// ```
    #[must_use]
    pub fn add_action(mut self, action: PlanAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Adds a warning to the plan.
    ///
    /// # Examples
    ///
    /// ```
    /// use projmove::operations::OperationPlan;
    ///
    /// let plan = OperationPlan::new("Test")
    ///     .add_warning("This is a warning");
    ///
    /// assert_eq!(plan.warnings.len(), 1);
    /// ```
    #[must_use]
    pub fn add_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Checks if the plan has no actions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns the number of actions in the plan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// All content change lines, in action order.
    #[must_use]
    pub fn changes(&self) -> Vec<String> {
        self.actions
            .iter()
            .flat_map(|a| a.changes().iter().cloned())
            .collect()
    }
}
