//! Fix-references operation.
//!
//! Repairs literal project references whose target no longer exists. A
//! broken reference is repointed at the workspace project with the same
//! file name when there is exactly one; otherwise it is removed.

use serde::Serialize;

use crate::error::Result;
use crate::path::{relative_path, SeparatorStyle};
use crate::workspace::{ProjectGraph, ProjectGraphLoader, ReferenceTarget, Workspace};

use super::plan::{OperationPlan, PlanAction};

/// Options for the fix-references operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RepairOptions {
    /// Leave references without a replacement in place instead of
    /// removing them.
    pub keep_broken: bool,
}

impl RepairOptions {
    /// Default options: unrepairable references are removed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether unrepairable references are kept.
    #[must_use]
    pub fn with_keep_broken(mut self, keep: bool) -> Self {
        self.keep_broken = keep;
        self
    }
}

/// Plan builder for the fix-references operation.
///
/// # Examples
///
/// ```no_run
/// use projmove::config::Config;
/// use projmove::operations::{PlanExecutor, RepairOptions, RepairPlan};
/// use projmove::workspace::WorkspaceResolver;
/// use std::path::Path;
///
/// let config = Config::default();
/// let workspace = WorkspaceResolver::new(&config).resolve(None, Path::new("/repo")).unwrap();
///
/// let plan = RepairPlan::new(&workspace, RepairOptions::new()).build_plan().unwrap();
/// if plan.is_empty() {
///     println!("Nothing to fix");
/// } else {
///     PlanExecutor::new(&workspace.working_dir).execute(&plan);
/// }
/// ```
#[derive(Debug)]
pub struct RepairPlan<'a> {
    workspace: &'a Workspace,
    options: RepairOptions,
}

impl<'a> RepairPlan<'a> {
    /// Creates a plan builder for `workspace`.
    #[must_use]
    pub fn new(workspace: &'a Workspace, options: RepairOptions) -> Self {
        Self { workspace, options }
    }

    /// Loads the workspace projects and plans the repairs.
    ///
    /// # Errors
    ///
    /// Returns an error if a project manifest cannot be read.
    pub fn build_plan(&self) -> Result<OperationPlan> {
        let mut graph = ProjectGraphLoader::new().load(&self.workspace.projects)?;
        Ok(self.plan_for(&mut graph))
    }

    /// Plans the repairs for an already loaded graph.
    #[must_use]
    pub fn plan_for(&self, graph: &mut ProjectGraph) -> OperationPlan {
        let mut plan = OperationPlan::new("Fix project references");
        let mut warnings = Vec::new();

        // Candidates are looked up before the documents are edited.
        let replacements: Vec<Vec<Option<Replacement>>> = graph
            .nodes()
            .iter()
            .map(|node| {
                node.references
                    .iter()
                    .map(|reference| self.replacement_for(graph, &reference.target))
                    .collect()
            })
            .collect();

        for (node, node_replacements) in graph.nodes_mut().iter_mut().zip(replacements) {
            let mut changes = Vec::new();
            for (reference, replacement) in node.references.iter_mut().zip(node_replacements) {
                match replacement {
                    None => {}
                    Some(Replacement::Repoint(target)) => {
                        let style =
                            SeparatorStyle::of(&reference.expression, SeparatorStyle::Backward);
                        let expression = style.apply(&relative_path(&node.directory, &target));
                        changes.push(format!(
                            "Replace ProjectReference \"{}\" => \"{expression}\"",
                            reference.expression
                        ));
                        node.document.set_include(reference.id, &expression);
                        reference.expression = expression;
                        reference.target = ReferenceTarget::Resolved(target);
                    }
                    Some(Replacement::Unrepairable(reason)) => {
                        if self.options.keep_broken {
                            warnings.push(format!(
                                "Kept broken ProjectReference \"{}\" in \"{}\" ({reason})",
                                reference.expression,
                                self.workspace.relative(&node.path)
                            ));
                        } else {
                            changes.push(format!(
                                "Remove ProjectReference \"{}\"",
                                reference.expression
                            ));
                            node.document.remove_item(reference.id);
                        }
                    }
                }
            }

            if node.document.has_unsaved_changes() {
                plan = plan.add_action(PlanAction::UpdateProject {
                    path: node.path.clone(),
                    contents: node.document.render(),
                    changes,
                });
            }
        }

        for warning in warnings {
            log::warn!("{warning}");
            plan = plan.add_warning(warning);
        }
        plan
    }

    fn replacement_for(&self, graph: &ProjectGraph, target: &ReferenceTarget) -> Option<Replacement> {
        let ReferenceTarget::Missing(missing) = target else {
            return None;
        };
        let file_name = missing.file_name()?.to_string_lossy().into_owned();
        let candidates: Vec<_> = graph.with_file_name(&file_name).collect();
        match candidates.as_slice() {
            [only] => Some(Replacement::Repoint(only.path.clone())),
            [] => Some(Replacement::Unrepairable("no project with that name".to_string())),
            many => Some(Replacement::Unrepairable(format!(
                "{} projects named {file_name}",
                many.len()
            ))),
        }
    }
}

enum Replacement {
    Repoint(std::path::PathBuf),
    Unrepairable(String),
}
