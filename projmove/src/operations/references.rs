//! Rewriting of project references invalidated by a move batch.

use std::path::Path;

use crate::path::{relative_path, SeparatorStyle};
use crate::workspace::ProjectGraph;

use super::moves::MoveSet;
use super::plan::PlanAction;

/// Recomputes reference expressions affected by a [`MoveSet`].
///
/// Every literal reference is resolved against the declaring project's
/// directory before the move. When either end of the reference moves, the
/// expression is recomputed from the declaring project's new directory to
/// the target's new path and written back in the separator style it was
/// written in. Unaffected references are left alone, as are references
/// whose expressions need evaluation.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReferenceFixupEngine;

impl ReferenceFixupEngine {
    /// Applies the batch to the documents in `graph` and returns one
    /// [`PlanAction::UpdateProject`] per changed manifest.
    ///
    /// The returned actions write to the manifests' current locations; the
    /// physical moves come afterwards.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use projmove::config::Config;
    /// use projmove::operations::{Move, MoveSetPlanner, ReferenceFixupEngine};
    /// use projmove::workspace::{ProjectGraphLoader, WorkspaceResolver};
    /// use std::path::Path;
    ///
    /// let config = Config::default();
    /// let workspace = WorkspaceResolver::new(&config).resolve(None, Path::new("/repo")).unwrap();
    /// let mut graph = ProjectGraphLoader::new().load(&workspace.projects).unwrap();
    /// let moves = vec![Move::new(Path::new("/repo/Old/Old.csproj"), Path::new("/repo/New/New.csproj"))];
    /// let set = MoveSetPlanner::new(&config, &workspace).plan(moves, &graph, false).unwrap();
    ///
    /// for action in ReferenceFixupEngine.fix(&mut graph, &set) {
    ///     println!("{:?}", action.changes());
    /// }
    /// ```
    #[must_use]
    pub fn fix(self, graph: &mut ProjectGraph, moves: &MoveSet) -> Vec<PlanAction> {
        let mut actions = Vec::new();

        for node in graph.nodes_mut() {
            let declaring_moves = moves.destination_of(&node.path).is_some();
            let new_location = moves.location_after(&node.path);
            let new_directory = new_location.parent().unwrap_or_else(|| Path::new(""));

            let mut changes = Vec::new();
            for reference in &mut node.references {
                let Some(target) = reference.target.path() else {
                    continue;
                };
                let target_moves = moves.destination_of(target).is_some();
                if !declaring_moves && !target_moves {
                    continue;
                }

                let target_after = moves.location_after(target);
                let style = SeparatorStyle::of(&reference.expression, SeparatorStyle::Backward);
                let expression = style.apply(&relative_path(new_directory, &target_after));
                if expression == reference.expression {
                    continue;
                }

                changes.push(format!(
                    "Replace ProjectReference \"{}\" => \"{expression}\"",
                    reference.expression
                ));
                node.document.set_include(reference.id, &expression);
                reference.expression = expression;
            }

            if node.document.has_unsaved_changes() {
                log::debug!("{} reference(s) changed in {}", changes.len(), node.path.display());
                actions.push(PlanAction::UpdateProject {
                    path: node.path.clone(),
                    contents: node.document.render(),
                    changes,
                });
            }
        }

        actions
    }
}
