//! Structural rewrite of solution member entries.

use std::path::Path;

use crate::error::Result;
use crate::manifest::SolutionFile;
use crate::path::{relative_path, SeparatorStyle};
use crate::workspace::project_name;

use super::moves::MoveSet;
use super::plan::PlanAction;

/// Substitutes moved projects in a solution manifest.
///
/// Only the display name and relative path of matching `Project(...)`
/// entries change. Type and project identifiers, and every other byte of
/// the file, are kept verbatim.
#[derive(Debug, Default, Clone, Copy)]
pub struct SolutionManifestRewriter;

impl SolutionManifestRewriter {
    /// Loads the solution at `path` and rewrites it for `moves`.
    ///
    /// Returns `None` when no entry refers to a moving project.
    ///
    /// # Errors
    ///
    /// Returns an error if the solution cannot be read.
    pub fn rewrite(self, path: &Path, moves: &MoveSet) -> Result<Option<PlanAction>> {
        let solution = SolutionFile::load(path)?;
        Ok(self.rewrite_solution(&solution, moves))
    }

    /// Rewrites an already loaded solution for `moves`.
    ///
    /// # Examples
    ///
    /// ```
    /// use projmove::manifest::SolutionFile;
    /// use projmove::operations::{MoveSet, SolutionManifestRewriter};
    /// use std::path::Path;
    ///
    /// let sln = SolutionFile::parse(Path::new("/repo/All.sln"), "Global\nEndGlobal\n").unwrap();
    /// assert!(SolutionManifestRewriter.rewrite_solution(&sln, &MoveSet::default()).is_none());
    /// ```
    #[must_use]
    pub fn rewrite_solution(self, solution: &SolutionFile, moves: &MoveSet) -> Option<PlanAction> {
        let mut replacements = Vec::new();
        let mut changes = Vec::new();

        for entry in solution.entries() {
            let Some(new_path) = moves.destination_of(&solution.resolve(entry)) else {
                continue;
            };

            let style = SeparatorStyle::of(&entry.relative_path, SeparatorStyle::Backward);
            let new_relative = style.apply(&relative_path(solution.directory(), new_path));
            let new_name = project_name(new_path);

            if new_name != entry.name {
                replacements.push((entry.name_span(), new_name));
            }
            if new_relative != entry.relative_path {
                changes.push(format!(
                    "Replace project \"{}\" => \"{new_relative}\"",
                    entry.relative_path
                ));
                replacements.push((entry.path_span(), new_relative));
            }
        }

        if replacements.is_empty() {
            return None;
        }
        let contents = solution.render_with(replacements);
        if contents == solution.text() {
            return None;
        }
        Some(PlanAction::RewriteSolution {
            path: solution.path().to_path_buf(),
            contents,
            changes,
        })
    }
}
