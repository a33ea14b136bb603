//! Validation and planning of project move batches.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::path::{resolve_components, same_path, CanonicalPath, PathRelationship};
use crate::workspace::discovery::projects_in_dir;
use crate::workspace::{ProjectGraph, Workspace};

/// One project manifest changing location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Move {
    /// Current manifest path.
    pub old_path: PathBuf,
    /// Manifest path after the move.
    pub new_path: PathBuf,
    /// The project travels inside another project's directory and needs no
    /// physical action of its own.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub carried: bool,
}

impl Move {
    /// Creates a move between two absolute manifest paths.
    #[must_use]
    pub fn new(old_path: &Path, new_path: &Path) -> Self {
        Self {
            old_path: resolve_components(old_path),
            new_path: resolve_components(new_path),
            carried: false,
        }
    }

    /// Directory currently containing the manifest.
    #[must_use]
    pub fn old_directory(&self) -> &Path {
        self.old_path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Directory containing the manifest after the move.
    #[must_use]
    pub fn new_directory(&self) -> &Path {
        self.new_path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Returns `true` if the project directory itself moves.
    #[must_use]
    pub fn changes_directory(&self) -> bool {
        !same_path(self.old_directory(), self.new_directory())
    }

    /// Returns `true` if old and new path are the same location.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        same_path(&self.old_path, &self.new_path)
    }
}

/// A validated batch of moves.
///
/// Lookups use path identity, so any spelling of an old path finds its
/// move.
#[derive(Debug, Clone, Default)]
pub struct MoveSet {
    moves: Vec<Move>,
    index: HashMap<CanonicalPath, usize>,
    warnings: Vec<String>,
}

impl MoveSet {
    /// Moves in batch order, carried moves last.
    #[must_use]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Number of moves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Returns `true` if nothing moves.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Non-fatal findings from planning.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// New location of the project at `old_path`, if it moves.
    #[must_use]
    pub fn destination_of(&self, old_path: &Path) -> Option<&Path> {
        self.index
            .get(&CanonicalPath::new(old_path))
            .map(|&i| self.moves[i].new_path.as_path())
    }

    /// Location of `path` after the batch: its destination if it moves,
    /// otherwise `path` itself.
    #[must_use]
    pub fn location_after(&self, path: &Path) -> PathBuf {
        self.destination_of(path)
            .map_or_else(|| path.to_path_buf(), Path::to_path_buf)
    }

    fn push(&mut self, mv: Move) {
        self.index
            .insert(CanonicalPath::new(&mv.old_path), self.moves.len());
        self.moves.push(mv);
    }
}

/// Validates a batch of moves against the workspace before anything is
/// touched.
///
/// # Examples
///
/// ```no_run
/// use projmove::config::Config;
/// use projmove::operations::{Move, MoveSetPlanner};
/// use projmove::workspace::{ProjectGraphLoader, WorkspaceResolver};
/// use std::path::Path;
///
/// let config = Config::default();
/// let workspace = WorkspaceResolver::new(&config).resolve(None, Path::new("/repo")).unwrap();
/// let graph = ProjectGraphLoader::new().load(&workspace.projects).unwrap();
///
/// let moves = vec![Move::new(Path::new("/repo/Old/Old.csproj"), Path::new("/repo/New/New.csproj"))];
/// let set = MoveSetPlanner::new(&config, &workspace).plan(moves, &graph, false).unwrap();
/// assert_eq!(set.len(), 1);
/// ```
#[derive(Debug)]
pub struct MoveSetPlanner<'a> {
    config: &'a Config,
    workspace: &'a Workspace,
}

impl<'a> MoveSetPlanner<'a> {
    /// Creates a planner for moves inside `workspace`.
    #[must_use]
    pub fn new(config: &'a Config, workspace: &'a Workspace) -> Self {
        Self { config, workspace }
    }

    /// Validates `moves` as a unit and returns the resulting [`MoveSet`].
    ///
    /// Moves whose old and new paths are the same location are dropped
    /// with a warning. Workspace projects nested inside a directory that
    /// moves are added as carried moves.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if an old path is not an existing file,
    /// and [`Error::MoveValidation`] if:
    /// - a new path lacks a recognized project extension,
    /// - an old directory holds more than one project manifest,
    /// - the same project is moved twice,
    /// - a new path collides with an existing project that stays put, with
    ///   another move's new path, or with an existing file that `force` does
    ///   not clear,
    /// - a new directory has a regular file as itself or an ancestor,
    /// - a new directory lies inside its own old directory or contains it,
    /// - two moves touch the same or nested directories,
    /// - a new directory already exists and `force` is not set.
    pub fn plan(&self, moves: Vec<Move>, graph: &ProjectGraph, force: bool) -> Result<MoveSet> {
        let mut set = MoveSet::default();

        let mut accepted: Vec<Move> = Vec::new();
        for mv in moves {
            if !mv.old_path.is_file() {
                return Err(Error::not_found(format!(
                    "project \"{}\"",
                    self.rel(&mv.old_path)
                )));
            }
            if mv.is_noop() {
                let warning = format!("\"{}\" is already at its destination", self.rel(&mv.old_path));
                log::warn!("{warning}");
                set.warnings.push(warning);
                continue;
            }
            if !self.config.is_project_file(&mv.new_path) {
                return Err(Error::move_validation(format!(
                    "\"{}\" does not have a recognized project extension",
                    self.rel(&mv.new_path)
                )));
            }
            if projects_in_dir(mv.old_directory(), self.config).len() > 1 {
                return Err(Error::move_validation(format!(
                    "Cannot move project \"{}\" because the directory contains multiple project files",
                    self.rel(&mv.old_path)
                )));
            }
            if accepted.iter().any(|m| same_path(&m.old_path, &mv.old_path)) {
                return Err(Error::move_validation(format!(
                    "Project \"{}\" is moved more than once",
                    self.rel(&mv.old_path)
                )));
            }
            accepted.push(mv);
        }

        for (i, mv) in accepted.iter().enumerate() {
            self.check_destination(mv, &accepted, graph, force)?;
            for other in accepted.iter().skip(i + 1) {
                self.check_pair(mv, other)?;
            }
            if !PathRelationship::is_within(&mv.new_path, &self.workspace.root_dir) {
                let warning = format!(
                    "\"{}\" is outside the workspace root",
                    self.rel(&mv.new_path)
                );
                log::warn!("{warning}");
                set.warnings.push(warning);
            }
        }

        let carried = Self::carried_moves(&accepted, graph);
        for mv in accepted.into_iter().chain(carried) {
            set.push(mv);
        }
        Ok(set)
    }

    fn check_destination(
        &self,
        mv: &Move,
        batch: &[Move],
        graph: &ProjectGraph,
        force: bool,
    ) -> Result<()> {
        let new_path = &mv.new_path;
        let vacated = |path: &Path| batch.iter().any(|m| same_path(&m.old_path, path));

        if let Some(other) = batch
            .iter()
            .find(|m| !std::ptr::eq(*m, mv) && same_path(&m.new_path, new_path))
        {
            return Err(Error::move_validation(format!(
                "Projects \"{}\" and \"{}\" would both move to \"{}\"",
                self.rel(&mv.old_path),
                self.rel(&other.old_path),
                self.rel(new_path)
            )));
        }
        if graph.contains(new_path) && !vacated(new_path) {
            return Err(Error::move_validation(format!(
                "The workspace already contains a project at \"{}\"",
                self.rel(new_path)
            )));
        }
        // A forced directory move clears whatever non-project file sits there.
        let cleared = force && mv.changes_directory();
        if new_path.exists() && !vacated(new_path) && !cleared {
            return Err(Error::move_validation(format!(
                "\"{}\" already exists",
                self.rel(new_path)
            )));
        }
        if let Some(file) = file_ancestor(mv.new_directory()) {
            return Err(Error::move_validation(format!(
                "Cannot move project \"{}\" to \"{}\" because \"{}\" is a file",
                self.rel(&mv.old_path),
                self.rel(new_path),
                self.rel(file)
            )));
        }

        if !mv.changes_directory() {
            return Ok(());
        }
        let old_dir = mv.old_directory();
        let new_dir = mv.new_directory();
        match PathRelationship::between(old_dir, new_dir) {
            PathRelationship::Ancestor => {
                return Err(Error::move_validation(format!(
                    "Cannot move project \"{}\" into its own directory",
                    self.rel(&mv.old_path)
                )));
            }
            PathRelationship::Descendant => {
                return Err(Error::move_validation(format!(
                    "Cannot move project \"{}\" to \"{}\" because the destination directory contains the project",
                    self.rel(&mv.old_path),
                    self.rel(new_path)
                )));
            }
            PathRelationship::Same | PathRelationship::Unrelated => {}
        }
        if new_dir.exists() && !force {
            return Err(Error::move_validation(format!(
                "The directory \"{}\" already exists",
                self.rel(new_dir)
            )));
        }
        Ok(())
    }

    /// Rejects pairs whose directory moves would interfere.
    fn check_pair(&self, a: &Move, b: &Move) -> Result<()> {
        let related = |x: &Path, y: &Path| PathRelationship::between(x, y).is_hierarchical();
        let conflict = (a.changes_directory() || b.changes_directory())
            && (related(a.old_directory(), b.old_directory())
                || (a.changes_directory() && related(a.new_directory(), b.old_directory()))
                || (b.changes_directory() && related(b.new_directory(), a.old_directory()))
                || (a.changes_directory()
                    && b.changes_directory()
                    && related(a.new_directory(), b.new_directory())));
        if conflict {
            return Err(Error::move_validation(format!(
                "Cannot move \"{}\" and \"{}\" in one batch because their directories overlap",
                self.rel(&a.old_path),
                self.rel(&b.old_path)
            )));
        }
        Ok(())
    }

    /// Moves for workspace projects that sit below a moving directory.
    fn carried_moves(batch: &[Move], graph: &ProjectGraph) -> Vec<Move> {
        let mut carried = Vec::new();
        for node in graph.nodes() {
            if batch.iter().any(|m| same_path(&m.old_path, &node.path)) {
                continue;
            }
            let Some(mv) = batch.iter().find(|m| {
                m.changes_directory()
                    && PathRelationship::strictly_contains(m.old_directory(), &node.path)
            }) else {
                continue;
            };
            let depth = mv.old_directory().components().count();
            let rest: PathBuf = node.path.components().skip(depth).collect();
            let mut carried_move = Move::new(&node.path, &mv.new_directory().join(rest));
            carried_move.carried = true;
            log::debug!(
                "{} moves along with {}",
                node.path.display(),
                mv.old_path.display()
            );
            carried.push(carried_move);
        }
        carried
    }

    fn rel(&self, path: &Path) -> String {
        self.workspace.relative(path)
    }
}

/// The nearest existing ancestor of `dir` (itself included) when that
/// entry is not a directory.
fn file_ancestor(dir: &Path) -> Option<&Path> {
    dir.ancestors()
        .find(|a| a.symlink_metadata().is_ok())
        .filter(|a| !a.is_dir())
}
