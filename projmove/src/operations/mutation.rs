//! Dual-mode filesystem primitives.
//!
//! Every change a command makes to the workspace goes through a
//! [`MutationExecutor`]. In [`ExecutionMode::Apply`] the primitives touch the
//! disk. In [`ExecutionMode::Plan`] they only update a staged overlay, so
//! checks made later in the same run observe earlier staged actions. Both
//! modes run the same checks and emit the same [`MutationRecord`]s, which is
//! what makes a staged run a faithful preview.
//!
//! Under [`FailurePolicy::Rollback`] the apply-mode executor journals every
//! completed change. Deletions are performed as renames to a sibling backup
//! so they can be undone. The first failure halts the executor; calling
//! [`MutationExecutor::finish`] then undoes the journal in reverse order.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::FailurePolicy;
use crate::error::{Error, Result};
use crate::path::{relative_path, resolve_components, same_path, CanonicalPath};

/// Whether primitives touch the disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Report what would happen; nothing is modified.
    Plan,
    /// Perform the changes.
    Apply,
}

/// Category of a filesystem change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationKind {
    /// A new file.
    Create,
    /// New contents for an existing file.
    Update,
    /// A file or directory changing location.
    Move,
    /// A file or directory removed.
    Delete,
}

/// How a change is worded in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    /// Writing a new file.
    Create,
    /// Rewriting a file.
    Update,
    /// Changing location across directories.
    Move,
    /// Changing name within the same directory.
    Rename,
    /// Removing.
    Delete,
}

impl Verb {
    /// Imperative form, e.g. `Move`.
    #[must_use]
    pub fn imperative(self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Move => "Move",
            Self::Rename => "Rename",
            Self::Delete => "Delete",
        }
    }

    /// Past tense, e.g. `Moved`.
    #[must_use]
    pub fn past(self) -> &'static str {
        match self {
            Self::Create => "Created",
            Self::Update => "Updated",
            Self::Move => "Moved",
            Self::Rename => "Renamed",
            Self::Delete => "Deleted",
        }
    }

    fn lower(self) -> String {
        self.imperative().to_lowercase()
    }
}

/// One attempted filesystem change.
///
/// Records carry no mode-specific data, so a staged run and an applied run
/// from the same starting tree produce equal records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationRecord {
    /// Category of the change.
    pub kind: MutationKind,
    /// Wording of the change.
    pub verb: Verb,
    /// Path the change starts from.
    pub source: PathBuf,
    /// Path the change ends at, for moves.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<PathBuf>,
    /// Whether the change succeeded (or would succeed).
    pub success: bool,
    /// Quoted paths involved, relative to the working directory.
    pub subject: String,
    /// Failure description, when the change did not happen.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MutationRecord {
    /// Imperative description, e.g. `Move "Old" to "New"`.
    #[must_use]
    pub fn description(&self) -> String {
        format!("{} {}", self.verb.imperative(), self.subject)
    }

    /// Report line for `mode`: imperative when staged, past tense when
    /// applied, the failure text when the change failed.
    #[must_use]
    pub fn message(&self, mode: ExecutionMode) -> String {
        match (&self.error, mode) {
            (Some(error), _) => error.clone(),
            (None, ExecutionMode::Plan) => self.description(),
            (None, ExecutionMode::Apply) => format!("{} {}", self.verb.past(), self.subject),
        }
    }
}

/// What is at a path, as seen by the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file.
    File,
    /// A directory.
    Directory,
    /// Nothing.
    Missing,
}

fn disk_kind(path: &Path) -> EntryKind {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => EntryKind::Directory,
        Ok(_) => EntryKind::File,
        Err(_) => EntryKind::Missing,
    }
}

#[derive(Debug, Clone)]
enum Staged {
    File,
    /// A directory; `Some` names where its contents still live on disk.
    Directory(Option<PathBuf>),
    Absent,
}

/// Staged view of the filesystem used in plan mode.
#[derive(Debug, Default)]
struct Overlay {
    entries: HashMap<CanonicalPath, (PathBuf, Staged)>,
}

impl Overlay {
    /// Nearest staged entry at or above `path`, with the components below it.
    fn lookup(&self, path: &Path) -> Option<(Vec<OsString>, &Staged)> {
        let mut below = Vec::new();
        for ancestor in path.ancestors() {
            if let Some((_, staged)) = self.entries.get(&CanonicalPath::new(ancestor)) {
                below.reverse();
                return Some((below, staged));
            }
            if let Some(name) = ancestor.file_name() {
                below.push(name.to_os_string());
            }
        }
        None
    }

    fn kind(&self, path: &Path) -> EntryKind {
        match self.lookup(path) {
            None => disk_kind(path),
            Some((below, staged)) => match staged {
                Staged::Absent => EntryKind::Missing,
                Staged::File if below.is_empty() => EntryKind::File,
                Staged::Directory(None) if below.is_empty() => EntryKind::Directory,
                Staged::Directory(Some(backing)) => disk_kind(&join_below(backing, &below)),
                Staged::File | Staged::Directory(None) => EntryKind::Missing,
            },
        }
    }

    /// Where the contents of `path` live on disk, if anywhere.
    fn backing(&self, path: &Path) -> Option<PathBuf> {
        match self.lookup(path) {
            None => Some(path.to_path_buf()),
            Some((below, Staged::Directory(Some(backing)))) => Some(join_below(backing, &below)),
            Some(_) => None,
        }
    }

    fn set(&mut self, path: &Path, staged: Staged) {
        self.entries
            .insert(CanonicalPath::new(path), (path.to_path_buf(), staged));
    }

    fn take_below(&mut self, path: &Path) -> Vec<(PathBuf, Staged)> {
        let key = CanonicalPath::new(path);
        let keys: Vec<CanonicalPath> = self
            .entries
            .keys()
            .filter(|k| **k != key && k.starts_with(&key))
            .cloned()
            .collect();
        keys.into_iter()
            .filter_map(|k| self.entries.remove(&k))
            .collect()
    }

    fn stage_move(&mut self, from: &Path, to: &Path, is_directory: bool) {
        let staged = if is_directory {
            Staged::Directory(self.backing(from))
        } else {
            Staged::File
        };
        let carried = self.take_below(from);
        self.take_below(to);
        self.set(from, Staged::Absent);
        self.set(to, staged);

        let depth = from.components().count();
        for (path, staged) in carried {
            let rest: PathBuf = path.components().skip(depth).collect();
            self.set(&to.join(rest), staged);
        }
    }

    fn stage_delete(&mut self, path: &Path) {
        self.take_below(path);
        self.set(path, Staged::Absent);
    }

    fn stage_directories(&mut self, dirs: &[PathBuf]) {
        for dir in dirs {
            self.set(dir, Staged::Directory(None));
        }
    }
}

fn join_below(base: &Path, below: &[OsString]) -> PathBuf {
    let mut path = base.to_path_buf();
    for name in below {
        path.push(name);
    }
    path
}

#[derive(Debug)]
enum JournalEntry {
    Wrote { path: PathBuf, previous: Option<Vec<u8>> },
    Moved { from: PathBuf, to: PathBuf },
    Deleted { original: PathBuf, backup: PathBuf },
    CreatedDirectory(PathBuf),
}

impl JournalEntry {
    fn undo(&self) -> io::Result<()> {
        match self {
            Self::Wrote { path, previous: Some(bytes) } => fs::write(path, bytes),
            Self::Wrote { path, previous: None } => fs::remove_file(path),
            Self::Moved { from, to } => fs::rename(to, from),
            Self::Deleted { original, backup } => fs::rename(backup, original),
            Self::CreatedDirectory(dir) => fs::remove_dir(dir),
        }
    }
}

/// Executes primitive filesystem changes in plan or apply mode.
///
/// # Examples
///
/// ```no_run
/// use projmove::operations::{ExecutionMode, MutationExecutor};
/// use std::path::Path;
///
/// let mut executor = MutationExecutor::new(ExecutionMode::Plan, Path::new("/repo"));
/// executor.try_move_directory(Path::new("/repo/Old"), Path::new("/repo/New"));
/// executor.try_move_file(Path::new("/repo/New/Old.csproj"), Path::new("/repo/New/New.csproj"), false);
/// for record in executor.records() {
///     println!("{}", record.description());
/// }
/// ```
#[derive(Debug)]
pub struct MutationExecutor {
    mode: ExecutionMode,
    policy: FailurePolicy,
    working_dir: PathBuf,
    overlay: Overlay,
    journal: Vec<JournalEntry>,
    records: Vec<MutationRecord>,
    halted: Option<String>,
}

impl MutationExecutor {
    /// Creates an executor reporting paths relative to `working_dir`.
    #[must_use]
    pub fn new(mode: ExecutionMode, working_dir: &Path) -> Self {
        Self {
            mode,
            policy: FailurePolicy::BestEffort,
            working_dir: working_dir.to_path_buf(),
            overlay: Overlay::default(),
            journal: Vec::new(),
            records: Vec::new(),
            halted: None,
        }
    }

    /// Sets the failure policy.
    #[must_use]
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The execution mode.
    #[must_use]
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Records emitted so far.
    #[must_use]
    pub fn records(&self) -> &[MutationRecord] {
        &self.records
    }

    /// Removes and returns the records emitted so far.
    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.records)
    }

    /// Returns `true` once a failure has stopped a rollback batch.
    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.halted.is_some()
    }

    /// What is at `path`, including staged changes in plan mode.
    #[must_use]
    pub fn kind_of(&self, path: &Path) -> EntryKind {
        let path = resolve_components(path);
        match self.mode {
            ExecutionMode::Plan => self.overlay.kind(&path),
            ExecutionMode::Apply => disk_kind(&path),
        }
    }

    /// Writes `contents` to `path`, creating or replacing the file.
    pub fn try_write_file(&mut self, path: &Path, contents: &str) -> bool {
        if self.is_halted() {
            return false;
        }
        let path = resolve_components(path);
        let (kind, verb) = match self.kind_of(&path) {
            EntryKind::File => (MutationKind::Update, Verb::Update),
            _ => (MutationKind::Create, Verb::Create),
        };
        let subject = format!("\"{}\"", self.relative(&path));

        let parent_exists = path
            .parent()
            .is_some_and(|p| self.kind_of(p) == EntryKind::Directory);
        if !parent_exists || self.kind_of(&path) == EntryKind::Directory {
            let error = format!(
                "Cannot {} {subject} because its location is not a writable file path",
                verb.lower()
            );
            return self.record(kind, verb, &path, None, subject, Some(error));
        }

        if self.mode == ExecutionMode::Plan {
            self.overlay.set(&path, Staged::File);
            return self.record(kind, verb, &path, None, subject, None);
        }

        let journaling = self.journaling();
        let outcome = (|| -> io::Result<()> {
            let previous = if journaling && kind == MutationKind::Update {
                Some(fs::read(&path)?)
            } else {
                None
            };
            fs::write(&path, contents)?;
            if journaling {
                self.journal.push(JournalEntry::Wrote {
                    path: path.clone(),
                    previous,
                });
            }
            Ok(())
        })();

        let error = outcome
            .err()
            .map(|e| format!("Failed to {} {subject} ({e})", verb.lower()));
        self.record(kind, verb, &path, None, subject, error)
    }

    /// Deletes a file. Returns `false` without a record if there is no file.
    pub fn try_delete_file(&mut self, path: &Path) -> bool {
        self.try_delete(path, EntryKind::File)
    }

    /// Deletes a directory tree. Returns `false` without a record if there
    /// is no directory.
    pub fn try_delete_directory(&mut self, path: &Path) -> bool {
        self.try_delete(path, EntryKind::Directory)
    }

    fn try_delete(&mut self, path: &Path, expected: EntryKind) -> bool {
        if self.is_halted() {
            return false;
        }
        let path = resolve_components(path);
        if self.kind_of(&path) != expected {
            log::debug!("nothing to delete at {}", path.display());
            return false;
        }
        let subject = format!("\"{}\"", self.relative(&path));

        if self.mode == ExecutionMode::Plan {
            self.overlay.stage_delete(&path);
            return self.record(MutationKind::Delete, Verb::Delete, &path, None, subject, None);
        }

        let outcome = if self.journaling() {
            let backup = backup_path(&path);
            fs::rename(&path, &backup).map(|()| {
                self.journal.push(JournalEntry::Deleted {
                    original: path.clone(),
                    backup,
                });
            })
        } else if expected == EntryKind::Directory {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };

        let error = outcome
            .err()
            .map(|e| format!("Failed to delete {subject} ({e})"));
        self.record(MutationKind::Delete, Verb::Delete, &path, None, subject, error)
    }

    /// Moves a file. Returns `false` without a record if `old` is not a file.
    ///
    /// Fails when `new` already exists, unless `overwrite` is set or the two
    /// paths differ only in spelling.
    pub fn try_move_file(&mut self, old: &Path, new: &Path, overwrite: bool) -> bool {
        self.try_move(old, new, overwrite, EntryKind::File)
    }

    /// Moves a directory, creating missing parents of the destination.
    /// Returns `false` without a record if `old` is not a directory.
    pub fn try_move_directory(&mut self, old: &Path, new: &Path) -> bool {
        self.try_move(old, new, false, EntryKind::Directory)
    }

    fn try_move(&mut self, old: &Path, new: &Path, overwrite: bool, expected: EntryKind) -> bool {
        if self.is_halted() {
            return false;
        }
        let old = resolve_components(old);
        let new = resolve_components(new);
        if self.kind_of(&old) != expected {
            log::debug!("nothing to move at {}", old.display());
            return false;
        }

        let renaming = match (old.parent(), new.parent()) {
            (Some(a), Some(b)) => same_path(a, b),
            _ => false,
        };
        let verb = if renaming { Verb::Rename } else { Verb::Move };
        let target = if renaming {
            new.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        } else {
            self.relative(&new)
        };
        let subject = format!("\"{}\" to \"{target}\"", self.relative(&old));

        let respelling = same_path(&old, &new);
        let occupied = self.kind_of(&new);
        let replace_file = overwrite && expected == EntryKind::File && occupied == EntryKind::File;
        if !respelling && occupied != EntryKind::Missing && !replace_file {
            let error = format!(
                "Cannot {} {subject} because the destination already exists",
                verb.lower()
            );
            return self.record(MutationKind::Move, verb, &old, Some(&new), subject, Some(error));
        }

        if let Some(file) = self.file_ancestor(&new) {
            let error = format!(
                "Cannot {} {subject} because \"{}\" is not a directory",
                verb.lower(),
                self.relative(&file)
            );
            return self.record(MutationKind::Move, verb, &old, Some(&new), subject, Some(error));
        }

        let missing_parents = self.missing_ancestors(&new);
        if expected == EntryKind::File && !missing_parents.is_empty() {
            let error = format!(
                "Cannot {} {subject} because the destination directory does not exist",
                verb.lower()
            );
            return self.record(MutationKind::Move, verb, &old, Some(&new), subject, Some(error));
        }

        if self.mode == ExecutionMode::Plan {
            self.overlay.stage_directories(&missing_parents);
            self.overlay
                .stage_move(&old, &new, expected == EntryKind::Directory);
            return self.record(MutationKind::Move, verb, &old, Some(&new), subject, None);
        }

        let journaling = self.journaling();
        let outcome = (|| -> io::Result<()> {
            for dir in &missing_parents {
                fs::create_dir(dir)?;
                if journaling {
                    self.journal.push(JournalEntry::CreatedDirectory(dir.clone()));
                }
            }
            if replace_file && !respelling && journaling {
                let backup = backup_path(&new);
                fs::rename(&new, &backup)?;
                self.journal.push(JournalEntry::Deleted {
                    original: new.clone(),
                    backup,
                });
            }
            fs::rename(&old, &new)?;
            if journaling {
                self.journal.push(JournalEntry::Moved {
                    from: old.clone(),
                    to: new.clone(),
                });
            }
            Ok(())
        })();

        let error = outcome
            .err()
            .map(|e| format!("Failed to {} {subject} ({e})", verb.lower()));
        self.record(MutationKind::Move, verb, &old, Some(&new), subject, error)
    }

    /// Ends the batch.
    ///
    /// On success, backups kept for rollback are removed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RolledBack`] if a failure halted a rollback batch.
    /// In apply mode the completed changes have been undone by then.
    pub fn finish(&mut self) -> Result<()> {
        if let Some(failed) = self.halted.take() {
            let restored = match self.mode {
                ExecutionMode::Apply => self.roll_back(),
                ExecutionMode::Plan => 0,
            };
            return Err(Error::RolledBack { failed, restored });
        }

        for entry in self.journal.drain(..) {
            if let JournalEntry::Deleted { backup, .. } = entry {
                let removed = if backup.is_dir() {
                    fs::remove_dir_all(&backup)
                } else {
                    fs::remove_file(&backup)
                };
                if let Err(e) = removed {
                    log::warn!("could not remove backup {}: {e}", backup.display());
                }
            }
        }
        Ok(())
    }

    fn roll_back(&mut self) -> usize {
        let mut restored = 0;
        while let Some(entry) = self.journal.pop() {
            match entry.undo() {
                Ok(()) if !matches!(entry, JournalEntry::CreatedDirectory(_)) => restored += 1,
                Ok(()) => {}
                Err(e) => log::error!("could not undo {entry:?}: {e}"),
            }
        }
        log::debug!("rolled back {restored} change(s)");
        restored
    }

    fn journaling(&self) -> bool {
        self.mode == ExecutionMode::Apply && self.policy == FailurePolicy::Rollback
    }

    /// Missing ancestors of `path`, outermost first.
    fn missing_ancestors(&self, path: &Path) -> Vec<PathBuf> {
        let mut missing: Vec<PathBuf> = path
            .ancestors()
            .skip(1)
            .take_while(|dir| !dir.as_os_str().is_empty() && self.kind_of(dir) == EntryKind::Missing)
            .map(Path::to_path_buf)
            .collect();
        missing.reverse();
        missing
    }

    /// The nearest existing ancestor of `path` when it is a file.
    fn file_ancestor(&self, path: &Path) -> Option<PathBuf> {
        path.ancestors()
            .skip(1)
            .take_while(|dir| !dir.as_os_str().is_empty())
            .map(|dir| (dir, self.kind_of(dir)))
            .find(|(_, kind)| *kind != EntryKind::Missing)
            .filter(|(_, kind)| *kind == EntryKind::File)
            .map(|(dir, _)| dir.to_path_buf())
    }

    fn relative(&self, path: &Path) -> String {
        relative_path(&self.working_dir, path)
    }

    fn record(
        &mut self,
        kind: MutationKind,
        verb: Verb,
        source: &Path,
        destination: Option<&Path>,
        subject: String,
        error: Option<String>,
    ) -> bool {
        let success = error.is_none();
        if let Some(message) = &error {
            log::debug!("mutation failed: {message}");
            if self.policy == FailurePolicy::Rollback {
                self.halted = Some(message.clone());
            }
        }
        self.records.push(MutationRecord {
            kind,
            verb,
            source: source.to_path_buf(),
            destination: destination.map(Path::to_path_buf),
            success,
            subject,
            error,
        });
        success
    }
}

/// Unused sibling name used to park a deleted entry until commit.
fn backup_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    let mut candidate = parent.join(format!(".{name}.projmove-backup"));
    let mut n = 1;
    while candidate.exists() {
        candidate = parent.join(format!(".{name}.projmove-backup-{n}"));
        n += 1;
    }
    candidate
}
