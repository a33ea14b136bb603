//! Filesystem scanning for project and solution manifests.

use std::fs;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::path::{relative_path, resolve_components, CanonicalPath};

/// Project manifests directly inside `dir`, sorted by file name.
///
/// A missing or unreadable directory yields no projects.
#[must_use]
pub fn projects_in_dir(dir: &Path, config: &Config) -> Vec<PathBuf> {
    files_in_dir(dir, |p| config.is_project_file(p))
}

/// Solution manifests directly inside `dir`, sorted by file name.
#[must_use]
pub fn solutions_in_dir(dir: &Path, config: &Config) -> Vec<PathBuf> {
    files_in_dir(dir, |p| config.is_solution_file(p))
}

fn files_in_dir<F>(dir: &Path, accept: F) -> Vec<PathBuf>
where
    F: Fn(&Path) -> bool,
{
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && accept(path))
        .collect();
    files.sort();
    files
}

/// All project manifests beneath `root`, skipping excluded directories.
///
/// Traversal order is deterministic (sorted by file name at each level).
#[must_use]
pub fn projects_recursive(root: &Path, config: &Config) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !config.is_excluded_directory(&entry.file_name().to_string_lossy())
        })
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::debug!("skipping unreadable entry: {e}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && config.is_project_file(entry.path()))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Returns `true` if `dir` contains one of the repository marker directories.
#[must_use]
pub fn is_repository_root(dir: &Path, config: &Config) -> bool {
    config
        .repository_markers()
        .iter()
        .any(|marker| dir.join(marker).exists())
}

/// Walks from `start` towards the filesystem root and returns the first
/// non-empty result of `check`.
///
/// The walk stops after checking a repository root.
pub fn search_upward<T, F>(start: &Path, config: &Config, mut check: F) -> Option<T>
where
    F: FnMut(&Path) -> Option<T>,
{
    let mut current = Some(start);
    while let Some(dir) = current {
        if let Some(found) = check(dir) {
            return Some(found);
        }
        if is_repository_root(dir, config) {
            log::debug!("upward search stopped at repository root {}", dir.display());
            return None;
        }
        current = dir.parent();
    }
    None
}

/// Returns `true` if any directory between `root` and `path` is excluded.
///
/// Leading `..` components (paths outside the root) are skipped, and the
/// file name itself is not checked.
#[must_use]
pub fn is_in_excluded_directory(path: &Path, root: &Path, config: &Config) -> bool {
    let relative = relative_path(root, path);
    let relative = Path::new(&relative);
    let Some(parent) = relative.parent() else {
        return false;
    };
    parent.components().any(|c| match c {
        Component::Normal(name) => config.is_excluded_directory(&name.to_string_lossy()),
        _ => false,
    })
}

/// Expands a `|`-separated list of glob segments against `working_dir`.
///
/// Segments naming an existing file or directory are taken literally;
/// everything else is matched case-insensitively. Results keep segment
/// order and are de-duplicated.
///
/// # Errors
///
/// Returns [`Error::InvalidPattern`] if a segment is not a valid glob.
pub fn expand_pattern(pattern: &str, working_dir: &Path) -> Result<Vec<PathBuf>> {
    let options = glob::MatchOptions {
        case_sensitive: false,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    let mut results: Vec<PathBuf> = Vec::new();
    let mut seen = std::collections::HashSet::new();
    let mut push = |path: PathBuf, results: &mut Vec<PathBuf>| {
        if seen.insert(CanonicalPath::new(&path)) {
            results.push(path);
        }
    };

    for segment in pattern.split('|').map(str::trim).filter(|s| !s.is_empty()) {
        let literal = resolve_components(&working_dir.join(segment));
        if literal.exists() {
            push(literal, &mut results);
            continue;
        }

        let full = if Path::new(segment).is_absolute() {
            segment.replace('\\', "/")
        } else {
            format!(
                "{}/{}",
                glob::Pattern::escape(&working_dir.to_string_lossy()),
                segment.replace('\\', "/")
            )
        };

        let paths = glob::glob_with(&full, options).map_err(|e| Error::InvalidPattern {
            pattern: segment.to_string(),
            reason: e.to_string(),
        })?;
        let mut matched: Vec<PathBuf> = paths
            .filter_map(std::result::Result::ok)
            .map(|p| resolve_components(&p))
            .collect();
        matched.sort();
        for path in matched {
            push(path, &mut results);
        }
    }

    Ok(results)
}
