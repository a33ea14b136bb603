//! Translation of command arguments into move batches.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::path::{absolutize, same_path};
use crate::workspace::{project_name, Workspace};

use super::moves::Move;

/// Builds the move for `move-project <project> <new>`.
///
/// `project` is a manifest path or a project name (see
/// [`Workspace::find_project`]). `new` is either a manifest path relative to
/// the working directory, or a bare name. A bare name places the project in
/// a sibling directory of that name: `<parent of project dir>/<name>/<name><ext>`.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if the project cannot be found,
/// [`Error::AmbiguousProject`] if its name matches several projects, and
/// [`Error::MoveValidation`] if `new` names a project that already exists.
pub fn project_move(
    workspace: &Workspace,
    config: &Config,
    project: &str,
    new: &str,
) -> Result<Move> {
    let old_path = workspace.find_project(project, config)?;

    let new_path = if config.is_project_file(Path::new(new)) {
        absolutize(Path::new(new), &workspace.working_dir)?
    } else {
        sibling_location(&old_path, new)
    };

    if new_path.exists() && !same_path(&new_path, &old_path) {
        return Err(Error::move_validation(format!(
            "Project \"{}\" already exists",
            workspace.relative(&new_path)
        )));
    }

    Ok(Move::new(&old_path, &new_path))
}

/// `<parent of project dir>/<name>/<name><ext>` for the project at `old_path`.
fn sibling_location(old_path: &Path, name: &str) -> PathBuf {
    let project_dir = old_path.parent().unwrap_or_else(|| Path::new(""));
    let parent = project_dir.parent().unwrap_or(project_dir);
    let file_name = match old_path.extension() {
        Some(ext) => format!("{name}.{}", ext.to_string_lossy()),
        None => name.to_string(),
    };
    parent.join(name).join(file_name)
}

/// Returns `true` if `name` is `prefix` or a dotted child of it, ignoring
/// ASCII case.
///
/// # Examples
///
/// ```
/// use projmove::operations::is_in_namespace;
///
/// assert!(is_in_namespace("Acme.Core", "Acme"));
/// assert!(is_in_namespace("Acme", "acme"));
/// assert!(!is_in_namespace("AcmeTools", "Acme"));
/// ```
#[must_use]
pub fn is_in_namespace(name: &str, prefix: &str) -> bool {
    namespace_rest(name, prefix).is_some()
}

/// What follows `prefix` in `name`: empty or starting with a dot.
fn namespace_rest<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    let head = name.get(..prefix.len())?;
    let rest = &name[prefix.len()..];
    (head.eq_ignore_ascii_case(prefix) && (rest.is_empty() || rest.starts_with('.')))
        .then_some(rest)
}

/// Builds the batch for `change-namespace <old> <new>`.
///
/// Every workspace project whose name is in the `old` namespace is renamed
/// by swapping the prefix. A project directory named after the project
/// (ignoring case) is renamed too; other directories stay where they are.
///
/// An empty batch means there is nothing to rename.
#[must_use]
pub fn namespace_moves(workspace: &Workspace, old_prefix: &str, new_prefix: &str) -> Vec<Move> {
    let mut moves = Vec::new();
    for project in &workspace.projects {
        let name = project_name(project);
        let Some(rest) = namespace_rest(&name, old_prefix) else {
            continue;
        };

        let new_name = format!("{new_prefix}{rest}");
        let file_name = match project.extension() {
            Some(ext) => format!("{new_name}.{}", ext.to_string_lossy()),
            None => new_name.clone(),
        };

        let directory = project.parent().unwrap_or_else(|| Path::new(""));
        let renames_directory = directory
            .file_name()
            .is_some_and(|d| d.to_string_lossy().eq_ignore_ascii_case(&name));
        let new_directory = match directory.parent() {
            Some(parent) if renames_directory => parent.join(&new_name),
            _ => directory.to_path_buf(),
        };

        log::debug!("{name} becomes {new_name}");
        moves.push(Move::new(project, &new_directory.join(file_name)));
    }
    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn workspace(root: &Path, projects: &[&str]) -> Workspace {
        let mut paths = Vec::new();
        for rel in projects {
            let path = root.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "<Project />").unwrap();
            paths.push(path);
        }
        Workspace {
            working_dir: root.to_path_buf(),
            root_dir: root.to_path_buf(),
            solutions: Vec::new(),
            projects: paths,
        }
    }

    #[test]
    fn test_bare_name_becomes_sibling_directory() {
        let temp = TempDir::new().unwrap();
        let ws = workspace(temp.path(), &["src/Old/Old.csproj"]);
        let mv = project_move(&ws, &Config::default(), "old", "New").unwrap();
        assert_eq!(mv.old_path, temp.path().join("src/Old/Old.csproj"));
        assert_eq!(mv.new_path, temp.path().join("src/New/New.csproj"));
    }

    #[test]
    fn test_manifest_path_used_as_is() {
        let temp = TempDir::new().unwrap();
        let ws = workspace(temp.path(), &["Old/Old.csproj"]);
        let mv = project_move(&ws, &Config::default(), "Old/Old.csproj", "lib/Core/Core.csproj")
            .unwrap();
        assert_eq!(mv.new_path, temp.path().join("lib/Core/Core.csproj"));
    }

    #[test]
    fn test_existing_destination_rejected() {
        let temp = TempDir::new().unwrap();
        let ws = workspace(temp.path(), &["Old/Old.csproj", "New/New.csproj"]);
        let err = project_move(&ws, &Config::default(), "Old", "New").unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("New/New.csproj"));
    }

    #[test]
    fn test_unknown_project_not_found() {
        let temp = TempDir::new().unwrap();
        let ws = workspace(temp.path(), &["Old/Old.csproj"]);
        let err = project_move(&ws, &Config::default(), "Missing", "New").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_namespace_membership() {
        assert!(is_in_namespace("Acme.Web.Api", "Acme.Web"));
        assert!(!is_in_namespace("Acme.WebTools", "Acme.Web"));
        assert!(!is_in_namespace("Other", "Acme"));
        assert!(is_in_namespace("ACME.Core", "acme"));
        assert!(!is_in_namespace("Ac", "Acme"));
    }

    #[test]
    fn test_namespace_prefix_ignores_case() {
        let temp = TempDir::new().unwrap();
        let ws = workspace(temp.path(), &["Acme.Core/Acme.Core.csproj", "AcmeTools/AcmeTools.csproj"]);

        let moves = namespace_moves(&ws, "acme", "Contoso");
        assert_eq!(moves.len(), 1);
        assert_eq!(
            ws.relative(&moves[0].new_path),
            "Contoso.Core/Contoso.Core.csproj"
        );
    }

    #[test]
    fn test_namespace_moves_rename_matching_directories_only() {
        let temp = TempDir::new().unwrap();
        let ws = workspace(
            temp.path(),
            &[
                "Acme/Acme.csproj",
                "src/acme.core/Acme.Core.csproj",
                "tests/Acme.Tests.csproj",
                "AcmeTools/AcmeTools.csproj",
            ],
        );

        let moves = namespace_moves(&ws, "Acme", "Contoso");
        let pairs: Vec<_> = moves
            .iter()
            .map(|m| (ws.relative(&m.old_path), ws.relative(&m.new_path)))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("Acme/Acme.csproj".to_string(), "Contoso/Contoso.csproj".to_string()),
                (
                    "src/acme.core/Acme.Core.csproj".to_string(),
                    "src/Contoso.Core/Contoso.Core.csproj".to_string()
                ),
                (
                    "tests/Acme.Tests.csproj".to_string(),
                    "tests/Contoso.Tests.csproj".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_namespace_without_matches_is_empty() {
        let temp = TempDir::new().unwrap();
        let ws = workspace(temp.path(), &["App/App.csproj"]);
        assert!(namespace_moves(&ws, "Acme", "Contoso").is_empty());
    }
}
