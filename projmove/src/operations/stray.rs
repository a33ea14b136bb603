//! Stray-projects operation: manifests on disk that a solution does not list.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::Result;
use crate::manifest::SolutionFile;
use crate::path::CanonicalPath;
use crate::workspace::discovery::projects_recursive;

/// Project manifests under `search_root` that `solution` does not list.
///
/// Excluded directories are skipped. Results are in traversal order.
///
/// # Errors
///
/// Returns an error if the solution cannot be read.
///
/// # Examples
///
/// ```no_run
/// use projmove::config::Config;
/// use projmove::operations::find_stray_projects;
/// use std::path::Path;
///
/// let strays = find_stray_projects(Path::new("/repo/All.sln"), Path::new("/repo"), &Config::default()).unwrap();
/// if strays.is_empty() {
///     println!("No stray projects were found");
/// }
/// ```
pub fn find_stray_projects(
    solution: &Path,
    search_root: &Path,
    config: &Config,
) -> Result<Vec<PathBuf>> {
    let members: HashSet<CanonicalPath> = SolutionFile::load(solution)?
        .member_projects(|p| config.is_project_file(p))
        .iter()
        .map(|p| CanonicalPath::new(p))
        .collect();
    log::debug!("{} lists {} project(s)", solution.display(), members.len());

    Ok(projects_recursive(search_root, config)
        .into_iter()
        .filter(|p| !members.contains(&CanonicalPath::new(p)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<Project />").unwrap();
    }

    #[test]
    fn test_unlisted_projects_reported() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "App/App.csproj");
        touch(temp.path(), "Tools/Tool.csproj");
        touch(temp.path(), "App/obj/Generated.csproj");
        fs::write(
            temp.path().join("All.sln"),
            "Project(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"App\", \"app\\APP.csproj\", \"{AAAAAAAA-0000-0000-0000-000000000001}\"\r\nEndProject\r\n",
        )
        .unwrap();

        let strays =
            find_stray_projects(&temp.path().join("All.sln"), temp.path(), &Config::default())
                .unwrap();
        assert_eq!(strays, vec![temp.path().join("Tools/Tool.csproj")]);
    }

    #[test]
    fn test_everything_listed() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "App/App.csproj");
        fs::write(
            temp.path().join("All.sln"),
            "Project(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"App\", \"App/App.csproj\", \"{AAAAAAAA-0000-0000-0000-000000000001}\"\r\nEndProject\r\n",
        )
        .unwrap();

        let strays =
            find_stray_projects(&temp.path().join("All.sln"), temp.path(), &Config::default())
                .unwrap();
        assert!(strays.is_empty());
    }

    #[test]
    fn test_missing_solution_is_error() {
        let temp = TempDir::new().unwrap();
        assert!(find_stray_projects(&temp.path().join("None.sln"), temp.path(), &Config::default())
            .is_err());
    }
}
