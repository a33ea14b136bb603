//! Workspace resolution.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::discovery::{
    expand_pattern, is_in_excluded_directory, projects_in_dir, projects_recursive,
    search_upward, solutions_in_dir,
};
use super::spec::WorkspaceSpec;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::manifest::SolutionFile;
use crate::path::{absolutize, relative_path, CanonicalPath};

/// A concrete set of project manifests to operate on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Workspace {
    /// Directory relative paths are reported against.
    pub working_dir: PathBuf,
    /// Directory the workspace is rooted at.
    pub root_dir: PathBuf,
    /// Solution manifests whose member lists are kept in sync.
    pub solutions: Vec<PathBuf>,
    /// Project manifests, de-duplicated, in discovery order.
    pub projects: Vec<PathBuf>,
}

impl Workspace {
    /// The parent solution, when the workspace has exactly one.
    #[must_use]
    pub fn solution(&self) -> Option<&Path> {
        match self.solutions.as_slice() {
            [only] => Some(only.as_path()),
            _ => None,
        }
    }

    /// Returns `true` if no projects were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// `path` relative to the working directory, `/`-separated.
    #[must_use]
    pub fn relative(&self, path: &Path) -> String {
        relative_path(&self.working_dir, path)
    }

    /// Returns `true` if `path` is one of the workspace projects.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        let key = CanonicalPath::new(path);
        self.projects.iter().any(|p| CanonicalPath::new(p) == key)
    }

    /// Finds a project by file path or by project name.
    ///
    /// A reference carrying a project extension is a path relative to the
    /// working directory and must exist. Anything else is compared
    /// case-insensitively against the file stems of the workspace projects.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when nothing matches and
    /// [`Error::AmbiguousProject`] when a name matches several projects.
    pub fn find_project(&self, reference: &str, config: &Config) -> Result<PathBuf> {
        let as_path = Path::new(reference);
        if config.is_project_file(as_path) {
            let path = absolutize(as_path, &self.working_dir)?;
            if path.is_file() {
                return Ok(path);
            }
            return Err(Error::not_found(format!("project \"{reference}\"")));
        }

        let matches: Vec<&PathBuf> = self
            .projects
            .iter()
            .filter(|p| {
                p.file_stem()
                    .is_some_and(|stem| stem.to_string_lossy().eq_ignore_ascii_case(reference))
            })
            .collect();

        match matches.as_slice() {
            [] => Err(Error::not_found(format!("project \"{reference}\""))),
            [only] => Ok((*only).clone()),
            many => Err(Error::AmbiguousProject {
                name: reference.to_string(),
                candidates: many.iter().map(|p| self.relative(p)).collect(),
            }),
        }
    }
}

/// Turns workspace specifications into [`Workspace`]s.
///
/// # Examples
///
/// ```no_run
/// use projmove::config::Config;
/// use projmove::workspace::WorkspaceResolver;
/// use std::path::Path;
///
/// let config = Config::default();
/// let resolver = WorkspaceResolver::new(&config);
/// let workspace = resolver.resolve(Some("All.sln"), Path::new("/repo")).unwrap();
/// for project in &workspace.projects {
///     println!("{}", workspace.relative(project));
/// }
/// ```
#[derive(Debug)]
pub struct WorkspaceResolver<'a> {
    config: &'a Config,
}

impl<'a> WorkspaceResolver<'a> {
    /// Creates a resolver using the recognized extensions and exclusions
    /// of `config`.
    #[must_use]
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Resolves `spec` against `working_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named path does not exist, a
    /// pattern is invalid, or a solution manifest cannot be read.
    pub fn resolve(&self, spec: Option<&str>, working_dir: &Path) -> Result<Workspace> {
        let spec = WorkspaceSpec::parse(spec, working_dir, self.config)?;
        log::debug!("resolving workspace {spec:?}");

        let (root_dir, solutions, candidates) = match spec {
            WorkspaceSpec::Auto => self.resolve_auto(working_dir)?,
            WorkspaceSpec::Solution(sln) => {
                let root = parent_of(&sln);
                let members = self.solution_members(&sln)?;
                (root, vec![sln], members)
            }
            WorkspaceSpec::Project(project) => (parent_of(&project), Vec::new(), vec![project]),
            WorkspaceSpec::Directory(dir) => self.resolve_directory(&dir)?,
            WorkspaceSpec::Pattern(pattern) => {
                let mut solutions = Vec::new();
                let mut projects = Vec::new();
                for path in expand_pattern(&pattern, working_dir)? {
                    if path.is_dir() {
                        projects.extend(projects_recursive(&path, self.config));
                    } else if self.config.is_solution_file(&path) {
                        projects.extend(self.solution_members(&path)?);
                        solutions.push(path);
                    } else if self.config.is_project_file(&path) {
                        projects.push(path);
                    }
                }
                (working_dir.to_path_buf(), solutions, projects)
            }
        };

        let projects = self.finalize(&root_dir, candidates);
        Ok(Workspace {
            working_dir: working_dir.to_path_buf(),
            root_dir,
            solutions,
            projects,
        })
    }

    /// Upward search for a lone solution, then a lone project, then a
    /// recursive scan of the working directory.
    ///
    /// A directory holding several solutions (or projects) does not end the
    /// search; it continues to the parent.
    fn resolve_auto(&self, working_dir: &Path) -> Result<(PathBuf, Vec<PathBuf>, Vec<PathBuf>)> {
        let solution = search_upward(working_dir, self.config, |dir| {
            single(solutions_in_dir(dir, self.config))
        });
        if let Some(sln) = solution {
            let members = self.solution_members(&sln)?;
            return Ok((parent_of(&sln), vec![sln], members));
        }

        let project = search_upward(working_dir, self.config, |dir| {
            single(projects_in_dir(dir, self.config))
        });
        if let Some(project) = project {
            return Ok((parent_of(&project), Vec::new(), vec![project]));
        }

        Ok((
            working_dir.to_path_buf(),
            Vec::new(),
            projects_recursive(working_dir, self.config),
        ))
    }

    /// A directory with a single solution resolves to it; otherwise every
    /// project beneath the directory.
    fn resolve_directory(&self, dir: &Path) -> Result<(PathBuf, Vec<PathBuf>, Vec<PathBuf>)> {
        if let [sln] = solutions_in_dir(dir, self.config).as_slice() {
            let members = self.solution_members(sln)?;
            return Ok((dir.to_path_buf(), vec![sln.clone()], members));
        }
        Ok((
            dir.to_path_buf(),
            Vec::new(),
            projects_recursive(dir, self.config),
        ))
    }

    fn solution_members(&self, sln: &Path) -> Result<Vec<PathBuf>> {
        let solution = SolutionFile::load(sln)?;
        Ok(solution.member_projects(|p| self.config.is_project_file(p)))
    }

    /// Drops excluded and duplicate entries, keeping first occurrences.
    fn finalize(&self, root: &Path, candidates: Vec<PathBuf>) -> Vec<PathBuf> {
        let mut seen = HashSet::new();
        candidates
            .into_iter()
            .filter(|p| !is_in_excluded_directory(p, root, self.config))
            .filter(|p| seen.insert(CanonicalPath::new(p)))
            .collect()
    }
}

fn single(mut found: Vec<PathBuf>) -> Option<PathBuf> {
    if found.len() == 1 {
        found.pop()
    } else {
        None
    }
}

fn parent_of(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const TYPE_ID: &str = "{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}";

    fn touch(root: &Path, rel: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "<Project />\n").unwrap();
        path
    }

    fn write_sln(root: &Path, rel: &str, members: &[&str]) -> PathBuf {
        let mut text = String::from("Microsoft Visual Studio Solution File, Format Version 12.00\n");
        for (i, member) in members.iter().enumerate() {
            let name = Path::new(member).file_stem().unwrap().to_string_lossy();
            text.push_str(&format!(
                "Project(\"{TYPE_ID}\") = \"{name}\", \"{member}\", \"{{00000000-0000-0000-0000-00000000000{i}}}\"\nEndProject\n"
            ));
        }
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, text).unwrap();
        path
    }

    fn repo() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".git")).unwrap();
        temp
    }

    #[test]
    fn test_explicit_solution_expands_members() {
        let temp = repo();
        let app = touch(temp.path(), "src/App/App.csproj");
        let lib = touch(temp.path(), "src/Lib/Lib.csproj");
        touch(temp.path(), "src/Stray/Stray.csproj");
        let sln = write_sln(temp.path(), "All.sln", &["src\\App\\App.csproj", "src/Lib/Lib.csproj"]);

        let config = Config::default();
        let ws = WorkspaceResolver::new(&config)
            .resolve(Some("All.sln"), temp.path())
            .unwrap();

        assert_eq!(ws.solution(), Some(sln.as_path()));
        assert_eq!(ws.root_dir, temp.path());
        assert_eq!(ws.projects, vec![app, lib]);
    }

    #[test]
    fn test_auto_finds_single_solution_upward() {
        let temp = repo();
        let app = touch(temp.path(), "src/App/App.csproj");
        write_sln(temp.path(), "All.sln", &["src/App/App.csproj"]);

        let config = Config::default();
        let ws = WorkspaceResolver::new(&config)
            .resolve(None, &temp.path().join("src").join("App"))
            .unwrap();

        assert_eq!(ws.solutions.len(), 1);
        assert_eq!(ws.root_dir, temp.path());
        assert_eq!(ws.projects, vec![app]);
    }

    #[test]
    fn test_auto_with_two_solutions_falls_back_to_scan() {
        let temp = repo();
        let app = touch(temp.path(), "App/App.csproj");
        let lib = touch(temp.path(), "Lib/Lib.csproj");
        write_sln(temp.path(), "A.sln", &["App/App.csproj"]);
        write_sln(temp.path(), "B.sln", &["Lib/Lib.csproj"]);

        let config = Config::default();
        let ws = WorkspaceResolver::new(&config).resolve(None, temp.path()).unwrap();

        assert!(ws.solutions.is_empty());
        assert_eq!(ws.projects, vec![app, lib]);
    }

    #[test]
    fn test_auto_climbs_past_directory_with_two_solutions() {
        let temp = repo();
        let app = touch(temp.path(), "sub/App/App.csproj");
        write_sln(temp.path(), "sub/A.sln", &["App/App.csproj"]);
        write_sln(temp.path(), "sub/B.sln", &["App/App.csproj"]);
        let all = write_sln(temp.path(), "All.sln", &["sub/App/App.csproj"]);

        let config = Config::default();
        let ws = WorkspaceResolver::new(&config)
            .resolve(None, &temp.path().join("sub"))
            .unwrap();

        assert_eq!(ws.solution(), Some(all.as_path()));
        assert_eq!(ws.root_dir, temp.path());
        assert_eq!(ws.projects, vec![app]);
    }

    #[test]
    fn test_auto_finds_single_project_upward() {
        let temp = repo();
        let app = touch(temp.path(), "App/App.csproj");
        fs::create_dir_all(temp.path().join("App/Properties")).unwrap();

        let config = Config::default();
        let ws = WorkspaceResolver::new(&config)
            .resolve(None, &temp.path().join("App/Properties"))
            .unwrap();

        assert_eq!(ws.projects, vec![app]);
        assert_eq!(ws.root_dir, temp.path().join("App"));
    }

    #[test]
    fn test_auto_recursive_excludes_build_output() {
        let temp = repo();
        let app = touch(temp.path(), "App/App.csproj");
        let lib = touch(temp.path(), "Lib/Lib.csproj");
        touch(temp.path(), "App/obj/App.csproj");

        let config = Config::default();
        let ws = WorkspaceResolver::new(&config).resolve(None, temp.path()).unwrap();
        assert_eq!(ws.projects, vec![app, lib]);
        assert_eq!(ws.root_dir, temp.path());
    }

    #[test]
    fn test_solution_members_in_excluded_dirs_dropped() {
        let temp = repo();
        let app = touch(temp.path(), "App/App.csproj");
        touch(temp.path(), "bin/Gen/Gen.csproj");
        write_sln(temp.path(), "All.sln", &["App/App.csproj", "bin/Gen/Gen.csproj"]);

        let config = Config::default();
        let ws = WorkspaceResolver::new(&config)
            .resolve(Some("All.sln"), temp.path())
            .unwrap();
        assert_eq!(ws.projects, vec![app]);
    }

    #[test]
    fn test_pattern_with_solution_and_duplicates() {
        let temp = repo();
        let app = touch(temp.path(), "App/App.csproj");
        let lib = touch(temp.path(), "Lib/Lib.csproj");
        write_sln(temp.path(), "All.sln", &["App/App.csproj"]);

        let config = Config::default();
        let ws = WorkspaceResolver::new(&config)
            .resolve(Some("*.sln|**/*.csproj"), temp.path())
            .unwrap();

        assert_eq!(ws.solutions.len(), 1);
        assert_eq!(ws.projects, vec![app, lib]);
    }

    #[test]
    fn test_pattern_without_matches_is_empty() {
        let temp = repo();
        let config = Config::default();
        let ws = WorkspaceResolver::new(&config)
            .resolve(Some("**/*.vbproj"), temp.path())
            .unwrap();
        assert!(ws.is_empty());
    }

    #[test]
    fn test_find_project_by_name_and_path() {
        let temp = repo();
        let app = touch(temp.path(), "App/App.csproj");
        touch(temp.path(), "a/Core/Core.csproj");
        touch(temp.path(), "b/Core/Core.csproj");

        let config = Config::default();
        let ws = WorkspaceResolver::new(&config).resolve(None, temp.path()).unwrap();

        assert_eq!(ws.find_project("app", &config).unwrap(), app);
        assert_eq!(ws.find_project("App/App.csproj", &config).unwrap(), app);
        assert!(ws.find_project("Missing", &config).unwrap_err().is_not_found());
        match ws.find_project("Core", &config) {
            Err(Error::AmbiguousProject { candidates, .. }) => {
                assert_eq!(candidates, vec!["a/Core/Core.csproj", "b/Core/Core.csproj"]);
            }
            other => panic!("expected ambiguity, got {other:?}"),
        }
    }
}
