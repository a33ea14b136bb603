//! Classification of user-supplied workspace specifications.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::path::absolutize;

/// What the user asked to operate on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceSpec {
    /// Nothing given: discover from the working directory.
    Auto,
    /// An existing solution manifest.
    Solution(PathBuf),
    /// An existing project manifest.
    Project(PathBuf),
    /// An existing directory.
    Directory(PathBuf),
    /// A `|`-separated list of glob segments.
    Pattern(String),
}

impl WorkspaceSpec {
    /// Classifies `spec` relative to `working_dir`.
    ///
    /// Blank input means [`WorkspaceSpec::Auto`]. Input containing `*`, `?`
    /// or `|` is a pattern. Anything else must name an existing path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for a plain path that does not exist, and
    /// [`Error::InvalidPath`] for an existing file that is neither a
    /// project nor a solution.
    ///
    /// # Examples
    ///
    /// ```
    /// use projmove::config::Config;
    /// use projmove::workspace::WorkspaceSpec;
    /// use std::path::Path;
    ///
    /// let cwd = Path::new("/");
    /// let config = Config::default();
    /// assert_eq!(WorkspaceSpec::parse(None, cwd, &config).unwrap(), WorkspaceSpec::Auto);
    /// assert_eq!(
    ///     WorkspaceSpec::parse(Some("src/**/*.csproj"), cwd, &config).unwrap(),
    ///     WorkspaceSpec::Pattern("src/**/*.csproj".to_string())
    /// );
    /// ```
    pub fn parse(spec: Option<&str>, working_dir: &Path, config: &Config) -> Result<Self> {
        let Some(spec) = spec.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(Self::Auto);
        };

        if spec.contains(['*', '?', '|']) {
            return Ok(Self::Pattern(spec.to_string()));
        }

        let path = absolutize(Path::new(spec), working_dir)?;
        if path.is_dir() {
            Ok(Self::Directory(path))
        } else if path.is_file() {
            if config.is_solution_file(&path) {
                Ok(Self::Solution(path))
            } else if config.is_project_file(&path) {
                Ok(Self::Project(path))
            } else {
                Err(Error::InvalidPath {
                    path,
                    reason: "not a project or solution manifest".to_string(),
                })
            }
        } else {
            Err(Error::not_found(format!("workspace \"{spec}\"")))
        }
    }
}
