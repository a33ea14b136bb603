//! Configuration schema definitions.
//!
//! This module defines the configuration structure for projmove: which file
//! extensions mark project and solution manifests, which directories are
//! never searched, where the upward workspace search stops, and how
//! mutation failures and reports are handled.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Project manifest extensions recognized when nothing is configured.
pub const DEFAULT_PROJECT_EXTENSIONS: &[&str] = &[".csproj", ".fsproj", ".vbproj", ".pyproj", ".proj"];

/// Solution manifest extensions recognized when nothing is configured.
pub const DEFAULT_SOLUTION_EXTENSIONS: &[&str] = &[".sln"];

/// Directory names that never contain workspace projects.
pub const DEFAULT_EXCLUDED_DIRECTORIES: &[&str] = &["bin", "obj", ".vs", ".git", ".hg", ".svn"];

/// Directory names that mark a repository root.
pub const DEFAULT_REPOSITORY_MARKERS: &[&str] = &[".git", ".hg", ".svn"];

/// Complete configuration structure.
///
/// Every field is optional so that partial configuration files can be
/// layered; accessors fall back to the built-in defaults.
///
/// # Examples
///
/// ```
/// use projmove::config::{Config, FailurePolicy};
///
/// let config = Config {
///     project_extensions: Some(vec![".csproj".to_string()]),
///     failure_policy: Some(FailurePolicy::Rollback),
///     ..Default::default()
/// };
/// assert!(config.is_project_file(std::path::Path::new("App/App.CSPROJ")));
/// assert!(!config.is_project_file(std::path::Path::new("Lib/Lib.fsproj")));
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// File extensions (with leading dot) of project manifests.
    pub project_extensions: Option<Vec<String>>,

    /// File extensions (with leading dot) of solution manifests.
    pub solution_extensions: Option<Vec<String>>,

    /// Directory names skipped during discovery.
    pub excluded_directories: Option<Vec<String>>,

    /// Directory names whose presence marks a repository root.
    pub repository_markers: Option<Vec<String>>,

    /// What to do when a filesystem mutation fails.
    pub failure_policy: Option<FailurePolicy>,

    /// Report format.
    pub output_format: Option<OutputFormat>,
}

impl Config {
    /// Returns a configuration with every field set to its built-in default.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            project_extensions: Some(to_owned_list(DEFAULT_PROJECT_EXTENSIONS)),
            solution_extensions: Some(to_owned_list(DEFAULT_SOLUTION_EXTENSIONS)),
            excluded_directories: Some(to_owned_list(DEFAULT_EXCLUDED_DIRECTORIES)),
            repository_markers: Some(to_owned_list(DEFAULT_REPOSITORY_MARKERS)),
            failure_policy: Some(FailurePolicy::default()),
            output_format: Some(OutputFormat::default()),
        }
    }

    /// Effective project extensions.
    #[must_use]
    pub fn project_extensions(&self) -> Vec<String> {
        self.project_extensions
            .clone()
            .unwrap_or_else(|| to_owned_list(DEFAULT_PROJECT_EXTENSIONS))
    }

    /// Effective solution extensions.
    #[must_use]
    pub fn solution_extensions(&self) -> Vec<String> {
        self.solution_extensions
            .clone()
            .unwrap_or_else(|| to_owned_list(DEFAULT_SOLUTION_EXTENSIONS))
    }

    /// Effective excluded directory names.
    #[must_use]
    pub fn excluded_directories(&self) -> Vec<String> {
        self.excluded_directories
            .clone()
            .unwrap_or_else(|| to_owned_list(DEFAULT_EXCLUDED_DIRECTORIES))
    }

    /// Effective repository marker names.
    #[must_use]
    pub fn repository_markers(&self) -> Vec<String> {
        self.repository_markers
            .clone()
            .unwrap_or_else(|| to_owned_list(DEFAULT_REPOSITORY_MARKERS))
    }

    /// Effective failure policy.
    #[must_use]
    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy.unwrap_or_default()
    }

    /// Effective output format.
    #[must_use]
    pub fn output_format(&self) -> OutputFormat {
        self.output_format.unwrap_or_default()
    }

    /// Returns `true` if the file name carries a project extension.
    #[must_use]
    pub fn is_project_file(&self, path: &Path) -> bool {
        has_extension(path, &self.project_extensions())
    }

    /// Returns `true` if the file name carries a solution extension.
    #[must_use]
    pub fn is_solution_file(&self, path: &Path) -> bool {
        has_extension(path, &self.solution_extensions())
    }

    /// Returns `true` if a directory with this name is never searched.
    #[must_use]
    pub fn is_excluded_directory(&self, name: &str) -> bool {
        self.excluded_directories()
            .iter()
            .any(|d| d.eq_ignore_ascii_case(name))
    }
}

/// Case-insensitive match of the file name against dotted extensions.
fn has_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_lowercase()) else {
        return false;
    };
    extensions.iter().any(|ext| {
        let ext = ext.to_lowercase();
        name.len() > ext.len() && name.ends_with(&ext)
    })
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Policy applied when a filesystem mutation fails mid-batch.
///
/// # Examples
///
/// ```
/// use projmove::config::FailurePolicy;
///
/// let policy: FailurePolicy = serde_yaml::from_str("rollback").unwrap();
/// assert_eq!(policy, FailurePolicy::Rollback);
/// assert_eq!(FailurePolicy::default(), FailurePolicy::BestEffort);
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Record the failure and continue with the remaining actions.
    #[default]
    BestEffort,
    /// Undo every completed action and fail the command.
    Rollback,
}

impl FailurePolicy {
    /// Parses a policy name as written in configuration.
    ///
    /// # Errors
    ///
    /// Returns an error message for unrecognized names.
    pub fn parse(s: &str) -> std::result::Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "best-effort" | "besteffort" => Ok(Self::BestEffort),
            "rollback" | "atomic" => Ok(Self::Rollback),
            _ => Err(format!("invalid failure policy: {s}")),
        }
    }
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BestEffort => write!(f, "best-effort"),
            Self::Rollback => write!(f, "rollback"),
        }
    }
}

/// Output format for reports.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable lines.
    #[default]
    Human,
    /// JSON document.
    Json,
}

impl OutputFormat {
    /// Parses a format name.
    ///
    /// # Errors
    ///
    /// Returns an error message for unrecognized names.
    pub fn parse(s: &str) -> std::result::Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            _ => Err(format!("invalid output format: {s}")),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Human => write!(f, "human"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let yaml = r"
project_extensions: ['.csproj', '.fsproj']
solution_extensions: ['.sln']
excluded_directories: ['bin', 'obj', 'node_modules']
repository_markers: ['.git']
failure_policy: rollback
output_format: json
";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            config.project_extensions,
            Some(vec![".csproj".to_string(), ".fsproj".to_string()])
        );
        assert_eq!(config.failure_policy, Some(FailurePolicy::Rollback));
        assert_eq!(config.output_format, Some(OutputFormat::Json));
        assert!(config.is_excluded_directory("node_modules"));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let yaml = "project_extension: ['.csproj']\n";
        let result: std::result::Result<Config, _> = serde_yaml::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.project_extensions(), to_owned_list(DEFAULT_PROJECT_EXTENSIONS));
        assert_eq!(config.failure_policy(), FailurePolicy::BestEffort);
        assert_eq!(config.output_format(), OutputFormat::Human);
    }

    #[test]
    fn test_with_defaults_matches_accessors() {
        let config = Config::with_defaults();
        assert_eq!(config.project_extensions(), Config::default().project_extensions());
        assert_eq!(config.repository_markers(), Config::default().repository_markers());
    }

    #[test]
    fn test_is_project_file_case_insensitive() {
        let config = Config::default();
        assert!(config.is_project_file(Path::new("/repo/App/App.CsProj")));
        assert!(config.is_project_file(Path::new("Tool.proj")));
        assert!(!config.is_project_file(Path::new("/repo/App/App.cs")));
        assert!(!config.is_project_file(Path::new(".csproj")));
    }

    #[test]
    fn test_is_solution_file() {
        let config = Config::default();
        assert!(config.is_solution_file(Path::new("All.SLN")));
        assert!(!config.is_solution_file(Path::new("All.slnx")));
    }

    #[test]
    fn test_excluded_directories_default() {
        let config = Config::default();
        assert!(config.is_excluded_directory("bin"));
        assert!(config.is_excluded_directory("OBJ"));
        assert!(!config.is_excluded_directory("src"));
    }

    #[test]
    fn test_failure_policy_parse() {
        assert_eq!(FailurePolicy::parse("best-effort").unwrap(), FailurePolicy::BestEffort);
        assert_eq!(FailurePolicy::parse("Rollback").unwrap(), FailurePolicy::Rollback);
        assert!(FailurePolicy::parse("sometimes").is_err());
    }

    #[test]
    fn test_output_format_display_roundtrip() {
        for format in [OutputFormat::Human, OutputFormat::Json] {
            assert_eq!(OutputFormat::parse(&format.to_string()).unwrap(), format);
        }
    }
}
