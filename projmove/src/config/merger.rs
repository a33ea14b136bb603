//! Configuration merging and precedence handling.
//!
//! List fields are replaced wholesale by higher-precedence sources; they are
//! never accumulated, so a project can narrow the recognized extensions.

use crate::config::loader::ConfigSource;
use crate::config::schema::Config;

/// Merges configuration sources according to precedence rules.
///
/// # Examples
///
/// ```
/// use projmove::config::{Config, ConfigMerger, OutputFormat};
///
/// let low = Config { output_format: Some(OutputFormat::Human), ..Default::default() };
/// let high = Config { output_format: Some(OutputFormat::Json), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.output_format, Some(OutputFormat::Json));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge multiple configuration sources on top of `base`.
    ///
    /// Sources should be provided in order from lowest to highest precedence.
    #[must_use]
    pub fn merge(base: Config, sources: Vec<ConfigSource>) -> Config {
        let mut result = base;

        for source in sources {
            log::debug!("merging config from {}", source.path.display());
            Self::merge_into(&mut result, &source.config);
        }

        result
    }

    /// Merge source config into target (source overwrites target).
    ///
    /// Every field is replaced when the source sets it.
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.project_extensions.is_some() {
            target.project_extensions.clone_from(&source.project_extensions);
        }

        if source.solution_extensions.is_some() {
            target.solution_extensions.clone_from(&source.solution_extensions);
        }

        if source.excluded_directories.is_some() {
            target.excluded_directories.clone_from(&source.excluded_directories);
        }

        if source.repository_markers.is_some() {
            target.repository_markers.clone_from(&source.repository_markers);
        }

        if source.failure_policy.is_some() {
            target.failure_policy = source.failure_policy;
        }

        if source.output_format.is_some() {
            target.output_format = source.output_format;
        }
    }
}
