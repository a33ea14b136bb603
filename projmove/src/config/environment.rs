//! Environment variable handling for configuration overrides.
//!
//! This module provides support for `PROJMOVE_*` environment variables that
//! override configuration file values.

use crate::config::schema::{Config, FailurePolicy, OutputFormat};
use crate::error::{Error, Result};
use std::env;

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use projmove::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to config.
    ///
    /// List variables are comma-separated and replace the configured list.
    ///
    /// # Errors
    ///
    /// Returns an error if a policy or format value is not recognized.
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Some(list) = Self::list_var("PROJMOVE_PROJECT_EXTENSIONS") {
            config.project_extensions = Some(list);
        }

        if let Some(list) = Self::list_var("PROJMOVE_SOLUTION_EXTENSIONS") {
            config.solution_extensions = Some(list);
        }

        if let Some(list) = Self::list_var("PROJMOVE_EXCLUDED_DIRECTORIES") {
            config.excluded_directories = Some(list);
        }

        if let Some(list) = Self::list_var("PROJMOVE_REPOSITORY_MARKERS") {
            config.repository_markers = Some(list);
        }

        if let Ok(val) = env::var("PROJMOVE_FAILURE_POLICY") {
            config.failure_policy =
                Some(FailurePolicy::parse(&val).map_err(|message| Error::Validation {
                    field: "PROJMOVE_FAILURE_POLICY".into(),
                    message,
                })?);
        }

        if let Ok(val) = env::var("PROJMOVE_OUTPUT_FORMAT") {
            config.output_format =
                Some(OutputFormat::parse(&val).map_err(|message| Error::Validation {
                    field: "PROJMOVE_OUTPUT_FORMAT".into(),
                    message,
                })?);
        }

        Ok(())
    }

    fn list_var(name: &str) -> Option<Vec<String>> {
        env::var(name).ok().map(|value| Self::parse_list(&value))
    }

    /// Parse a comma-separated list, dropping blank entries.
    fn parse_list(s: &str) -> Vec<String> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(ToString::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "PROJMOVE_PROJECT_EXTENSIONS",
        "PROJMOVE_SOLUTION_EXTENSIONS",
        "PROJMOVE_EXCLUDED_DIRECTORIES",
        "PROJMOVE_REPOSITORY_MARKERS",
        "PROJMOVE_FAILURE_POLICY",
        "PROJMOVE_OUTPUT_FORMAT",
    ];

    fn clear_vars() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(
            EnvironmentConfig::parse_list(".csproj, .fsproj"),
            vec![".csproj".to_string(), ".fsproj".to_string()]
        );
        assert_eq!(
            EnvironmentConfig::parse_list(" bin ,, obj "),
            vec!["bin".to_string(), "obj".to_string()]
        );
        assert!(EnvironmentConfig::parse_list("").is_empty());
    }

    #[test]
    #[serial]
    fn test_apply_overrides_no_env_vars() {
        clear_vars();
        let mut config = Config::default();
        EnvironmentConfig::apply_overrides(&mut config).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    #[serial]
    fn test_list_overrides_replace() {
        clear_vars();
        env::set_var("PROJMOVE_PROJECT_EXTENSIONS", ".csproj");
        env::set_var("PROJMOVE_EXCLUDED_DIRECTORIES", "bin,obj,node_modules");

        let mut config = Config::with_defaults();
        EnvironmentConfig::apply_overrides(&mut config).unwrap();
        clear_vars();

        assert_eq!(config.project_extensions, Some(vec![".csproj".to_string()]));
        assert_eq!(config.excluded_directories().len(), 3);
        assert!(config.is_excluded_directory("node_modules"));
    }

    #[test]
    #[serial]
    fn test_policy_and_format_overrides() {
        clear_vars();
        env::set_var("PROJMOVE_FAILURE_POLICY", "rollback");
        env::set_var("PROJMOVE_OUTPUT_FORMAT", "JSON");

        let mut config = Config::default();
        EnvironmentConfig::apply_overrides(&mut config).unwrap();
        clear_vars();

        assert_eq!(config.failure_policy, Some(FailurePolicy::Rollback));
        assert_eq!(config.output_format, Some(OutputFormat::Json));
    }

    #[test]
    #[serial]
    fn test_invalid_policy_rejected() {
        clear_vars();
        env::set_var("PROJMOVE_FAILURE_POLICY", "whenever");

        let mut config = Config::default();
        let result = EnvironmentConfig::apply_overrides(&mut config);
        clear_vars();

        match result {
            Err(Error::Validation { field, .. }) => assert_eq!(field, "PROJMOVE_FAILURE_POLICY"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
