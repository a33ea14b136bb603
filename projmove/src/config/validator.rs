//! Configuration validation.
//!
//! This module checks that configured extensions and directory names are
//! usable before any discovery runs.

use crate::config::schema::Config;
use crate::error::{Error, Result};

/// Validates configuration values.
///
/// # Examples
///
/// ```
/// use projmove::config::{Config, ConfigValidator};
///
/// ConfigValidator::validate(&Config::with_defaults()).unwrap();
///
/// let bad = Config { project_extensions: Some(vec!["csproj".into()]), ..Default::default() };
/// assert!(ConfigValidator::validate(&bad).is_err());
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first offending field.
    pub fn validate(config: &Config) -> Result<()> {
        if let Some(ref extensions) = config.project_extensions {
            Self::validate_extensions("project_extensions", extensions)?;
        }

        if let Some(ref extensions) = config.solution_extensions {
            Self::validate_extensions("solution_extensions", extensions)?;
        }

        if let Some(ref dirs) = config.excluded_directories {
            Self::validate_directory_names("excluded_directories", dirs)?;
        }

        if let Some(ref markers) = config.repository_markers {
            Self::validate_directory_names("repository_markers", markers)?;
        }

        if let (Some(projects), Some(solutions)) =
            (&config.project_extensions, &config.solution_extensions)
        {
            if let Some(shared) = projects
                .iter()
                .find(|p| solutions.iter().any(|s| s.eq_ignore_ascii_case(p)))
            {
                return Err(Error::Validation {
                    field: "solution_extensions".into(),
                    message: format!("'{shared}' is also a project extension"),
                });
            }
        }

        Ok(())
    }

    /// Extensions must be non-empty, start with a dot and contain no separators.
    fn validate_extensions(field: &str, extensions: &[String]) -> Result<()> {
        if extensions.is_empty() {
            return Err(Error::Validation {
                field: field.into(),
                message: "Must list at least one extension".into(),
            });
        }

        for ext in extensions {
            if !ext.starts_with('.') || ext.len() < 2 {
                return Err(Error::Validation {
                    field: field.into(),
                    message: format!("'{ext}' must start with '.' followed by a name"),
                });
            }
            if ext.contains(['/', '\\']) || ext.chars().any(char::is_whitespace) {
                return Err(Error::Validation {
                    field: field.into(),
                    message: format!("'{ext}' must not contain separators or whitespace"),
                });
            }
        }

        Ok(())
    }

    /// Directory names must be single components.
    fn validate_directory_names(field: &str, names: &[String]) -> Result<()> {
        if names.is_empty() {
            return Err(Error::Validation {
                field: field.into(),
                message: "Must list at least one directory name".into(),
            });
        }

        for name in names {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err(Error::Validation {
                    field: field.into(),
                    message: "Cannot contain empty names".into(),
                });
            }
            if trimmed.contains(['/', '\\']) {
                return Err(Error::Validation {
                    field: field.into(),
                    message: format!("'{name}' must be a directory name, not a path"),
                });
            }
            if trimmed == "." || trimmed == ".." {
                return Err(Error::Validation {
                    field: field.into(),
                    message: format!("'{name}' is not a valid directory name"),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(result: Result<()>) -> String {
        match result {
            Err(Error::Validation { field, .. }) => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        ConfigValidator::validate(&Config::default()).unwrap();
        ConfigValidator::validate(&Config::with_defaults()).unwrap();
    }

    #[test]
    fn test_empty_extension_list_rejected() {
        let config = Config {
            project_extensions: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(field_of(ConfigValidator::validate(&config)), "project_extensions");
    }

    #[test]
    fn test_extension_without_dot_rejected() {
        let config = Config {
            solution_extensions: Some(vec!["sln".into()]),
            ..Default::default()
        };
        assert_eq!(field_of(ConfigValidator::validate(&config)), "solution_extensions");
    }

    #[test]
    fn test_bare_dot_extension_rejected() {
        let config = Config {
            project_extensions: Some(vec![".".into()]),
            ..Default::default()
        };
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_directory_with_separator_rejected() {
        let config = Config {
            excluded_directories: Some(vec!["build/out".into()]),
            ..Default::default()
        };
        assert_eq!(field_of(ConfigValidator::validate(&config)), "excluded_directories");
    }

    #[test]
    fn test_empty_excluded_directories_rejected() {
        let config = Config {
            excluded_directories: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(field_of(ConfigValidator::validate(&config)), "excluded_directories");
    }

    #[test]
    fn test_empty_repository_markers_rejected() {
        let config = Config {
            repository_markers: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(field_of(ConfigValidator::validate(&config)), "repository_markers");
    }

    #[test]
    fn test_overlapping_extensions_rejected() {
        let config = Config {
            project_extensions: Some(vec![".proj".into()]),
            solution_extensions: Some(vec![".PROJ".into()]),
            ..Default::default()
        };
        assert_eq!(field_of(ConfigValidator::validate(&config)), "solution_extensions");
    }
}
