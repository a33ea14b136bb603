//! Configuration system for projmove.
//!
//! This module provides hierarchical configuration with support for:
//! - YAML configuration files (user config and directory `projmove.yaml`)
//! - Environment variable overrides
//! - Programmatic configuration via builder pattern
//! - Validation of extensions and directory names
//!
//! # Configuration Precedence
//!
//! Configuration is merged from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Programmatic overrides (via `ConfigBuilder::with_config`)
//! 2. Environment variables (`PROJMOVE_*`)
//! 3. Nearest `projmove.yaml` at or above the working directory
//! 4. User config (`~/.projmove/config.yaml`)
//! 5. Built-in defaults
//!
//! List fields are replaced, never accumulated.
//!
//! # Examples
//!
//! ```no_run
//! use projmove::config::ConfigBuilder;
//! use std::path::Path;
//!
//! let config = ConfigBuilder::new()
//!     .with_working_dir(Path::new("/path/to/repo"))
//!     .build()
//!     .unwrap();
//!
//! println!("Project extensions: {:?}", config.project_extensions());
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

pub use builder::ConfigBuilder;
pub use environment::EnvironmentConfig;
pub use loader::{ConfigLoader, ConfigSource};
pub use merger::ConfigMerger;
pub use schema::{Config, FailurePolicy, OutputFormat};
pub use validator::ConfigValidator;
