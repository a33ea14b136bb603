//! Utility functions for CLI operations.
//!
//! This module provides helpers shared across CLI commands: configuration
//! loading, workspace resolution, and report printing.

use crate::error::CliError;
use projmove::config::{FailurePolicy, OutputFormat};
use projmove::operations::MoveOptions;
use projmove::output::Report;
use projmove::{Config, ConfigBuilder, Workspace, WorkspaceResolver};
use std::env;
use std::path::PathBuf;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone, Default)]
#[allow(dead_code)] // verbose is consumed by the logger in main.rs
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Workspace to operate on (solution path, glob, or directory).
    pub workspace: Option<String>,

    /// Report what would change without modifying anything.
    pub stage: bool,

    /// Undo completed changes when one fails.
    pub atomic: bool,

    /// Output format override.
    pub format: Option<OutputFormat>,
}

/// The current working directory.
pub fn working_dir() -> Result<PathBuf, CliError> {
    Ok(env::current_dir()?)
}

/// Load hierarchical configuration.
///
/// Configuration is merged from multiple sources with precedence:
/// 1. Global options (highest priority)
/// 2. Environment variables
/// 3. Configuration files
/// 4. Built-in defaults (lowest priority)
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let mut builder = ConfigBuilder::new().with_working_dir(&working_dir()?);

    let overrides = Config {
        failure_policy: global.atomic.then_some(FailurePolicy::Rollback),
        output_format: global.format,
        ..Config::default()
    };
    if overrides.failure_policy.is_some() || overrides.output_format.is_some() {
        builder = builder.with_config(overrides);
    }

    builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// Resolve the workspace a command operates on.
///
/// A positional solution argument takes precedence over `--workspace`.
pub fn resolve_workspace(
    global: &GlobalOptions,
    config: &Config,
    solution: Option<&str>,
) -> Result<Workspace, CliError> {
    let spec = solution.or(global.workspace.as_deref());
    let workspace = WorkspaceResolver::new(config).resolve(spec, &working_dir()?)?;
    log::debug!(
        "Resolved workspace at {} with {} project(s)",
        workspace.root_dir.display(),
        workspace.projects.len()
    );
    Ok(workspace)
}

/// Move options from global flags and configuration.
pub fn move_options(global: &GlobalOptions, config: &Config, force: bool) -> MoveOptions {
    MoveOptions::new()
        .with_force(force)
        .staged(global.stage)
        .with_policy(config.failure_policy())
}

/// Render `report` in the configured format and print it to stdout.
pub fn print_report(config: &Config, report: &Report<'_>) -> Result<(), CliError> {
    let formatter = config.output_format().create_formatter();
    let text = formatter.format(report)?;
    if !text.is_empty() {
        println!("{text}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_options_follow_flags() {
        let global = GlobalOptions {
            stage: true,
            ..GlobalOptions::default()
        };
        let config = Config {
            failure_policy: Some(FailurePolicy::Rollback),
            ..Config::default()
        };

        let options = move_options(&global, &config, true);
        assert!(options.force);
        assert_eq!(options.mode, projmove::ExecutionMode::Plan);
        assert_eq!(options.failure_policy, FailurePolicy::Rollback);
    }

    #[test]
    fn test_move_options_defaults() {
        let options = move_options(&GlobalOptions::default(), &Config::default(), false);
        assert_eq!(options, MoveOptions::new());
    }
}
