//! Change-namespace command implementation.
//!
//! This module implements the `change-namespace` command, which renames
//! every project whose name is a namespace prefix or starts with it.

use crate::error::CliError;
use crate::utils::{
    load_configuration, move_options, print_report, resolve_workspace, GlobalOptions,
};
use clap::Args;
use projmove::operations::{execute_moves, namespace_moves};
use projmove::output::Report;

/// Rename every project under a namespace prefix.
#[derive(Args)]
pub struct ChangeNamespaceCommand {
    /// Namespace prefix to replace
    #[arg(value_name = "OLD_PREFIX")]
    pub old_prefix: String,

    /// Replacement prefix
    #[arg(value_name = "NEW_PREFIX")]
    pub new_prefix: String,

    /// Solution, solution glob, or directory defining the workspace
    #[arg(value_name = "SOLUTION")]
    pub solution: Option<String>,

    /// Replace destination directories that already exist
    #[arg(long)]
    pub force: bool,
}

impl ChangeNamespaceCommand {
    /// Execute the change-namespace command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        // 1. Validate arguments
        if self.old_prefix.trim().is_empty() || self.new_prefix.trim().is_empty() {
            return Err(CliError::InvalidArguments(
                "Namespace prefixes cannot be empty".to_string(),
            ));
        }

        // 2. Load configuration and resolve the workspace
        let config = load_configuration(global)?;
        let workspace = resolve_workspace(global, &config, self.solution.as_deref())?;

        // 3. Collect one move per project in the namespace
        let moves = namespace_moves(&workspace, &self.old_prefix, &self.new_prefix);
        log::debug!(
            "{} project(s) in namespace {}",
            moves.len(),
            self.old_prefix
        );

        // 4. Plan and run the batch
        let options = move_options(global, &config, self.force);
        let report = execute_moves(&config, &workspace, moves, options)?;

        print_report(
            &config,
            &Report::Moves {
                report: &report,
                empty_message: "Nothing to rename",
            },
        )?;

        let failures = report.execution.failure_count();
        if failures > 0 {
            log::warn!("{failures} change(s) failed");
        }

        report.execution.check()?;
        Ok(())
    }
}
