//! Move-project command implementation.
//!
//! This module implements the `move-project` command, which moves or
//! renames one project and rewrites every reference and solution entry that
//! points at it.

use crate::error::CliError;
use crate::utils::{
    load_configuration, move_options, print_report, resolve_workspace, GlobalOptions,
};
use clap::Args;
use projmove::operations::{execute_moves, project_move};
use projmove::output::Report;

/// Move or rename a project.
#[derive(Args)]
pub struct MoveProjectCommand {
    /// Project to move: a project file path or a project name
    #[arg(value_name = "PROJECT")]
    pub project: String,

    /// New project file path, or a bare name to rename in place
    #[arg(value_name = "NEW_PROJECT")]
    pub new_project: String,

    /// Solution, solution glob, or directory defining the workspace
    #[arg(value_name = "SOLUTION")]
    pub solution: Option<String>,

    /// Replace a destination directory that already exists
    #[arg(long)]
    pub force: bool,
}

impl MoveProjectCommand {
    /// Execute the move-project command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        // 1. Load configuration
        let config = load_configuration(global)?;

        // 2. Resolve the workspace and the requested move
        let workspace = resolve_workspace(global, &config, self.solution.as_deref())?;
        let request = project_move(&workspace, &config, &self.project, &self.new_project)?;

        // 3. Plan and run the batch
        let options = move_options(global, &config, self.force);
        let report = execute_moves(&config, &workspace, vec![request], options)?;

        // 4. Report
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
