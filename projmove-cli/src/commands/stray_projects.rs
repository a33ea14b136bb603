//! Stray-projects command implementation.
//!
//! This module implements the `stray-projects` command, which lists project
//! files under the working directory that a solution does not include.

use crate::error::CliError;
use crate::utils::{
    load_configuration, print_report, resolve_workspace, working_dir, GlobalOptions,
};
use clap::Args;
use projmove::operations::find_stray_projects;
use projmove::output::Report;

/// List project files a solution does not include.
#[derive(Args)]
pub struct StrayProjectsCommand {
    /// Solution to check (default: the workspace solution)
    #[arg(value_name = "SOLUTION")]
    pub solution: Option<String>,
}

impl StrayProjectsCommand {
    /// Execute the stray-projects command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let workspace = resolve_workspace(global, &config, self.solution.as_deref())?;

        let solution = workspace
            .solution()
            .ok_or_else(|| CliError::NotFound("Solution".to_string()))?;

        let search_root = working_dir()?;
        let projects = find_stray_projects(solution, &search_root, &config)?;

        print_report(
            &config,
            &Report::StrayProjects {
                solution,
                projects: &projects,
                working_dir: &search_root,
            },
        )
    }
}
