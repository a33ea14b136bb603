//! Show-workspace command implementation.

use crate::error::CliError;
use crate::utils::{load_configuration, print_report, resolve_workspace, GlobalOptions};
use clap::Args;
use projmove::output::Report;

/// Show the resolved workspace.
#[derive(Args)]
pub struct ShowWorkspaceCommand {
    /// Solution, solution glob, or directory defining the workspace
    #[arg(value_name = "WORKSPACE")]
    pub target: Option<String>,
}

impl ShowWorkspaceCommand {
    /// Execute the show-workspace command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let workspace = resolve_workspace(global, &config, self.target.as_deref())?;
        print_report(&config, &Report::Workspace(&workspace))
    }
}
