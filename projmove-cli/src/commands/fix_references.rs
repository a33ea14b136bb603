//! Fix-references command implementation.
//!
//! This module implements the `fix-references` command, which repoints
//! broken project references at a workspace project with the same file
//! name, or removes them when no such project exists.

use crate::error::CliError;
use crate::utils::{load_configuration, print_report, resolve_workspace, GlobalOptions};
use clap::Args;
use projmove::operations::{PlanExecutor, RepairOptions, RepairPlan};
use projmove::output::Report;

/// Repair or remove broken project references.
#[derive(Args)]
pub struct FixReferencesCommand {
    /// Solution, solution glob, or directory defining the workspace
    #[arg(value_name = "WORKSPACE")]
    pub target: Option<String>,

    /// Keep references that cannot be repaired instead of removing them
    #[arg(long)]
    pub keep_broken: bool,
}

impl FixReferencesCommand {
    /// Execute the fix-references command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        // 1. Load configuration and resolve the workspace
        let config = load_configuration(global)?;
        let workspace = resolve_workspace(global, &config, self.target.as_deref())?;

        // 2. Build the repair plan
        let options = RepairOptions::new().with_keep_broken(self.keep_broken);
        let plan = RepairPlan::new(&workspace, options).build_plan()?;

        // 3. Execute it
        let mut executor =
            PlanExecutor::new(&workspace.working_dir).with_policy(config.failure_policy());
        if global.stage {
            executor = executor.staged();
        }
        let result = executor.execute(&plan);

        print_report(
            &config,
            &Report::Execution {
                result: &result,
                empty_message: "Nothing to fix",
            },
        )?;

        result.check()?;
        Ok(())
    }
}
