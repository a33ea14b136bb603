//! Main entry point for the projmove CLI.
//!
//! This is the command-line interface for moving and renaming projects in
//! multi-project workspaces:
//! - `move-project`: Move or rename a project and fix its references
//! - `change-namespace`: Rename every project under a namespace prefix
//! - `fix-references`: Repair or remove broken project references
//! - `stray-projects`: List project files a solution does not include
//! - `show-workspace`: Show the resolved workspace

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::{fold_command_words, Cli};
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments, accepting sentence-style command names
    let cli = Cli::parse_from(fold_command_words(std::env::args_os().collect()));

    // Initialize logging based on verbosity
    projmove::init_logger(cli.verbose, cli.quiet).install();

    // Convert CLI args to GlobalOptions
    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        workspace: cli.workspace,
        stage: cli.stage,
        atomic: cli.atomic,
        format: cli.format,
    };

    // Execute the command
    let result = match cli.command {
        cli::Command::MoveProject(cmd) => cmd.execute(&global),
        cli::Command::ChangeNamespace(cmd) => cmd.execute(&global),
        cli::Command::FixReferences(cmd) => cmd.execute(&global),
        cli::Command::StrayProjects(cmd) => cmd.execute(&global),
        cli::Command::ShowWorkspace(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
