//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    ChangeNamespaceCommand, CompletionsCommand, FixReferencesCommand, MoveProjectCommand,
    ShowWorkspaceCommand, StrayProjectsCommand,
};
use clap::{Parser, Subcommand};
use projmove::config::OutputFormat;
use std::ffi::OsString;

/// Command-line tool for moving and renaming projects.
#[derive(Parser)]
#[command(name = "projmove")]
#[command(
    version,
    about = "Move and rename projects without breaking references",
    long_about = None
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Workspace to operate on: a solution, a solution glob, or a directory
    #[arg(long, value_name = "WORKSPACE", global = true, env = "PROJMOVE_WORKSPACE")]
    pub workspace: Option<String>,

    /// Report every change without modifying anything
    #[arg(long, global = true)]
    pub stage: bool,

    /// Undo completed changes if any change fails
    #[arg(long, global = true)]
    pub atomic: bool,

    /// Output format
    #[arg(long, value_enum, value_name = "FORMAT", global = true)]
    pub format: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Move or rename a project and fix everything that refers to it
    MoveProject(MoveProjectCommand),

    /// Rename every project under a namespace prefix
    ChangeNamespace(ChangeNamespaceCommand),

    /// Repair or remove broken project references
    FixReferences(FixReferencesCommand),

    /// List project files a solution does not include
    StrayProjects(StrayProjectsCommand),

    /// Show the resolved workspace
    ShowWorkspace(ShowWorkspaceCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}

/// Registered command names, used to fold sentence-style invocations.
pub const COMMAND_NAMES: &[&str] = &[
    "move-project",
    "change-namespace",
    "fix-references",
    "stray-projects",
    "show-workspace",
    "completions",
];

/// Global options that consume the following argument.
const VALUED_OPTIONS: &[&str] = &["--workspace", "--format"];

/// Fold a sentence-style command (`move project a b`) into its registered
/// name (`move-project a b`).
///
/// Only the first positional argument and the ones directly after it are
/// considered. Arguments that already name a command pass through unchanged.
pub fn fold_command_words(args: Vec<OsString>) -> Vec<OsString> {
    let Some(start) = first_positional(&args) else {
        return args;
    };

    let words: Vec<String> = args[start..]
        .iter()
        .map(|a| a.to_string_lossy().to_lowercase())
        .collect();
    if COMMAND_NAMES.contains(&words[0].as_str()) {
        return args;
    }

    for len in (2..=words.len().min(3)).rev() {
        let joined = words[..len].join("-");
        if let Some(name) = COMMAND_NAMES.iter().find(|n| **n == joined) {
            let mut folded = args[..start].to_vec();
            folded.push(OsString::from(*name));
            folded.extend_from_slice(&args[start + len..]);
            return folded;
        }
    }

    args
}

/// Index of the first argument that is neither the program name nor a
/// global option.
fn first_positional(args: &[OsString]) -> Option<usize> {
    let mut i = 1;
    while i < args.len() {
        let arg = args[i].to_string_lossy();
        if !arg.starts_with('-') {
            return Some(i);
        }
        if arg == "--" {
            return None;
        }
        i += if VALUED_OPTIONS.contains(&arg.as_ref()) { 2 } else { 1 };
    }
    None
}
