//! Build script for projmove-cli.
//!
//! This script generates man pages at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs
/// When adding/removing/modifying commands, update both files.
fn build_cli() -> Command {
    Command::new("projmove")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Move and rename projects without breaking references")
        .long_about(
            "Command-line tool for moving and renaming projects in multi-project workspaces \
             while keeping project references and solution entries in sync",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("workspace")
                .long("workspace")
                .help("Workspace to operate on: a solution, a solution glob, or a directory")
                .value_name("WORKSPACE")
                .global(true)
                .env("PROJMOVE_WORKSPACE"),
        )
        .arg(
            Arg::new("stage")
                .long("stage")
                .help("Report every change without modifying anything")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("atomic")
                .long("atomic")
                .help("Undo completed changes if any change fails")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .help("Output format")
                .value_name("FORMAT")
                .value_parser(["human", "json"])
                .global(true),
        )
        .subcommands(vec![
            Command::new("move-project")
                .about("Move or rename a project and fix everything that refers to it")
                .long_about(
                    "Move a project to a new path, or rename it in place, rewriting project \
                     references in both directions and every solution entry",
                ),
            Command::new("change-namespace")
                .about("Rename every project under a namespace prefix")
                .long_about(
                    "Rename every project whose name equals or starts with the old prefix, \
                     together with its directory when the directory carries the project name",
                ),
            Command::new("fix-references")
                .about("Repair or remove broken project references")
                .long_about(
                    "Repoint broken project references at a workspace project with the same \
                     file name, or remove them",
                ),
            Command::new("stray-projects")
                .about("List project files a solution does not include")
                .long_about("List project files under the working directory missing from a solution"),
            Command::new("show-workspace")
                .about("Show the resolved workspace")
                .long_about("Display the solutions, root directory and projects of the workspace"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() -> std::io::Result<()> {
    let out_dir = PathBuf::from(std::env::var_os("OUT_DIR").unwrap_or_default());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir)?;

    let mut buffer = Vec::new();
    Man::new(build_cli()).render(&mut buffer)?;
    fs::write(man_dir.join("projmove.1"), buffer)?;

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
    Ok(())
}
