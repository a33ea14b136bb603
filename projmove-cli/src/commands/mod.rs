//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `move-project`: Move or rename a project and fix its references
//! - `change-namespace`: Rename every project under a namespace prefix
//! - `fix-references`: Repair or remove broken project references
//! - `stray-projects`: List project files a solution does not include
//! - `show-workspace`: Show the resolved workspace
//! - `completions`: Generate shell completion scripts

pub mod change_namespace;
pub mod completions;
pub mod fix_references;
pub mod move_project;
pub mod show_workspace;
pub mod stray_projects;

pub use change_namespace::ChangeNamespaceCommand;
pub use completions::CompletionsCommand;
pub use fix_references::FixReferencesCommand;
pub use move_project::MoveProjectCommand;
pub use show_workspace::ShowWorkspaceCommand;
pub use stray_projects::StrayProjectsCommand;
