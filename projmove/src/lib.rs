#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # projmove
//!
//! A library for moving and renaming projects in multi-project workspaces
//! without breaking the references that point at them.
//!
//! A move rewrites three kinds of state: member entries in solution
//! manifests, `ProjectReference` items in project manifests, and the
//! project directories and manifest files on disk. The library plans all of
//! it up front, validates the batch as a unit, and only then touches the
//! filesystem.
//!
//! ## Core Types
//!
//! - [`CanonicalPath`] and [`PathRelationship`]: path identity and nesting
//! - [`Workspace`] and [`WorkspaceResolver`]: which manifests take part
//! - [`ProjectGraph`]: loaded projects and their references
//! - [`MoveSetPlanner`], [`ReferenceFixupEngine`], [`SolutionManifestRewriter`]:
//!   planning a batch
//! - [`MutationExecutor`] and [`PlanExecutor`]: applying or staging a plan
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use projmove::path::{relative_path, SeparatorStyle};
//! use projmove::CanonicalPath;
//! use std::path::Path;
//!
//! let a = CanonicalPath::new(Path::new("/repo/Old/../New/New.csproj"));
//! let b = CanonicalPath::new(Path::new("/REPO/new/NEW.csproj"));
//! assert_eq!(a, b);
//!
//! let rel = relative_path(Path::new("/repo/src/New"), Path::new("/repo/Lib/Lib.csproj"));
//! assert_eq!(SeparatorStyle::Backward.apply(&rel), r"..\..\Lib\Lib.csproj");
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod operations;
pub mod output;
pub mod path;
pub mod workspace;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use operations::{
    execute_moves, ExecutionMode, ExecutionResult, Move, MoveOptions, MoveReport, MoveSet,
    MoveSetPlanner, MutationExecutor, MutationRecord, OperationPlan, PlanAction, PlanExecutor,
    ReferenceFixupEngine, SolutionManifestRewriter,
};
pub use path::{CanonicalPath, PathRelationship};
pub use workspace::{ProjectGraph, ProjectGraphLoader, Workspace, WorkspaceResolver};
