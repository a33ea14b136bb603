//! Workspace operations using the plan-execute pattern.
//!
//! Every operation is split into two phases:
//! 1. **Planning**: resolves arguments, validates the batch, and computes
//!    new manifest text. Nothing on disk changes.
//! 2. **Execution**: a [`PlanExecutor`] runs the plan's actions through a
//!    [`MutationExecutor`], either for real or in plan mode.
//!
//! Plan mode runs the same checks against a staged view of the tree, so a
//! staged run reports exactly what an applied run would do.
//!
//! # Examples
//!
//! ```no_run
//! use projmove::config::ConfigBuilder;
//! use projmove::operations::{execute_moves, project_move, MoveOptions};
//! use projmove::workspace::WorkspaceResolver;
//! use std::path::Path;
//!
//! let working_dir = Path::new("/repo");
//! let config = ConfigBuilder::new().with_working_dir(working_dir).build().unwrap();
//! let workspace = WorkspaceResolver::new(&config).resolve(None, working_dir).unwrap();
//!
//! let mv = project_move(&workspace, &config, "Old", "New").unwrap();
//! let report = execute_moves(&config, &workspace, vec![mv], MoveOptions::new().staged(true)).unwrap();
//! for record in &report.execution.records {
//!     println!("{}", record.message(report.execution.mode()));
//! }
//! ```

pub mod executor;
pub mod moves;
pub mod mutation;
pub mod plan;
pub mod references;
pub mod relocate;
pub mod repair;
pub mod requests;
pub mod solution;
pub mod stray;

pub use executor::{ExecutionResult, PlanExecutor, RollbackSummary};
pub use moves::{Move, MoveSet, MoveSetPlanner};
pub use mutation::{EntryKind, ExecutionMode, MutationExecutor, MutationKind, MutationRecord, Verb};
pub use plan::{OperationPlan, PlanAction};
pub use references::ReferenceFixupEngine;
pub use relocate::{execute_moves, MoveOptions, MoveReport, RelocationPlan};
pub use repair::{RepairOptions, RepairPlan};
pub use requests::{is_in_namespace, namespace_moves, project_move};
pub use solution::SolutionManifestRewriter;
pub use stray::find_stray_projects;
