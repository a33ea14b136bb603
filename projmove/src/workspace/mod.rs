//! Workspace discovery and the project graph.
//!
//! A workspace is resolved from a user-supplied specification (solution,
//! project, directory, glob pattern, or nothing) into an ordered list of
//! project manifests. [`ProjectGraphLoader`] then loads those manifests and
//! classifies every `ProjectReference` they declare.

pub mod discovery;
mod graph;
mod resolver;
mod spec;

pub use graph::{
    project_name, ProjectGraph, ProjectGraphLoader, ProjectNode, ProjectReference,
    ReferenceTarget,
};
pub use resolver::{Workspace, WorkspaceResolver};
pub use spec::WorkspaceSpec;
