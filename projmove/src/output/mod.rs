//! Output formatting module for operation reports.
//!
//! This module renders operation outcomes for the user, either as
//! human-readable report lines or as JSON.

mod formatters;

use std::path::{Path, PathBuf};

use crate::config::OutputFormat;
use crate::operations::{ExecutionResult, MoveReport};
use crate::workspace::Workspace;
use crate::Result;

pub use formatters::{HumanFormatter, JsonFormatter};

/// Something a command wants to show.
#[derive(Debug, Clone, Copy)]
pub enum Report<'a> {
    /// Outcome of a move batch.
    Moves {
        /// The report to render.
        report: &'a MoveReport,
        /// Line shown when the batch had nothing to do.
        empty_message: &'a str,
    },
    /// Outcome of a plan that is not a move batch.
    Execution {
        /// The result to render.
        result: &'a ExecutionResult,
        /// Line shown when the plan had nothing to do.
        empty_message: &'a str,
    },
    /// A resolved workspace.
    Workspace(&'a Workspace),
    /// Projects a solution does not list.
    StrayProjects {
        /// The solution that was checked.
        solution: &'a Path,
        /// Unlisted project manifests.
        projects: &'a [PathBuf],
        /// Directory paths are shown relative to.
        working_dir: &'a Path,
    },
}

/// Trait for rendering reports into an output format.
pub trait OutputFormatter {
    /// Render the given report into a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the report cannot be serialized.
    fn format(&self, report: &Report<'_>) -> Result<String>;
}

impl OutputFormat {
    /// Create a formatter for this output format.
    ///
    /// # Examples
    ///
    /// ```
    /// use projmove::config::OutputFormat;
    /// use projmove::output::Report;
    /// use projmove::workspace::Workspace;
    /// use std::path::PathBuf;
    ///
    /// let workspace = Workspace {
    ///     working_dir: PathBuf::from("/repo"),
    ///     root_dir: PathBuf::from("/repo"),
    ///     solutions: vec![],
    ///     projects: vec![PathBuf::from("/repo/App/App.csproj")],
    /// };
    /// let text = OutputFormat::Human
    ///     .create_formatter()
    ///     .format(&Report::Workspace(&workspace))
    ///     .unwrap();
    /// assert!(text.contains("App/App.csproj"));
    /// ```
    #[must_use]
    pub fn create_formatter(self) -> Box<dyn OutputFormatter> {
        match self {
            Self::Human => Box::new(HumanFormatter),
            Self::Json => Box::new(JsonFormatter),
        }
    }
}
