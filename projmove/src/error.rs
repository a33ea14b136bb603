//! Error types for the projmove library.
//!
//! This module provides the error hierarchy for all operations in the
//! projmove library, using `thiserror` for ergonomic error handling.
//!
//! Errors fall into three groups:
//! - Problems detected while validating a batch of moves (`MoveValidation`).
//!   These are always raised before anything on disk is touched.
//! - Lookups that fail before planning starts (`NotFound`, `AmbiguousProject`).
//! - Everything else: configuration, manifest, pattern and I/O failures.
//!
//! Individual filesystem mutations never surface here; they are recorded as
//! [`MutationRecord`](crate::operations::MutationRecord)s instead.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with a projmove error.
///
/// # Examples
///
/// ```
/// use projmove::{Error, Result};
///
/// fn example_operation() -> Result<usize> {
///     Ok(2)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the projmove library.
#[derive(Debug, Error)]
pub enum Error {
    /// An invalid filesystem path was provided.
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath {
        /// The invalid path.
        path: PathBuf,
        /// The reason the path is invalid.
        reason: String,
    },

    /// A configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration value failed validation.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// A batch of moves was rejected before any mutation took place.
    #[error("{message}")]
    MoveValidation {
        /// Description of the rejected move, naming the offending path.
        message: String,
    },

    /// The requested project, solution or path was not found.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// A project name matched more than one project in the workspace.
    #[error("project name '{name}' is ambiguous: {}", candidates.join(", "))]
    AmbiguousProject {
        /// The name that was looked up.
        name: String,
        /// Relative paths of the matching projects.
        candidates: Vec<String>,
    },

    /// A project manifest could not be read as a manifest.
    #[error("invalid manifest {}: {reason}", path.display())]
    InvalidManifest {
        /// The manifest path.
        path: PathBuf,
        /// Why the manifest was rejected.
        reason: String,
    },

    /// A workspace glob pattern could not be compiled.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern segment.
        pattern: String,
        /// The reason the pattern is invalid.
        reason: String,
    },

    /// A mutation failed and the batch was undone under the rollback policy.
    #[error("{failed}; rolled back {restored} completed change(s)")]
    RolledBack {
        /// Description of the mutation that failed.
        failed: String,
        /// Number of journaled changes that were undone.
        restored: usize,
    },
}

impl Error {
    /// Creates a move validation error from a message.
    pub(crate) fn move_validation(message: impl Into<String>) -> Self {
        Self::MoveValidation {
            message: message.into(),
        }
    }

    /// Creates a not-found error for a resource description.
    pub(crate) fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Check if error indicates that something could not be found.
    ///
    /// # Examples
    ///
    /// ```
    /// use projmove::Error;
    ///
    /// let err = Error::NotFound { resource: "project Foo".to_string() };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if error is a pre-flight move validation failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use projmove::Error;
    ///
    /// let err = Error::MoveValidation { message: "collision".to_string() };
    /// assert!(err.is_validation());
    /// ```
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MoveValidation { .. })
    }
}
