//! Path identity and path arithmetic.
//!
//! # Key Concepts
//!
//! ## Identity
//!
//! [`CanonicalPath`] is the equivalence relation used for every path-keyed
//! lookup in the crate. Two paths are the same resource iff their canonical
//! forms are equal: comparison ignores case, separator style, redundant `.`
//! and `..` segments, and trailing separators.
//!
//! ## Normalization
//!
//! [`absolutize`] produces absolute, display-friendly paths that keep the
//! user's spelling. It expands `~` and resolves components lexically.
//!
//! ## Relative expressions
//!
//! [`relative_path`] recomputes the relative path written into manifests,
//! and [`SeparatorStyle`] keeps the separator convention of the text it
//! replaces.
//!
//! # Examples
//!
//! ```
//! use projmove::path::{relative_path, CanonicalPath, PathRelationship};
//! use std::path::Path;
//!
//! let a = CanonicalPath::with_base(Path::new("Old/../New/New.proj"), Path::new("/repo"));
//! assert_eq!(a.as_str(), "/repo/new/new.proj");
//!
//! assert_eq!(
//!     relative_path(Path::new("/repo/New"), Path::new("/repo/Lib/Lib.proj")),
//!     "../Lib/Lib.proj"
//! );
//!
//! assert!(PathRelationship::is_within(Path::new("/repo/New"), Path::new("/REPO")));
//! ```

mod identity;
pub mod normalize;
mod relationship;
mod relative;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

pub use identity::{same_path, CanonicalPath};
pub use normalize::{absolutize, resolve_components};
pub use relationship::PathRelationship;
pub use relative::{expression_to_path, relative_path, SeparatorStyle};
