//! Path relationship checking.
//!
//! This module determines how two locations relate in the directory
//! hierarchy, using [`CanonicalPath`] identity so the answer does not depend
//! on case or separator spelling.

use std::path::Path;

use super::CanonicalPath;

/// Relationship between two paths.
///
/// # Examples
///
/// ```
/// use projmove::path::PathRelationship;
/// use std::path::Path;
///
/// let parent = Path::new("/repo");
/// let child = Path::new("/Repo/src/App");
///
/// assert_eq!(
///     PathRelationship::between(parent, child),
///     PathRelationship::Ancestor
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathRelationship {
    /// The second path lies beneath the first.
    Ancestor,

    /// The first path lies beneath the second.
    Descendant,

    /// Both paths name the same location.
    Same,

    /// Neither path contains the other.
    Unrelated,
}

impl PathRelationship {
    /// Determine the relationship between two paths.
    ///
    /// # Examples
    ///
    /// ```
    /// use projmove::path::PathRelationship;
    /// use std::path::Path;
    ///
    /// assert_eq!(
    ///     PathRelationship::between(Path::new("/a/b"), Path::new("/a")),
    ///     PathRelationship::Descendant
    /// );
    /// assert_eq!(
    ///     PathRelationship::between(Path::new("/a/"), Path::new("/A")),
    ///     PathRelationship::Same
    /// );
    /// assert_eq!(
    ///     PathRelationship::between(Path::new("/a"), Path::new("/b")),
    ///     PathRelationship::Unrelated
    /// );
    /// ```
    #[must_use]
    pub fn between(path1: &Path, path2: &Path) -> Self {
        Self::between_canonical(&CanonicalPath::new(path1), &CanonicalPath::new(path2))
    }

    /// Same as [`between`](Self::between) for already-canonical paths.
    #[must_use]
    pub fn between_canonical(path1: &CanonicalPath, path2: &CanonicalPath) -> Self {
        if path1 == path2 {
            Self::Same
        } else if path2.starts_with(path1) {
            Self::Ancestor
        } else if path1.starts_with(path2) {
            Self::Descendant
        } else {
            Self::Unrelated
        }
    }

    /// Check if the relationship is hierarchical (not unrelated).
    ///
    /// # Examples
    ///
    /// ```
    /// use projmove::path::PathRelationship;
    ///
    /// assert!(PathRelationship::Ancestor.is_hierarchical());
    /// assert!(PathRelationship::Same.is_hierarchical());
    /// assert!(!PathRelationship::Unrelated.is_hierarchical());
    /// ```
    #[must_use]
    pub fn is_hierarchical(&self) -> bool {
        matches!(self, Self::Ancestor | Self::Descendant | Self::Same)
    }

    /// Check if a path is within a directory (descendant or same).
    ///
    /// # Examples
    ///
    /// ```
    /// use projmove::path::PathRelationship;
    /// use std::path::Path;
    ///
    /// let dir = Path::new("/repo");
    /// assert!(PathRelationship::is_within(Path::new("/repo/App/App.proj"), dir));
    /// assert!(PathRelationship::is_within(dir, dir));
    /// assert!(!PathRelationship::is_within(Path::new("/elsewhere"), dir));
    /// ```
    #[must_use]
    pub fn is_within(path: &Path, directory: &Path) -> bool {
        matches!(
            Self::between(path, directory),
            Self::Descendant | Self::Same
        )
    }

    /// Check if a path strictly contains another path.
    #[must_use]
    pub fn strictly_contains(path: &Path, other: &Path) -> bool {
        Self::between(path, other) == Self::Ancestor
    }
}
