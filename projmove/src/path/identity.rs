//! Canonical path identity.
//!
//! Every map and set keyed by a filesystem path goes through
//! [`CanonicalPath`], so two spellings of the same location always land on
//! the same key regardless of case, separator style, redundant segments or
//! trailing separators.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

/// Case-insensitive, separator-insensitive identity of a filesystem path.
///
/// The canonical form is an absolute, lowercase, `/`-joined string with `.`
/// and `..` resolved lexically. Symlinks are never followed.
///
/// # Examples
///
/// ```
/// use projmove::path::CanonicalPath;
/// use std::path::Path;
///
/// let base = Path::new("/work");
/// let a = CanonicalPath::with_base(Path::new("Src/App/../Lib/"), base);
/// let b = CanonicalPath::with_base(Path::new("/WORK/src/lib"), base);
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CanonicalPath(String);

impl CanonicalPath {
    /// Builds the identity of `path`, absolutizing against the current
    /// working directory when it is relative.
    ///
    /// When the working directory cannot be determined, relative paths are
    /// treated as rooted at `/`.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        let base = env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        Self::with_base(path, &base)
    }

    /// Builds the identity of `path`, absolutizing against `base` when it is
    /// relative.
    ///
    /// Whitespace-only input yields the empty identity, which is equal only
    /// to itself.
    #[must_use]
    pub fn with_base(path: &Path, base: &Path) -> Self {
        let raw = path.to_string_lossy();
        if raw.trim().is_empty() {
            return Self::default();
        }
        let raw = raw.replace('\\', "/");

        let joined = if is_absolute_str(&raw) {
            raw
        } else {
            let base = base.to_string_lossy().replace('\\', "/");
            format!("{}/{raw}", base.trim_end_matches('/'))
        };

        Self(canonicalize_str(&joined))
    }

    /// Returns the empty identity.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns `true` for the identity of blank input.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the canonical string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the identity of the containing directory, or `None` at a root.
    ///
    /// # Examples
    ///
    /// ```
    /// use projmove::path::CanonicalPath;
    /// use std::path::Path;
    ///
    /// let file = CanonicalPath::with_base(Path::new("/a/B/c.proj"), Path::new("/"));
    /// assert_eq!(file.parent().unwrap().as_str(), "/a/b");
    /// ```
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let idx = self.0.rfind('/')?;
        let root_len = root_len(&self.0);
        if self.0.len() <= root_len {
            return None;
        }
        if idx < root_len {
            return Some(Self(self.0[..root_len].to_string()));
        }
        Some(Self(self.0[..idx].to_string()))
    }

    /// Returns `true` when `self` equals `ancestor` or lies beneath it.
    ///
    /// Matching is done on whole components, so `/a/bc` does not start with
    /// `/a/b`.
    #[must_use]
    pub fn starts_with(&self, ancestor: &Self) -> bool {
        if self.is_empty() || ancestor.is_empty() {
            return self == ancestor;
        }
        if self.0 == ancestor.0 {
            return true;
        }
        let Some(rest) = self.0.strip_prefix(&ancestor.0) else {
            return false;
        };
        ancestor.0.ends_with('/') || rest.starts_with('/')
    }

    /// Number of components below the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0[root_len(&self.0)..]
            .split('/')
            .filter(|s| !s.is_empty())
            .count()
    }
}

impl fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&Path> for CanonicalPath {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

impl From<&PathBuf> for CanonicalPath {
    fn from(path: &PathBuf) -> Self {
        Self::new(path)
    }
}

/// Returns `true` when both paths name the same resource.
///
/// # Examples
///
/// ```
/// use projmove::path::same_path;
/// use std::path::Path;
///
/// assert!(same_path(Path::new("/a/b/../C"), Path::new("/A/c/")));
/// assert!(!same_path(Path::new("/a"), Path::new("/b")));
/// ```
#[must_use]
pub fn same_path(a: &Path, b: &Path) -> bool {
    CanonicalPath::new(a) == CanonicalPath::new(b)
}

/// `/...` or a drive prefix such as `c:/...`.
fn is_absolute_str(s: &str) -> bool {
    s.starts_with('/') || has_drive_prefix(s)
}

fn has_drive_prefix(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Length of the root portion of a canonical string (`/` or `c:/`).
fn root_len(s: &str) -> usize {
    if has_drive_prefix(s) {
        if s.as_bytes().get(2) == Some(&b'/') {
            3
        } else {
            2
        }
    } else {
        usize::from(s.starts_with('/'))
    }
}

/// Resolves `.`/`..` lexically and lowercases. `..` at the root is absorbed.
fn canonicalize_str(absolute: &str) -> String {
    let (root, rest) = if has_drive_prefix(absolute) {
        let drive = absolute[..2].to_lowercase();
        (format!("{drive}/"), &absolute[2..])
    } else {
        ("/".to_string(), absolute)
    };

    let mut parts: Vec<&str> = Vec::new();
    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }

    let mut out = root;
    out.push_str(&parts.join("/"));
    out.to_lowercase()
}
