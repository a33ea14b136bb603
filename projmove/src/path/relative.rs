//! Relative path expressions between canonical locations.
//!
//! Reference items and solution entries store paths relative to the file
//! that declares them. When one end of such an edge moves, the expression is
//! recomputed here and rendered in the separator style the original text
//! used.

use std::path::{Component, Path};

/// Computes the relative path from directory `from_dir` to `to`.
///
/// Both paths must be absolute. Components are compared case-insensitively;
/// the spelling of `to` is kept for the emitted components. The result is
/// `/`-separated. When the paths live on different roots, `to` is returned
/// unchanged.
///
/// # Examples
///
/// ```
/// use projmove::path::relative_path;
/// use std::path::Path;
///
/// let rel = relative_path(Path::new("/repo/New"), Path::new("/repo/Lib/Lib.proj"));
/// assert_eq!(rel, "../Lib/Lib.proj");
///
/// let rel = relative_path(Path::new("/repo"), Path::new("/REPO/App/App.proj"));
/// assert_eq!(rel, "App/App.proj");
/// ```
#[must_use]
pub fn relative_path(from_dir: &Path, to: &Path) -> String {
    let from_parts = split_components(from_dir);
    let to_parts = split_components(to);

    if from_parts[0].to_lowercase() != to_parts[0].to_lowercase() {
        return to.to_string_lossy().replace('\\', "/");
    }

    let common = from_parts
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a.to_lowercase() == b.to_lowercase())
        .count();

    let mut segments: Vec<String> = Vec::new();
    for _ in common..from_parts.len() {
        segments.push("..".to_string());
    }
    segments.extend(to_parts[common..].iter().cloned());

    if segments.is_empty() {
        ".".to_string()
    } else {
        segments.join("/")
    }
}

/// Separator convention of a path expression found in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeparatorStyle {
    /// Forward slashes.
    Forward,
    /// Backslashes, as written by Windows tooling.
    Backward,
}

impl SeparatorStyle {
    /// Detects the style of an existing expression.
    ///
    /// An expression is treated as backslash-styled when it contains a
    /// backslash and no forward slash. Expressions without any separator use
    /// `fallback`.
    ///
    /// # Examples
    ///
    /// ```
    /// use projmove::path::SeparatorStyle;
    ///
    /// assert_eq!(SeparatorStyle::of(r"..\Lib\Lib.proj", SeparatorStyle::Forward), SeparatorStyle::Backward);
    /// assert_eq!(SeparatorStyle::of("../Lib/Lib.proj", SeparatorStyle::Backward), SeparatorStyle::Forward);
    /// assert_eq!(SeparatorStyle::of("Lib.proj", SeparatorStyle::Backward), SeparatorStyle::Backward);
    /// ```
    #[must_use]
    pub fn of(expression: &str, fallback: Self) -> Self {
        match (expression.contains('\\'), expression.contains('/')) {
            (true, false) => Self::Backward,
            (false, true) | (true, true) => Self::Forward,
            (false, false) => fallback,
        }
    }

    /// Renders a `/`-separated relative path in this style.
    #[must_use]
    pub fn apply(self, relative: &str) -> String {
        match self {
            Self::Forward => relative.replace('\\', "/"),
            Self::Backward => relative.replace('/', "\\"),
        }
    }
}

/// Turns a path expression read from a manifest into a platform path.
///
/// Manifests written on Windows use backslashes, which are ordinary file
/// name characters on Unix; they are converted so the expression resolves
/// the same way everywhere.
#[must_use]
pub fn expression_to_path(expression: &str) -> std::path::PathBuf {
    if cfg!(windows) {
        std::path::PathBuf::from(expression)
    } else {
        std::path::PathBuf::from(expression.replace('\\', "/"))
    }
}

/// First element is the root marker (`/` or a drive prefix), followed by
/// normal components with `.`/`..` already applied.
fn split_components(path: &Path) -> Vec<String> {
    let unified = path.to_string_lossy().replace('\\', "/");
    let mut parts: Vec<String> = Vec::new();
    let mut root = String::from("/");
    for component in Path::new(&unified).components() {
        match component {
            Component::Prefix(prefix) => {
                root = prefix.as_os_str().to_string_lossy().to_string();
            }
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir => {
                parts.pop();
            }
            Component::Normal(name) => parts.push(name.to_string_lossy().to_string()),
        }
    }
    // Drive letters written with forward slashes are not a Prefix on Unix.
    if let Some(first) = parts.first() {
        if unified.starts_with(first.as_str()) && first.len() == 2 && first.ends_with(':') {
            root = parts.remove(0);
        }
    }
    let mut out = Vec::with_capacity(parts.len() + 1);
    out.push(root);
    out.extend(parts);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sibling_directories() {
        assert_eq!(
            relative_path(Path::new("/repo/Old"), Path::new("/repo/Lib/Lib.proj")),
            "../Lib/Lib.proj"
        );
    }

    #[test]
    fn test_descendant() {
        assert_eq!(
            relative_path(Path::new("/repo"), Path::new("/repo/src/App/App.proj")),
            "src/App/App.proj"
        );
    }

    #[test]
    fn test_ancestor_of_from() {
        assert_eq!(
            relative_path(Path::new("/repo/a/b/c"), Path::new("/repo/X.proj")),
            "../../../X.proj"
        );
    }

    #[test]
    fn test_case_insensitive_common_prefix_keeps_target_spelling() {
        assert_eq!(
            relative_path(Path::new("/Repo/src/app"), Path::new("/repo/SRC/Lib/Lib.proj")),
            "../Lib/Lib.proj"
        );
    }

    #[test]
    fn test_same_directory() {
        assert_eq!(relative_path(Path::new("/repo"), Path::new("/repo")), ".");
    }

    #[test]
    fn test_dot_segments_resolved() {
        assert_eq!(
            relative_path(Path::new("/repo/New/./x/.."), Path::new("/repo/Lib/../Lib/Lib.proj")),
            "../Lib/Lib.proj"
        );
    }

    #[test]
    fn test_different_drive_returns_target() {
        assert_eq!(
            relative_path(Path::new("c:/repo"), Path::new("d:/other/X.proj")),
            "d:/other/X.proj"
        );
    }

    #[test]
    fn test_separator_style_detection() {
        assert_eq!(
            SeparatorStyle::of("..\\Lib\\Lib.proj", SeparatorStyle::Forward),
            SeparatorStyle::Backward
        );
        assert_eq!(
            SeparatorStyle::of("../Lib/Lib.proj", SeparatorStyle::Backward),
            SeparatorStyle::Forward
        );
        assert_eq!(
            SeparatorStyle::of("Lib.proj", SeparatorStyle::Backward),
            SeparatorStyle::Backward
        );
    }

    #[test]
    fn test_separator_style_apply() {
        assert_eq!(SeparatorStyle::Backward.apply("../Lib/Lib.proj"), "..\\Lib\\Lib.proj");
        assert_eq!(SeparatorStyle::Forward.apply("../Lib/Lib.proj"), "../Lib/Lib.proj");
    }

    #[test]
    #[cfg(unix)]
    fn test_expression_to_path_unifies_backslashes() {
        assert_eq!(
            expression_to_path("..\\Lib\\Lib.proj"),
            std::path::PathBuf::from("../Lib/Lib.proj")
        );
    }
}
