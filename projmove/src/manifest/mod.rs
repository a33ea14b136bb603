//! Structural access to project and solution manifests.
//!
//! Manifests are never fully parsed. A small set of patterns locates the
//! pieces this crate reads and edits (reference items and solution member
//! entries) and every edit is applied to the original text by byte span, so
//! formatting, comments and unrelated content survive untouched.
//!
//! The patterns are compiled once per process by [`ensure_initialized`],
//! which every loader calls before touching text.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};

mod project;
mod solution;

pub use project::{ItemId, ProjectDocument, ProjectItem, PROJECT_REFERENCE};
pub use solution::{SolutionEntry, SolutionFile};

/// Compiled structural patterns shared by all manifest readers.
#[derive(Debug)]
pub struct Patterns {
    /// Opening tag of any element: name, attribute text, self-closing slash.
    pub(crate) element: Regex,
    /// `Include="..."` / `Include='...'` inside attribute text.
    pub(crate) include: Regex,
    /// XML comments.
    pub(crate) comment: Regex,
    /// One solution member header line.
    pub(crate) solution_project: Regex,
}

impl Patterns {
    fn compile() -> std::result::Result<Self, (String, regex::Error)> {
        let build = |pattern: &str| Regex::new(pattern).map_err(|e| (pattern.to_string(), e));
        Ok(Self {
            element: build(r"<(?P<name>[A-Za-z_][\w.\-]*)(?P<attrs>(?:\s[^>]*?)?)(?P<close>/?)>")?,
            include: build(r#"\bInclude\s*=\s*(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)')"#)?,
            comment: build(r"(?s)<!--.*?-->")?,
            solution_project: build(
                r#"(?m)^[ \t]*Project\("(?P<type>[^"]*)"\)\s*=\s*"(?P<name>[^"]*)",\s*"(?P<path>[^"]*)",\s*"(?P<id>\{[^"]*\})""#,
            )?,
        })
    }
}

/// Compiles the manifest patterns on first use and returns them.
///
/// Safe to call any number of times from any thread; compilation happens at
/// most once per process.
///
/// # Errors
///
/// Returns [`Error::InvalidPattern`] if a pattern failed to compile.
///
/// # Examples
///
/// ```
/// let first = projmove::manifest::ensure_initialized().unwrap();
/// let second = projmove::manifest::ensure_initialized().unwrap();
/// assert!(std::ptr::eq(first, second));
/// ```
pub fn ensure_initialized() -> Result<&'static Patterns> {
    static PATTERNS: OnceLock<std::result::Result<Patterns, (String, String)>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| {
            log::debug!("compiling manifest patterns");
            Patterns::compile().map_err(|(pattern, e)| (pattern, e.to_string()))
        })
        .as_ref()
        .map_err(|(pattern, reason)| Error::InvalidPattern {
            pattern: pattern.clone(),
            reason: reason.clone(),
        })
}

/// Returns `true` when an item value is a plain path with no build-language
/// expansions, wildcards or lists.
///
/// # Examples
///
/// ```
/// use projmove::manifest::is_literal;
///
/// assert!(is_literal(r"..\Lib\Lib.csproj"));
/// assert!(!is_literal("$(RepoRoot)/Lib/Lib.csproj"));
/// assert!(!is_literal("../**/*.csproj"));
/// assert!(!is_literal("a.csproj;b.csproj"));
/// ```
#[must_use]
pub fn is_literal(value: &str) -> bool {
    !value.trim().is_empty()
        && !value.contains("$(")
        && !value.contains("@(")
        && !value.contains("%(")
        && !value.contains(['*', '?', ';'])
}

/// Decodes the predefined XML entities in an attribute value.
pub(crate) fn unescape_xml(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Encodes characters that cannot appear raw in a quoted attribute value.
pub(crate) fn escape_xml(value: &str, quote: char) -> String {
    let mut out = value.replace('&', "&amp;").replace('<', "&lt;");
    if quote == '"' {
        out = out.replace('"', "&quot;");
    } else {
        out = out.replace('\'', "&apos;");
    }
    out
}
