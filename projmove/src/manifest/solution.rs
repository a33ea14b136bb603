//! Solution manifests, read through their `Project(...)` header lines only.

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use super::ensure_initialized;
use crate::error::{Error, Result};
use crate::path::{absolutize, expression_to_path};

/// One `Project("{type}") = "name", "path", "{id}"` header in a solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionEntry {
    /// Project type identifier, kept verbatim.
    pub type_id: String,
    /// Display name.
    pub name: String,
    /// Path relative to the solution directory, as written.
    pub relative_path: String,
    /// Project identifier, kept verbatim including braces.
    pub project_id: String,
    name_span: Range<usize>,
    path_span: Range<usize>,
}

impl SolutionEntry {
    /// Byte range of the display name in the solution text.
    #[must_use]
    pub fn name_span(&self) -> Range<usize> {
        self.name_span.clone()
    }

    /// Byte range of the relative path in the solution text.
    #[must_use]
    pub fn path_span(&self) -> Range<usize> {
        self.path_span.clone()
    }
}

/// A solution manifest and the member entries found in it.
///
/// # Examples
///
/// ```
/// use projmove::manifest::SolutionFile;
/// use std::path::Path;
///
/// let text = "Project(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"App\", \"src\\App\\App.csproj\", \"{11111111-1111-1111-1111-111111111111}\"\nEndProject\n";
/// let sln = SolutionFile::parse(Path::new("/repo/All.sln"), text).unwrap();
/// assert_eq!(sln.entries().len(), 1);
/// assert_eq!(sln.entries()[0].name, "App");
/// ```
#[derive(Debug, Clone)]
pub struct SolutionFile {
    path: PathBuf,
    text: String,
    entries: Vec<SolutionEntry>,
}

impl SolutionFile {
    /// Reads the solution at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or
    /// [`Error::InvalidManifest`] if it is not text.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let text = String::from_utf8(bytes).map_err(|e| Error::InvalidManifest {
            path: path.to_path_buf(),
            reason: format!("not valid UTF-8: {e}"),
        })?;
        Self::parse(path, &text)
    }

    /// Scans solution text that belongs to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the structural patterns cannot be initialized.
    pub fn parse(path: &Path, text: &str) -> Result<Self> {
        let patterns = ensure_initialized()?;

        let entries = patterns
            .solution_project
            .captures_iter(text)
            .filter_map(|caps| {
                let name = caps.name("name")?;
                let rel = caps.name("path")?;
                Some(SolutionEntry {
                    type_id: caps.name("type")?.as_str().to_string(),
                    name: name.as_str().to_string(),
                    relative_path: rel.as_str().to_string(),
                    project_id: caps.name("id")?.as_str().to_string(),
                    name_span: name.range(),
                    path_span: rel.range(),
                })
            })
            .collect();

        Ok(Self {
            path: path.to_path_buf(),
            text: text.to_string(),
            entries,
        })
    }

    /// Path of the solution file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory containing the solution file.
    #[must_use]
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Original text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Every `Project(...)` entry, solution folders included.
    #[must_use]
    pub fn entries(&self) -> &[SolutionEntry] {
        &self.entries
    }

    /// Absolute path an entry points to.
    #[must_use]
    pub fn resolve(&self, entry: &SolutionEntry) -> PathBuf {
        let relative = expression_to_path(&entry.relative_path);
        absolutize(&relative, self.directory())
            .unwrap_or_else(|_| self.directory().join(relative))
    }

    /// Absolute paths of entries accepted by `is_project`, in file order.
    ///
    /// Solution folders and other non-project entries are filtered out by
    /// the predicate.
    pub fn member_projects<F>(&self, is_project: F) -> Vec<PathBuf>
    where
        F: Fn(&Path) -> bool,
    {
        self.entries
            .iter()
            .map(|entry| self.resolve(entry))
            .filter(|path| is_project(path))
            .collect()
    }

    /// Returns the text with the given spans replaced.
    ///
    /// Spans must not overlap.
    #[must_use]
    pub fn render_with(&self, mut replacements: Vec<(Range<usize>, String)>) -> String {
        replacements.sort_by(|a, b| b.0.start.cmp(&a.0.start));
        let mut out = self.text.clone();
        for (span, replacement) in replacements {
            out.replace_range(span, &replacement);
        }
        out
    }
}
