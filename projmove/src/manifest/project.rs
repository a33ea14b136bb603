//! Project manifest documents.

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use super::{ensure_initialized, escape_xml, unescape_xml};
use crate::error::{Error, Result};

/// Item type of project-to-project references.
pub const PROJECT_REFERENCE: &str = "ProjectReference";

/// Index of an item within its [`ProjectDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(usize);

/// One item element found in a project manifest.
#[derive(Debug, Clone)]
pub struct ProjectItem {
    item_type: String,
    include: String,
    original_include: String,
    quote: char,
    value_span: Range<usize>,
    element_span: Range<usize>,
    removed: bool,
}

impl ProjectItem {
    /// Element name, e.g. `ProjectReference`.
    #[must_use]
    pub fn item_type(&self) -> &str {
        &self.item_type
    }

    /// Current unevaluated `Include` value, including pending edits.
    #[must_use]
    pub fn include(&self) -> &str {
        &self.include
    }

    /// `Include` value as it was read from disk.
    #[must_use]
    pub fn original_include(&self) -> &str {
        &self.original_include
    }

    /// Returns `true` once the item has been removed from the document.
    #[must_use]
    pub fn is_removed(&self) -> bool {
        self.removed
    }

    fn is_changed(&self) -> bool {
        self.removed || self.include != self.original_include
    }
}

/// A project manifest loaded for structural editing.
///
/// Only the `Include` attribute of item elements is modeled. Elements inside
/// XML comments are ignored. [`render`](Self::render) reproduces the
/// original text byte for byte except for edited values and removed
/// elements.
///
/// # Examples
///
/// ```
/// use projmove::manifest::{ProjectDocument, PROJECT_REFERENCE};
/// use std::path::Path;
///
/// let text = r#"<Project>
///   <ItemGroup>
///     <ProjectReference Include="..\Lib\Lib.csproj" />
///   </ItemGroup>
/// </Project>
/// "#;
/// let mut doc = ProjectDocument::parse(Path::new("/repo/App/App.csproj"), text).unwrap();
/// let (id, item) = doc.items(PROJECT_REFERENCE).next().unwrap();
/// assert_eq!(item.include(), r"..\Lib\Lib.csproj");
///
/// doc.set_include(id, r"..\..\Lib\Lib.csproj");
/// assert!(doc.has_unsaved_changes());
/// assert!(doc.render().contains(r#"Include="..\..\Lib\Lib.csproj""#));
/// ```
#[derive(Debug, Clone)]
pub struct ProjectDocument {
    path: PathBuf,
    text: String,
    items: Vec<ProjectItem>,
}

impl ProjectDocument {
    /// Reads and scans the manifest at `path`.
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

    /// Scans manifest text that belongs to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the structural patterns cannot be initialized or
    /// the text does not look like an XML manifest.
    pub fn parse(path: &Path, text: &str) -> Result<Self> {
        let patterns = ensure_initialized()?;

        let body = text.trim_start_matches('\u{feff}').trim_start();
        if !body.is_empty() && !body.starts_with('<') {
            return Err(Error::InvalidManifest {
                path: path.to_path_buf(),
                reason: "expected an XML document".to_string(),
            });
        }

        let comments: Vec<Range<usize>> = patterns
            .comment
            .find_iter(text)
            .map(|m| m.range())
            .collect();
        let in_comment = |pos: usize| comments.iter().any(|c| c.contains(&pos));

        let mut items = Vec::new();
        for caps in patterns.element.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            if in_comment(whole.start()) {
                continue;
            }
            let (Some(name), Some(attrs)) = (caps.name("name"), caps.name("attrs")) else {
                continue;
            };
            let Some(include) = patterns.include.captures(attrs.as_str()) else {
                continue;
            };
            let (value, quote) = match (include.name("dq"), include.name("sq")) {
                (Some(v), _) => (v, '"'),
                (None, Some(v)) => (v, '\''),
                (None, None) => continue,
            };

            let self_closing = caps.name("close").is_some_and(|c| !c.as_str().is_empty());
            let element_end = if self_closing {
                whole.end()
            } else {
                find_closing_tag(text, whole.end(), name.as_str()).unwrap_or(whole.end())
            };

            let value_start = attrs.start() + value.start();
            let decoded = unescape_xml(value.as_str());
            items.push(ProjectItem {
                item_type: name.as_str().to_string(),
                include: decoded.clone(),
                original_include: decoded,
                quote,
                value_span: value_start..value_start + value.len(),
                element_span: whole.start()..element_end,
                removed: false,
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
            text: text.to_string(),
            items,
        })
    }

    /// Path the document was loaded from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory containing the manifest.
    #[must_use]
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Items of the given type (case-insensitive), skipping removed items.
    pub fn items<'a>(
        &'a self,
        item_type: &'a str,
    ) -> impl Iterator<Item = (ItemId, &'a ProjectItem)> + 'a {
        self.items
            .iter()
            .enumerate()
            .filter(move |(_, item)| {
                !item.removed && item.item_type.eq_ignore_ascii_case(item_type)
            })
            .map(|(i, item)| (ItemId(i), item))
    }

    /// Looks up an item by id.
    #[must_use]
    pub fn item(&self, id: ItemId) -> Option<&ProjectItem> {
        self.items.get(id.0)
    }

    /// Replaces the unevaluated `Include` value of an item.
    ///
    /// Unknown ids are ignored.
    pub fn set_include(&mut self, id: ItemId, value: &str) {
        if let Some(item) = self.items.get_mut(id.0) {
            item.include = value.to_string();
        }
    }

    /// Removes an item element from the document.
    pub fn remove_item(&mut self, id: ItemId) {
        if let Some(item) = self.items.get_mut(id.0) {
            item.removed = true;
        }
    }

    /// Returns `true` if any item was edited or removed.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.items.iter().any(ProjectItem::is_changed)
    }

    /// Produces the document text with all pending edits applied.
    #[must_use]
    pub fn render(&self) -> String {
        let mut edits: Vec<(Range<usize>, String)> = Vec::new();
        for item in self.items.iter().filter(|i| i.is_changed()) {
            if item.removed {
                edits.push((whole_lines(&self.text, item.element_span.clone()), String::new()));
            } else {
                edits.push((item.value_span.clone(), escape_xml(&item.include, item.quote)));
            }
        }

        // Back to front so earlier spans stay valid.
        edits.sort_by(|a, b| b.0.start.cmp(&a.0.start));
        let mut out = self.text.clone();
        for (span, replacement) in edits {
            out.replace_range(span, &replacement);
        }
        out
    }
}

/// Position just past the matching `</name>` tag, searching from `from`.
fn find_closing_tag(text: &str, from: usize, name: &str) -> Option<usize> {
    let needle = format!("</{name}");
    let start = text[from..].find(&needle)? + from;
    let close = text[start..].find('>')? + start;
    Some(close + 1)
}

/// Widens `span` to cover its whole line(s) when nothing else shares them.
fn whole_lines(text: &str, span: Range<usize>) -> Range<usize> {
    let bytes = text.as_bytes();

    let mut start = span.start;
    while start > 0 && matches!(bytes[start - 1], b' ' | b'\t') {
        start -= 1;
    }
    let starts_line = start == 0 || bytes[start - 1] == b'\n';

    let mut end = span.end;
    while end < bytes.len() && matches!(bytes[end], b' ' | b'\t') {
        end += 1;
    }
    let ends_line = end == bytes.len() || bytes[end] == b'\n' || bytes[end] == b'\r';

    if !(starts_line && ends_line) {
        return span;
    }
    if end < bytes.len() && bytes[end] == b'\r' {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'\n' {
        end += 1;
    }
    start..end
}
