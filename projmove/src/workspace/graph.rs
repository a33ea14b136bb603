//! Loaded project manifests and the references between them.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::manifest::{is_literal, ItemId, ProjectDocument, PROJECT_REFERENCE};
use crate::path::{absolutize, expression_to_path, CanonicalPath};

/// Where a reference item points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceTarget {
    /// A literal expression naming an existing manifest.
    Resolved(PathBuf),
    /// A literal expression whose target does not exist.
    Missing(PathBuf),
    /// An expression that needs evaluation (properties, wildcards, lists).
    /// Such references are never rewritten.
    Computed,
}

impl ReferenceTarget {
    /// Absolute target path for literal references.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Resolved(p) | Self::Missing(p) => Some(p),
            Self::Computed => None,
        }
    }
}

/// A `ProjectReference` item declared by a project.
#[derive(Debug, Clone)]
pub struct ProjectReference {
    /// Item handle inside the declaring document.
    pub id: ItemId,
    /// Unevaluated `Include` value as read.
    pub expression: String,
    /// Target resolved against the declaring project's directory.
    pub target: ReferenceTarget,
}

/// One project manifest in the graph.
#[derive(Debug, Clone)]
pub struct ProjectNode {
    /// Absolute manifest path.
    pub path: PathBuf,
    /// Directory containing the manifest.
    pub directory: PathBuf,
    /// Editable manifest text.
    pub document: ProjectDocument,
    /// Declared references, in document order.
    pub references: Vec<ProjectReference>,
}

impl ProjectNode {
    /// Project name: the manifest file name without its extension.
    #[must_use]
    pub fn name(&self) -> String {
        project_name(&self.path)
    }
}

/// Returns the file stem of a manifest path.
#[must_use]
pub fn project_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// The projects of a workspace, indexed by path identity.
#[derive(Debug, Clone, Default)]
pub struct ProjectGraph {
    nodes: Vec<ProjectNode>,
    index: HashMap<CanonicalPath, usize>,
}

impl ProjectGraph {
    /// All nodes in load order.
    #[must_use]
    pub fn nodes(&self) -> &[ProjectNode] {
        &self.nodes
    }

    /// Mutable access for reference rewriting.
    pub fn nodes_mut(&mut self) -> &mut [ProjectNode] {
        &mut self.nodes
    }

    /// Looks up a node by path identity.
    #[must_use]
    pub fn get(&self, path: &Path) -> Option<&ProjectNode> {
        self.index
            .get(&CanonicalPath::new(path))
            .map(|&i| &self.nodes[i])
    }

    /// Returns `true` if `path` is one of the loaded projects.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.index.contains_key(&CanonicalPath::new(path))
    }

    /// Number of loaded projects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no projects were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Finds loaded projects whose file name matches `file_name`,
    /// ignoring case.
    pub fn with_file_name<'a>(&'a self, file_name: &'a str) -> impl Iterator<Item = &'a ProjectNode> {
        self.nodes.iter().filter(move |node| {
            node.path
                .file_name()
                .is_some_and(|n| n.to_string_lossy().eq_ignore_ascii_case(file_name))
        })
    }
}

/// Builds a [`ProjectGraph`] from manifest paths.
///
/// # Examples
///
/// ```no_run
/// use projmove::workspace::ProjectGraphLoader;
/// use std::path::PathBuf;
///
/// let graph = ProjectGraphLoader::new()
///     .load(&[PathBuf::from("/repo/App/App.csproj")])
///     .unwrap();
/// for node in graph.nodes() {
///     println!("{} has {} reference(s)", node.name(), node.references.len());
/// }
/// ```
#[derive(Debug, Default)]
pub struct ProjectGraphLoader;

impl ProjectGraphLoader {
    /// Creates a loader.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Loads every manifest in `projects`.
    ///
    /// Paths that are not existing files are skipped with a warning.
    /// Duplicates (by path identity) are loaded once.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing manifest cannot be read or is not an
    /// XML document.
    pub fn load(&self, projects: &[PathBuf]) -> Result<ProjectGraph> {
        let mut graph = ProjectGraph::default();

        for path in projects {
            if !path.is_file() {
                log::warn!("project {} does not exist, skipping", path.display());
                continue;
            }
            let key = CanonicalPath::new(path);
            if graph.index.contains_key(&key) {
                continue;
            }

            let document = ProjectDocument::load(path)?;
            let directory = document.directory().to_path_buf();
            graph.index.insert(key, graph.nodes.len());
            graph.nodes.push(ProjectNode {
                path: path.clone(),
                directory,
                references: Vec::new(),
                document,
            });
        }

        // Targets are classified once every workspace project is indexed.
        let known: Vec<CanonicalPath> = graph.index.keys().cloned().collect();
        for node in &mut graph.nodes {
            node.references = node
                .document
                .items(PROJECT_REFERENCE)
                .map(|(id, item)| ProjectReference {
                    id,
                    expression: item.include().to_string(),
                    target: classify(item.include(), &node.directory, &known),
                })
                .collect();
            log::debug!(
                "loaded {} with {} reference(s)",
                node.path.display(),
                node.references.len()
            );
        }

        Ok(graph)
    }
}

fn classify(expression: &str, directory: &Path, known: &[CanonicalPath]) -> ReferenceTarget {
    if !is_literal(expression) {
        return ReferenceTarget::Computed;
    }
    let Ok(target) = absolutize(&expression_to_path(expression.trim()), directory) else {
        return ReferenceTarget::Computed;
    };
    if target.is_file() || known.contains(&CanonicalPath::new(&target)) {
        ReferenceTarget::Resolved(target)
    } else {
        ReferenceTarget::Missing(target)
    }
}
