//! Common test utilities for integration tests.
//!
//! This module provides a repository fixture builder and tree snapshots for
//! testing the projmove library against real directory trees.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tempfile::TempDir;
use walkdir::WalkDir;

use projmove::config::Config;
use projmove::workspace::{Workspace, WorkspaceResolver};

/// Project type identifier written into generated solutions.
#[allow(dead_code)]
pub const CSHARP_TYPE_ID: &str = "{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}";

/// A temporary repository with a `.git` marker at its root.
///
/// # Examples
///
/// ```no_run
/// # use common::TestRepo;
/// let repo = TestRepo::new()
///     .project("Lib/Lib.proj", &[])
///     .project("App/App.proj", &["../Lib/Lib.proj"])
///     .solution("All.sln", &["App\\App.proj", "Lib\\Lib.proj"]);
/// let workspace = repo.workspace();
/// ```
pub struct TestRepo {
    temp: TempDir,
}

#[allow(dead_code)]
impl TestRepo {
    /// Creates an empty repository.
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        Self { temp }
    }

    /// Repository root.
    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// Absolute path of `rel` inside the repository.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.temp.path().join(rel)
    }

    /// Adds a project manifest with the given `ProjectReference` includes.
    pub fn project(self, rel: &str, references: &[&str]) -> Self {
        let mut text = String::from("<Project Sdk=\"Microsoft.NET.Sdk\">\r\n");
        text.push_str("  <PropertyGroup>\r\n    <TargetFramework>net8.0</TargetFramework>\r\n  </PropertyGroup>\r\n");
        if !references.is_empty() {
            text.push_str("  <ItemGroup>\r\n");
            for reference in references {
                text.push_str(&format!("    <ProjectReference Include=\"{reference}\" />\r\n"));
            }
            text.push_str("  </ItemGroup>\r\n");
        }
        text.push_str("</Project>\r\n");
        self.file(rel, &text)
    }

    /// Adds a solution listing `members` (paths relative to the solution).
    ///
    /// Project identifiers are derived from the member index so tests can
    /// check they survive a rewrite.
    pub fn solution(self, rel: &str, members: &[&str]) -> Self {
        let mut text = String::from(
            "\u{feff}\r\nMicrosoft Visual Studio Solution File, Format Version 12.00\r\n# Visual Studio Version 17\r\n",
        );
        for (i, member) in members.iter().enumerate() {
            let name = Path::new(&member.replace('\\', "/"))
                .file_stem()
                .unwrap()
                .to_string_lossy()
                .into_owned();
            text.push_str(&format!(
                "Project(\"{CSHARP_TYPE_ID}\") = \"{name}\", \"{member}\", \"{}\"\r\nEndProject\r\n",
                project_id(i)
            ));
        }
        text.push_str("Global\r\n\tGlobalSection(SolutionProperties) = preSolution\r\n\t\tHideSolutionNode = FALSE\r\n\tEndGlobalSection\r\nEndGlobal\r\n");
        self.file(rel, &text)
    }

    /// Adds an arbitrary file.
    pub fn file(self, rel: &str, contents: &str) -> Self {
        let path = self.path(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
        self
    }

    /// Reads a file inside the repository.
    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel)).unwrap()
    }

    /// Resolves the workspace with default configuration from the root.
    pub fn workspace(&self) -> Workspace {
        WorkspaceResolver::new(&Config::default())
            .resolve(None, self.root())
            .unwrap()
    }

    /// Relative path and content hash of every entry under the root.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        snapshot(self.root())
    }
}

/// Identifier of the `index`-th generated solution member.
#[allow(dead_code)]
pub fn project_id(index: usize) -> String {
    format!("{{0000000{index}-AAAA-BBBB-CCCC-DDDDDDDDDDDD}}")
}

/// Relative path to content hash for every entry under `root`.
///
/// Directories map to an empty string so empty directories count.
pub fn snapshot(root: &Path) -> BTreeMap<String, String> {
    WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .map(|entry| {
            let entry = entry.unwrap();
            let rel = entry
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/");
            let hash = if entry.file_type().is_file() {
                format!("{:x}", Sha256::digest(fs::read(entry.path()).unwrap()))
            } else {
                String::new()
            };
            (rel, hash)
        })
        .collect()
}
