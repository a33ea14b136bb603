//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test repositories in temporary directories
//! - Command builders isolated from the user's configuration
//! - Tree snapshots for checking that nothing changed

use assert_cmd::Command;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

/// Environment variables that would leak user settings into a test run.
const PROJMOVE_VARS: &[&str] = &[
    "PROJMOVE_WORKSPACE",
    "PROJMOVE_LOG_MODE",
    "PROJMOVE_PROJECT_EXTENSIONS",
    "PROJMOVE_SOLUTION_EXTENSIONS",
    "PROJMOVE_EXCLUDED_DIRECTORIES",
    "PROJMOVE_REPOSITORY_MARKERS",
    "PROJMOVE_FAILURE_POLICY",
    "PROJMOVE_OUTPUT_FORMAT",
];

/// Test environment with an isolated repository and home directory.
pub struct TestEnv {
    /// Home directory (kept alive for the duration of the test)
    home: TempDir,
    /// Repository root, with a `.git` marker
    repo: TempDir,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create an empty repository.
    pub fn new() -> Self {
        let home = tempfile::tempdir().expect("Failed to create home dir");
        let repo = tempfile::tempdir().expect("Failed to create repo dir");
        fs::create_dir(repo.path().join(".git")).expect("Failed to create .git marker");
        Self { home, repo }
    }

    /// Repository root.
    pub fn root(&self) -> &Path {
        self.repo.path()
    }

    /// Absolute path of `rel` inside the repository.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.repo.path().join(rel)
    }

    /// A `projmove` command run from the repository root.
    pub fn command(&self) -> Command {
        self.command_in("")
    }

    /// A `projmove` command run from `rel` inside the repository.
    pub fn command_in(&self, rel: &str) -> Command {
        let mut cmd = Command::cargo_bin("projmove").expect("Failed to find projmove binary");
        cmd.current_dir(self.path(rel)).env("HOME", self.home.path());
        for var in PROJMOVE_VARS {
            cmd.env_remove(var);
        }
        cmd
    }

    /// Add a project manifest with the given `ProjectReference` includes.
    pub fn project(self, rel: &str, references: &[&str]) -> Self {
        let mut text = String::from("<Project Sdk=\"Microsoft.NET.Sdk\">\r\n");
        if !references.is_empty() {
            text.push_str("  <ItemGroup>\r\n");
            for reference in references {
                text.push_str(&format!(
                    "    <ProjectReference Include=\"{reference}\" />\r\n"
                ));
            }
            text.push_str("  </ItemGroup>\r\n");
        }
        text.push_str("</Project>\r\n");
        self.file(rel, &text)
    }

    /// Add a solution listing `members` (paths relative to the solution).
    pub fn solution(self, rel: &str, members: &[&str]) -> Self {
        let mut text =
            String::from("\r\nMicrosoft Visual Studio Solution File, Format Version 12.00\r\n");
        for (i, member) in members.iter().enumerate() {
            let name = Path::new(&member.replace('\\', "/"))
                .file_stem()
                .expect("member has a file name")
                .to_string_lossy()
                .into_owned();
            text.push_str(&format!(
                "Project(\"{{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}}\") = \"{name}\", \"{member}\", \"{{0000000{i}-AAAA-BBBB-CCCC-DDDDDDDDDDDD}}\"\r\nEndProject\r\n"
            ));
        }
        text.push_str("Global\r\nEndGlobal\r\n");
        self.file(rel, &text)
    }

    /// Add an arbitrary file.
    pub fn file(self, rel: &str, contents: &str) -> Self {
        let path = self.path(rel);
        fs::create_dir_all(path.parent().expect("file has a parent"))
            .expect("Failed to create parent directory");
        fs::write(path, contents).expect("Failed to write file");
        self
    }

    /// Read a file inside the repository.
    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel)).expect("Failed to read file")
    }

    /// Relative path to content hash for every entry in the repository.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        let root = self.root();
        WalkDir::new(root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .map(|entry| {
                let entry = entry.expect("Failed to walk repository");
                let rel = entry
                    .path()
                    .strip_prefix(root)
                    .expect("entry is under the root")
                    .to_string_lossy()
                    .replace('\\', "/");
                let hash = if entry.file_type().is_file() {
                    let bytes = fs::read(entry.path()).expect("Failed to read file");
                    format!("{:x}", Sha256::digest(bytes))
                } else {
                    String::new()
                };
                (rel, hash)
            })
            .collect()
    }
}

/// The two-project repository used by most command tests.
#[allow(dead_code)]
pub fn basic_env() -> TestEnv {
    TestEnv::new()
        .project("Old/Old.proj", &["../Lib/Lib.proj"])
        .project("Lib/Lib.proj", &[])
        .solution("All.sln", &["Old\\Old.proj", "Lib\\Lib.proj"])
}
