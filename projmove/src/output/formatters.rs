//! Output formatter implementations.

use serde_json::json;

use crate::operations::ExecutionResult;
use crate::path::relative_path;
use crate::{Error, Result};

use super::{OutputFormatter, Report};

/// Formatter for JSON output.
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &Report<'_>) -> Result<String> {
        let value = match report {
            Report::Moves { report, .. } => serde_json::to_value(report),
            Report::Execution { result, .. } => serde_json::to_value(result),
            Report::Workspace(workspace) => serde_json::to_value(workspace),
            Report::StrayProjects {
                solution,
                projects,
                working_dir,
            } => Ok(json!({
                "solution": relative_path(working_dir, solution),
                "projects": projects
                    .iter()
                    .map(|p| relative_path(working_dir, p))
                    .collect::<Vec<_>>(),
            })),
        };

        value
            .and_then(|v| serde_json::to_string_pretty(&v))
            .map_err(|e| Error::Validation {
                field: "json_output".to_string(),
                message: format!("failed to serialize to JSON: {e}"),
            })
    }
}

/// Formatter for human-readable output.
///
/// Execution reports list content changes first, then one line per
/// mutation: imperative when staged, past tense when applied.
pub struct HumanFormatter;

impl HumanFormatter {
    fn execution_lines(result: &ExecutionResult, empty_message: &str) -> Vec<String> {
        let mut lines: Vec<String> = result
            .warnings
            .iter()
            .map(|w| format!("Warning: {w}"))
            .collect();

        if result.changes.is_empty() && result.records.is_empty() {
            lines.push(empty_message.to_string());
            return lines;
        }

        lines.extend(result.changes.iter().cloned());
        let mode = result.mode();
        lines.extend(result.records.iter().map(|r| r.message(mode)));

        if let Some(summary) = &result.rolled_back {
            lines.push(format!(
                "Rolled back {} change(s) after: {}",
                summary.restored, summary.failed
            ));
        }
        lines
    }
}

impl OutputFormatter for HumanFormatter {
    fn format(&self, report: &Report<'_>) -> Result<String> {
        let lines = match report {
            Report::Moves {
                report,
                empty_message,
            } => Self::execution_lines(&report.execution, empty_message),
            Report::Execution {
                result,
                empty_message,
            } => Self::execution_lines(result, empty_message),
            Report::Workspace(workspace) => {
                let mut lines = vec![format!("Root: {}", workspace.root_dir.display())];
                if workspace.solutions.is_empty() {
                    lines.push("Solutions: none".to_string());
                } else {
                    lines.push("Solutions:".to_string());
                    lines.extend(
                        workspace
                            .solutions
                            .iter()
                            .map(|s| format!("  {}", workspace.relative(s))),
                    );
                }
                lines.push(format!("Projects ({}):", workspace.projects.len()));
                lines.extend(
                    workspace
                        .projects
                        .iter()
                        .map(|p| format!("  {}", workspace.relative(p))),
                );
                lines
            }
            Report::StrayProjects {
                projects,
                working_dir,
                ..
            } => {
                if projects.is_empty() {
                    vec!["No stray projects were found".to_string()]
                } else {
                    projects
                        .iter()
                        .map(|p| relative_path(working_dir, p))
                        .collect()
                }
            }
        };

        Ok(lines.join("\n"))
    }
}
