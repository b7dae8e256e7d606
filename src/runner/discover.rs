//! Static test inventory.
//!
//! Files are found by glob and scanned lexically. Counts are estimates:
//! generated test names, helper wrappers and commented-out calls all skew them.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use futures_util::future::join_all;
use regex::Regex;

use super::workspace::Workspace;
use crate::models::{DiscoveredSuite, Framework, TestDiscoveryResult};

/// Workspace-relative globs for candidate test files.
pub const TEST_FILE_GLOBS: &[&str] = &[
    "**/*.test.ts",
    "**/*.spec.ts",
    "**/*.test.js",
    "**/*.spec.js",
    "**/__tests__/**/*.ts",
    "**/__tests__/**/*.js",
];

/// Per-pattern cap on matched files.
pub const MAX_FILES_PER_GLOB: usize = 100;

static TEST_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:it|test)\s*\(").expect("valid regex"));

static DESCRIBE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bdescribe\s*\(\s*(?:'([^']*)'|"([^"]*)"|`([^`]*)`)"#).expect("valid regex")
});

/// Number of `it(` / `test(` calls in the source.
pub fn estimate_test_count(source: &str) -> usize {
    TEST_CALL.find_iter(source).count()
}

/// Name of the first `describe(...)` block, if any.
pub fn first_describe_name(source: &str) -> Option<String> {
    let caps = DESCRIBE_NAME.captures(source)?;
    (1..=3)
        .find_map(|i| caps.get(i))
        .map(|m| m.as_str().to_string())
}

/// Collect candidate test files, in glob order, without duplicates.
pub async fn find_test_files(workspace: &dyn Workspace, ignore: &[String]) -> Vec<PathBuf> {
    let ignore: Vec<glob::Pattern> = ignore
        .iter()
        .filter_map(|p| match glob::Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                tracing::warn!(pattern = %p, error = %e, "ignoring invalid discovery pattern");
                None
            }
        })
        .collect();

    let mut files: Vec<PathBuf> = Vec::new();
    for pattern in TEST_FILE_GLOBS {
        let matches = match workspace.find_files(pattern, MAX_FILES_PER_GLOB).await {
            Ok(matches) => matches,
            Err(e) => {
                tracing::debug!(pattern, error = %e, "glob failed");
                continue;
            }
        };
        for path in matches {
            let relative = path.strip_prefix(workspace.root()).unwrap_or(&path);
            if ignore.iter().any(|p| p.matches_path(relative)) || files.contains(&path) {
                continue;
            }
            files.push(path);
        }
    }
    files
}

/// Scan the workspace's test files and estimate what they contain.
pub async fn discover(
    workspace: &dyn Workspace,
    framework: Framework,
    ignore: &[String],
) -> TestDiscoveryResult {
    let files = find_test_files(workspace, ignore).await;

    let scans = files.iter().map(|path| scan_file(workspace, path));
    let suites: Vec<DiscoveredSuite> = join_all(scans).await.into_iter().flatten().collect();

    let result = TestDiscoveryResult::new(framework, suites);
    tracing::info!(
        files = result.suites.len(),
        tests = result.total_tests,
        "discovery complete"
    );
    result
}

async fn scan_file(workspace: &dyn Workspace, path: &Path) -> Option<DiscoveredSuite> {
    let source = match workspace.read_text(path).await {
        Ok(source) => source,
        Err(e) => {
            tracing::debug!(error = %e, "skipping unreadable test file");
            return None;
        }
    };

    let name = first_describe_name(&source).unwrap_or_else(|| base_name(path));
    Some(DiscoveredSuite {
        file: path.to_string_lossy().to_string(),
        name,
        estimated_tests: estimate_test_count(&source),
    })
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

#[cfg(test)]
#[path = "discover_tests.rs"]
mod tests;
