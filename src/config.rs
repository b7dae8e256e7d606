use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub runner: RunnerConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub mocha: MochaConfig,
}

/// How framework processes are launched.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Package runner prefix, split shell-style.
    /// Example: "npx" or "pnpm exec"
    pub command: String,
    /// Deadline for the whole framework process.
    pub timeout_ms: u64,
    /// Cap on captured stdout and stderr, each.
    pub max_buffer_bytes: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            command: "npx".into(),
            timeout_ms: 120_000,
            max_buffer_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Controls which files are excluded during test discovery.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscoveryConfig {
    /// Glob patterns (relative to workspace root) of files to skip.
    /// Example: ["src/legacy/**", "**/*.contract.test.ts"]
    #[serde(default)]
    pub ignore: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MochaConfig {
    #[serde(default)]
    pub grouping: SuiteGrouping,
}

/// How mocha's flat test list is regrouped into suites.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuiteGrouping {
    /// First whitespace-delimited token of the full title.
    #[default]
    FirstToken,
    /// The test's source file.
    File,
}

impl Config {
    /// Load `testlens.toml` from the workspace root, falling back to defaults if absent or invalid.
    pub fn load(workspace: &Path) -> Self {
        let path = workspace.join("testlens.toml");
        let Ok(content) = std::fs::read_to_string(&path) else {
            return Self::default();
        };
        match toml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
