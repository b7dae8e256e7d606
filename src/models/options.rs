use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::framework::Framework;

/// Per-call run configuration. Nothing here survives the call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestRunOptions {
    /// Restrict the run to these files.
    pub files: Vec<PathBuf>,
    /// Test name patterns, forwarded to the framework's name filter.
    pub patterns: Vec<String>,
    pub coverage: bool,
    /// Accepted but not supported; the run executes once.
    pub watch: bool,
    /// Skip detection and use this framework.
    pub framework: Option<Framework>,
    /// Per-test timeout hint in milliseconds.
    pub test_timeout_ms: Option<u64>,
}
