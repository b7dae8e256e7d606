use serde::{Deserialize, Serialize};

use super::framework::Framework;

/// One test file found by lexical scanning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredSuite {
    pub file: String,
    pub name: String,
    /// Count of `it(` / `test(` calls. An estimate, not a guarantee.
    pub estimated_tests: usize,
}

/// Static, best-effort inventory of a workspace's tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDiscoveryResult {
    pub framework: Framework,
    pub suites: Vec<DiscoveredSuite>,
    pub total_tests: usize,
}

impl TestDiscoveryResult {
    pub fn new(framework: Framework, suites: Vec<DiscoveredSuite>) -> Self {
        let total_tests = suites.iter().map(|s| s.estimated_tests).sum();
        Self {
            framework,
            suites,
            total_tests,
        }
    }
}
