use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    #[default]
    Pending,
    Running,
    Passed,
    Failed,
    Skipped,
}

impl TestStatus {
    /// Jest and mocha collapse everything that is neither passed nor failed into skipped.
    pub fn from_binary_state(state: &str) -> Self {
        match state {
            "passed" => TestStatus::Passed,
            "failed" => TestStatus::Failed,
            _ => TestStatus::Skipped,
        }
    }

    /// Vitest reports its own vocabulary; keep it as-is where we have a matching variant.
    pub fn from_native(state: &str) -> Self {
        match state {
            "passed" | "pass" => TestStatus::Passed,
            "failed" | "fail" => TestStatus::Failed,
            "pending" | "todo" => TestStatus::Pending,
            "running" | "run" => TestStatus::Running,
            _ => TestStatus::Skipped,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, TestStatus::Failed)
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
