use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::framework::Framework;
use super::id;
use super::status::TestStatus;
use super::summary::{RunSummary, aggregate};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub id: String,
    pub name: String,
    pub suite_name: String,
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    pub status: TestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
}

impl TestCase {
    /// Build a test case whose id is derived from `suite_key` and `full_name`.
    ///
    /// Error detail is dropped unless the status is failed.
    pub fn new(
        suite_key: &str,
        full_name: &str,
        name: impl Into<String>,
        suite_name: impl Into<String>,
        file: impl Into<String>,
        status: TestStatus,
    ) -> Self {
        Self {
            id: id::test_id(suite_key, full_name),
            name: name.into(),
            suite_name: suite_name.into(),
            file: file.into(),
            line: None,
            status,
            duration_ms: None,
            error: None,
        }
    }

    pub fn with_line(mut self, line: Option<u32>) -> Self {
        self.line = line;
        self
    }

    pub fn with_duration(mut self, duration_ms: Option<u64>) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_error(mut self, error: Option<ErrorDetail>) -> Self {
        self.error = if self.status.is_failed() { error } else { None };
        self
    }
}

/// One file or logical group of tests.
///
/// Counts and status are computed from the test list at construction and
/// cannot drift from it afterwards, deserialization included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "SuiteRecord")]
pub struct TestSuite {
    id: String,
    name: String,
    file: String,
    tests: Vec<TestCase>,
    status: TestStatus,
    duration_ms: u64,
    passed: usize,
    failed: usize,
    skipped: usize,
}

impl TestSuite {
    pub fn new(
        suite_key: &str,
        name: impl Into<String>,
        file: impl Into<String>,
        tests: Vec<TestCase>,
        duration_ms: u64,
    ) -> Self {
        Self::with_id(id::suite_id(suite_key), name, file, tests, duration_ms)
    }

    fn with_id(
        id: String,
        name: impl Into<String>,
        file: impl Into<String>,
        tests: Vec<TestCase>,
        duration_ms: u64,
    ) -> Self {
        let passed = tests
            .iter()
            .filter(|t| t.status == TestStatus::Passed)
            .count();
        let failed = tests.iter().filter(|t| t.status.is_failed()).count();
        let skipped = tests.len() - passed - failed;
        Self {
            id,
            name: name.into(),
            file: file.into(),
            status: if failed == 0 {
                TestStatus::Passed
            } else {
                TestStatus::Failed
            },
            tests,
            duration_ms,
            passed,
            failed,
            skipped,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn tests(&self) -> &[TestCase] {
        &self.tests
    }

    pub fn status(&self) -> TestStatus {
        self.status
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Everything that is neither passed nor failed, pending included.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

/// Stored form of a suite; counts are recomputed on load.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SuiteRecord {
    id: String,
    name: String,
    file: String,
    #[serde(default)]
    tests: Vec<TestCase>,
    #[serde(default)]
    duration_ms: u64,
}

impl From<SuiteRecord> for TestSuite {
    fn from(record: SuiteRecord) -> Self {
        Self::with_id(record.id, record.name, record.file, record.tests, record.duration_ms)
    }
}

/// Coverage percentages as reported by the framework's coverage tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageSummary {
    pub lines: f64,
    pub branches: f64,
    pub functions: f64,
    pub statements: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RunRecord")]
pub struct TestRunResult {
    pub timestamp: DateTime<Utc>,
    pub duration_ms: u64,
    pub framework: Framework,
    suites: Vec<TestSuite>,
    pub passed: bool,
    summary: RunSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage: Option<CoverageSummary>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub timed_out: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Stored form of a run; the summary is re-aggregated on load.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunRecord {
    timestamp: DateTime<Utc>,
    duration_ms: u64,
    framework: Framework,
    #[serde(default)]
    suites: Vec<TestSuite>,
    passed: bool,
    #[serde(default)]
    coverage: Option<CoverageSummary>,
    #[serde(default)]
    timed_out: bool,
    #[serde(default)]
    reason: Option<String>,
}

impl From<RunRecord> for TestRunResult {
    fn from(record: RunRecord) -> Self {
        Self {
            timestamp: record.timestamp,
            duration_ms: record.duration_ms,
            framework: record.framework,
            summary: aggregate(&record.suites),
            suites: record.suites,
            passed: record.passed,
            coverage: record.coverage,
            timed_out: record.timed_out,
            reason: record.reason,
        }
    }
}

impl TestRunResult {
    /// Assemble a result from normalized suites.
    ///
    /// `native_success` is the framework's own overall verdict when it reports
    /// one; otherwise the run passes iff no test failed.
    pub fn new(framework: Framework, suites: Vec<TestSuite>, native_success: Option<bool>) -> Self {
        let summary = aggregate(&suites);
        let passed = native_success.unwrap_or(summary.failed == 0);
        let duration_ms = suites.iter().map(TestSuite::duration_ms).sum();
        Self {
            timestamp: Utc::now(),
            duration_ms,
            framework,
            suites,
            passed,
            summary,
            coverage: None,
            timed_out: false,
            reason: None,
        }
    }

    /// An empty, passing result explaining why nothing ran.
    pub fn vacuous(framework: Framework, reason: impl Into<String>) -> Self {
        let mut result = Self::new(framework, Vec::new(), None);
        result.reason = Some(reason.into());
        result
    }

    pub fn suites(&self) -> &[TestSuite] {
        &self.suites
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
