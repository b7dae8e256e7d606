//! Mocha adapter.
//!
//! Mocha's JSON reporter emits a flat list of tests with no suite structure.
//! Suites are synthesized by a [`SuiteGrouping`] strategy. The default,
//! first-token grouping, assumes titles of the form `"<Group> <description>"`
//! and misgroups anything else.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use super::{
    FrameworkAdapter, base_name, file_args, millis, name_filter, parse_report, strip_ansi,
    value_text,
};
use crate::config::SuiteGrouping;
use crate::error::Result;
use crate::models::{
    ErrorDetail, Framework, TestCase, TestRunOptions, TestRunResult, TestStatus, TestSuite,
};

/// Group key for tests that give the strategy nothing to work with.
pub const UNGROUPED: &str = "Ungrouped";

pub struct MochaAdapter {
    grouping: SuiteGrouping,
}

impl MochaAdapter {
    pub fn new(grouping: SuiteGrouping) -> Self {
        Self { grouping }
    }
}

impl Default for MochaAdapter {
    fn default() -> Self {
        Self::new(SuiteGrouping::FirstToken)
    }
}

#[derive(Debug, Deserialize)]
struct MochaReport {
    tests: Vec<MochaTest>,
    #[serde(default)]
    passes: Vec<MochaTest>,
    #[serde(default)]
    failures: Vec<MochaTest>,
    #[serde(default)]
    pending: Vec<MochaTest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MochaTest {
    title: String,
    #[serde(default)]
    full_title: String,
    file: Option<String>,
    duration: Option<f64>,
    /// Only some reporter versions include it.
    state: Option<String>,
    #[serde(default)]
    err: Option<MochaError>,
}

#[derive(Debug, Default, Deserialize)]
struct MochaError {
    message: Option<String>,
    stack: Option<String>,
    #[serde(default)]
    expected: serde_json::Value,
    #[serde(default)]
    actual: serde_json::Value,
}

/// A suite under construction.
struct Group {
    key: String,
    name: String,
    file: String,
    tests: Vec<TestCase>,
    duration_ms: u64,
}

impl FrameworkAdapter for MochaAdapter {
    fn framework(&self) -> Framework {
        Framework::Mocha
    }

    fn args(&self, options: &TestRunOptions) -> Vec<String> {
        let mut args = vec!["mocha".to_string(), "--reporter=json".to_string()];
        args.extend(file_args(options));
        if let Some(filter) = name_filter(&options.patterns) {
            args.push("--grep".into());
            args.push(filter);
        }
        if let Some(ms) = options.test_timeout_ms {
            args.push("--timeout".into());
            args.push(ms.to_string());
        }
        if options.coverage {
            tracing::debug!("mocha has no built-in coverage; ignoring coverage request");
        }
        args
    }

    fn parse(&self, raw: &str) -> Result<TestRunResult> {
        let report: MochaReport = parse_report(raw, Framework::Mocha)?;
        let verdicts = Verdicts::new(&report);
        let mut groups = Groups::default();

        for test in &report.tests {
            let status = verdicts.status_of(test);
            groups.push(self.group_of(test), test, status);
        }

        // Failing hooks are reported only in `failures`, never in `tests`.
        let seen: HashSet<TestKey<'_>> = report.tests.iter().map(key_of).collect();
        for failure in report.failures.iter().filter(|f| !seen.contains(&key_of(f))) {
            groups.push(self.group_of(failure), failure, TestStatus::Failed);
        }

        let suites = groups
            .list
            .into_iter()
            .map(|g| TestSuite::new(&g.key, g.name, g.file, g.tests, g.duration_ms))
            .collect();
        Ok(TestRunResult::new(Framework::Mocha, suites, None))
    }
}

/// Groups in first-appearance order.
#[derive(Default)]
struct Groups {
    list: Vec<Group>,
    index: HashMap<String, usize>,
}

impl Groups {
    fn push(&mut self, (key, name): (String, String), test: &MochaTest, status: TestStatus) {
        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => {
                self.list.push(Group {
                    key: key.clone(),
                    name,
                    file: test.file.clone().unwrap_or_default(),
                    tests: Vec::new(),
                    duration_ms: 0,
                });
                self.index.insert(key, self.list.len() - 1);
                self.list.len() - 1
            }
        };

        let group = &mut self.list[slot];
        let duration = millis(test.duration);
        group.duration_ms += duration.unwrap_or(0);

        let case = TestCase::new(
            &group.key,
            &test.full_title,
            &test.title,
            &group.name,
            test.file.clone().unwrap_or_default(),
            status,
        )
        .with_duration(duration)
        .with_error(test.err.as_ref().and_then(error_detail));
        group.tests.push(case);
    }
}

impl MochaAdapter {
    /// Group key and display name for a test.
    fn group_of(&self, test: &MochaTest) -> (String, String) {
        match self.grouping {
            SuiteGrouping::FirstToken => {
                let key = test
                    .full_title
                    .split_whitespace()
                    .next()
                    .unwrap_or(UNGROUPED)
                    .to_string();
                (key.clone(), key)
            }
            SuiteGrouping::File => match test.file.as_deref() {
                Some(file) => (file.to_string(), base_name(file)),
                None => (UNGROUPED.to_string(), UNGROUPED.to_string()),
            },
        }
    }
}

/// A test is identified by its file and full title; titles alone repeat across files.
type TestKey<'a> = (&'a str, &'a str);

fn key_of(test: &MochaTest) -> TestKey<'_> {
    (test.file.as_deref().unwrap_or(""), test.full_title.as_str())
}

/// Outcome lookup for reporters that omit `state` on each test.
struct Verdicts<'a> {
    failed: HashSet<TestKey<'a>>,
    pending: HashSet<TestKey<'a>>,
    passed: HashSet<TestKey<'a>>,
}

impl<'a> Verdicts<'a> {
    fn new(report: &'a MochaReport) -> Self {
        let keys = |tests: &'a [MochaTest]| -> HashSet<TestKey<'a>> {
            tests.iter().map(key_of).collect()
        };
        Self {
            failed: keys(&report.failures),
            pending: keys(&report.pending),
            passed: keys(&report.passes),
        }
    }

    fn status_of(&self, test: &MochaTest) -> TestStatus {
        if let Some(state) = test.state.as_deref() {
            return TestStatus::from_binary_state(state);
        }
        let key = key_of(test);
        if self.failed.contains(&key) {
            TestStatus::Failed
        } else if self.passed.contains(&key) {
            TestStatus::Passed
        } else if self.pending.contains(&key) {
            TestStatus::Skipped
        } else if test.err.as_ref().is_some_and(|e| e.message.is_some()) {
            TestStatus::Failed
        } else {
            TestStatus::Skipped
        }
    }
}

fn error_detail(err: &MochaError) -> Option<ErrorDetail> {
    let message = err.message.as_deref()?;
    Some(ErrorDetail {
        message: strip_ansi(message),
        stack: err.stack.as_deref().map(strip_ansi),
        expected: value_text(&err.expected),
        actual: value_text(&err.actual),
    })
}

#[cfg(test)]
#[path = "mocha_tests.rs"]
mod tests;
