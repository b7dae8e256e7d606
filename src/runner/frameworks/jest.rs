//! Jest adapter.
//!
//! Runs `jest --json` and maps its report. Vitest's JSON reporter follows the
//! same shape, so the report types here are shared with the vitest adapter.

use serde::Deserialize;

use super::{
    FrameworkAdapter, base_name, failure_detail, file_args, millis, name_filter, parse_report,
    value_text,
};
use crate::error::Result;
use crate::models::{Framework, TestCase, TestRunOptions, TestRunResult, TestStatus, TestSuite};

/// Name given to the synthetic case for a file that crashed before running tests.
pub const SUITE_FAILED_TO_RUN: &str = "Test suite failed to run";

pub struct JestAdapter;

impl FrameworkAdapter for JestAdapter {
    fn framework(&self) -> Framework {
        Framework::Jest
    }

    fn args(&self, options: &TestRunOptions) -> Vec<String> {
        let mut args = vec!["jest".to_string()];
        if options.coverage {
            args.push("--coverage".into());
            args.push("--coverageReporters=json-summary".into());
        }
        args.extend(file_args(options));
        args.push("--json".into());
        if let Some(filter) = name_filter(&options.patterns) {
            args.push("-t".into());
            args.push(filter);
        }
        if let Some(ms) = options.test_timeout_ms {
            args.push(format!("--testTimeout={ms}"));
        }
        args
    }

    fn parse(&self, raw: &str) -> Result<TestRunResult> {
        let report: JestReport = parse_report(raw, Framework::Jest)?;
        let suites = report
            .test_results
            .iter()
            .map(|file| file.to_suite(StatusMapping::Binary, file.elapsed()))
            .collect();
        Ok(TestRunResult::new(Framework::Jest, suites, report.success))
    }
}

/// How native assertion statuses become [`TestStatus`].
#[derive(Debug, Clone, Copy)]
pub(crate) enum StatusMapping {
    /// passed / failed / everything else skipped.
    Binary,
    /// Keep the framework's own status.
    Native,
}

impl StatusMapping {
    fn map(self, status: &str) -> TestStatus {
        match self {
            StatusMapping::Binary => TestStatus::from_binary_state(status),
            StatusMapping::Native => TestStatus::from_native(status),
        }
    }
}

/// Jest JSON output structure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JestReport {
    pub success: Option<bool>,
    pub test_results: Vec<JestTestFile>,
}

/// A test file result.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JestTestFile {
    pub name: String,
    pub status: Option<String>,
    pub message: Option<String>,
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
    pub duration: Option<f64>,
    #[serde(default)]
    pub assertion_results: Vec<JestAssertion>,
}

/// A single test assertion result.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JestAssertion {
    #[serde(default)]
    pub ancestor_titles: Vec<String>,
    pub title: String,
    pub full_name: Option<String>,
    pub status: String,
    pub duration: Option<f64>,
    #[serde(default)]
    pub failure_messages: Vec<String>,
    #[serde(default)]
    pub failure_details: Vec<serde_json::Value>,
    pub location: Option<JestLocation>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JestLocation {
    pub line: u32,
}

impl JestTestFile {
    /// `endTime - startTime`, when both are present.
    pub(crate) fn elapsed(&self) -> u64 {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => millis(Some(end - start)).unwrap_or(0),
            _ => 0,
        }
    }

    pub(crate) fn to_suite(&self, mapping: StatusMapping, duration_ms: u64) -> TestSuite {
        let suite_name = base_name(&self.name);
        let mut tests: Vec<TestCase> = self
            .assertion_results
            .iter()
            .map(|a| a.to_case(&self.name, &suite_name, mapping))
            .collect();

        if tests.is_empty()
            && self.status.as_deref() == Some("failed")
            && let Some(message) = self.message.as_deref().filter(|m| !m.trim().is_empty())
        {
            let case = TestCase::new(
                &self.name,
                SUITE_FAILED_TO_RUN,
                SUITE_FAILED_TO_RUN,
                &suite_name,
                &self.name,
                TestStatus::Failed,
            )
            .with_error(failure_detail(&[message.to_string()]));
            tests.push(case);
        }

        TestSuite::new(&self.name, suite_name, &self.name, tests, duration_ms)
    }
}

impl JestAssertion {
    fn full_name(&self) -> String {
        self.full_name.clone().unwrap_or_else(|| {
            self.ancestor_titles
                .iter()
                .chain(std::iter::once(&self.title))
                .cloned()
                .collect::<Vec<_>>()
                .join(" ")
        })
    }

    fn to_case(&self, file: &str, suite_name: &str, mapping: StatusMapping) -> TestCase {
        let status = mapping.map(&self.status);
        let error = failure_detail(&self.failure_messages).map(|mut detail| {
            if let Some(matcher) = self
                .failure_details
                .iter()
                .find_map(|d| d.get("matcherResult"))
            {
                detail.expected = matcher.get("expected").and_then(value_text);
                detail.actual = matcher.get("actual").and_then(value_text);
            }
            detail
        });

        TestCase::new(
            file,
            &self.full_name(),
            &self.title,
            suite_name,
            file,
            status,
        )
        .with_line(self.location.as_ref().map(|l| l.line))
        .with_duration(millis(self.duration))
        .with_error(error)
    }
}

#[cfg(test)]
#[path = "jest_tests.rs"]
mod tests;
