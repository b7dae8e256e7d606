//! Vitest adapter.
//!
//! `vitest run --reporter=json` emits the jest report shape. Statuses are kept
//! as vitest reports them, and suite duration comes from the file's own
//! `duration` field.

use super::jest::{JestReport, StatusMapping};
use super::{FrameworkAdapter, file_args, millis, name_filter, parse_report};
use crate::error::Result;
use crate::models::{Framework, TestRunOptions, TestRunResult};

pub struct VitestAdapter;

impl FrameworkAdapter for VitestAdapter {
    fn framework(&self) -> Framework {
        Framework::Vitest
    }

    fn args(&self, options: &TestRunOptions) -> Vec<String> {
        let mut args = vec![
            "vitest".to_string(),
            "run".to_string(),
            "--reporter=json".to_string(),
        ];
        if options.coverage {
            args.push("--coverage".into());
            args.push("--coverage.reporter=json-summary".into());
        }
        args.extend(file_args(options));
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
        let report: JestReport = parse_report(raw, Framework::Vitest)?;
        let suites = report
            .test_results
            .iter()
            .map(|file| file.to_suite(StatusMapping::Native, millis(file.duration).unwrap_or(0)))
            .collect();
        Ok(TestRunResult::new(Framework::Vitest, suites, report.success))
    }
}

#[cfg(test)]
#[path = "vitest_tests.rs"]
mod tests;
