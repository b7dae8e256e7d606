//! Coverage totals written by the framework's `json-summary` reporter.
//!
//! Only read, never computed: if the summary file is missing, unreadable or
//! older than the run, the result simply carries no coverage.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Deserialize;

use super::workspace::Workspace;
use crate::models::CoverageSummary;

pub const COVERAGE_SUMMARY_FILE: &str = "coverage/coverage-summary.json";

#[derive(Debug, Deserialize)]
struct SummaryFile {
    total: SummaryTotals,
}

#[derive(Debug, Deserialize)]
struct SummaryTotals {
    lines: Metric,
    branches: Metric,
    functions: Metric,
    statements: Metric,
}

#[derive(Debug, Deserialize)]
struct Metric {
    /// Istanbul writes the string "Unknown" when nothing was measured.
    #[serde(default)]
    pct: serde_json::Value,
}

impl Metric {
    fn pct(&self) -> f64 {
        self.pct.as_f64().unwrap_or(0.0)
    }
}

/// Parse an istanbul `coverage-summary.json`.
pub fn parse_summary(content: &str) -> Option<CoverageSummary> {
    let file: SummaryFile = serde_json::from_str(content).ok()?;
    Some(CoverageSummary {
        lines: file.total.lines.pct(),
        branches: file.total.branches.pct(),
        functions: file.total.functions.pct(),
        statements: file.total.statements.pct(),
    })
}

/// Read the summary, provided it was written at or after `since`.
pub async fn read_summary(workspace: &dyn Workspace, since: SystemTime) -> Option<CoverageSummary> {
    let path = workspace.root().join(COVERAGE_SUMMARY_FILE);
    match workspace.modified(&path).await {
        Ok(modified) if modified < whole_seconds(since) => {
            tracing::debug!("coverage summary predates this run; ignoring");
            return None;
        }
        Ok(_) => {}
        Err(e) => {
            tracing::debug!(error = %e, "no coverage summary");
            return None;
        }
    }
    match workspace.read_text(&path).await {
        Ok(content) => parse_summary(&content),
        Err(e) => {
            tracing::debug!(error = %e, "no coverage summary");
            None
        }
    }
}

/// Some file systems keep whole-second modification times.
fn whole_seconds(time: SystemTime) -> SystemTime {
    match time.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => UNIX_EPOCH + Duration::from_secs(elapsed.as_secs()),
        Err(_) => time,
    }
}

#[cfg(test)]
#[path = "coverage_tests.rs"]
mod tests;
