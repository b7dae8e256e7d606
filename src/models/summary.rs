use serde::{Deserialize, Serialize};

use super::result::TestSuite;
use super::status::TestStatus;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Subset of `skipped` whose native status was pending or todo.
    pub pending: usize,
}

/// Roll suite-level counts up into a run summary.
pub fn aggregate(suites: &[TestSuite]) -> RunSummary {
    suites.iter().fold(RunSummary::default(), |mut acc, suite| {
        acc.total += suite.tests().len();
        acc.passed += suite.passed();
        acc.failed += suite.failed();
        acc.skipped += suite.skipped();
        acc.pending += suite
            .tests()
            .iter()
            .filter(|t| t.status == TestStatus::Pending)
            .count();
        acc
    })
}
