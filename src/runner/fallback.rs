//! Turns output no parser could read into a single failing test, so callers
//! always receive a well-formed result.

use crate::models::{ErrorDetail, Framework, TestCase, TestRunResult, TestStatus, TestSuite};

/// Longest prefix of the raw output kept as the error message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 1000;

pub const FALLBACK_SUITE: &str = "Test Run";
pub const FALLBACK_TEST: &str = "Test execution failed";

/// One suite, one failing test, carrying the start of `raw` as its message.
pub fn synthesize(framework: Framework, raw: &str) -> TestRunResult {
    let message: String = raw.chars().take(MAX_MESSAGE_CHARS).collect();
    tracing::warn!(%framework, "output was not a readable report; synthesizing failure");

    let case = TestCase::new(
        FALLBACK_SUITE,
        FALLBACK_TEST,
        FALLBACK_TEST,
        FALLBACK_SUITE,
        "",
        TestStatus::Failed,
    )
    .with_error(Some(ErrorDetail {
        message,
        ..Default::default()
    }));

    let suite = TestSuite::new(FALLBACK_SUITE, FALLBACK_SUITE, "", vec![case], 0);
    TestRunResult::new(framework, vec![suite], None)
}

#[cfg(test)]
#[path = "fallback_tests.rs"]
mod tests;
