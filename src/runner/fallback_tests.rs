use super::*;
use crate::models::RunSummary;

#[test]
fn produces_one_failing_case() {
    let raw = "TypeError: Cannot read properties of undefined\n    at main.js:1:1";
    let result = synthesize(Framework::Jest, raw);

    assert_eq!(result.suites().len(), 1);
    let tests = result.suites()[0].tests();
    assert_eq!(tests.len(), 1);
    assert_eq!(tests[0].status, TestStatus::Failed);
    assert_eq!(tests[0].error.as_ref().unwrap().message, raw);
    assert!(!result.passed);
    assert_eq!(
        *result.summary(),
        RunSummary {
            total: 1,
            passed: 0,
            failed: 1,
            skipped: 0,
            pending: 0,
        }
    );
}

#[test]
fn message_is_a_bounded_prefix() {
    let raw = "x".repeat(5000);
    let result = synthesize(Framework::Mocha, &raw);
    let message = &result.suites()[0].tests()[0].error.as_ref().unwrap().message;

    assert_eq!(message.chars().count(), MAX_MESSAGE_CHARS);
    assert!(raw.starts_with(message.as_str()));
}

#[test]
fn truncation_respects_char_boundaries() {
    let raw = "é".repeat(1500);
    let result = synthesize(Framework::Vitest, &raw);
    let message = &result.suites()[0].tests()[0].error.as_ref().unwrap().message;

    assert_eq!(message.chars().count(), MAX_MESSAGE_CHARS);
    assert!(raw.starts_with(message.as_str()));
}

#[test]
fn ids_are_deterministic() {
    let a = synthesize(Framework::Jest, "boom");
    let b = synthesize(Framework::Jest, "different");
    assert_eq!(a.suites()[0].id(), b.suites()[0].id());
    assert_eq!(a.suites()[0].tests()[0].id, b.suites()[0].tests()[0].id);
}
