use super::*;

#[test]
fn binary_states_collapse_to_skipped() {
    assert_eq!(TestStatus::from_binary_state("passed"), TestStatus::Passed);
    assert_eq!(TestStatus::from_binary_state("failed"), TestStatus::Failed);
    assert_eq!(TestStatus::from_binary_state("pending"), TestStatus::Skipped);
    assert_eq!(TestStatus::from_binary_state("todo"), TestStatus::Skipped);
    assert_eq!(TestStatus::from_binary_state("disabled"), TestStatus::Skipped);
}

#[test]
fn native_states_keep_pending() {
    assert_eq!(TestStatus::from_native("pass"), TestStatus::Passed);
    assert_eq!(TestStatus::from_native("fail"), TestStatus::Failed);
    assert_eq!(TestStatus::from_native("todo"), TestStatus::Pending);
    assert_eq!(TestStatus::from_native("pending"), TestStatus::Pending);
    assert_eq!(TestStatus::from_native("skipped"), TestStatus::Skipped);
}

#[test]
fn serializes_lowercase() {
    assert_eq!(serde_json::to_string(&TestStatus::Passed).unwrap(), r#""passed""#);
}
