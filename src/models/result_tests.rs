use super::*;

fn case(suite: &str, name: &str, status: TestStatus) -> TestCase {
    TestCase::new(suite, name, name, suite, suite, status)
}

#[test]
fn suite_counts_follow_tests() {
    let suite = TestSuite::new(
        "a.test.ts",
        "a.test.ts",
        "a.test.ts",
        vec![
            case("a.test.ts", "one", TestStatus::Passed),
            case("a.test.ts", "two", TestStatus::Failed),
            case("a.test.ts", "three", TestStatus::Skipped),
            case("a.test.ts", "four", TestStatus::Pending),
        ],
        10,
    );

    assert_eq!(suite.passed(), 1);
    assert_eq!(suite.failed(), 1);
    assert_eq!(suite.skipped(), 2);
    assert_eq!(
        suite.passed() + suite.failed() + suite.skipped(),
        suite.tests().len()
    );
    assert_eq!(suite.status(), TestStatus::Failed);
}

#[test]
fn suite_without_failures_passes() {
    let suite = TestSuite::new(
        "a",
        "a",
        "a",
        vec![
            case("a", "one", TestStatus::Passed),
            case("a", "two", TestStatus::Skipped),
        ],
        0,
    );
    assert_eq!(suite.status(), TestStatus::Passed);
}

#[test]
fn summary_sums_suites() {
    let suites = vec![
        TestSuite::new(
            "a",
            "a",
            "a",
            vec![
                case("a", "1", TestStatus::Passed),
                case("a", "2", TestStatus::Passed),
                case("a", "3", TestStatus::Passed),
            ],
            5,
        ),
        TestSuite::new(
            "b",
            "b",
            "b",
            vec![
                case("b", "1", TestStatus::Passed),
                case("b", "2", TestStatus::Failed),
                case("b", "3", TestStatus::Pending),
            ],
            7,
        ),
    ];
    let result = TestRunResult::new(Framework::Jest, suites, None);

    assert_eq!(
        *result.summary(),
        RunSummary {
            total: 6,
            passed: 4,
            failed: 1,
            skipped: 1,
            pending: 1,
        }
    );
    assert!(!result.passed);
    assert_eq!(result.duration_ms, 12);
}

#[test]
fn native_success_overrides_derived_verdict() {
    let suites = vec![TestSuite::new(
        "a",
        "a",
        "a",
        vec![case("a", "1", TestStatus::Passed)],
        0,
    )];
    let result = TestRunResult::new(Framework::Jest, suites, Some(false));
    assert!(!result.passed);
}

#[test]
fn error_detail_dropped_for_passing_test() {
    let test = case("a", "ok", TestStatus::Passed).with_error(Some(ErrorDetail {
        message: "boom".into(),
        ..Default::default()
    }));
    assert!(test.error.is_none());
}

#[test]
fn vacuous_result_is_empty_and_passing() {
    let result = TestRunResult::vacuous(Framework::Unknown, "nothing to run");
    assert!(result.passed);
    assert!(result.suites().is_empty());
    assert_eq!(*result.summary(), RunSummary::default());
    assert_eq!(result.reason.as_deref(), Some("nothing to run"));
}

#[test]
fn serializes_camel_case_and_omits_absent_fields() {
    let test = case("a", "ok", TestStatus::Passed);
    let json = serde_json::to_value(&test).unwrap();
    assert_eq!(json["suiteName"], "a");
    assert_eq!(json["status"], "passed");
    assert!(json.get("durationMs").is_none());
    assert!(json.get("error").is_none());
}

#[test]
fn deserialized_suite_recomputes_counts() {
    let json = r#"{
        "id": "abc123def456",
        "name": "auth",
        "file": "/repo/auth.test.ts",
        "status": "passed",
        "durationMs": 20,
        "passed": 7,
        "failed": 0,
        "skipped": 0,
        "tests": [
            {"id": "1", "name": "a", "suiteName": "auth", "file": "/repo/auth.test.ts", "status": "passed"},
            {"id": "2", "name": "b", "suiteName": "auth", "file": "/repo/auth.test.ts", "status": "failed"}
        ]
    }"#;
    let suite: TestSuite = serde_json::from_str(json).unwrap();

    assert_eq!(suite.id(), "abc123def456");
    assert_eq!(suite.passed(), 1);
    assert_eq!(suite.failed(), 1);
    assert_eq!(suite.skipped(), 0);
    assert_eq!(suite.status(), TestStatus::Failed);
    assert_eq!(suite.duration_ms(), 20);
}

#[test]
fn deserialized_result_reaggregates_summary() {
    let suite = TestSuite::new(
        "auth",
        "auth",
        "auth.test.ts",
        vec![
            case("auth", "a", TestStatus::Passed),
            case("auth", "b", TestStatus::Failed),
        ],
        5,
    );
    let original = TestRunResult::new(Framework::Jest, vec![suite], Some(false));
    let mut json = serde_json::to_value(&original).unwrap();
    json["summary"] = serde_json::json!({"total": 9, "passed": 9, "failed": 0, "skipped": 0, "pending": 0});

    let loaded: TestRunResult = serde_json::from_value(json).unwrap();

    assert_eq!(loaded, original);
    assert_eq!(loaded.summary().failed, 1);
}
