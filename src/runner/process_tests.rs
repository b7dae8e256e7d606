#![cfg(unix)]

use super::*;
use std::time::Instant;

fn sh(script: &str) -> ProcessRequest {
    ProcessRequest::new("sh", std::env::temp_dir()).args(["-c", script])
}

#[tokio::test]
async fn captures_stdout_stderr_and_exit_code() {
    let request = sh("echo out; echo err >&2; exit 3");
    let output = run(&request, &CancellationToken::new()).await.unwrap();

    assert_eq!(output.stdout, "out\n");
    assert_eq!(output.stderr, "err\n");
    assert_eq!(output.exit_code, Some(3));
    assert!(!output.timed_out);
    assert!(!output.cancelled);
    assert!(!output.success());
}

#[tokio::test]
async fn passes_environment_overrides() {
    let request = sh("printf %s \"$TESTLENS_VALUE\"").env("TESTLENS_VALUE", "hello");
    let output = run(&request, &CancellationToken::new()).await.unwrap();

    assert_eq!(output.stdout, "hello");
    assert!(output.success());
}

#[tokio::test]
async fn truncates_at_buffer_cap() {
    let request = sh("printf 'abcdefghij'").max_buffer_bytes(4);
    let output = run(&request, &CancellationToken::new()).await.unwrap();

    assert_eq!(output.stdout, "abcd");
    assert!(output.truncated);
    assert!(output.success());
}

#[tokio::test]
async fn timeout_terminates_process() {
    let request = sh("echo started; sleep 30").timeout(Some(Duration::from_millis(200)));
    let start = Instant::now();
    let output = run(&request, &CancellationToken::new()).await.unwrap();

    assert!(output.timed_out);
    assert_eq!(output.stdout, "started\n");
    assert!(start.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn timeout_reported_without_output() {
    let request = sh("sleep 30").timeout(Some(Duration::from_millis(100)));
    let output = run(&request, &CancellationToken::new()).await.unwrap();

    assert!(output.timed_out);
    assert!(output.stdout.is_empty());
}

#[tokio::test]
async fn kills_process_that_ignores_terminate() {
    let request = sh("trap '' TERM; while true; do sleep 1; done")
        .timeout(Some(Duration::from_millis(100)));
    let start = Instant::now();
    let output = run(&request, &CancellationToken::new()).await.unwrap();

    assert!(output.timed_out);
    assert_eq!(output.exit_code, None);
    assert!(start.elapsed() >= KILL_GRACE);
    assert!(start.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn cancellation_terminates_process() {
    let request = sh("sleep 30");
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let output = run(&request, &cancel).await.unwrap();
    assert!(output.cancelled);
    assert!(!output.timed_out);
}

#[tokio::test]
async fn spawn_failure_is_an_error() {
    let request = ProcessRequest::new("definitely-not-a-real-binary-xyz", std::env::temp_dir());
    let err = run(&request, &CancellationToken::new()).await;
    assert!(matches!(err, Err(Error::Spawn { .. })));
}
