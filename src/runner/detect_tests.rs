use super::*;
use crate::runner::workspace::LocalWorkspace;
use std::fs;
use tempfile::TempDir;

fn project(package_json: Option<&str>) -> TempDir {
    let temp = tempfile::tempdir().unwrap();
    if let Some(content) = package_json {
        fs::write(temp.path().join("package.json"), content).unwrap();
    }
    temp
}

async fn detect_in(temp: &TempDir) -> Framework {
    detect(&LocalWorkspace::new(temp.path())).await
}

// =============================================================================
// MANIFEST DETECTION
// =============================================================================

#[tokio::test]
async fn detects_vitest_from_dev_dependencies() {
    let temp = project(Some(r#"{"devDependencies": {"vitest": "^2.0.0"}}"#));
    assert_eq!(detect_in(&temp).await, Framework::Vitest);
}

#[tokio::test]
async fn detects_jest_from_runtime_dependencies() {
    let temp = project(Some(r#"{"dependencies": {"jest": "^29.0.0"}}"#));
    assert_eq!(detect_in(&temp).await, Framework::Jest);
}

#[tokio::test]
async fn detects_mocha() {
    let temp = project(Some(r#"{"devDependencies": {"mocha": "^10.0.0", "chai": "^4"}}"#));
    assert_eq!(detect_in(&temp).await, Framework::Mocha);
}

#[tokio::test]
async fn vitest_wins_over_jest_across_groups() {
    let temp = project(Some(
        r#"{"dependencies": {"jest": "^29.0.0"}, "devDependencies": {"vitest": "^2.0.0"}}"#,
    ));
    assert_eq!(detect_in(&temp).await, Framework::Vitest);
}

#[tokio::test]
async fn jest_wins_over_mocha() {
    let temp = project(Some(
        r#"{"devDependencies": {"mocha": "^10.0.0", "jest": "^29.0.0"}}"#,
    ));
    assert_eq!(detect_in(&temp).await, Framework::Jest);
}

// =============================================================================
// FALLBACKS
// =============================================================================

#[tokio::test]
async fn unity_marker_when_no_manifest() {
    let temp = project(None);
    let dir = temp.path().join("Assets/Tests");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("AssemblyTests.asmdef"), "{}").unwrap();

    assert_eq!(detect_in(&temp).await, Framework::UnityEditmode);
}

#[tokio::test]
async fn unity_marker_when_manifest_has_no_framework() {
    let temp = project(Some(r#"{"dependencies": {"left-pad": "1.0.0"}}"#));
    fs::write(temp.path().join("Assembly-CSharp.asmdef"), "{}").unwrap();

    assert_eq!(detect_in(&temp).await, Framework::UnityEditmode);
}

#[tokio::test]
async fn malformed_manifest_falls_through() {
    let temp = project(Some("{ not json"));
    assert_eq!(detect_in(&temp).await, Framework::Unknown);
}

#[tokio::test]
async fn empty_workspace_is_unknown() {
    let temp = project(None);
    assert_eq!(detect_in(&temp).await, Framework::Unknown);
}

// =============================================================================
// MANIFEST READING
// =============================================================================

#[tokio::test]
async fn absent_and_malformed_manifests_are_distinguishable() {
    let absent = project(None);
    let malformed = project(Some("[1,"));

    let absent = read_manifest(&LocalWorkspace::new(absent.path())).await;
    let malformed = read_manifest(&LocalWorkspace::new(malformed.path())).await;

    assert!(matches!(absent, Ok(None)));
    assert!(matches!(malformed, Err(Error::Manifest { .. })));
}
