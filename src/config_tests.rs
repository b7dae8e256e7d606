use super::*;
use std::fs;

#[test]
fn defaults_when_absent() {
    let temp = tempfile::tempdir().unwrap();
    let config = Config::load(temp.path());

    assert_eq!(config.runner.command, "npx");
    assert_eq!(config.runner.timeout_ms, 120_000);
    assert_eq!(config.runner.max_buffer_bytes, 5 * 1024 * 1024);
    assert!(config.discovery.ignore.is_empty());
    assert_eq!(config.mocha.grouping, SuiteGrouping::FirstToken);
}

#[test]
fn reads_partial_config() {
    let temp = tempfile::tempdir().unwrap();
    fs::write(
        temp.path().join("testlens.toml"),
        r#"
[runner]
command = "pnpm exec"

[discovery]
ignore = ["legacy/**"]

[mocha]
grouping = "file"
"#,
    )
    .unwrap();

    let config = Config::load(temp.path());
    assert_eq!(config.runner.command, "pnpm exec");
    assert_eq!(config.runner.timeout_ms, 120_000);
    assert_eq!(config.discovery.ignore, vec!["legacy/**".to_string()]);
    assert_eq!(config.mocha.grouping, SuiteGrouping::File);
}

#[test]
fn invalid_config_falls_back_to_defaults() {
    let temp = tempfile::tempdir().unwrap();
    fs::write(temp.path().join("testlens.toml"), "runner = [").unwrap();

    let config = Config::load(temp.path());
    assert_eq!(config.runner.command, "npx");
}
