//! Test execution orchestration.
//!
//! A run moves through detection, execution and parsing and always ends in a
//! [`TestRunResult`]. Failures along the way become data: a fallback suite
//! when output cannot be parsed, a vacuous result when there is nothing to
//! run. Nothing here returns an error to the caller.

pub mod coverage;
pub mod detect;
pub mod discover;
pub mod fallback;
pub mod frameworks;
pub mod process;
pub mod workspace;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::models::{Framework, TestDiscoveryResult, TestRunOptions, TestRunResult};
use frameworks::{FrameworkAdapter, adapter_for};
use process::{ProcessOutput, ProcessRequest};
use workspace::{LocalWorkspace, Workspace};

pub const NO_WORKSPACE_REASON: &str = "No workspace folder is open";
pub const NO_FRAMEWORK_REASON: &str = "No supported test framework detected";
pub const UNITY_REASON: &str = "Unity tests must be run from the Unity editor";

/// Environment every framework process gets on top of the inherited one.
const PROCESS_ENV: &[(&str, &str)] = &[("CI", "true"), ("FORCE_COLOR", "0")];

/// Entry point for detection, discovery and runs against one workspace.
///
/// Holds no state between calls; concurrent runs against the same workspace
/// are the caller's business.
pub struct TestRunner {
    workspace: Option<Arc<dyn Workspace>>,
    config: Config,
}

impl TestRunner {
    pub fn new(workspace: Option<Arc<dyn Workspace>>, config: Config) -> Self {
        Self { workspace, config }
    }

    /// Runner over a local directory, configured from its `testlens.toml`.
    pub fn for_directory(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let config = Config::load(&root);
        Self::new(Some(Arc::new(LocalWorkspace::new(root))), config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub async fn detect_framework(&self) -> Framework {
        match &self.workspace {
            Some(ws) => detect::detect(ws.as_ref()).await,
            None => Framework::Unknown,
        }
    }

    pub async fn discover(&self) -> TestDiscoveryResult {
        let Some(ws) = &self.workspace else {
            return TestDiscoveryResult::default();
        };
        let framework = detect::detect(ws.as_ref()).await;
        discover::discover(ws.as_ref(), framework, &self.config.discovery.ignore).await
    }

    pub async fn run(&self, options: &TestRunOptions) -> TestRunResult {
        self.run_with_cancel(options, CancellationToken::new()).await
    }

    /// Like [`run`](Self::run), but the framework process is terminated when
    /// `cancel` fires.
    pub async fn run_with_cancel(
        &self,
        options: &TestRunOptions,
        cancel: CancellationToken,
    ) -> TestRunResult {
        let Some(ws) = &self.workspace else {
            return TestRunResult::vacuous(Framework::Unknown, NO_WORKSPACE_REASON);
        };

        let framework = match options.framework {
            Some(framework) => framework,
            None => detect::detect(ws.as_ref()).await,
        };

        if options.watch {
            tracing::warn!("watch mode is not supported; running once");
        }

        let Some(adapter) = adapter_for(framework, &self.config) else {
            let reason = if framework.is_unity() {
                UNITY_REASON
            } else {
                NO_FRAMEWORK_REASON
            };
            return TestRunResult::vacuous(framework, reason);
        };

        let started = Instant::now();
        let run_started = SystemTime::now();
        let request = self.request(ws.root().to_path_buf(), adapter.as_ref(), options);
        tracing::info!(%framework, "starting test run");

        let (mut result, reported) = match process::run(&request, &cancel).await {
            Ok(output) => {
                let (mut result, reported) = parse_output(adapter.as_ref(), &output);
                result.timed_out = output.timed_out;
                (result, reported)
            }
            Err(e) => (fallback::synthesize(framework, &e.to_string()), false),
        };

        // A run that produced no report wrote no coverage either.
        if options.coverage && reported {
            result.coverage = coverage::read_summary(ws.as_ref(), run_started).await;
        }
        result.duration_ms = started.elapsed().as_millis() as u64;
        result.timestamp = Utc::now();

        let summary = result.summary();
        tracing::info!(
            %framework,
            passed = result.passed,
            total = summary.total,
            failed = summary.failed,
            duration_ms = result.duration_ms,
            "test run finished"
        );
        result
    }

    fn request(
        &self,
        cwd: PathBuf,
        adapter: &dyn FrameworkAdapter,
        options: &TestRunOptions,
    ) -> ProcessRequest {
        let runner = &self.config.runner;
        let mut prefix = match shell_words::split(&runner.command) {
            Ok(words) if !words.is_empty() => words,
            Ok(_) | Err(_) => {
                tracing::warn!(command = %runner.command, "invalid runner command; using npx");
                vec!["npx".to_string()]
            }
        };
        let program = prefix.remove(0);

        let timeout = (runner.timeout_ms > 0).then(|| Duration::from_millis(runner.timeout_ms));
        let mut request = ProcessRequest::new(program, cwd)
            .args(prefix)
            .args(adapter.args(options))
            .timeout(timeout)
            .max_buffer_bytes(runner.max_buffer_bytes);
        for (key, value) in PROCESS_ENV {
            request = request.env(*key, *value);
        }
        request
    }
}

/// Parse the report, or fall back to a synthetic failure carrying whatever
/// text the process left behind. The flag is true when a report was parsed.
fn parse_output(adapter: &dyn FrameworkAdapter, output: &ProcessOutput) -> (TestRunResult, bool) {
    match adapter.parse(&output.stdout) {
        Ok(result) => (result, true),
        Err(e) => {
            tracing::debug!(error = %e, "report parse failed");
            (fallback::synthesize(adapter.framework(), &failure_text(output)), false)
        }
    }
}

fn failure_text(output: &ProcessOutput) -> String {
    if !output.stdout.trim().is_empty() {
        output.stdout.clone()
    } else if !output.stderr.trim().is_empty() {
        output.stderr.clone()
    } else if output.timed_out {
        "Test process timed out without producing output".to_string()
    } else if output.cancelled {
        "Test run was cancelled before producing output".to_string()
    } else {
        match output.exit_code {
            Some(code) => format!("Test process exited with code {code} without producing output"),
            None => "Test process was killed without producing output".to_string(),
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
