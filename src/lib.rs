//! Test execution orchestration for JavaScript/TypeScript workspaces.
//!
//! Detects the workspace's test framework, estimates its tests from source,
//! and runs the framework's CLI with a JSON reporter, normalizing the report
//! into a framework-independent [`TestRunResult`].
//!
//! ```no_run
//! # async fn demo() {
//! use testlens::{TestRunOptions, TestRunner};
//!
//! let runner = TestRunner::for_directory("/path/to/project");
//! let result = runner.run(&TestRunOptions::default()).await;
//! println!("{} of {} passed", result.summary().passed, result.summary().total);
//! # }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod runner;

pub use config::Config;
pub use error::{Error, Result};
pub use models::{
    CoverageSummary, DiscoveredSuite, ErrorDetail, Framework, RunSummary, TestCase,
    TestDiscoveryResult, TestRunOptions, TestRunResult, TestStatus, TestSuite,
};
pub use runner::TestRunner;
pub use runner::workspace::{LocalWorkspace, Workspace};
pub use tokio_util::sync::CancellationToken;
