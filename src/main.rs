use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt};

use testlens::{CancellationToken, Framework, TestRunOptions, TestRunner};

#[derive(Debug, Parser)]
#[command(name = "testlens", version, about = "Detect, discover and run JavaScript tests")]
struct Cli {
    /// Workspace root (defaults to the current directory)
    #[arg(short, long, global = true, env = "TESTLENS_WORKSPACE")]
    workspace: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the detected test framework
    Detect,
    /// Estimate the workspace's tests without running them
    Discover,
    /// Run the tests and print the normalized result
    Run(RunArgs),
}

#[derive(Debug, clap::Args)]
struct RunArgs {
    /// Restrict the run to these files
    #[arg(long = "file", value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Only run tests whose names match
    #[arg(long = "pattern", value_name = "PATTERN")]
    patterns: Vec<String>,

    /// Collect coverage totals
    #[arg(long)]
    coverage: bool,

    /// Accepted for compatibility; runs once
    #[arg(long)]
    watch: bool,

    /// Skip detection (jest, vitest, mocha, unity-editmode, unity-playmode)
    #[arg(long)]
    framework: Option<Framework>,

    /// Per-test timeout passed to the framework, in milliseconds
    #[arg(long, value_name = "MS")]
    test_timeout: Option<u64>,

    /// Deadline for the whole framework process, in milliseconds (0 disables)
    #[arg(long, value_name = "MS")]
    timeout: Option<u64>,
}

impl RunArgs {
    fn options(&self) -> TestRunOptions {
        TestRunOptions {
            files: self.files.clone(),
            patterns: self.patterns.clone(),
            coverage: self.coverage,
            watch: self.watch,
            framework: self.framework,
            test_timeout_ms: self.test_timeout,
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("TESTLENS_LOG").unwrap_or_else(|_| EnvFilter::new("off"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_logging();
    let cli = Cli::parse();

    let root = match cli.workspace {
        Some(root) => root,
        None => std::env::current_dir().context("cannot determine current directory")?,
    };
    let mut runner = TestRunner::for_directory(root);

    match cli.command {
        Command::Detect => {
            let framework = runner.detect_framework().await;
            print_json(&framework)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Discover => {
            print_json(&runner.discover().await)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Run(args) => {
            if let Some(timeout) = args.timeout {
                runner.config_mut().runner.timeout_ms = timeout;
            }

            let cancel = CancellationToken::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    on_interrupt.cancel();
                }
            });

            let result = runner.run_with_cancel(&args.options(), cancel).await;
            print_json(&result)?;
            Ok(if result.passed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}").context("failed to write to stdout")?;
    Ok(())
}
