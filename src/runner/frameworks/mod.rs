//! Per-framework invocation and report parsing.
//!
//! Each adapter knows how to ask its framework for a JSON report and how to
//! map that report onto the common result model. Adapters know nothing about
//! each other; the orchestrator picks one by [`Framework`].

pub mod jest;
pub mod mocha;
pub mod vitest;

use serde::de::{DeserializeOwned, IgnoredAny};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{ErrorDetail, Framework, TestRunOptions, TestRunResult};

pub use jest::JestAdapter;
pub use mocha::MochaAdapter;
pub use vitest::VitestAdapter;

/// Trait for framework-specific adapters.
pub trait FrameworkAdapter: Send + Sync {
    fn framework(&self) -> Framework;

    /// Arguments after the package runner, e.g. `["jest", "--json"]`.
    fn args(&self, options: &TestRunOptions) -> Vec<String>;

    /// Map the framework's native JSON report onto the common model.
    fn parse(&self, raw: &str) -> Result<TestRunResult>;
}

/// Adapter for a framework that can be run from the command line.
pub fn adapter_for(framework: Framework, config: &Config) -> Option<Box<dyn FrameworkAdapter>> {
    match framework {
        Framework::Jest => Some(Box::new(JestAdapter)),
        Framework::Vitest => Some(Box::new(VitestAdapter)),
        Framework::Mocha => Some(Box::new(MochaAdapter::new(config.mocha.grouping))),
        Framework::UnityEditmode | Framework::UnityPlaymode | Framework::Unknown => None,
    }
}

/// Deserialize a report, tolerating banner text printed before it.
pub(crate) fn parse_report<T: DeserializeOwned>(raw: &str, framework: Framework) -> Result<T> {
    let parse_error = |message: String| Error::Parse {
        framework: framework.to_string(),
        message,
    };

    let whole = match serde_json::from_str(raw.trim()) {
        Ok(report) => return Ok(report),
        Err(e) => e,
    };

    // Test output may print objects of its own before the report. Walk the
    // top-level values in order and keep the first that fits the report's shape.
    let mut last = None;
    let mut rest = raw;
    while let Some(start) = rest.find('{') {
        let candidate = &rest[start..];
        let mut values = serde_json::Deserializer::from_str(candidate).into_iter::<IgnoredAny>();
        match values.next() {
            Some(Ok(_)) => {
                let end = values.byte_offset();
                match serde_json::from_str::<T>(&candidate[..end]) {
                    Ok(report) => return Ok(report),
                    Err(e) => last = Some(e),
                }
                rest = &candidate[end..];
            }
            // Unterminated: nothing after this point can be complete either.
            Some(Err(e)) if e.is_eof() => {
                last = Some(e);
                break;
            }
            Some(Err(e)) => {
                last = Some(e);
                rest = &candidate[1..];
            }
            None => break,
        }
    }

    match last {
        Some(e) => Err(parse_error(e.to_string())),
        None => Err(parse_error(format!("no JSON object in output ({whole})"))),
    }
}

/// Join several name patterns into one alternation.
pub(crate) fn name_filter(patterns: &[String]) -> Option<String> {
    match patterns {
        [] => None,
        [one] => Some(one.clone()),
        many => Some(
            many.iter()
                .map(|p| format!("(?:{p})"))
                .collect::<Vec<_>>()
                .join("|"),
        ),
    }
}

pub(crate) fn file_args(options: &TestRunOptions) -> impl Iterator<Item = String> + '_ {
    options
        .files
        .iter()
        .map(|f| f.to_string_lossy().to_string())
}

pub(crate) fn millis(value: Option<f64>) -> Option<u64> {
    value.filter(|v| v.is_finite() && *v >= 0.0).map(|v| v.round() as u64)
}

/// Last path component, for suite display names.
pub(crate) fn base_name(path: &str) -> String {
    std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

/// Render an expected/actual value the way a reader would want to see it.
pub(crate) fn value_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(strip_ansi(s)),
        other => Some(other.to_string()),
    }
}

/// Split jest-style failure text into the message and the full stack.
///
/// The message is everything before the first `at ...` frame.
pub(crate) fn failure_detail(messages: &[String]) -> Option<ErrorDetail> {
    if messages.is_empty() {
        return None;
    }
    let full = strip_ansi(&messages.join("\n"));

    let message_end = full
        .lines()
        .position(|line| line.trim_start().starts_with("at "))
        .map(|idx| full.lines().take(idx).collect::<Vec<_>>().join("\n"));

    let (message, stack) = match message_end {
        Some(message) if !message.trim().is_empty() => (message.trim_end().to_string(), Some(full)),
        _ => (full, None),
    };

    Some(ErrorDetail {
        message,
        stack,
        expected: None,
        actual: None,
    })
}

/// Strip ANSI escape sequences from a string.
pub(crate) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // Skip until we hit a letter (end of escape sequence)
            for c2 in chars.by_ref() {
                if c2.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
