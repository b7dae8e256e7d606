use std::path::PathBuf;

/// Internal error types.
///
/// None of these cross the public `TestRunner` boundary; they are turned into
/// result data (a fallback suite, an `unknown` framework, a skipped file).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The framework process could not be started.
    #[error("failed to spawn {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// File I/O error
    #[error("io error: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// package.json exists but is not valid JSON.
    #[error("malformed manifest {}: {source}", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Reporter output did not match the framework's schema.
    #[error("invalid {framework} report: {message}")]
    Parse { framework: String, message: String },

    /// Bad glob pattern.
    #[error("glob error: {0}")]
    Glob(#[from] glob::PatternError),
}

pub type Result<T> = std::result::Result<T, Error>;
