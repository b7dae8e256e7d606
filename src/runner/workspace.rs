use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;

use crate::error::{Error, Result};

/// Directories that hold installed dependencies rather than project sources.
pub const DEPENDENCY_DIRS: &[&str] = &["node_modules"];

/// File-system queries the runner needs from its host.
///
/// Editors and other hosts can supply their own implementation; the CLI and
/// tests use [`LocalWorkspace`].
#[async_trait]
pub trait Workspace: Send + Sync {
    /// Absolute workspace root.
    fn root(&self) -> &Path;

    /// Files matching a workspace-relative glob, dependency directories
    /// excluded, at most `limit` of them.
    async fn find_files(&self, pattern: &str, limit: usize) -> Result<Vec<PathBuf>>;

    /// Read a file as UTF-8 text.
    async fn read_text(&self, path: &Path) -> Result<String>;

    /// Last modification time of a file.
    async fn modified(&self, path: &Path) -> Result<SystemTime>;
}

/// A workspace backed by the local file system.
#[derive(Debug, Clone)]
pub struct LocalWorkspace {
    root: PathBuf,
}

impl LocalWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl Workspace for LocalWorkspace {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn find_files(&self, pattern: &str, limit: usize) -> Result<Vec<PathBuf>> {
        let root = glob::Pattern::escape(&self.root.to_string_lossy());
        let full = format!("{}/{}", root.trim_end_matches('/'), pattern);

        let files = glob::glob(&full)?
            .flatten()
            .filter(|path| {
                let relative = path.strip_prefix(&self.root).unwrap_or(path);
                path.is_file() && !in_dependency_dir(relative)
            })
            .take(limit)
            .collect();
        Ok(files)
    }

    async fn read_text(&self, path: &Path) -> Result<String> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| Error::Io {
                path: path.to_path_buf(),
                source,
            })
    }

    async fn modified(&self, path: &Path) -> Result<SystemTime> {
        let io_error = |source| Error::Io {
            path: path.to_path_buf(),
            source,
        };
        let metadata = tokio::fs::metadata(path).await.map_err(io_error)?;
        metadata.modified().map_err(io_error)
    }
}

fn in_dependency_dir(path: &Path) -> bool {
    path.components().any(|c| match c {
        Component::Normal(name) => DEPENDENCY_DIRS.iter().any(|d| name == *d),
        _ => false,
    })
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
