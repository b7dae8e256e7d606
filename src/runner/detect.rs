//! Test framework auto-detection.
//!
//! Detection priority (first match wins):
//! 1. package.json dependencies: vitest, then jest, then mocha
//! 2. a Unity assembly definition anywhere in the tree
//! 3. unknown

use std::collections::BTreeMap;
use std::io::ErrorKind;

use serde::Deserialize;

use super::workspace::Workspace;
use crate::error::{Error, Result};
use crate::models::Framework;

pub const MANIFEST_FILE: &str = "package.json";
pub const UNITY_MARKER_GLOB: &str = "**/Assembly*.asmdef";

/// Dependency keys checked in priority order.
const FRAMEWORK_DEPENDENCIES: &[(&str, Framework)] = &[
    ("vitest", Framework::Vitest),
    ("jest", Framework::Jest),
    ("mocha", Framework::Mocha),
];

/// The parts of package.json detection cares about.
#[derive(Debug, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub dependencies: BTreeMap<String, serde_json::Value>,
    #[serde(rename = "devDependencies", default)]
    pub dev_dependencies: BTreeMap<String, serde_json::Value>,
}

impl Manifest {
    /// True if either dependency group declares `name`.
    pub fn declares(&self, name: &str) -> bool {
        self.dependencies.contains_key(name) || self.dev_dependencies.contains_key(name)
    }

    /// The first framework, by priority, that the manifest declares.
    pub fn framework(&self) -> Option<Framework> {
        FRAMEWORK_DEPENDENCIES
            .iter()
            .find(|(dep, _)| self.declares(dep))
            .map(|(_, framework)| *framework)
    }
}

/// Read the workspace manifest.
///
/// `Ok(None)` when there is no manifest, `Err` when it exists but cannot be
/// read or parsed.
pub async fn read_manifest(workspace: &dyn Workspace) -> Result<Option<Manifest>> {
    let path = workspace.root().join(MANIFEST_FILE);
    let content = match workspace.read_text(&path).await {
        Ok(content) => content,
        Err(Error::Io { source, .. }) if source.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| Error::Manifest { path, source })
}

/// Decide which framework the workspace uses. Never fails.
pub async fn detect(workspace: &dyn Workspace) -> Framework {
    let manifest = match read_manifest(workspace).await {
        Ok(manifest) => manifest,
        Err(e) => {
            tracing::debug!(error = %e, "treating unreadable manifest as absent");
            None
        }
    };

    if let Some(framework) = manifest.as_ref().and_then(Manifest::framework) {
        tracing::debug!(%framework, "detected from manifest");
        return framework;
    }

    match workspace.find_files(UNITY_MARKER_GLOB, 1).await {
        Ok(markers) if !markers.is_empty() => {
            tracing::debug!(marker = %markers[0].display(), "detected unity project");
            Framework::UnityEditmode
        }
        Ok(_) => Framework::Unknown,
        Err(e) => {
            tracing::debug!(error = %e, "unity marker lookup failed");
            Framework::Unknown
        }
    }
}

#[cfg(test)]
#[path = "detect_tests.rs"]
mod tests;
