//! Dependency manifest written into each cache entry
//!
//! The manifest is a `package.json` the installer understands. It is
//! pretty-printed with sorted dependencies so entries stay diffable.

use crate::deps::DependencySet;
use crate::error::{BunvError, BunvResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Manifest file name inside a cache entry
pub const MANIFEST_FILE: &str = "package.json";

/// Installed package tree inside a cache entry
pub const PACKAGES_DIR: &str = "node_modules";

const MANIFEST_NAME: &str = "bunv-env";

/// Parsed `package.json` of a cache entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub name: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
}

impl Manifest {
    /// Build the manifest describing a dependency set
    pub fn from_set(deps: &DependencySet) -> Self {
        Self {
            name: MANIFEST_NAME.to_string(),
            private: true,
            dependencies: deps.as_map().clone(),
        }
    }

    /// Path of the manifest inside `dir`
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(MANIFEST_FILE)
    }

    /// Render as pretty-printed JSON with a trailing newline
    pub fn render(&self) -> BunvResult<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Write the manifest into `dir`
    pub async fn write(&self, dir: &Path) -> BunvResult<PathBuf> {
        let path = Self::path_in(dir);
        fs::write(&path, self.render()?)
            .await
            .map_err(|e| BunvError::io(format!("writing manifest {}", path.display()), e))?;
        Ok(path)
    }

    /// Read the manifest from `dir`, `None` if absent
    pub async fn read(dir: &Path) -> BunvResult<Option<Self>> {
        let path = Self::path_in(dir);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(BunvError::io(
                    format!("reading manifest {}", path.display()),
                    e,
                ))
            }
        };
        Ok(Some(serde_json::from_str(&content)?))
    }
}
