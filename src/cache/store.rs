//! Cache directory management
//!
//! Maps fingerprints to entry directories under a single cache root and
//! owns their lifecycle (create, reuse, explicit invalidation).

use crate::cache::manifest::{Manifest, PACKAGES_DIR};
use crate::config::schema::CacheConfig;
use crate::deps::Fingerprint;
use crate::error::{BunvError, BunvResult};
use chrono::{DateTime, Local};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Result of looking up a fingerprint without touching the filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLocation {
    /// Where the entry lives (or would live)
    pub path: PathBuf,
    /// Whether a directory already exists there
    pub exists: bool,
}

/// A cache entry found on disk
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub fingerprint: Fingerprint,
    pub path: PathBuf,
    /// Parsed manifest, `None` if missing or unreadable
    pub manifest: Option<Manifest>,
    /// Whether the installed package tree is present
    pub installed: bool,
    /// Last modification time of the entry directory
    pub modified: Option<DateTime<Local>>,
}

impl CacheEntry {
    /// Number of packages listed in the manifest
    pub fn package_count(&self) -> usize {
        self.manifest
            .as_ref()
            .map(|m| m.dependencies.len())
            .unwrap_or(0)
    }
}

/// Fingerprint-addressed store of dependency environments
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    /// Create a store rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the cache root: explicit override, then config, then default
    pub fn resolve(override_dir: Option<&Path>, config: &CacheConfig) -> Self {
        let root = override_dir
            .map(Path::to_path_buf)
            .or_else(|| config.dir.clone())
            .unwrap_or_else(Self::default_root);
        debug!("Cache root: {}", root.display());
        Self::new(root)
    }

    /// `~/.bunv/cache`, or `<tmp>/bunv-cache` without a home directory
    pub fn default_root() -> PathBuf {
        match dirs::home_dir() {
            Some(home) => home.join(".bunv").join("cache"),
            None => std::env::temp_dir().join("bunv-cache"),
        }
    }

    /// Get the cache root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the entry for a fingerprint
    pub fn entry_path(&self, fingerprint: &Fingerprint) -> PathBuf {
        self.root.join(fingerprint.as_str())
    }

    /// Look up an entry without creating anything
    pub async fn locate(&self, fingerprint: &Fingerprint) -> CacheLocation {
        let path = self.entry_path(fingerprint);
        let exists = fs::metadata(&path)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false);
        CacheLocation { path, exists }
    }

    /// Create the entry directory if needed and return its path
    pub async fn ensure(&self, fingerprint: &Fingerprint) -> BunvResult<PathBuf> {
        let path = self.entry_path(fingerprint);

        match fs::metadata(&path).await {
            Ok(meta) if meta.is_dir() => {
                debug!("Cache hit: {}", path.display());
                return Ok(path);
            }
            Ok(_) => {
                return Err(BunvError::cache_dir(
                    path,
                    io::Error::new(io::ErrorKind::AlreadyExists, "path exists and is not a directory"),
                ));
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(BunvError::cache_dir(path, e)),
        }

        fs::create_dir_all(&path)
            .await
            .map_err(|e| BunvError::cache_dir(path.clone(), e))?;
        info!("Created cache entry {}", path.display());
        Ok(path)
    }

    /// Remove an entry. Returns whether anything was removed.
    pub async fn invalidate(&self, fingerprint: &Fingerprint) -> BunvResult<bool> {
        let path = self.entry_path(fingerprint);

        let result = match fs::symlink_metadata(&path).await {
            Ok(meta) if meta.is_dir() => fs::remove_dir_all(&path).await,
            Ok(_) => fs::remove_file(&path).await,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => Err(e),
        };

        result.map_err(|e| BunvError::cache_dir(path.clone(), e))?;
        info!("Invalidated cache entry {}", path.display());
        Ok(true)
    }

    /// List all entries under the root, sorted by fingerprint
    pub async fn entries(&self) -> BunvResult<Vec<CacheEntry>> {
        let mut dir = match fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(BunvError::io(
                    format!("listing cache root {}", self.root.display()),
                    e,
                ))
            }
        };

        let mut entries = Vec::new();
        while let Some(item) = dir
            .next_entry()
            .await
            .map_err(|e| BunvError::io(format!("listing cache root {}", self.root.display()), e))?
        {
            let Some(fingerprint) = item.file_name().to_str().and_then(Fingerprint::parse) else {
                continue;
            };
            let Ok(meta) = item.metadata().await else {
                continue;
            };
            if !meta.is_dir() {
                continue;
            }

            let path = item.path();
            let manifest = match Manifest::read(&path).await {
                Ok(manifest) => manifest,
                Err(e) => {
                    warn!("Unreadable manifest in {}: {}", path.display(), e);
                    None
                }
            };
            let installed = fs::metadata(path.join(PACKAGES_DIR))
                .await
                .map(|m| m.is_dir())
                .unwrap_or(false);
            let modified = meta.modified().ok().map(DateTime::<Local>::from);

            entries.push(CacheEntry {
                fingerprint,
                path,
                manifest,
                installed,
                modified,
            });
        }

        entries.sort_by(|a, b| a.fingerprint.cmp(&b.fingerprint));
        Ok(entries)
    }
}
