//! Script launching
//!
//! Hard-links the script into its cache entry so relative module resolution
//! finds the entry's `node_modules`, then runs it with `NODE_PATH` pointing
//! at the entry. The launcher never creates entries, it only links into one.

use crate::error::{BunvError, BunvResult};
use crate::runtime::{ExitOutcome, ScriptRuntime, MODULE_PATH_VAR};
use std::env;
use std::ffi::OsString;
use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Runs scripts inside materialized cache entries
pub struct Launcher<'a> {
    runtime: &'a dyn ScriptRuntime,
}

impl<'a> Launcher<'a> {
    pub fn new(runtime: &'a dyn ScriptRuntime) -> Self {
        Self { runtime }
    }

    /// Link `script` into `entry` and run it with `args`.
    ///
    /// `script` must be absolute. Returns the child's exit outcome.
    pub async fn launch(
        &self,
        entry: &Path,
        script: &Path,
        args: &[String],
    ) -> BunvResult<ExitOutcome> {
        let linked = link_script(entry, script).await?;

        let module_path = module_path_value(entry, env::var_os(MODULE_PATH_VAR))?;
        debug!("{}={}", MODULE_PATH_VAR, module_path.to_string_lossy());

        let envs = [(MODULE_PATH_VAR.to_string(), module_path)];
        self.runtime.run(&linked, args, &envs).await
    }
}

/// Replace `<entry>/<script file name>` with a fresh hard link to `script`
pub async fn link_script(entry: &Path, script: &Path) -> BunvResult<PathBuf> {
    let file_name = script.file_name().ok_or_else(|| BunvError::PathInvalid {
        path: script.to_path_buf(),
        reason: "script path has no file name".to_string(),
    })?;
    let target = entry.join(file_name);

    let link_error = |source: io::Error| BunvError::Link {
        script: script.to_path_buf(),
        target: target.clone(),
        source,
    };

    // Running the entry's own copy: removing it would delete the script
    if is_same_file(script, &target).await {
        debug!("{} already in place", target.display());
        return Ok(target);
    }

    match fs::remove_file(&target).await {
        Ok(()) => debug!("Removed stale link {}", target.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(link_error(e)),
    }

    fs::hard_link(script, &target).await.map_err(link_error)?;
    Ok(target)
}

/// Whether `a` and `b` name the same file on disk
async fn is_same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::metadata(a).await, fs::metadata(b).await) {
        (Ok(a), Ok(b)) => same_inode(&a, &b),
        _ => false,
    }
}

#[cfg(unix)]
fn same_inode(a: &Metadata, b: &Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    a.dev() == b.dev() && a.ino() == b.ino()
}

#[cfg(not(unix))]
fn same_inode(_: &Metadata, _: &Metadata) -> bool {
    false
}

/// Compute the module search path: `entry` first, then any existing value
pub fn module_path_value(entry: &Path, existing: Option<OsString>) -> BunvResult<OsString> {
    let existing = existing.filter(|value| !value.is_empty());

    let paths = std::iter::once(entry.to_path_buf())
        .chain(existing.iter().flat_map(env::split_paths));

    env::join_paths(paths).map_err(|e| BunvError::PathInvalid {
        path: entry.to_path_buf(),
        reason: format!("cannot be used in {}: {}", MODULE_PATH_VAR, e),
    })
}
