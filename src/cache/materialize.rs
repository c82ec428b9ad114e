//! Environment materialization
//!
//! Makes sure a cache entry actually holds its dependency set: writes the
//! manifest and runs the installer when the package tree is missing.
//! Running it again against a populated entry is a no-op.

use crate::cache::manifest::{Manifest, PACKAGES_DIR};
use crate::deps::DependencySet;
use crate::error::{BunvError, BunvResult};
use crate::runtime::ScriptRuntime;
use console::style;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// Work needed to bring an entry up to date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallPlan {
    pub write_manifest: bool,
    pub install: bool,
}

impl InstallPlan {
    /// Inspect an entry directory and decide what must be done.
    ///
    /// Installing is only worthwhile when the set holds packages besides the
    /// implicit base entry. Fails if the entry cannot be inspected.
    pub async fn for_entry(deps: &DependencySet, dir: &Path) -> BunvResult<Self> {
        let manifest_present = exists(&Manifest::path_in(dir)).await?;
        let packages_present = exists(&dir.join(PACKAGES_DIR)).await?;

        let install = deps.has_declared_packages() && (!manifest_present || !packages_present);
        Ok(Self {
            write_manifest: install || !manifest_present,
            install,
        })
    }

    pub fn is_noop(&self) -> bool {
        !self.write_manifest && !self.install
    }
}

/// What a materialization did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterializeOutcome {
    /// Entry was already complete
    Reused,
    /// Only the manifest was written (nothing to install)
    ManifestOnly,
    /// Packages were installed
    Installed,
}

/// Populates cache entries using a [`ScriptRuntime`]'s installer
pub struct Materializer<'a> {
    runtime: &'a dyn ScriptRuntime,
}

impl<'a> Materializer<'a> {
    pub fn new(runtime: &'a dyn ScriptRuntime) -> Self {
        Self { runtime }
    }

    /// Bring the entry at `dir` in line with `deps`
    pub async fn materialize(
        &self,
        deps: &DependencySet,
        dir: &Path,
    ) -> BunvResult<MaterializeOutcome> {
        let plan = InstallPlan::for_entry(deps, dir).await?;
        debug!("Install plan for {}: {:?}", dir.display(), plan);

        if plan.is_noop() {
            return Ok(MaterializeOutcome::Reused);
        }

        if plan.write_manifest {
            let path = Manifest::from_set(deps).write(dir).await?;
            debug!("Wrote {}", path.display());
        }

        if !plan.install {
            return Ok(MaterializeOutcome::ManifestOnly);
        }

        eprintln!(
            "{} Installing {} packages...",
            style("→").cyan(),
            deps.len()
        );

        let outcome = self.runtime.install(dir).await?;
        if !outcome.success() {
            // A partial package tree would pass for a complete one next time
            discard_packages(dir).await?;
            return Err(BunvError::InstallFailed {
                command: self.runtime.install_command(),
                outcome,
            });
        }

        info!("Installed dependencies into {}", dir.display());
        Ok(MaterializeOutcome::Installed)
    }
}

async fn exists(path: &Path) -> BunvResult<bool> {
    fs::try_exists(path)
        .await
        .map_err(|e| BunvError::cache_dir(path, e))
}

async fn discard_packages(dir: &Path) -> BunvResult<()> {
    let packages = dir.join(PACKAGES_DIR);
    match fs::remove_dir_all(&packages).await {
        Ok(()) => {
            debug!("Removed incomplete {}", packages.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(BunvError::cache_dir(packages, e)),
    }
}
