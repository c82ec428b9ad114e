//! Script runtime abstraction
//!
//! The package installer and the script runner are external programs. This
//! module hides them behind [`ScriptRuntime`] so the cache logic can be
//! exercised without a real `bun` on the machine.

mod bun;
mod exit;

pub use bun::BunRuntime;
pub use exit::ExitOutcome;

use crate::error::BunvResult;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;

/// Environment variable steering module resolution of the child runtime
pub const MODULE_PATH_VAR: &str = "NODE_PATH";

/// Abstract runtime interface
#[async_trait]
pub trait ScriptRuntime: Send + Sync {
    /// Install the packages listed in `dir`'s manifest into `dir`.
    ///
    /// Installer output must go to the caller's stderr.
    async fn install(&self, dir: &Path) -> BunvResult<ExitOutcome>;

    /// Run `script` with `args`, inheriting stdio, with extra `envs` set
    async fn run(
        &self,
        script: &Path,
        args: &[String],
        envs: &[(String, OsString)],
    ) -> BunvResult<ExitOutcome>;

    /// Human-readable command used for installs, for error messages
    fn install_command(&self) -> String;

    /// Get the human-readable runtime name for display
    fn runtime_name(&self) -> &str;
}
