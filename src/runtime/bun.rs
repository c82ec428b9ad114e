//! Bun runtime
//!
//! Implements [`ScriptRuntime`] by shelling out to the `bun` binary (or
//! whatever `runtime.program` points at).

use crate::config::schema::RuntimeConfig;
use crate::error::{BunvError, BunvResult};
use crate::runtime::{ExitOutcome, ScriptRuntime};
use async_trait::async_trait;
use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Runtime backed by a Bun-compatible executable
#[derive(Debug, Clone)]
pub struct BunRuntime {
    program: String,
    install_args: Vec<String>,
    run_args: Vec<String>,
}

impl BunRuntime {
    /// Create a runtime from configuration
    pub fn new(config: &RuntimeConfig) -> Self {
        Self {
            program: config.program.clone(),
            install_args: config.install_args.clone(),
            run_args: config.run_args.clone(),
        }
    }

    fn display_command(&self, args: &[String]) -> String {
        std::iter::once(self.program.as_str())
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for BunRuntime {
    fn default() -> Self {
        Self::new(&RuntimeConfig::default())
    }
}

#[async_trait]
impl ScriptRuntime for BunRuntime {
    async fn install(&self, dir: &Path) -> BunvResult<ExitOutcome> {
        let command = self.install_command();
        debug!("Executing in {}: {}", dir.display(), command);

        // Installer chatter goes to stderr; stdout belongs to the script
        let status = Command::new(&self.program)
            .args(&self.install_args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::from(io::stderr()))
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| BunvError::command_failed(command, e))?;

        Ok(ExitOutcome::from(status))
    }

    async fn run(
        &self,
        script: &Path,
        args: &[String],
        envs: &[(String, OsString)],
    ) -> BunvResult<ExitOutcome> {
        debug!(
            "Executing: {} {} {:?}",
            self.display_command(&self.run_args),
            script.display(),
            args
        );

        let status = Command::new(&self.program)
            .args(&self.run_args)
            .arg(script)
            .args(args)
            .envs(envs.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| {
                BunvError::command_failed(
                    format!(
                        "{} {}",
                        self.display_command(&self.run_args),
                        script.display()
                    ),
                    e,
                )
            })?;

        Ok(ExitOutcome::from(status))
    }

    fn install_command(&self) -> String {
        self.display_command(&self.install_args)
    }

    fn runtime_name(&self) -> &str {
        &self.program
    }
}
