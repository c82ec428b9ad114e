//! Run command - execute a script in its cached dependency environment

use crate::cache::{CacheStore, Materializer};
use crate::cli::args::RunArgs;
use crate::config::Config;
use crate::deps;
use crate::error::{BunvError, BunvResult};
use crate::launch::Launcher;
use crate::runtime::{BunRuntime, ExitOutcome, ScriptRuntime};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokio::fs;
use tracing::{debug, info};

/// Execute the run command
pub async fn execute(args: RunArgs, config: &Config, store: &CacheStore) -> BunvResult<ExitCode> {
    let runtime = BunRuntime::new(&config.runtime);
    debug!("Using runtime: {}", runtime.runtime_name());

    let outcome = run_script(&args, store, &runtime).await?;
    process_exit_code(outcome).map(ExitCode::from)
}

/// Resolve, materialize and launch. Returns the script's exit outcome.
pub async fn run_script(
    args: &RunArgs,
    store: &CacheStore,
    runtime: &dyn ScriptRuntime,
) -> BunvResult<ExitOutcome> {
    let script = resolve_script(&args.script).await?;
    debug!("Script: {}", script.display());

    let deps = deps::resolve_for_script(&script, &args.with).await;
    let fingerprint = deps.fingerprint();
    debug!("Dependency set {} ({} packages)", fingerprint, deps.len());

    if args.fresh && store.invalidate(&fingerprint).await? {
        info!("Discarded cached environment {}", fingerprint);
    }

    let location = store.locate(&fingerprint).await;
    if location.exists {
        debug!("Cache hit: {}", location.path.display());
    } else {
        info!("Cache miss: {}", location.path.display());
    }

    let entry = store.ensure(&fingerprint).await?;
    let materialized = Materializer::new(runtime).materialize(&deps, &entry).await?;
    debug!("Environment {}: {:?}", fingerprint, materialized);

    Launcher::new(runtime)
        .launch(&entry, &script, &args.args)
        .await
}

/// Check the script exists and make its path absolute
async fn resolve_script(path: &Path) -> BunvResult<PathBuf> {
    match fs::metadata(path).await {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => {
            return Err(BunvError::PathInvalid {
                path: path.to_path_buf(),
                reason: "not a file".to_string(),
            })
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(BunvError::ScriptNotFound(path.to_path_buf()))
        }
        Err(e) => return Err(BunvError::io(format!("reading {}", path.display()), e)),
    }

    fs::canonicalize(path)
        .await
        .map_err(|e| BunvError::io(format!("resolving script path {}", path.display()), e))
}

/// Map the child's outcome to this process's exit status
fn process_exit_code(outcome: ExitOutcome) -> BunvResult<u8> {
    match outcome {
        ExitOutcome::Code(code) => Ok(u8::try_from(code).unwrap_or(1)),
        ExitOutcome::Signaled(signal) => Err(BunvError::ProcessSignaled(signal)),
        ExitOutcome::Indeterminate => Err(BunvError::ProcessStatusUnknown),
    }
}
