//! Add command - record packages in a script's metadata block

use crate::cli::args::AddArgs;
use crate::deps::{metadata, parse_package_spec};
use crate::error::{BunvError, BunvResult};
use crate::ui::{self, UiContext};
use std::io;
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Execute the add command
pub async fn execute(args: AddArgs) -> BunvResult<()> {
    let ctx = UiContext::detect();
    let additions = parse_additions(&args.packages)?;

    add_to_script(&args.script, &additions).await?;

    for (name, version) in &additions {
        debug!("Recorded {}@{}", name, version);
    }
    ui::step_ok_detail(
        &ctx,
        &format!("Added {} package(s)", additions.len()),
        &args.script.display().to_string(),
    );

    Ok(())
}

fn parse_additions(packages: &[String]) -> BunvResult<Vec<(String, String)>> {
    packages
        .iter()
        .map(|token| {
            parse_package_spec(token)
                .ok_or_else(|| BunvError::User(format!("Invalid package: '{}'", token)))
        })
        .collect()
}

/// Rewrite the script in place with `additions` merged into its block
async fn add_to_script(script: &Path, additions: &[(String, String)]) -> BunvResult<()> {
    let source = match fs::read_to_string(script).await {
        Ok(source) => source,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(BunvError::ScriptNotFound(script.to_path_buf()))
        }
        Err(e) => return Err(BunvError::io(format!("reading {}", script.display()), e)),
    };

    let updated = metadata::upsert_dependencies(&source, additions)?;
    fs::write(script, updated)
        .await
        .map_err(|e| BunvError::io(format!("writing {}", script.display()), e))
}
