//! Cache command - inspect cached dependency environments

use crate::cache::{CacheEntry, CacheStore, InstallPlan};
use crate::cli::args::{CacheAction, CacheArgs, OutputFormat};
use crate::deps;
use crate::error::{BunvError, BunvResult};
use crate::ui::{self, UiContext};
use console::style;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Execute the cache command
pub async fn execute(args: CacheArgs, store: &CacheStore) -> BunvResult<()> {
    match args.action {
        CacheAction::Dir => {
            println!("{}", store.root().display());
            Ok(())
        }
        CacheAction::List { format } => list_entries(store, format).await,
        CacheAction::Info { script, with } => show_script_info(store, &script, &with).await,
    }
}

/// List all cache entries
async fn list_entries(store: &CacheStore, format: OutputFormat) -> BunvResult<()> {
    let entries = store.entries().await?;

    match format {
        OutputFormat::Table => print_entry_table(&entries),
        OutputFormat::Json => print_entry_json(&entries)?,
        OutputFormat::Plain => print_entry_plain(&entries),
    }

    Ok(())
}

fn print_entry_table(entries: &[CacheEntry]) {
    if entries.is_empty() {
        println!("No cached environments.");
        return;
    }

    println!(
        "{:<18} {:<10} {:<10} {:<18}",
        "FINGERPRINT", "PACKAGES", "STATE", "MODIFIED"
    );
    println!("{}", "-".repeat(58));

    for entry in entries {
        // Pad before styling so escape codes don't skew the columns
        let state = if entry.installed {
            style(format!("{:<10}", "installed")).green()
        } else {
            style(format!("{:<10}", "bare")).dim()
        };
        let modified = entry
            .modified
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:<18} {:<10} {} {:<18}",
            entry.fingerprint,
            entry.package_count(),
            state,
            modified
        );
    }

    println!();
    println!("Total: {} environment(s)", entries.len());
}

#[derive(Serialize)]
struct EntryJson {
    fingerprint: String,
    path: PathBuf,
    installed: bool,
    dependencies: Option<std::collections::BTreeMap<String, String>>,
    modified: Option<String>,
}

impl From<&CacheEntry> for EntryJson {
    fn from(entry: &CacheEntry) -> Self {
        Self {
            fingerprint: entry.fingerprint.to_string(),
            path: entry.path.clone(),
            installed: entry.installed,
            dependencies: entry.manifest.as_ref().map(|m| m.dependencies.clone()),
            modified: entry.modified.map(|t| t.to_rfc3339()),
        }
    }
}

fn print_entry_json(entries: &[CacheEntry]) -> BunvResult<()> {
    let json: Vec<EntryJson> = entries.iter().map(EntryJson::from).collect();
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

fn print_entry_plain(entries: &[CacheEntry]) {
    for entry in entries {
        println!("{}", entry.path.display());
    }
}

/// Show the environment a script resolves to, without creating it
async fn show_script_info(store: &CacheStore, script: &Path, with: &[String]) -> BunvResult<()> {
    if !script.is_file() {
        return Err(BunvError::ScriptNotFound(script.to_path_buf()));
    }

    let ctx = UiContext::detect();
    let deps = deps::resolve_for_script(script, with).await;
    let fingerprint = deps.fingerprint();
    let location = store.locate(&fingerprint).await;

    ui::section(&ctx, &script.display().to_string());
    ui::key_value(&ctx, "Fingerprint", fingerprint.as_str());
    ui::key_value(&ctx, "Entry", &location.path.display().to_string());

    let state = if !location.exists {
        "not cached"
    } else if InstallPlan::for_entry(&deps, &location.path).await?.is_noop() {
        "ready"
    } else {
        "incomplete"
    };
    ui::key_value(&ctx, "State", state);

    ui::section(&ctx, "Dependencies");
    for (name, version) in deps.iter() {
        ui::key_value(&ctx, name, version);
    }
    if !deps.has_declared_packages() {
        ui::remark(&ctx, "Only the implicit base package; nothing to install");
    }

    Ok(())
}
