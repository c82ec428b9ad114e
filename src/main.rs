//! bunv - dependency-cached runner for single-file Bun scripts
//!
//! CLI entry point that dispatches to subcommands.

use bunv::cache::CacheStore;
use bunv::cli::{commands, Cli, Commands};
use bunv::config::ConfigManager;
use bunv::error::BunvResult;
use clap::error::ErrorKind;
use clap::Parser;
use console::style;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Usage errors share the exit status of every other setup failure
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> BunvResult<ExitCode> {
    // 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("bunv=warn"),
        1 => EnvFilter::new("bunv=info"),
        _ => EnvFilter::new("bunv=debug"),
    };

    // stdout belongs to the script
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load().await?;

    let store = CacheStore::resolve(cli.cache_dir.as_deref(), &config.cache);
    debug!("Cache root: {}", store.root().display());

    match cli.command {
        Commands::Run(args) => commands::run(args, &config, &store).await,
        Commands::Add(args) => commands::add(args).await.map(|()| ExitCode::SUCCESS),
        Commands::Cache(args) => commands::cache(args, &store)
            .await
            .map(|()| ExitCode::SUCCESS),
        Commands::Config(args) => commands::config(args, &config, &config_manager)
            .await
            .map(|()| ExitCode::SUCCESS),
    }
}
