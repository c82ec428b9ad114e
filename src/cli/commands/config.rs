//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::{BunvError, BunvResult};
use crate::ui::{self, UiContext};
use std::path::PathBuf;

/// Keys accepted by `config set`
const VALID_KEYS: [&str; 4] = [
    "runtime.program",
    "runtime.install_args",
    "runtime.run_args",
    "cache.dir",
];

/// Execute the config command
pub async fn execute(args: ConfigArgs, config: &Config, manager: &ConfigManager) -> BunvResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value }) => set_value(manager, config, &key, &value).await?,
    }

    Ok(())
}

fn show_config(config: &Config) -> BunvResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

async fn init_config(manager: &ConfigManager, force: bool) -> BunvResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui::step_warn_hint(
            &ctx,
            &format!("Config already exists at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;

    ui::step_ok_detail(
        &ctx,
        "Configuration initialized",
        &path.display().to_string(),
    );

    Ok(())
}

async fn set_value(
    manager: &ConfigManager,
    config: &Config,
    key: &str,
    value: &str,
) -> BunvResult<()> {
    let ctx = UiContext::detect();
    let mut config = config.clone();

    if let Err(e) = apply_value(&mut config, key, value) {
        ui::step_error_detail(&ctx, "Unknown config key", key);
        ui::remark(&ctx, &format!("Valid keys: {}", VALID_KEYS.join(", ")));
        return Err(e);
    }

    manager.save(&config).await?;
    ui::step_ok(&ctx, &format!("Set {} = {}", key, value));

    Ok(())
}

/// Apply a dot-separated `key` to `config`
fn apply_value(config: &mut Config, key: &str, value: &str) -> BunvResult<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["runtime", "program"] => config.runtime.program = value.trim().to_string(),
        ["runtime", "install_args"] => config.runtime.install_args = parse_list(value),
        ["runtime", "run_args"] => config.runtime.run_args = parse_list(value),
        ["cache", "dir"] => {
            config.cache.dir = match value.trim() {
                "" => None,
                dir => Some(PathBuf::from(dir)),
            }
        }
        _ => return Err(BunvError::User(format!("Unknown config key: {}", key))),
    }

    Ok(())
}

/// Split a whitespace-separated argument list
fn parse_list(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}
