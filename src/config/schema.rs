//! Configuration schema for bunv
//!
//! Configuration is stored at `~/.config/bunv/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Script runtime and installer settings
    pub runtime: RuntimeConfig,

    /// Cache settings
    pub cache: CacheConfig,
}

/// Runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Executable used both to install packages and to run scripts
    pub program: String,

    /// Arguments for the install step (run inside the cache entry)
    pub install_args: Vec<String>,

    /// Arguments placed before the script path when running it
    pub run_args: Vec<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            program: "bun".to_string(),
            install_args: vec!["install".to_string()],
            run_args: vec!["run".to_string()],
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache root override (default: ~/.bunv/cache)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}
