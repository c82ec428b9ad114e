//! Error types for bunv
//!
//! All modules use `BunvResult<T>` as their return type.

use crate::runtime::ExitOutcome;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for bunv operations
pub type BunvResult<T> = Result<T, BunvError>;

/// All errors that can occur in bunv
#[derive(Error, Debug)]
pub enum BunvError {
    // Script errors
    #[error("Script not found: {0}")]
    ScriptNotFound(PathBuf),

    // Cache errors
    #[error("Failed to prepare cache directory {path}: {source}")]
    CacheDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Package install failed: {command} ({outcome})")]
    InstallFailed {
        command: String,
        outcome: ExitOutcome,
    },

    #[error("Failed to link {script} into {target}: {source}")]
    Link {
        script: PathBuf,
        target: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid path: {path}: {reason}")]
    PathInvalid { path: PathBuf, reason: String },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Process terminated by signal {0}")]
    ProcessSignaled(i32),

    #[error("Process exit status could not be determined")]
    ProcessStatusUnknown,

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("{0}")]
    User(String),
}

impl BunvError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a cache directory error
    pub fn cache_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CacheDirectory {
            path: path.into(),
            source,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::CommandFailed { .. } => {
                Some("Install Bun from https://bun.sh or set runtime.program: bunv config set runtime.program <path>")
            }
            Self::CacheDirectory { .. } => {
                Some("Check permissions on the cache root, or point BUNV_CACHE_DIR somewhere writable")
            }
            Self::Link { .. } => {
                Some("Hard links need the script and the cache on one filesystem; set BUNV_CACHE_DIR accordingly")
            }
            Self::InstallFailed { .. } => Some("Check the installer output above, then retry with --fresh"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = BunvError::ScriptNotFound(PathBuf::from("missing.ts"));
        assert_eq!(err.to_string(), "Script not found: missing.ts");
    }

    #[test]
    fn install_failed_display_includes_outcome() {
        let err = BunvError::InstallFailed {
            command: "bun install".to_string(),
            outcome: ExitOutcome::Code(1),
        };
        assert_eq!(
            err.to_string(),
            "Package install failed: bun install (exit code 1)"
        );
    }

    #[test]
    fn error_hint() {
        let err = BunvError::command_failed(
            "bun install",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert!(err.hint().unwrap().contains("runtime.program"));
        assert_eq!(BunvError::ProcessStatusUnknown.hint(), None);
    }
}
