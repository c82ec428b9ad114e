//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// bunv - run single-file Bun scripts with inline dependencies
///
/// Dependencies declared in a script's `// /// script` block are installed
/// once per distinct set into a shared cache and reused on every run.
#[derive(Parser, Debug)]
#[command(name = "bunv")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "BUNV_CONFIG")]
    pub config: Option<PathBuf>,

    /// Cache root directory (default: ~/.bunv/cache)
    #[arg(long, global = true, env = "BUNV_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a script in its dependency environment
    Run(RunArgs),

    /// Add dependencies to a script's inline metadata
    Add(AddArgs),

    /// Inspect the dependency cache
    Cache(CacheArgs),

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Script to run
    pub script: PathBuf,

    /// Extra packages for this run (repeatable or comma-separated)
    #[arg(long = "with", value_name = "PACKAGE[@VERSION]", value_delimiter = ',')]
    pub with: Vec<String>,

    /// Discard the cached environment and install again
    #[arg(long)]
    pub fresh: bool,

    /// Arguments passed to the script
    #[arg(last = true)]
    pub args: Vec<String>,
}

/// Arguments for the add command
#[derive(Parser, Debug)]
pub struct AddArgs {
    /// Script whose metadata block is updated
    #[arg(short, long)]
    pub script: PathBuf,

    /// Packages to add
    #[arg(required = true, value_name = "PACKAGE[@VERSION]")]
    pub packages: Vec<String>,
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Subcommand for cache
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Print the cache root directory
    Dir,

    /// List cached environments
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show the environment a script resolves to
    Info {
        /// Script to inspect
        script: PathBuf,

        /// Extra packages, as for `run --with`
        #[arg(long = "with", value_name = "PACKAGE[@VERSION]", value_delimiter = ',')]
        with: Vec<String>,
    },
}

/// Output format for list command
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., runtime.program)
        key: String,
        /// Value to set
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_run() {
        let cli = Cli::parse_from(["bunv", "run", "script.ts"]);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.script, PathBuf::from("script.ts"));
                assert!(args.with.is_empty());
                assert!(args.args.is_empty());
                assert!(!args.fresh);
            }
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn cli_parses_run_with_passthrough() {
        let cli = Cli::parse_from([
            "bunv",
            "run",
            "script.ts",
            "--with",
            "lodash@4.17.21",
            "--",
            "--flag",
            "value",
        ]);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.with, vec!["lodash@4.17.21"]);
                assert_eq!(args.args, vec!["--flag", "value"]);
            }
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn cli_parses_repeated_and_comma_separated_with() {
        let cli = Cli::parse_from([
            "bunv", "run", "--with", "zod,chalk@5", "--with", "@types/bun", "x.ts",
        ]);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.with, vec!["zod", "chalk@5", "@types/bun"]);
            }
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn cli_parses_add() {
        let cli = Cli::parse_from(["bunv", "add", "--script", "x.ts", "zod", "chalk@5"]);
        match cli.command {
            Commands::Add(args) => {
                assert_eq!(args.script, PathBuf::from("x.ts"));
                assert_eq!(args.packages, vec!["zod", "chalk@5"]);
            }
            _ => panic!("expected Add command"),
        }
    }

    #[test]
    fn cli_add_requires_packages() {
        assert!(Cli::try_parse_from(["bunv", "add", "--script", "x.ts"]).is_err());
    }

    #[test]
    fn cli_parses_cache_list() {
        let cli = Cli::parse_from(["bunv", "cache", "list", "--format", "json"]);
        match cli.command {
            Commands::Cache(CacheArgs {
                action: CacheAction::List { format },
            }) => assert!(matches!(format, OutputFormat::Json)),
            _ => panic!("expected cache list"),
        }
    }

    #[test]
    fn cli_global_cache_dir() {
        let cli = Cli::parse_from(["bunv", "cache", "dir", "--cache-dir", "/tmp/c"]);
        assert_eq!(cli.cache_dir, Some(PathBuf::from("/tmp/c")));
    }

    #[test]
    fn cli_verbose_levels() {
        let cli = Cli::parse_from(["bunv", "cache", "dir"]);
        assert_eq!(cli.verbose, 0);

        let cli = Cli::parse_from(["bunv", "-v", "cache", "dir"]);
        assert_eq!(cli.verbose, 1);

        let cli = Cli::parse_from(["bunv", "-vv", "cache", "dir"]);
        assert_eq!(cli.verbose, 2);
    }
}
