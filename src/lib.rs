//! bunv - isolated dependency environments for single-file Bun scripts
//!
//! A script declares its packages in a `// /// script` header block. bunv
//! fingerprints the resulting dependency set, installs it once into a
//! per-fingerprint cache directory and runs the script against it.

pub mod cache;
pub mod cli;
pub mod config;
pub mod deps;
pub mod error;
pub mod launch;
pub mod runtime;
pub mod ui;

pub use error::{BunvError, BunvResult};
