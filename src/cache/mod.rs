//! Fingerprint-addressed dependency cache
//!
//! Each distinct dependency set gets its own directory under the cache root,
//! named by the set's fingerprint. Same set = same directory, installed once.
//!
//! # Entry layout
//!
//! | Path | Written by |
//! |------|------------|
//! | `package.json` | materializer |
//! | `node_modules/` | installer |
//! | `<script name>` | launcher (hard link) |
//!
//! There is no cross-process lock. Two first runs of the same set may
//! install into the same entry concurrently; the installer must tolerate it.

pub mod manifest;
pub mod materialize;
pub mod store;

pub use manifest::{Manifest, MANIFEST_FILE, PACKAGES_DIR};
pub use materialize::{InstallPlan, MaterializeOutcome, Materializer};
pub use store::{CacheEntry, CacheLocation, CacheStore};
