//! Dependency resolution for scripts
//!
//! Turns a script's inline metadata block plus `--with` overrides into a
//! canonical [`DependencySet`] and derives its [`Fingerprint`].
//!
//! # Precedence
//!
//! | Source | Rank |
//! |--------|------|
//! | Implicit `@types/node` | lowest |
//! | `--with` overrides | middle |
//! | `// /// script` block | highest |

pub mod fingerprint;
pub mod metadata;
pub mod set;

pub use fingerprint::Fingerprint;
pub use metadata::{read_script_metadata, ScriptMetadata};
pub use set::{parse_package_spec, DependencySet, BASE_PACKAGE, LATEST};

use std::path::Path;

/// Build the dependency set for a script and its `--with` overrides
pub async fn resolve_for_script(script: &Path, overrides: &[String]) -> DependencySet {
    let declared = read_script_metadata(script).await.into_dependencies();
    DependencySet::resolve(&declared, overrides)
}
