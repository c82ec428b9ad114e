//! Canonical dependency sets

use crate::deps::fingerprint::Fingerprint;
use std::collections::BTreeMap;

/// Type definitions package every environment carries
pub const BASE_PACKAGE: &str = "@types/node";

/// Version specifier used when none is given
pub const LATEST: &str = "latest";

/// Resolved mapping of package name to version specifier
///
/// Backed by a `BTreeMap`, so iteration (and therefore the generated
/// manifest) is always sorted by package name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySet {
    packages: BTreeMap<String, String>,
}

impl DependencySet {
    /// Create a set holding only the implicit base entry
    pub fn new() -> Self {
        let mut packages = BTreeMap::new();
        packages.insert(BASE_PACKAGE.to_string(), LATEST.to_string());
        Self { packages }
    }

    /// Merge the three dependency sources into one set.
    ///
    /// Later sources override earlier ones: base entry, then `overrides`
    /// (`name` or `name@version` tokens), then `declared` from the script's
    /// metadata block.
    pub fn resolve(declared: &BTreeMap<String, String>, overrides: &[String]) -> Self {
        let mut set = Self::new();

        for token in overrides {
            if let Some((name, version)) = parse_package_spec(token) {
                set.insert(name, version);
            }
        }

        for (name, version) in declared {
            set.insert(name.clone(), version.clone());
        }

        set
    }

    /// Insert or replace a package
    pub fn insert(&mut self, name: impl Into<String>, version: impl Into<String>) {
        self.packages.insert(name.into(), version.into());
    }

    /// Look up the version specifier for a package
    pub fn get(&self, name: &str) -> Option<&str> {
        self.packages.get(name).map(String::as_str)
    }

    /// Iterate over `(name, version)` pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.packages
            .iter()
            .map(|(name, version)| (name.as_str(), version.as_str()))
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Whether the set holds anything besides implicit base entries
    pub fn has_declared_packages(&self) -> bool {
        self.packages.keys().any(|name| !is_base_package(name))
    }

    /// Borrow the underlying sorted map
    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.packages
    }

    /// Fingerprint identifying this set
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(self)
    }
}

impl Default for DependencySet {
    fn default() -> Self {
        Self::new()
    }
}

fn is_base_package(name: &str) -> bool {
    name == BASE_PACKAGE
}

/// Parse a `name` or `name@version` token.
///
/// The split happens at the last `@` past the first character, so scoped
/// names like `@types/node@20` keep their leading `@`. Returns `None` for
/// blank tokens. A missing or empty version becomes `latest`.
pub fn parse_package_spec(token: &str) -> Option<(String, String)> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    let (name, version) = match token.rfind('@') {
        Some(at) if at > 0 => (&token[..at], &token[at + 1..]),
        _ => (token, ""),
    };

    let version = if version.trim().is_empty() {
        LATEST
    } else {
        version.trim()
    };

    Some((name.trim().to_string(), version.to_string()))
}
