//! Dependency set fingerprinting
//!
//! A fingerprint is the first 16 hex characters of the SHA256 of the sorted
//! `(name, version)` pairs, each field length-prefixed so that no two
//! distinct sets share an encoding. Same set = same cache entry.

use crate::deps::set::DependencySet;
use sha2::{Digest, Sha256};
use std::fmt;

/// Number of hex characters kept from the digest
pub const FINGERPRINT_LEN: usize = 16;

/// Short, deterministic identifier of a dependency set
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute the fingerprint of a dependency set
    pub fn of(set: &DependencySet) -> Self {
        let mut entries: Vec<(&str, &str)> = set.iter().collect();
        entries.sort_unstable();

        let mut hasher = Sha256::new();
        for (name, version) in entries {
            update_field(&mut hasher, name);
            update_field(&mut hasher, version);
        }
        let digest = hex::encode(hasher.finalize());

        Self(digest[..FINGERPRINT_LEN].to_string())
    }

    /// Accept an existing directory name as a fingerprint.
    ///
    /// Returns `None` unless the value is exactly 16 lowercase hex chars.
    pub fn parse(value: &str) -> Option<Self> {
        let valid = value.len() == FINGERPRINT_LEN
            && value
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));
        valid.then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn update_field(hasher: &mut Sha256, field: &str) {
    hasher.update((field.len() as u64).to_be_bytes());
    hasher.update(field.as_bytes());
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
