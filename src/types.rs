// src/types.rs

//! Shared primitives: keys, versions and the `key:version` dependency string.
//!
//! Both the generator and the analyzer speak in terms of [`DepRef`]s. The
//! string form is bit-exact: `"<entity-lowercase-plural>_id_<id>:<version>"`,
//! e.g. `posts_id_42:1`.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::{CausalError, Result};

/// 1-based sequence number of successive writes to a [`Key`].
pub type Version = u64;

/// Globally unique operation id assigned by the generator.
pub type OpId = u64;

/// Index of a user in construction order.
pub type UserId = usize;

/// Greedy key capture so the split happens on the rightmost colon.
static DEP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+):([0-9]+)$").expect("dependency pattern is a valid regex")
});

/// Entity types the generator knows how to name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Post,
}

impl EntityKind {
    /// Type name as it appears in a record's `types` list.
    pub fn type_name(self) -> &'static str {
        match self {
            EntityKind::User => "User",
            EntityKind::Post => "Post",
        }
    }

    /// Lowercase plural used as the key prefix.
    pub fn plural(self) -> &'static str {
        match self {
            EntityKind::User => "users",
            EntityKind::Post => "posts",
        }
    }

    pub fn key(self, id: u64) -> Key {
        Key(format!("{}_id_{}", self.plural(), id))
    }
}

/// Logical identity of a mutable entity, rendered as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(String);

impl Key {
    pub fn new(raw: impl Into<String>) -> Self {
        Key(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A `(Key, Version)` pair: one slot in a key's write chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DepRef {
    pub key: Key,
    pub version: Version,
}

impl DepRef {
    pub fn new(key: Key, version: Version) -> Self {
        Self { key, version }
    }
}

impl fmt::Display for DepRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.key, self.version)
    }
}

impl FromStr for DepRef {
    type Err = CausalError;

    fn from_str(s: &str) -> Result<Self> {
        parse_dep(s)
    }
}

/// Parse a dependency string into its key and version.
///
/// Everything up to the rightmost colon is the key; what follows must be an
/// unsigned integer that fits a [`Version`].
pub fn parse_dep(raw: &str) -> Result<DepRef> {
    let caps = DEP_PATTERN
        .captures(raw)
        .ok_or_else(|| CausalError::MalformedDependency(raw.to_string()))?;

    let version = caps[2]
        .parse::<Version>()
        .map_err(|_| CausalError::MalformedDependency(raw.to_string()))?;

    Ok(DepRef::new(Key::new(&caps[1]), version))
}
