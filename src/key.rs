//! Namespaced identifiers (`namespace:path`) used as node discriminators.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Namespace of the node kinds shipped with this crate.
pub const BUILTIN_NAMESPACE: &str = "wolfyutilities";

static KEY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:([a-z0-9_.\-]+):)?([a-z0-9_.\-/]+)$").expect("namespaced key pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid namespaced key '{0}': expected lowercase 'namespace:path'")]
pub struct InvalidKey(pub String);

/// A `namespace:path` identifier, e.g. `wolfyutilities:int`.
///
/// Parsing accepts a bare path, which is placed in the [`BUILTIN_NAMESPACE`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespacedKey {
    namespace: String,
    path: String,
}

impl NamespacedKey {
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Result<Self, InvalidKey> {
        let key = NamespacedKey {
            namespace: namespace.into(),
            path: path.into(),
        };
        if KEY_PATTERN.is_match(&key.to_string()) && !key.namespace.is_empty() {
            Ok(key)
        } else {
            Err(InvalidKey(key.to_string()))
        }
    }

    /// Key in the built-in namespace. Callers pass literal paths only.
    pub(crate) fn builtin(path: &'static str) -> Self {
        NamespacedKey {
            namespace: BUILTIN_NAMESPACE.to_string(),
            path: path.to_string(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for NamespacedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for NamespacedKey {
    type Err = InvalidKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = KEY_PATTERN
            .captures(s)
            .ok_or_else(|| InvalidKey(s.to_string()))?;
        let namespace = caps.get(1).map_or(BUILTIN_NAMESPACE, |m| m.as_str());
        Ok(NamespacedKey {
            namespace: namespace.to_string(),
            path: caps[2].to_string(),
        })
    }
}
