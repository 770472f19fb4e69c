use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier correlating one window across the agent and the renderer.
///
/// Keys are minted from a sequential counter, so the string form is always the
/// decimal index. A recycled key keeps the index it was minted with.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowKey(String);

impl WindowKey {
    pub fn from_index(index: u64) -> Self {
        Self(index.to_string())
    }

    /// Sequential index this key was minted from, if it has one.
    pub fn index(&self) -> Option<u64> {
        self.0.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WindowKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for WindowKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}
