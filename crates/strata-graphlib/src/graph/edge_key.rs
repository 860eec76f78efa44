//! Edge identity.
//!
//! An edge is identified by its endpoints `v -> w` plus an optional `name` that tells parallel
//! edges of a multigraph apart. Undirected graphs store endpoints in lexical order.

use serde::{Deserialize, Serialize};

/// Borrowed form of [`EdgeKey`] so lookups don't have to allocate.
///
/// Hashes exactly like `EdgeKey` because `str`/`String` and `Option<&str>`/`Option<String>`
/// hash identically and the fields are hashed in the same order.
#[derive(Clone, Copy, Hash)]
pub(in crate::graph) struct EdgeKeyView<'a> {
    pub(in crate::graph) v: &'a str,
    pub(in crate::graph) w: &'a str,
    pub(in crate::graph) name: Option<&'a str>,
}

impl hashbrown::Equivalent<EdgeKey> for EdgeKeyView<'_> {
    fn equivalent(&self, key: &EdgeKey) -> bool {
        key.v == self.v && key.w == self.w && key.name.as_deref() == self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey {
    pub v: String,
    pub w: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl EdgeKey {
    pub fn new(
        v: impl Into<String>,
        w: impl Into<String>,
        name: Option<impl Into<String>>,
    ) -> Self {
        Self {
            v: v.into(),
            w: w.into(),
            name: name.map(Into::into),
        }
    }

    pub fn unnamed(v: impl Into<String>, w: impl Into<String>) -> Self {
        Self {
            v: v.into(),
            w: w.into(),
            name: None,
        }
    }

    /// Returns the endpoint opposite to `node`.
    pub fn other(&self, node: &str) -> &str {
        if self.v == node { &self.w } else { &self.v }
    }

    pub fn is_self_loop(&self) -> bool {
        self.v == self.w
    }
}
