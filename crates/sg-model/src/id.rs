//! Page identifiers.
//!
//! Ids are opaque strings in the form `"<Kind> /<uuid>"` so that generated
//! ids stay namespaced apart from well-known hand-written ones. The generator
//! is the collaborator an editor UI calls *before* dispatching an add
//! command; the core never mints ids on its own.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque page identifier.
///
/// Equality and hashing are by string value, never by object identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    /// Wrap an existing id string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh id under the given kind namespace.
    ///
    /// Produces `"<kind> /<uuid>"`, the same format carried by nodes
    /// hydrated from a published build.
    #[must_use]
    pub fn generate(kind: &str) -> Self {
        Self(format!("{kind} /{}", Uuid::new_v4()))
    }

    /// The raw id string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for PageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
