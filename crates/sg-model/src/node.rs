//! Page nodes and metadata.
//!
//! A [`PageNode`] is a single content-tree entity: slug, template reference,
//! weak tree links (parent id, ordered child ids), an owned field store, and
//! page metadata. Tree links are ids, never owning pointers, so a node can be
//! referenced before it exists and survives the soft deletion of relatives.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::field::Field;
use crate::id::PageId;

/// Page-level metadata as edited in the page explorer.
///
/// Replaced wholesale by an update command; callers wanting a partial update
/// pre-merge with the previous record themselves.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
    /// Whether the page is included in the published site.
    #[serde(default)]
    pub published: bool,
    /// Timestamp of the last publish, as an RFC 3339 string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_published: Option<String>,
}

/// Site-wide metadata, independent of any page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,
}

/// A single content-tree entity.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageNode {
    /// Slug, unique among siblings by caller contract.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub slug: String,
    /// Template reference. `None` marks an unresolvable stub, shown as
    /// "locked" in the editor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Parent id. `None` means the node is a root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<PageId>,
    /// Ordered child ids; order defines sibling display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PageId>,
    /// Owned field store, keyed by field name.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub fields: HashMap<String, Field>,
    #[serde(default)]
    pub page_metadata: PageMetadata,
    /// Request path baked into the last published build, if any. Absent for
    /// nodes created in the editor since that build.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_path: Option<String>,
    /// Soft-delete flag. A deleted node stays addressable by id but is
    /// excluded from traversal and routing.
    #[serde(default)]
    pub deleted: bool,
}

impl PageNode {
    /// Create an empty stub node.
    ///
    /// Used for creation-on-patch: structural commands may reference an id
    /// that has not yet been independently created, and the registry
    /// materializes it as a stub to tolerate that construction order.
    #[must_use]
    pub fn stub() -> Self {
        Self::default()
    }

    /// Whether the node is unresolvable (no template reference).
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.template.is_none()
    }
}

/// Flat projection of a node for explorer-style UIs.
///
/// Collapses metadata fallbacks so presentation layers need no knowledge of
/// node internals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub slug: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub published: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_published: Option<String>,
    /// True when the node has no template and cannot be resolved.
    pub locked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stub_is_locked_root() {
        let stub = PageNode::stub();
        assert!(stub.is_locked());
        assert!(stub.parent.is_none());
        assert!(stub.children.is_empty());
        assert!(!stub.deleted);
    }

    #[test]
    fn test_node_with_template_is_not_locked() {
        let node = PageNode {
            template: Some("BlogPage".to_owned()),
            ..PageNode::default()
        };
        assert!(!node.is_locked());
    }

    #[test]
    fn test_node_serialization_skips_empty() {
        let json = serde_json::to_value(PageNode::stub()).unwrap();
        assert!(json.get("slug").is_none());
        assert!(json.get("children").is_none());
        assert!(json.get("fields").is_none());
        assert_eq!(json["deleted"], false);
    }

    #[test]
    fn test_node_roundtrip_keeps_links() {
        let node = PageNode {
            slug: "blog".to_owned(),
            template: Some("BlogPage".to_owned()),
            parent: Some(PageId::from("SitePage /root")),
            children: vec![PageId::from("SitePage /post-1")],
            ..PageNode::default()
        };

        let json = serde_json::to_string(&node).unwrap();
        let back: PageNode = serde_json::from_str(&json).unwrap();

        assert_eq!(back, node);
    }

    #[test]
    fn test_metadata_defaults_to_unpublished() {
        let meta: PageMetadata = serde_json::from_str("{}").unwrap();
        assert!(!meta.published);
        assert!(meta.title.is_none());
    }
}
