//! Immutable site state snapshots.
//!
//! [`SiteState`] is the normalized page graph: a flat arena of nodes keyed by
//! id, the derived dynamic routing table, and optional site-wide metadata.
//! It is a pure value, never an ambient or static registry, so tests,
//! previews, and diffs can hold as many independent snapshots as they like.
//!
//! # Snapshot discipline
//!
//! Nodes are stored behind `Arc`, and every mutation goes through
//! copy-on-write at node granularity (`Arc::make_mut`): deriving the next
//! snapshot clones only the nodes a command touches, so two snapshots safely
//! share all unrelated subtrees.
//!
//! Deletion is a tagged status on the node, never removal from the arena;
//! every traversal filters on it explicitly, and a deleted node stays
//! addressable by id so stale references never dangle.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sg_model::{Field, PageId, PageNode, PageSummary, SiteMetadata, paths};

use crate::error::SiteError;
use crate::routing::{PathLookup, RoutingTable};

/// The page-tree state: node arena, routing table, site metadata.
///
/// Mutated only through [`apply`](SiteState::apply), which derives a fresh
/// snapshot and leaves the receiver untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteState {
    #[serde(default)]
    nodes: HashMap<PageId, Arc<PageNode>>,
    #[serde(default)]
    routing: RoutingTable,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    site_metadata: Option<SiteMetadata>,
}

impl SiteState {
    /// Get a node by id.
    ///
    /// Soft-deleted nodes are returned too: deletion excludes a node from
    /// traversal and routing, not from id addressing.
    #[must_use]
    pub fn get_node(&self, id: &PageId) -> Option<&PageNode> {
        self.nodes.get(id).map(Arc::as_ref)
    }

    /// Live children of a node, in sibling display order.
    ///
    /// Filters out soft-deleted children and ids not (yet) present in the
    /// arena. A deleted or unknown parent has no traversable children.
    #[must_use]
    pub fn list_children(&self, id: &PageId) -> Vec<&PageId> {
        let Some(node) = self.get_node(id) else {
            return Vec::new();
        };
        if node.deleted {
            return Vec::new();
        }

        node.children
            .iter()
            .filter(|child| self.get_node(child).is_some_and(|n| !n.deleted))
            .collect()
    }

    /// Live root nodes (no parent), sorted by id for deterministic output.
    #[must_use]
    pub fn root_ids(&self) -> Vec<&PageId> {
        let mut roots: Vec<&PageId> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.parent.is_none() && !node.deleted)
            .map(|(id, _)| id)
            .collect();
        roots.sort();
        roots
    }

    /// Number of nodes in the arena, soft-deleted ones included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Current request path of a node, derived from its ancestor slug chain.
    ///
    /// Returns `None` when the node is unknown, soft-deleted, sits under a
    /// deleted ancestor, or its parent chain is broken (dangling parent id or
    /// a malformed cycle).
    #[must_use]
    pub fn path_of(&self, id: &PageId) -> Option<String> {
        let mut segments: Vec<&str> = Vec::new();
        let mut visited: HashSet<&PageId> = HashSet::new();
        let mut current = Some(id);

        while let Some(cur) = current {
            if !visited.insert(cur) {
                tracing::warn!(id = %id, "Parent chain contains a cycle");
                return None;
            }
            let node = self.get_node(cur)?;
            if node.deleted {
                return None;
            }
            segments.push(node.slug.as_str());
            current = node.parent.as_ref();
        }

        segments.reverse();
        Some(paths::join_path(segments))
    }

    /// Look up which page serves a request path.
    ///
    /// Answers from the dynamic routing table; [`PathLookup::Static`] means
    /// the caller should fall back to static slug resolution.
    #[must_use]
    pub fn resolve_path(&self, path: &str) -> PathLookup {
        self.routing.resolve(path)
    }

    /// Best-known request path for a node: its dynamic entry if one exists,
    /// otherwise the path baked into the last published build.
    #[must_use]
    pub fn route_to(&self, id: &PageId) -> Option<String> {
        if let Some(path) = self.routing.path_for(id) {
            return Some(path.to_owned());
        }
        self.get_node(id)?.static_path.clone()
    }

    /// Explorer-style projection of a live node.
    ///
    /// Collapses the metadata fallbacks the page explorer expects: slug falls
    /// back to the baked path's first segment, then `"root"`; a node without
    /// a template is `locked`.
    #[must_use]
    pub fn summary(&self, id: &PageId) -> Option<PageSummary> {
        let node = self.get_node(id)?;
        if node.deleted {
            return None;
        }

        let meta = &node.page_metadata;
        let slug = if node.slug.is_empty() {
            node.static_path
                .as_deref()
                .and_then(|path| path.split('/').nth(1))
                .filter(|segment| !segment.is_empty())
                .map_or_else(|| "root".to_owned(), str::to_owned)
        } else {
            node.slug.clone()
        };
        let title = meta.title.clone().unwrap_or_else(|| slug.clone());

        Some(PageSummary {
            slug,
            title,
            description: meta.description.clone().unwrap_or_default(),
            image: meta.image.clone(),
            published: meta.published,
            last_published: meta.date_published.clone(),
            locked: node.is_locked(),
        })
    }

    /// Whether a live sibling under `parent` already uses `slug`.
    ///
    /// The engine never enforces sibling slug uniqueness itself; this is the
    /// pre-dispatch check for callers (and for the opt-in store validation).
    #[must_use]
    pub fn slug_in_use(
        &self,
        parent: Option<&PageId>,
        slug: &str,
        exclude: Option<&PageId>,
    ) -> bool {
        let siblings = match parent {
            Some(parent) => self.list_children(parent),
            None => self.root_ids(),
        };

        siblings
            .into_iter()
            .filter(|&sibling| exclude != Some(sibling))
            .filter_map(|sibling| self.get_node(sibling))
            .any(|node| node.slug == slug)
    }

    /// Strictly-typed read of a plain field's content.
    ///
    /// # Errors
    ///
    /// `NotFound` when the page or field is absent; `TypeMismatch` when the
    /// stored field is a blocks field.
    pub fn plain_content(&self, id: &PageId, field_name: &str) -> Result<&Value, SiteError> {
        match self.field(id, field_name)? {
            Field::PlainField(plain) => Ok(&plain.content),
            Field::BlocksField(_) => Err(SiteError::TypeMismatch {
                field: field_name.to_owned(),
                expected: "PlainField",
                found: "BlocksField",
            }),
        }
    }

    /// Strictly-typed read of a block sub-field value.
    ///
    /// # Errors
    ///
    /// `NotFound` when the page, field, slot (live), or sub-field is absent;
    /// `TypeMismatch` when the stored field is a plain field.
    pub fn block_value(
        &self,
        id: &PageId,
        field_name: &str,
        position: u32,
        block_field_name: &str,
    ) -> Result<&Value, SiteError> {
        let blocks = match self.field(id, field_name)? {
            Field::BlocksField(blocks) => blocks,
            Field::PlainField(_) => {
                return Err(SiteError::TypeMismatch {
                    field: field_name.to_owned(),
                    expected: "BlocksField",
                    found: "PlainField",
                });
            }
        };

        let block = blocks
            .blocks
            .get(&position)
            .filter(|block| !block.deleted)
            .ok_or_else(|| SiteError::NotFound(format!("block {position} in {field_name}")))?;

        block.fields.get(block_field_name).ok_or_else(|| {
            SiteError::NotFound(format!("sub-field {block_field_name} in block {position}"))
        })
    }

    /// The dynamic routing table.
    #[must_use]
    pub fn routing(&self) -> &RoutingTable {
        &self.routing
    }

    /// Site-wide metadata, if set.
    #[must_use]
    pub fn site_metadata(&self) -> Option<&SiteMetadata> {
        self.site_metadata.as_ref()
    }

    fn field(&self, id: &PageId, field_name: &str) -> Result<&Field, SiteError> {
        let node = self
            .get_node(id)
            .ok_or_else(|| SiteError::NotFound(format!("page {id}")))?;
        node.fields
            .get(field_name)
            .ok_or_else(|| SiteError::NotFound(format!("field {field_name} on {id}")))
    }

    // ------------------------------------------------------------------
    // Registry internals (crate-private, used by the reducer)
    // ------------------------------------------------------------------

    /// Mutable access to a node, materializing a stub if absent.
    ///
    /// This is the creation-on-patch contract: structural commands may
    /// reference an id before it is independently created, and the registry
    /// tolerates that construction order.
    pub(crate) fn node_mut(&mut self, id: &PageId) -> &mut PageNode {
        Arc::make_mut(
            self.nodes
                .entry(id.clone())
                .or_insert_with(|| Arc::new(PageNode::stub())),
        )
    }

    /// Mutable access to an existing node; never creates.
    pub(crate) fn existing_node_mut(&mut self, id: &PageId) -> Option<&mut PageNode> {
        self.nodes.get_mut(id).map(Arc::make_mut)
    }

    /// Insert (or fully replace) a node.
    pub(crate) fn insert_node(&mut self, id: PageId, node: PageNode) {
        self.nodes.insert(id, Arc::new(node));
    }

    pub(crate) fn routing_mut(&mut self) -> &mut RoutingTable {
        &mut self.routing
    }

    pub(crate) fn set_site_metadata(&mut self, meta: SiteMetadata) {
        self.site_metadata = Some(meta);
    }

    /// Shared handle to a node, for snapshot-sharing assertions.
    #[cfg(test)]
    pub(crate) fn node_arc(&self, id: &PageId) -> Option<&Arc<PageNode>> {
        self.nodes.get(id)
    }
}
