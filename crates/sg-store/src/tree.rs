//! Structural tree operations.
//!
//! Add, delete, move, and update keep the parent/child links referentially
//! symmetric: both sides of any link edit are applied before the command
//! returns, so an externally observed snapshot never shows a child whose
//! parent disagrees.
//!
//! The child-list duplicate guard compares id *values*: an id already listed
//! is never appended twice.

use sg_model::{PageId, PageMetadata, PageNode};

use crate::error::SiteError;
use crate::state::SiteState;

impl SiteState {
    /// Insert a node and link it under its parent.
    ///
    /// The parent is materialized as a stub if it does not exist yet. When
    /// the id itself was already materialized as a stub (a child referenced
    /// it first), the stub's accumulated child links are merged into the
    /// incoming node rather than dropped.
    pub(crate) fn add_page(&mut self, id: &PageId, mut node: PageNode) {
        let parent_id = node.parent.clone();

        if let Some(existing) = self.get_node(id) {
            for child in existing.children.clone() {
                if !node.children.contains(&child) {
                    node.children.push(child);
                }
            }
        }
        self.insert_node(id.clone(), node);

        if let Some(parent_id) = parent_id {
            let parent = self.node_mut(&parent_id);
            if !parent.children.contains(id) {
                parent.children.push(id.clone());
            }
        }
    }

    /// Soft-delete a node.
    ///
    /// The id deliberately stays listed in its parent's children so history
    /// and undo remain possible; traversal filters on the flag instead.
    pub(crate) fn delete_page(&mut self, id: &PageId) {
        self.node_mut(id).deleted = true;
    }

    /// Reparent a node; `None` detaches it to become a root.
    ///
    /// A move to the current parent is a no-op. A move that would make the
    /// node its own ancestor is rejected before any mutation.
    ///
    /// # Errors
    ///
    /// `InvalidMove` when the target parent is the node itself or one of its
    /// descendants.
    pub(crate) fn move_page(
        &mut self,
        id: &PageId,
        new_parent: Option<&PageId>,
    ) -> Result<(), SiteError> {
        let old_parent = self.get_node(id).and_then(|node| node.parent.clone());

        if old_parent.as_ref() == new_parent {
            return Ok(());
        }

        if let Some(new_parent) = new_parent
            && (new_parent == id || self.is_ancestor(id, new_parent))
        {
            return Err(SiteError::InvalidMove {
                id: id.clone(),
                parent: new_parent.clone(),
            });
        }

        self.node_mut(id).parent = new_parent.cloned();

        if let Some(new_parent) = new_parent {
            let parent = self.node_mut(new_parent);
            if !parent.children.contains(id) {
                parent.children.push(id.clone());
            }
        }

        if let Some(old_parent) = old_parent
            && let Some(parent) = self.existing_node_mut(&old_parent)
        {
            parent.children.retain(|child| child != id);
        }

        Ok(())
    }

    /// Overwrite slug and/or replace the whole metadata record.
    ///
    /// Metadata replacement is wholesale, not per key; callers wanting a
    /// partial update pre-merge with the previous record themselves.
    pub(crate) fn update_page(
        &mut self,
        id: &PageId,
        slug: Option<String>,
        meta: Option<PageMetadata>,
    ) {
        let node = self.node_mut(id);
        if let Some(slug) = slug {
            node.slug = slug;
        }
        if let Some(meta) = meta {
            node.page_metadata = meta;
        }
    }

    /// Whether `ancestor` appears on `node`'s parent chain.
    ///
    /// Tolerates malformed chains (dangling ids, cycles) by stopping at the
    /// first repeat instead of looping.
    fn is_ancestor(&self, ancestor: &PageId, node: &PageId) -> bool {
        let mut visited = std::collections::HashSet::new();
        let mut current = self.get_node(node).and_then(|n| n.parent.as_ref());

        while let Some(cur) = current {
            if cur == ancestor {
                return true;
            }
            if !visited.insert(cur) {
                tracing::warn!(id = %node, "Parent chain contains a cycle");
                return false;
            }
            current = self.get_node(cur).and_then(|n| n.parent.as_ref());
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> PageId {
        PageId::from(raw)
    }

    fn page(slug: &str, parent: Option<&str>) -> PageNode {
        PageNode {
            slug: slug.to_owned(),
            template: Some("Page".to_owned()),
            parent: parent.map(PageId::from),
            ..PageNode::default()
        }
    }

    #[test]
    fn test_add_page_links_parent_and_child() {
        let mut state = SiteState::default();
        state.add_page(&id("P1"), page("blog", None));
        state.add_page(&id("P2"), page("post-1", Some("P1")));

        assert_eq!(state.get_node(&id("P1")).unwrap().children, vec![id("P2")]);
        assert_eq!(
            state.get_node(&id("P2")).unwrap().parent.as_ref(),
            Some(&id("P1"))
        );
    }

    #[test]
    fn test_add_page_before_parent_exists() {
        let mut state = SiteState::default();
        // Parent referenced before it is independently created.
        state.add_page(&id("P2"), page("post-1", Some("P1")));

        let parent = state.get_node(&id("P1")).unwrap();
        assert_eq!(parent.children, vec![id("P2")]);
        assert!(parent.is_locked());

        // The later add fills the stub in, keeping the accumulated link.
        state.add_page(&id("P1"), page("blog", None));
        state.add_page(&id("P3"), page("post-2", Some("P1")));
        let parent = state.get_node(&id("P1")).unwrap();
        assert_eq!(parent.slug, "blog");
        assert_eq!(parent.children, vec![id("P2"), id("P3")]);
    }

    #[test]
    fn test_add_page_duplicate_child_guard_is_by_value() {
        let mut state = SiteState::default();
        state.add_page(&id("P1"), page("blog", None));
        state.add_page(&id("P2"), page("post-1", Some("P1")));
        // Same id again, freshly constructed: must not be appended twice.
        state.add_page(&id("P2"), page("post-1", Some("P1")));

        assert_eq!(state.get_node(&id("P1")).unwrap().children, vec![id("P2")]);
    }

    #[test]
    fn test_delete_page_sets_flag_and_keeps_listing() {
        let mut state = SiteState::default();
        state.add_page(&id("P1"), page("blog", None));
        state.add_page(&id("P2"), page("post-1", Some("P1")));

        state.delete_page(&id("P2"));

        assert!(state.get_node(&id("P2")).unwrap().deleted);
        // Soft delete does not unlink.
        assert_eq!(state.get_node(&id("P1")).unwrap().children, vec![id("P2")]);
        assert!(state.list_children(&id("P1")).is_empty());
    }

    #[test]
    fn test_move_page_reparents_once() {
        let mut state = SiteState::default();
        state.add_page(&id("P1"), page("blog", None));
        state.add_page(&id("P2"), page("shop", None));
        state.add_page(&id("P3"), page("post-1", Some("P1")));

        state.move_page(&id("P3"), Some(&id("P2"))).unwrap();

        // The id appears in exactly one parent's children.
        assert!(state.get_node(&id("P1")).unwrap().children.is_empty());
        assert_eq!(state.get_node(&id("P2")).unwrap().children, vec![id("P3")]);
        assert_eq!(
            state.get_node(&id("P3")).unwrap().parent.as_ref(),
            Some(&id("P2"))
        );
    }

    #[test]
    fn test_move_page_to_null_detaches() {
        let mut state = SiteState::default();
        state.add_page(&id("P1"), page("blog", None));
        state.add_page(&id("P2"), page("post-1", Some("P1")));

        state.move_page(&id("P2"), None).unwrap();

        assert!(state.get_node(&id("P1")).unwrap().children.is_empty());
        assert!(state.get_node(&id("P2")).unwrap().parent.is_none());
        assert!(state.root_ids().contains(&&id("P2")));
    }

    #[test]
    fn test_move_page_to_current_parent_is_noop() {
        let mut state = SiteState::default();
        state.add_page(&id("P1"), page("blog", None));
        state.add_page(&id("P2"), page("post-1", Some("P1")));
        let before = state.clone();

        state.move_page(&id("P2"), Some(&id("P1"))).unwrap();

        assert_eq!(state, before);
    }

    #[test]
    fn test_move_page_rejects_self_parent() {
        let mut state = SiteState::default();
        state.add_page(&id("P1"), page("blog", None));
        let before = state.clone();

        let err = state.move_page(&id("P1"), Some(&id("P1"))).unwrap_err();

        assert!(matches!(err, SiteError::InvalidMove { .. }));
        assert_eq!(state, before);
    }

    #[test]
    fn test_move_page_rejects_cycle() {
        let mut state = SiteState::default();
        state.add_page(&id("P1"), page("blog", None));
        state.add_page(&id("P2"), page("2024", Some("P1")));
        state.add_page(&id("P3"), page("post-1", Some("P2")));
        let before = state.clone();

        // P1 under its own grandchild.
        let err = state.move_page(&id("P1"), Some(&id("P3"))).unwrap_err();

        assert!(matches!(err, SiteError::InvalidMove { .. }));
        assert_eq!(state, before);
    }

    #[test]
    fn test_move_sequence_keeps_tree_consistent() {
        let mut state = SiteState::default();
        state.add_page(&id("P1"), page("a", None));
        state.add_page(&id("P2"), page("b", None));
        state.add_page(&id("P3"), page("c", Some("P1")));

        state.move_page(&id("P3"), Some(&id("P2"))).unwrap();
        state.move_page(&id("P3"), Some(&id("P1"))).unwrap();
        state.move_page(&id("P3"), None).unwrap();

        // After shuffling, referential symmetry holds everywhere.
        for page_id in [id("P1"), id("P2")] {
            for child in &state.get_node(&page_id).unwrap().children {
                assert_eq!(
                    state.get_node(child).unwrap().parent.as_ref(),
                    Some(&page_id)
                );
            }
        }
        assert!(state.get_node(&id("P3")).unwrap().parent.is_none());
        assert!(state.get_node(&id("P1")).unwrap().children.is_empty());
        assert!(state.get_node(&id("P2")).unwrap().children.is_empty());
    }

    #[test]
    fn test_update_page_overwrites_slug() {
        let mut state = SiteState::default();
        state.add_page(&id("P1"), page("blog", None));

        state.update_page(&id("P1"), Some("journal".to_owned()), None);

        assert_eq!(state.get_node(&id("P1")).unwrap().slug, "journal");
    }

    #[test]
    fn test_update_page_replaces_metadata_wholesale() {
        let mut state = SiteState::default();
        let mut node = page("blog", None);
        node.page_metadata = PageMetadata {
            title: Some("Blog".to_owned()),
            description: Some("Posts".to_owned()),
            ..PageMetadata::default()
        };
        state.add_page(&id("P1"), node);

        state.update_page(
            &id("P1"),
            None,
            Some(PageMetadata {
                title: Some("Journal".to_owned()),
                ..PageMetadata::default()
            }),
        );

        let meta = &state.get_node(&id("P1")).unwrap().page_metadata;
        assert_eq!(meta.title.as_deref(), Some("Journal"));
        // Full replacement: the old description is gone.
        assert!(meta.description.is_none());
    }
}
