//! Dynamic-path resolver for Sitegraph.
//!
//! Derives, from a committed [`SiteState`] snapshot, the routing entries for
//! the subtree a structural change touched. A path is *dynamic* when the
//! static routing of the published build cannot serve it: the node was
//! created in the editor (no baked path), or a move or rename made its baked
//! path stale. Everything else resolves by static slug concatenation and
//! needs no table entry.
//!
//! # Two-phase contract
//!
//! The resolver never mutates state. The caller sequences the two commands
//! explicitly:
//!
//! ```
//! use sg_model::PageId;
//! use sg_store::{PageCreate, SiteCommand, SiteState};
//!
//! # fn main() -> Result<(), sg_store::SiteError> {
//! let blog = PageId::from("SitePage /blog");
//!
//! // Phase one: the structural command commits.
//! let state = SiteState::default().apply(SiteCommand::AddPage {
//!     page_id: blog.clone(),
//!     page: PageCreate {
//!         slug: "blog".to_owned(),
//!         template: Some("BlogPage".to_owned()),
//!         ..PageCreate::default()
//!     },
//! })?;
//!
//! // Phase two: resolve against the observed snapshot, then dispatch.
//! let delta = sg_routing::resolve_dynamic_paths(&state, &blog);
//! let state = state.apply(SiteCommand::UpdateSiteRouting {
//!     dynamic_paths: delta,
//! })?;
//!
//! assert_eq!(state.route_to(&blog).as_deref(), Some("/blog"));
//! # Ok(())
//! # }
//! ```

use sg_model::PageId;
use sg_store::{RoutingDelta, SiteState};

/// Recompute dynamic-path entries for the subtree rooted at `affected_id`.
///
/// Every id in the subtree is reported as affected (soft-deleted nodes and
/// nodes that end up needing no entry included), so that applying the delta
/// purges all of their stale entries. New entries are emitted only for nodes
/// that are live (no deleted ancestor), resolvable (a template is set), and
/// whose current slug-derived path is not already the baked static one.
#[must_use]
pub fn resolve_dynamic_paths(state: &SiteState, affected_id: &PageId) -> RoutingDelta {
    let mut delta = RoutingDelta::default();
    visit(state, affected_id, &mut delta);

    tracing::debug!(
        affected = delta.affected_ids.len(),
        paths = delta.dynamic_paths.len(),
        "resolved dynamic paths"
    );

    delta
}

fn visit(state: &SiteState, id: &PageId, delta: &mut RoutingDelta) {
    // Malformed child graphs could list an id twice; visit each node once.
    if delta.affected_ids.contains(id) {
        return;
    }
    delta.affected_ids.push(id.clone());

    let Some(node) = state.get_node(id) else {
        return;
    };

    // `path_of` is `None` for deleted nodes and under deleted ancestors, so
    // those contribute no entries while still being purged as affected.
    if !node.is_locked()
        && let Some(path) = state.path_of(id)
        && node.static_path.as_deref() != Some(path.as_str())
    {
        delta.dynamic_paths.insert(path, id.clone());
    }

    for child in &node.children {
        visit(state, child, delta);
    }
}
