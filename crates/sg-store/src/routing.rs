//! Dynamic routing table.
//!
//! The table is a derived, cached projection: authoritative page identity
//! lives in the node arena, and the table only answers "which page serves
//! this request path" in O(1) for paths that cannot be derived from static
//! slug concatenation. Entries for an id are always replaced wholesale,
//! never merged per path.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use sg_model::PageId;

/// Full-replacement routing update for a set of affected ids.
///
/// Produced by the routing resolver after a structural change and dispatched
/// as an `updateSiteRouting` command. Applying the delta first purges every
/// existing entry whose target id is affected, then installs the new entries,
/// so stale paths pointing at a moved or renamed node cannot linger.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingDelta {
    /// Ids whose routing entries must be replaced.
    #[serde(default)]
    pub affected_ids: Vec<PageId>,
    /// New entries: request path -> page id.
    #[serde(default)]
    pub dynamic_paths: HashMap<String, PageId>,
}

/// Result of a path lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathLookup {
    /// The path is served by a dynamic routing entry.
    Dynamic(PageId),
    /// No dynamic entry; the caller falls back to static slug resolution.
    Static,
}

/// Mapping from request path to page id for dynamic paths.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingTable {
    #[serde(default)]
    dynamic_paths: HashMap<String, PageId>,
}

impl RoutingTable {
    /// Look up the page serving a request path.
    #[must_use]
    pub fn resolve(&self, path: &str) -> PathLookup {
        match self.dynamic_paths.get(path) {
            Some(id) => PathLookup::Dynamic(id.clone()),
            None => PathLookup::Static,
        }
    }

    /// Reverse lookup: the dynamic path registered for an id, if any.
    ///
    /// When several paths target the same id, the lexicographically smallest
    /// one is returned so the answer is deterministic.
    #[must_use]
    pub fn path_for(&self, id: &PageId) -> Option<&str> {
        self.dynamic_paths
            .iter()
            .filter(|(_, target)| *target == id)
            .map(|(path, _)| path.as_str())
            .min()
    }

    /// All entries, unordered.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PageId)> {
        self.dynamic_paths
            .iter()
            .map(|(path, id)| (path.as_str(), id))
    }

    /// Number of dynamic entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dynamic_paths.len()
    }

    /// True when no dynamic entries exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dynamic_paths.is_empty()
    }

    /// Apply a full-replacement delta.
    ///
    /// Purges every entry whose *value* is in `affected_ids`, regardless of
    /// the entry's key, before installing the new entries.
    pub(crate) fn apply_delta(&mut self, delta: &RoutingDelta) {
        let affected: HashSet<&PageId> = delta.affected_ids.iter().collect();

        self.dynamic_paths.retain(|_, id| !affected.contains(id));

        for (path, id) in &delta.dynamic_paths {
            if let Some(previous) = self.dynamic_paths.get(path)
                && previous != id
            {
                tracing::warn!(
                    path = %path,
                    previous = %previous,
                    next = %id,
                    "Dynamic path collision: entry re-targeted"
                );
            }
            self.dynamic_paths.insert(path.clone(), id.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta(affected: &[&str], entries: &[(&str, &str)]) -> RoutingDelta {
        RoutingDelta {
            affected_ids: affected.iter().map(|id| PageId::from(*id)).collect(),
            dynamic_paths: entries
                .iter()
                .map(|(path, id)| ((*path).to_owned(), PageId::from(*id)))
                .collect(),
        }
    }

    #[test]
    fn test_apply_delta_installs_entries() {
        let mut table = RoutingTable::default();

        table.apply_delta(&delta(&["P1"], &[("/a", "P1")]));

        assert_eq!(table.resolve("/a"), PathLookup::Dynamic(PageId::from("P1")));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_apply_delta_purges_by_value_not_key() {
        let mut table = RoutingTable::default();
        table.apply_delta(&delta(&["P1"], &[("/old/path", "P1")]));

        // New entry under a completely different key; the old one must go.
        table.apply_delta(&delta(&["P1"], &[("/a", "P1")]));

        assert_eq!(table.resolve("/old/path"), PathLookup::Static);
        assert_eq!(table.resolve("/a"), PathLookup::Dynamic(PageId::from("P1")));
    }

    #[test]
    fn test_apply_delta_with_empty_paths_clears_id() {
        let mut table = RoutingTable::default();
        table.apply_delta(&delta(&["P1"], &[("/a", "P1")]));

        table.apply_delta(&delta(&["P1"], &[]));

        assert_eq!(table.resolve("/a"), PathLookup::Static);
        assert!(table.is_empty());
    }

    #[test]
    fn test_apply_delta_leaves_unaffected_ids_alone() {
        let mut table = RoutingTable::default();
        table.apply_delta(&delta(&["P1"], &[("/a", "P1")]));
        table.apply_delta(&delta(&["P2"], &[("/b", "P2")]));

        table.apply_delta(&delta(&["P1"], &[("/a2", "P1")]));

        assert_eq!(table.resolve("/b"), PathLookup::Dynamic(PageId::from("P2")));
        assert_eq!(table.resolve("/a"), PathLookup::Static);
        assert_eq!(
            table.resolve("/a2"),
            PathLookup::Dynamic(PageId::from("P1"))
        );
    }

    #[test]
    fn test_path_for_returns_smallest_path() {
        let mut table = RoutingTable::default();
        table.apply_delta(&delta(&["P1"], &[("/b", "P1"), ("/a", "P1")]));

        assert_eq!(table.path_for(&PageId::from("P1")), Some("/a"));
        assert_eq!(table.path_for(&PageId::from("P9")), None);
    }
}
