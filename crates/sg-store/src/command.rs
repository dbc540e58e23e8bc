//! The discriminated command surface.
//!
//! Every edit the page-tree editor drives is one [`SiteCommand`] variant,
//! applied atomically by [`SiteState::apply`](crate::SiteState::apply). The
//! serde tag mirrors the wire action names consumed by UI layers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sg_model::{
    Field, FieldSelector, FieldSpec, FieldWrite, PageId, PageMetadata, PageNode, SiteMetadata,
};

use crate::routing::RoutingDelta;

/// Payload of an add-page command.
///
/// The full node shape minus engine-owned attributes: a freshly added page
/// never carries a baked static path and is never born deleted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageCreate {
    #[serde(default)]
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<PageId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PageId>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub fields: HashMap<String, Field>,
    #[serde(default)]
    pub page_metadata: PageMetadata,
}

impl From<PageCreate> for PageNode {
    fn from(page: PageCreate) -> Self {
        Self {
            slug: page.slug,
            template: page.template,
            parent: page.parent,
            children: page.children,
            fields: page.fields,
            page_metadata: page.page_metadata,
            static_path: None,
            deleted: false,
        }
    }
}

/// A single edit request processed by the dispatcher.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SiteCommand {
    /// Insert a node and link it under its parent.
    #[serde(rename_all = "camelCase")]
    AddPage { page_id: PageId, page: PageCreate },
    /// Overwrite slug and/or replace the whole metadata record.
    #[serde(rename_all = "camelCase")]
    UpdatePage {
        page_id: PageId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        slug: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        meta: Option<PageMetadata>,
    },
    /// Soft-delete a node.
    #[serde(rename_all = "camelCase")]
    DeletePage { page_id: PageId },
    /// Reparent a node; `None` detaches it to become a root.
    #[serde(rename_all = "camelCase")]
    MovePage {
        page_id: PageId,
        parent_page_id: Option<PageId>,
    },
    /// Seed field/block structure without writing content.
    #[serde(rename_all = "camelCase")]
    RegisterPageField { page_id: PageId, field: FieldSpec },
    /// Write field/block content.
    #[serde(rename_all = "camelCase")]
    UpdatePageField {
        page_id: PageId,
        field_details: FieldWrite,
    },
    /// Soft-delete a block slot.
    #[serde(rename_all = "camelCase")]
    DeletePageField {
        page_id: PageId,
        field: FieldSelector,
    },
    /// Hard-remove a field, block slot, or block sub-field.
    #[serde(rename_all = "camelCase")]
    UnregisterPageField {
        page_id: PageId,
        field: FieldSelector,
    },
    /// Replace the site-wide metadata record.
    #[serde(rename_all = "camelCase")]
    UpdateSiteMeta { meta: SiteMetadata },
    /// Replace routing entries for the affected ids.
    #[serde(rename_all = "camelCase")]
    UpdateSiteRouting { dynamic_paths: RoutingDelta },
    /// Reset to the initial empty state.
    DiscardSiteChanges,
}

impl SiteCommand {
    /// Wire name of the command, for diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddPage { .. } => "addPage",
            Self::UpdatePage { .. } => "updatePage",
            Self::DeletePage { .. } => "deletePage",
            Self::MovePage { .. } => "movePage",
            Self::RegisterPageField { .. } => "registerPageField",
            Self::UpdatePageField { .. } => "updatePageField",
            Self::DeletePageField { .. } => "deletePageField",
            Self::UnregisterPageField { .. } => "unregisterPageField",
            Self::UpdateSiteMeta { .. } => "updateSiteMeta",
            Self::UpdateSiteRouting { .. } => "updateSiteRouting",
            Self::DiscardSiteChanges => "discardSiteChanges",
        }
    }
}
