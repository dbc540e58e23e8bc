//! Command dispatch.
//!
//! [`SiteState::apply`] is the single entry point callers drive: it takes the
//! current snapshot by reference, applies one command, and yields the next
//! snapshot. Validation happens before any mutation, and the receiver is
//! never touched, so a rejected command leaves the caller's snapshot
//! byte-for-byte unchanged. There is no rollback because there is nothing
//! to roll back.

use crate::command::SiteCommand;
use crate::error::SiteError;
use crate::state::SiteState;

impl SiteState {
    /// Apply a command, yielding the next snapshot.
    ///
    /// Structural commands restore referential symmetry (both sides of every
    /// parent/child edit) before returning. Routing recomputation is *not*
    /// triggered here: the caller passes the committed snapshot to the
    /// routing resolver and dispatches the resulting delta as a separate
    /// `UpdateSiteRouting` command (the explicit two-phase contract).
    ///
    /// # Errors
    ///
    /// `InvalidMove` when a move would create a cycle or target the node
    /// itself; `DuplicateSlug` is never produced here (sibling slug
    /// uniqueness is a caller-side check).
    pub fn apply(&self, command: SiteCommand) -> Result<Self, SiteError> {
        tracing::debug!(command = command.name(), "apply command");

        let mut next = self.clone();
        match command {
            SiteCommand::AddPage { page_id, page } => next.add_page(&page_id, page.into()),
            SiteCommand::UpdatePage {
                page_id,
                slug,
                meta,
            } => next.update_page(&page_id, slug, meta),
            SiteCommand::DeletePage { page_id } => next.delete_page(&page_id),
            SiteCommand::MovePage {
                page_id,
                parent_page_id,
            } => next.move_page(&page_id, parent_page_id.as_ref())?,
            SiteCommand::RegisterPageField { page_id, field } => {
                next.register_field(&page_id, &field);
            }
            SiteCommand::UpdatePageField {
                page_id,
                field_details,
            } => next.update_field(&page_id, &field_details),
            SiteCommand::DeletePageField { page_id, field } => {
                next.delete_field(&page_id, &field);
            }
            SiteCommand::UnregisterPageField { page_id, field } => {
                next.unregister_field(&page_id, &field);
            }
            SiteCommand::UpdateSiteMeta { meta } => next.set_site_metadata(meta),
            SiteCommand::UpdateSiteRouting { dynamic_paths } => {
                next.routing_mut().apply_delta(&dynamic_paths);
            }
            SiteCommand::DiscardSiteChanges => next = Self::default(),
        }

        Ok(next)
    }
}
