//! Error taxonomy for the state engine.

use sg_model::PageId;

/// Error returned by commands and strict queries.
///
/// The engine only guards its own invariants (cycles, field variant
/// integrity); anything it does not check itself (sibling slug uniqueness in
/// particular) is expected to be validated by the caller before dispatch.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Referenced page or field does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
    /// Move would create a cycle or target the node itself.
    #[error("Invalid move: {id} cannot become a child of {parent}")]
    InvalidMove { id: PageId, parent: PageId },
    /// Requested field variant disagrees with the stored one.
    #[error("Type mismatch on field {field}: expected {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
    /// Slug already used by a live sibling.
    #[error("Duplicate slug among siblings: {slug}")]
    DuplicateSlug { slug: String },
}
