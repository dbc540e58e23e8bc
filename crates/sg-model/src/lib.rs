//! Core data model for Sitegraph.
//!
//! Pure types shared by the state engine and the routing resolver:
//! page identifiers, page nodes with their metadata, the structured content
//! field variants, and the slug/path utilities. No I/O and no mutable state
//! live here.

mod field;
mod id;
mod node;
pub mod paths;

pub use field::{
    Block, BlockSelector, BlockSpec, BlocksField, Field, FieldSelector, FieldSpec, FieldWrite,
    PlainField,
};
pub use id::PageId;
pub use node::{PageMetadata, PageNode, PageSummary, SiteMetadata};
