//! Page-tree state engine for Sitegraph.
//!
//! This crate provides:
//! - [`SiteState`]: the normalized page graph, field store, and routing
//!   table as one immutable snapshot value
//! - [`SiteCommand`]: the discriminated edit surface a page-tree editor
//!   drives
//! - [`SiteState::apply`]: the dispatcher; one command in, the next
//!   snapshot out
//! - [`SiteStore`]: a snapshot holder that serializes dispatch for
//!   UI-driven use
//!
//! # Quick Start
//!
//! ```
//! use sg_model::PageId;
//! use sg_store::{PageCreate, SiteCommand, SiteState};
//!
//! # fn main() -> Result<(), sg_store::SiteError> {
//! let blog = PageId::from("SitePage /blog");
//! let state = SiteState::default().apply(SiteCommand::AddPage {
//!     page_id: blog.clone(),
//!     page: PageCreate {
//!         slug: "blog".to_owned(),
//!         template: Some("BlogPage".to_owned()),
//!         ..PageCreate::default()
//!     },
//! })?;
//!
//! assert_eq!(state.path_of(&blog).as_deref(), Some("/blog"));
//! # Ok(())
//! # }
//! ```
//!
//! # Two-phase routing updates
//!
//! Structural commands do not recompute routing as a side effect. The caller
//! observes the committed snapshot, runs the routing resolver over it
//! (`sg-routing`), and dispatches the resulting delta as an
//! [`SiteCommand::UpdateSiteRouting`] command. This keeps every state
//! transition synchronous and explicit.

mod command;
mod error;
mod fields;
mod reducer;
mod routing;
mod state;
mod store;
mod tree;

pub use command::{PageCreate, SiteCommand};
pub use error::SiteError;
pub use routing::{PathLookup, RoutingDelta, RoutingTable};
pub use state::SiteState;
pub use store::{SiteStore, StoreConfig};
