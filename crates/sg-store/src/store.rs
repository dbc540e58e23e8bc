//! Snapshot holder for command dispatch.
//!
//! [`SiteStore`] owns the current [`SiteState`] snapshot and serializes
//! command application: commands run to completion one at a time against one
//! versioned snapshot, and readers hold `Arc<SiteState>` handles that stay
//! valid (and immutable) while newer snapshots are installed.
//!
//! # Thread Safety
//!
//! - `snapshot()` returns `Arc<SiteState>` with minimal locking (just an Arc
//!   clone)
//! - `dispatch()` holds a mutex for the apply-and-swap, so two structural
//!   mutations never interleave

use std::sync::{Arc, Mutex, RwLock};

use sg_model::PageId;

use crate::command::SiteCommand;
use crate::error::SiteError;
use crate::state::SiteState;

/// Configuration for [`SiteStore`].
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Kind namespace for generated page ids (`"<kind> /<uuid>"`).
    pub page_kind: String,
    /// Reject commands that would give two live siblings the same slug.
    ///
    /// Off by default: the engine itself never enforces sibling slug
    /// uniqueness, matching the documented caller-side contract.
    pub reject_duplicate_slugs: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            page_kind: "SitePage".to_owned(),
            reject_duplicate_slugs: false,
        }
    }
}

/// Owns the current snapshot and serializes command dispatch.
pub struct SiteStore {
    config: StoreConfig,
    /// Serializes dispatch so commands apply one at a time.
    dispatch_lock: Mutex<()>,
    /// Current snapshot (atomically swappable).
    current: RwLock<Arc<SiteState>>,
}

impl SiteStore {
    /// Create a store holding the initial empty state.
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            dispatch_lock: Mutex::new(()),
            current: RwLock::new(Arc::new(SiteState::default())),
        }
    }

    /// Create a store seeded with an existing snapshot (e.g. hydrated from a
    /// published build).
    #[must_use]
    pub fn with_state(config: StoreConfig, state: SiteState) -> Self {
        Self {
            config,
            dispatch_lock: Mutex::new(()),
            current: RwLock::new(Arc::new(state)),
        }
    }

    /// Current snapshot.
    ///
    /// The returned `Arc<SiteState>` is internally consistent and can be
    /// read without holding any lock; it is unaffected by later dispatches.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn snapshot(&self) -> Arc<SiteState> {
        self.current.read().unwrap().clone()
    }

    /// Generate a fresh page id in the configured namespace.
    #[must_use]
    pub fn generate_page_id(&self) -> PageId {
        PageId::generate(&self.config.page_kind)
    }

    /// Apply a command against the current snapshot and install the result.
    ///
    /// Returns the committed snapshot so the caller can run the follow-up
    /// routing resolution against exactly the state it observed.
    ///
    /// # Errors
    ///
    /// Propagates [`SiteError`] from validation or application; the current
    /// snapshot is left unchanged on error.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    pub fn dispatch(&self, command: SiteCommand) -> Result<Arc<SiteState>, SiteError> {
        let _guard = self.dispatch_lock.lock().unwrap();

        let current = self.snapshot();
        if self.config.reject_duplicate_slugs {
            Self::check_slugs(&current, &command)?;
        }

        let next = Arc::new(current.apply(command)?);
        *self.current.write().unwrap() = Arc::clone(&next);
        Ok(next)
    }

    /// Opt-in sibling slug validation, run before apply.
    fn check_slugs(state: &SiteState, command: &SiteCommand) -> Result<(), SiteError> {
        match command {
            SiteCommand::AddPage { page_id, page } => {
                if state.slug_in_use(page.parent.as_ref(), &page.slug, Some(page_id)) {
                    return Err(SiteError::DuplicateSlug {
                        slug: page.slug.clone(),
                    });
                }
            }
            SiteCommand::UpdatePage {
                page_id,
                slug: Some(slug),
                ..
            } => {
                let parent = state.get_node(page_id).and_then(|node| node.parent.clone());
                if state.slug_in_use(parent.as_ref(), slug, Some(page_id)) {
                    return Err(SiteError::DuplicateSlug { slug: slug.clone() });
                }
            }
            SiteCommand::MovePage {
                page_id,
                parent_page_id,
            } => {
                let Some(node) = state.get_node(page_id) else {
                    return Ok(());
                };
                if node.parent.as_ref() != parent_page_id.as_ref()
                    && state.slug_in_use(parent_page_id.as_ref(), &node.slug, Some(page_id))
                {
                    return Err(SiteError::DuplicateSlug {
                        slug: node.slug.clone(),
                    });
                }
            }
            _ => {}
        }
        Ok(())
    }
}
