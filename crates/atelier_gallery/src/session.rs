//! Generation-tagged refreshes of a [`Gallery`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use atelier_core::Result;
use parking_lot::RwLock;
use tracing::{info, warn};

use crate::model::Gallery;
use crate::resolver::Resolver;

/// What happened to the result of a refresh.
#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    /// The result was committed and is now the current snapshot.
    Committed(Arc<Gallery>),
    /// A newer refresh or an invalidation started while this one was in
    /// flight; its result was discarded.
    Stale { generation: u64 },
}

impl RefreshOutcome {
    pub fn gallery(&self) -> Option<&Arc<Gallery>> {
        match self {
            RefreshOutcome::Committed(gallery) => Some(gallery),
            RefreshOutcome::Stale { .. } => None,
        }
    }
}

/// Holds the latest committed [`Gallery`].
///
/// Every refresh takes a new generation number. A result is only committed
/// while its generation is still the newest, so a slow refresh can never
/// overwrite data from a later one.
pub struct Session {
    resolver: Resolver,
    generation: AtomicU64,
    current: RwLock<Option<Arc<Gallery>>>,
}

impl Session {
    pub fn new(resolver: Resolver) -> Self {
        Self {
            resolver,
            generation: AtomicU64::new(0),
            current: RwLock::new(None),
        }
    }

    /// Generation of the most recent refresh or invalidation.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Latest committed gallery, if any.
    pub fn snapshot(&self) -> Option<Arc<Gallery>> {
        self.current.read().clone()
    }

    /// Supersede any in-flight refresh and drop the current snapshot.
    /// Call when the wallet reconnects or switches account.
    pub fn invalidate(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.current.write() = None;
        info!(generation, "session invalidated");
        generation
    }

    /// Resolve again and commit the result if nothing superseded it.
    ///
    /// Errors are returned only for the current generation; a stale
    /// failure is reported as [`RefreshOutcome::Stale`].
    pub async fn refresh(&self) -> Result<RefreshOutcome> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.resolver.resolve().await;

        if self.generation() != generation {
            warn!(generation, latest = self.generation(), "discarding stale resolution");
            return Ok(RefreshOutcome::Stale { generation });
        }
        let gallery = Arc::new(result?);

        let mut current = self.current.write();
        // Re-check under the lock so an invalidate between the check above
        // and the write cannot be overwritten.
        if self.generation() != generation {
            warn!(generation, latest = self.generation(), "discarding stale resolution");
            return Ok(RefreshOutcome::Stale { generation });
        }
        *current = Some(Arc::clone(&gallery));
        info!(generation, address = %gallery.address, "snapshot committed");
        Ok(RefreshOutcome::Committed(gallery))
    }
}
