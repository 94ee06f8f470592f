//! Completion signal for vote writes.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::PostId;
use crate::ports::{Cache, PubSub};

/// Pub/sub channel carrying the id of every post whose votes changed.
pub const VOTES_CHANNEL: &str = "votes";

/// Cache key holding the serialized vote list of a post.
pub fn votes_cache_key(post_id: PostId) -> String {
    format!("votes:{post_id}")
}

/// Drops cached projections after a write and tells other observers to do the same.
///
/// Every eviction advances a generation shared by all clones. A reader that
/// loaded from the store under an older generation must not leave its list
/// in the cache.
#[derive(Clone)]
pub struct ProjectionInvalidator {
    cache: Arc<dyn Cache>,
    pubsub: Arc<dyn PubSub>,
    generation: Arc<AtomicU64>,
}

impl ProjectionInvalidator {
    pub fn new(cache: Arc<dyn Cache>, pubsub: Arc<dyn PubSub>) -> Self {
        Self {
            cache,
            pubsub,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub(crate) fn cache(&self) -> &Arc<dyn Cache> {
        &self.cache
    }

    /// Current eviction generation.
    pub(crate) fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Evict the cached list for `post_id` and publish a notification.
    ///
    /// Failures are logged only; the vote write has already been committed.
    pub async fn invalidate(&self, post_id: PostId) {
        self.evict(post_id).await;

        if let Err(e) = self
            .pubsub
            .publish(VOTES_CHANNEL, &post_id.to_string())
            .await
        {
            tracing::warn!(post_id, error = %e, "Failed to publish vote invalidation");
        }
    }

    /// Evict the local cache entry only. Used by notification subscribers.
    pub async fn evict(&self, post_id: PostId) {
        // Bumped before the delete so an in-flight reader sees it by the time
        // its own write-back could race the delete.
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Err(e) = self.cache.delete(&votes_cache_key(post_id)).await {
            tracing::warn!(post_id, error = %e, "Failed to evict cached votes");
        }
    }

    /// Parse the payload of a message received on [`VOTES_CHANNEL`].
    pub fn parse_notification(payload: &str) -> Option<PostId> {
        payload.trim().parse().ok()
    }
}
