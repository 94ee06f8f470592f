//! Read path: vote lists and derived tallies.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::{PostId, UserId, Vote, VoteTally};
use crate::error::VoteError;
use crate::ports::VoteRepository;

use super::invalidation::{ProjectionInvalidator, votes_cache_key};

/// Fetches the votes of a post, memoising the raw list in the cache.
///
/// Shares the invalidator of the [`VoteReconciler`](super::VoteReconciler)
/// so a list read before a write is never cached after it.
pub struct VoteProjector {
    repo: Arc<dyn VoteRepository>,
    invalidator: ProjectionInvalidator,
    ttl: Option<Duration>,
}

impl VoteProjector {
    pub fn new(
        repo: Arc<dyn VoteRepository>,
        invalidator: ProjectionInvalidator,
        ttl: Option<Duration>,
    ) -> Self {
        Self {
            repo,
            invalidator,
            ttl,
        }
    }

    /// All votes on `post_id`, unordered.
    pub async fn list(&self, post_id: PostId) -> Result<Vec<Vote>, VoteError> {
        let key = votes_cache_key(post_id);

        if let Some(raw) = self.invalidator.cache().get(&key).await {
            match serde_json::from_str::<Vec<Vote>>(&raw) {
                Ok(votes) => {
                    tracing::debug!(post_id, count = votes.len(), "Votes served from cache");
                    return Ok(votes);
                }
                Err(e) => {
                    tracing::warn!(post_id, error = %e, "Discarding unreadable cached votes");
                }
            }
        }

        let generation = self.invalidator.generation();
        let votes = self.repo.list_for_post(post_id).await?;
        tracing::debug!(post_id, count = votes.len(), "Votes loaded from store");

        self.write_back(post_id, &key, &votes, generation).await;
        Ok(votes)
    }

    /// Cache `votes` unless an eviction happened since they were read.
    async fn write_back(&self, post_id: PostId, key: &str, votes: &[Vote], generation: u64) {
        if self.invalidator.generation() != generation {
            tracing::debug!(post_id, "Votes changed during read, not caching");
            return;
        }

        let raw = match serde_json::to_string(votes) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(post_id, error = %e, "Failed to serialize votes");
                return;
            }
        };

        let cache = self.invalidator.cache();
        if let Err(e) = cache.set(key, &raw, self.ttl).await {
            tracing::warn!(post_id, error = %e, "Failed to cache votes");
            return;
        }

        // An eviction may have run between the check and the set.
        if self.invalidator.generation() != generation {
            if let Err(e) = cache.delete(key).await {
                tracing::warn!(post_id, error = %e, "Failed to drop raced cache entry");
            }
        }
    }

    /// Counts for `post_id` plus the viewer's own vote.
    pub async fn summarize(
        &self,
        post_id: PostId,
        viewer: Option<UserId>,
    ) -> Result<VoteTally, VoteError> {
        let votes = self.list(post_id).await?;
        Ok(VoteTally::from_votes(post_id, &votes, viewer))
    }
}
