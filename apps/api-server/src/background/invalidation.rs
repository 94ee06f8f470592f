//! Evicts locally cached vote lists when another instance publishes a write.

use tally_core::ProjectionInvalidator;
use tally_core::ports::{MessageHandler, PubSubError, PubSubMessage};
use tally_core::services::VOTES_CHANNEL;

use crate::state::AppState;

/// Subscribe the state's cache to vote notifications.
pub async fn subscribe_invalidations(state: &AppState) -> Result<(), PubSubError> {
    state
        .pubsub
        .subscribe(VOTES_CHANNEL, eviction_handler(state.invalidator.clone()))
        .await?;

    tracing::info!(channel = VOTES_CHANNEL, "Listening for vote invalidations");
    Ok(())
}

fn eviction_handler(invalidator: ProjectionInvalidator) -> MessageHandler {
    Box::new(move |message: PubSubMessage| {
        let invalidator = invalidator.clone();
        Box::pin(async move {
            match ProjectionInvalidator::parse_notification(&message.payload) {
                Some(post_id) => invalidator.evict(post_id).await,
                None => tracing::warn!(
                    payload = %message.payload,
                    "Ignoring malformed vote notification"
                ),
            }
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use tally_core::ports::{Cache, PubSub};
    use tally_core::services::votes_cache_key;
    use tally_infra::{InMemoryCache, InMemoryPubSub};

    #[tokio::test]
    async fn test_notification_evicts_cached_list() {
        let cache = Arc::new(InMemoryCache::new());
        let pubsub = Arc::new(InMemoryPubSub::default());
        let invalidator = ProjectionInvalidator::new(cache.clone(), pubsub.clone());

        pubsub
            .subscribe(VOTES_CHANNEL, eviction_handler(invalidator))
            .await
            .unwrap();
        cache.set(&votes_cache_key(4), "[]", None).await.unwrap();
        cache.set(&votes_cache_key(5), "[]", None).await.unwrap();

        pubsub.publish(VOTES_CHANNEL, "4").await.unwrap();
        pubsub.publish(VOTES_CHANNEL, "not-a-post").await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(!cache.exists(&votes_cache_key(4)).await);
        assert!(cache.exists(&votes_cache_key(5)).await);
    }
}
