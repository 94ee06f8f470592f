//! Redis pub/sub - carries vote invalidations between server instances.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use tally_core::ports::{MessageHandler, PubSub, PubSubError, PubSubMessage};

use crate::cache::RedisConfig;
use crate::cache::redis::connect;

/// Redis-backed PubSub implementation.
///
/// Publishing goes through the shared connection manager; every subscription
/// owns a dedicated pub/sub connection driven by its own task.
pub struct RedisPubSub {
    conn: ConnectionManager,
    client: Client,
    subscriptions: Arc<RwLock<HashMap<String, JoinHandle<()>>>>,
}

impl RedisPubSub {
    pub async fn new(config: RedisConfig) -> Result<Self, PubSubError> {
        let (client, conn) = connect(&config).await.map_err(PubSubError::Connection)?;

        tracing::info!(url = %config.url, "Connected to Redis PubSub");

        Ok(Self {
            conn,
            client,
            subscriptions: Arc::new(RwLock::new(HashMap::new())),
        })
    }
}

#[async_trait]
impl PubSub for RedisPubSub {
    async fn publish(&self, channel: &str, message: &str) -> Result<(), PubSubError> {
        let mut conn = self.conn.clone();
        conn.publish::<_, _, ()>(channel, message)
            .await
            .map_err(|e| PubSubError::PublishError(e.to_string()))
    }

    async fn subscribe(&self, channel: &str, handler: MessageHandler) -> Result<(), PubSubError> {
        let mut pubsub = self
            .client
            .get_async_pubsub()
            .await
            .map_err(|e| PubSubError::Connection(e.to_string()))?;
        pubsub
            .subscribe(channel)
            .await
            .map_err(|e| PubSubError::SubscribeError(e.to_string()))?;

        tracing::debug!(channel = %channel, "Subscribed to Redis channel");

        let channel_name = channel.to_string();
        let handle = tokio::spawn(async move {
            let mut stream = pubsub.on_message();
            while let Some(msg) = stream.next().await {
                let payload: String = match msg.get_payload() {
                    Ok(p) => p,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to get message payload");
                        continue;
                    }
                };

                handler(PubSubMessage {
                    channel: msg.get_channel_name().to_string(),
                    payload,
                })
                .await;
            }

            tracing::info!(channel = %channel_name, "PubSub connection closed");
        });

        if let Some(previous) = self
            .subscriptions
            .write()
            .await
            .insert(channel.to_string(), handle)
        {
            previous.abort();
        }

        Ok(())
    }

    async fn unsubscribe(&self, channel: &str) -> Result<(), PubSubError> {
        if let Some(handle) = self.subscriptions.write().await.remove(channel) {
            handle.abort();
            tracing::debug!(channel = %channel, "Unsubscribed from Redis channel");
        }
        Ok(())
    }
}
