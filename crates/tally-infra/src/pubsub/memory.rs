//! In-memory pub/sub.
//!
//! Fallback when Redis is not available; delivers within one process only.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{RwLock, broadcast};
use tokio::task::JoinHandle;

use tally_core::ports::{MessageHandler, PubSub, PubSubError, PubSubMessage};

struct Channel {
    sender: broadcast::Sender<String>,
    listeners: Vec<JoinHandle<()>>,
}

/// In-memory pub/sub system built on tokio broadcast channels.
pub struct InMemoryPubSub {
    channels: Arc<RwLock<HashMap<String, Channel>>>,
    buffer_size: usize,
}

impl InMemoryPubSub {
    pub fn new(buffer_size: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            buffer_size,
        }
    }
}

impl Default for InMemoryPubSub {
    fn default() -> Self {
        Self::new(100)
    }
}

#[async_trait]
impl PubSub for InMemoryPubSub {
    async fn publish(&self, channel: &str, message: &str) -> Result<(), PubSubError> {
        let channels = self.channels.read().await;

        match channels.get(channel) {
            Some(entry) => {
                // Err only means every receiver is gone.
                let _ = entry.sender.send(message.to_string());
                tracing::debug!(channel = %channel, "Message published");
            }
            None => tracing::debug!(channel = %channel, "No subscribers for channel"),
        }

        Ok(())
    }

    async fn subscribe(&self, channel: &str, handler: MessageHandler) -> Result<(), PubSubError> {
        let mut channels = self.channels.write().await;

        let entry = channels.entry(channel.to_string()).or_insert_with(|| Channel {
            sender: broadcast::channel(self.buffer_size).0,
            listeners: Vec::new(),
        });

        let mut receiver = entry.sender.subscribe();
        let channel_name = channel.to_string();

        let handle = tokio::spawn(async move {
            tracing::info!(channel = %channel_name, "Subscribed to channel");

            loop {
                match receiver.recv().await {
                    Ok(payload) => {
                        let msg = PubSubMessage {
                            channel: channel_name.clone(),
                            payload,
                        };
                        handler(msg).await;
                    }
                    Err(broadcast::error::RecvError::Lagged(count)) => {
                        tracing::warn!(
                            channel = %channel_name,
                            lagged = count,
                            "Subscriber lagged behind"
                        );
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!(channel = %channel_name, "Channel closed");
                        break;
                    }
                }
            }
        });
        entry.listeners.push(handle);

        Ok(())
    }

    async fn unsubscribe(&self, channel: &str) -> Result<(), PubSubError> {
        if let Some(entry) = self.channels.write().await.remove(channel) {
            for listener in entry.listeners {
                listener.abort();
            }
            tracing::info!(channel = %channel, "Unsubscribed from channel");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn forward_to(tx: mpsc::Sender<String>) -> MessageHandler {
        Box::new(move |msg| {
            let tx = tx.clone();
            Box::pin(async move {
                let _ = tx.send(msg.payload).await;
            })
        })
    }

    #[tokio::test]
    async fn test_subscriber_receives_published_message() {
        let pubsub = InMemoryPubSub::default();
        let (tx, mut rx) = mpsc::channel(4);

        pubsub.subscribe("votes", forward_to(tx)).await.unwrap();
        pubsub.publish("votes", "12").await.unwrap();

        let received = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap();
        assert_eq!(received, Some("12".to_string()));
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_ok() {
        let pubsub = InMemoryPubSub::default();
        assert!(pubsub.publish("votes", "12").await.is_ok());
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_delivery() {
        let pubsub = InMemoryPubSub::default();
        let (tx, mut rx) = mpsc::channel(4);

        pubsub.subscribe("votes", forward_to(tx)).await.unwrap();
        pubsub.unsubscribe("votes").await.unwrap();
        pubsub.publish("votes", "12").await.unwrap();

        let received = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await;
        // Either the listener was aborted (channel closed) or nothing arrived.
        assert!(matches!(received, Ok(None) | Err(_)));
    }
}
