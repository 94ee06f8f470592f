//! Pub/Sub port. Carries vote-change notifications between server instances.

use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;

/// Message received from a channel.
#[derive(Debug, Clone)]
pub struct PubSubMessage {
    pub channel: String,
    pub payload: String,
}

/// Handler for incoming messages.
pub type MessageHandler =
    Box<dyn Fn(PubSubMessage) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Fan-out messaging. Delivery is best effort; a message published while
/// nobody is subscribed is dropped.
///
/// Handlers are boxed so the trait stays usable as `Arc<dyn PubSub>`.
#[async_trait]
pub trait PubSub: Send + Sync {
    /// Publish a message to a channel.
    async fn publish(&self, channel: &str, message: &str) -> Result<(), PubSubError>;

    /// Run `handler` for every message on `channel` until unsubscribed.
    async fn subscribe(&self, channel: &str, handler: MessageHandler) -> Result<(), PubSubError>;

    /// Stop every handler registered on `channel`.
    async fn unsubscribe(&self, channel: &str) -> Result<(), PubSubError>;
}

/// Pub/Sub errors.
#[derive(Debug, thiserror::Error)]
pub enum PubSubError {
    #[error("Failed to publish: {0}")]
    PublishError(String),

    #[error("Failed to subscribe: {0}")]
    SubscribeError(String),

    #[error("Connection error: {0}")]
    Connection(String),
}
