//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod cache;
mod identity;
mod pubsub;
mod repository;

pub use auth::{AuthError, TokenClaims, TokenService};
pub use cache::{Cache, CacheError};
pub use identity::{AnonymousUser, CurrentUser, FixedUser};
pub use pubsub::{MessageHandler, PubSub, PubSubError, PubSubMessage};
pub use repository::VoteRepository;
