//! # Tally Infrastructure
//!
//! Concrete implementations of the ports defined in `tally-core`.
//! This crate contains the vote stores, caches, pub/sub and token validation.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL vote store via SeaORM
//! - `auth` - JWT token validation
//! - `redis` - Redis support for cache and pubsub

pub mod cache;
pub mod database;
pub mod pubsub;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use cache::InMemoryCache;
pub use database::{DatabaseConnections, InMemoryVoteRepository};
pub use pubsub::InMemoryPubSub;

#[cfg(feature = "auth")]
pub use auth::{JwtConfig, JwtTokenService};

#[cfg(feature = "postgres")]
pub use database::PostgresVoteRepository;

// Re-exports - Redis
#[cfg(feature = "redis")]
pub use cache::{RedisCache, RedisConfig};
#[cfg(feature = "redis")]
pub use pubsub::RedisPubSub;
