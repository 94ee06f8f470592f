//! Application state - shared across all handlers.

use std::sync::Arc;

use tally_core::ports::{Cache, PubSub, TokenService, VoteRepository};
use tally_core::{ProjectionInvalidator, VoteProjector, VoteReconciler};
use tally_infra::database::DatabaseConnections;
use tally_infra::{InMemoryCache, InMemoryPubSub, InMemoryVoteRepository, JwtTokenService};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub reconciler: Arc<VoteReconciler>,
    pub projector: Arc<VoteProjector>,
    pub invalidator: ProjectionInvalidator,
    pub pubsub: Arc<dyn PubSub>,
    pub tokens: Arc<dyn TokenService>,
    pub db: Option<Arc<DatabaseConnections>>,
    /// Set when the cache is process-local and needs periodic purging.
    pub memory_cache: Option<Arc<InMemoryCache>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let (db, votes) = init_votes(config).await?;
        let (cache, memory_cache, pubsub) = init_messaging(config).await?;
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::from_env());

        tracing::info!("Application state initialized");

        Ok(Self::assemble(
            votes,
            cache,
            memory_cache,
            pubsub,
            tokens,
            db,
            config,
        ))
    }

    /// Wire services around already-built backends.
    pub fn assemble(
        votes: Arc<dyn VoteRepository>,
        cache: Arc<dyn Cache>,
        memory_cache: Option<Arc<InMemoryCache>>,
        pubsub: Arc<dyn PubSub>,
        tokens: Arc<dyn TokenService>,
        db: Option<Arc<DatabaseConnections>>,
        config: &AppConfig,
    ) -> Self {
        let invalidator = ProjectionInvalidator::new(cache, pubsub.clone());

        Self {
            reconciler: Arc::new(VoteReconciler::new(votes.clone(), invalidator.clone())),
            projector: Arc::new(VoteProjector::new(
                votes,
                invalidator.clone(),
                config.votes_cache_ttl,
            )),
            invalidator,
            pubsub,
            tokens,
            db,
            memory_cache,
        }
    }
}

type VoteBackend = (Option<Arc<DatabaseConnections>>, Arc<dyn VoteRepository>);

#[cfg(feature = "postgres")]
async fn init_votes(config: &AppConfig) -> anyhow::Result<VoteBackend> {
    use anyhow::Context;
    use tally_infra::PostgresVoteRepository;

    let Some(db_config) = &config.database else {
        tracing::warn!("DATABASE_URL not set. Votes are kept in memory.");
        return Ok((None, Arc::new(InMemoryVoteRepository::new())));
    };

    let connections = DatabaseConnections::init(db_config)
        .await
        .context("failed to connect to the vote database")?;
    let connections = Arc::new(connections);
    let repo = Arc::new(PostgresVoteRepository::new(connections.main.clone()));

    Ok((Some(connections), repo))
}

#[cfg(not(feature = "postgres"))]
async fn init_votes(_config: &AppConfig) -> anyhow::Result<VoteBackend> {
    tracing::info!("Running without postgres feature - votes are kept in memory");
    Ok((None, Arc::new(InMemoryVoteRepository::new())))
}

type Messaging = (Arc<dyn Cache>, Option<Arc<InMemoryCache>>, Arc<dyn PubSub>);

fn in_memory_messaging() -> Messaging {
    let cache = Arc::new(InMemoryCache::new());
    (
        cache.clone(),
        Some(cache),
        Arc::new(InMemoryPubSub::default()),
    )
}

#[cfg(feature = "redis")]
async fn init_messaging(config: &AppConfig) -> anyhow::Result<Messaging> {
    use tally_infra::{RedisCache, RedisConfig, RedisPubSub};

    if !config.redis_enabled {
        return Ok(in_memory_messaging());
    }

    let redis_config = RedisConfig::from_env();
    let connected = async {
        let cache = RedisCache::new(redis_config.clone()).await?;
        let pubsub = RedisPubSub::new(redis_config.clone()).await?;
        anyhow::Ok((cache, pubsub))
    }
    .await;

    match connected {
        Ok((cache, pubsub)) => Ok((Arc::new(cache), None, Arc::new(pubsub))),
        Err(e) if redis_config.fallback_to_memory => {
            tracing::error!(error = %e, "Redis unavailable. Using in-memory cache and pubsub.");
            Ok(in_memory_messaging())
        }
        Err(e) => Err(e.context("failed to connect to Redis")),
    }
}

#[cfg(not(feature = "redis"))]
async fn init_messaging(config: &AppConfig) -> anyhow::Result<Messaging> {
    if config.redis_enabled {
        tracing::warn!("REDIS_URL is set but the redis feature is disabled");
    }
    Ok(in_memory_messaging())
}
