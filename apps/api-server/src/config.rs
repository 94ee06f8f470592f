//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use tally_infra::database::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    /// Lifetime of a cached vote list; `None` keeps entries until invalidated.
    pub votes_cache_ttl: Option<Duration>,
    /// Use Redis for the cache and pub/sub when set.
    pub redis_enabled: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let mut config = DatabaseConfig::new(url);
            if let Some(max) = parse_var("DB_MAX_CONNECTIONS") {
                config.max_connections = max;
            }
            if let Some(min) = parse_var("DB_MIN_CONNECTIONS") {
                config.min_connections = min;
            }
            config
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            database,
            votes_cache_ttl: cache_ttl(parse_var("VOTES_CACHE_TTL_SECS")),
            redis_enabled: env::var("REDIS_URL").is_ok(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.parse().ok())
}

/// 0 disables expiry; unset defaults to 30 seconds.
fn cache_ttl(secs: Option<u64>) -> Option<Duration> {
    match secs.unwrap_or(30) {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    }
}
