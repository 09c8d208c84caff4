//! Redis access for short-lived server state
//!
//! The API service keeps refresh tokens here: each token is a key whose TTL
//! is the token lifetime, so revocation is a delete and rotation is a take.
//! Every key is namespaced with the configured prefix, letting several
//! deployments share one Redis.

use anyhow::{Context, Result};
use redis::{AsyncCommands, Client, aio::MultiplexedConnection};
use tracing::{debug, info};

const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";
const DEFAULT_KEY_PREFIX: &str = "studio";

#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// e.g. `redis://localhost:6379`
    pub url: String,
    /// Namespace prepended to every key as `{prefix}:{key}`
    pub key_prefix: String,
}

impl RedisConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }

    /// Read `REDIS_URL` and `REDIS_KEY_PREFIX`
    pub fn from_env() -> Result<Self> {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string());
        let key_prefix = std::env::var("REDIS_KEY_PREFIX")
            .map(|prefix| prefix.trim().trim_end_matches(':').to_string())
            .unwrap_or_else(|_| DEFAULT_KEY_PREFIX.to_string());

        Ok(Self { url, key_prefix })
    }
}

/// Redis handle; connections are opened per call and multiplexed
#[derive(Clone)]
pub struct RedisPool {
    client: Client,
    key_prefix: String,
}

impl RedisPool {
    /// Validate the URL; no connection is made until the first command
    pub async fn new(config: &RedisConfig) -> Result<Self> {
        let client = Client::open(config.url.as_str())
            .with_context(|| format!("Invalid REDIS_URL {:?}", config.url))?;
        info!("Redis client ready, keys prefixed with {:?}", config.key_prefix);

        Ok(Self {
            client,
            key_prefix: config.key_prefix.clone(),
        })
    }

    fn key(&self, key: &str) -> String {
        if self.key_prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}:{}", self.key_prefix, key)
        }
    }

    async fn connection(&self) -> Result<MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .context("Redis is unreachable")
    }

    /// Store `value`; with a TTL the key expires after that many seconds
    pub async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> Result<()> {
        let key = self.key(key);
        let mut conn = self.connection().await?;

        let _: () = match ttl_seconds {
            Some(ttl) => conn.set_ex(&key, value, ttl).await?,
            None => conn.set(&key, value).await?,
        };
        debug!("Stored {}", key);
        Ok(())
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection().await?;
        Ok(conn.get(self.key(key)).await?)
    }

    /// Read and delete a key atomically, so a value is handed out once
    pub async fn take(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection().await?;
        let value = redis::cmd("GETDEL")
            .arg(self.key(key))
            .query_async(&mut conn)
            .await?;
        Ok(value)
    }

    /// Delete a key, returning whether it existed
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.connection().await?;
        let removed: u64 = conn.del(self.key(key)).await?;
        Ok(removed > 0)
    }

    pub async fn health_check(&self) -> Result<bool> {
        let mut conn = self.connection().await?;
        let reply: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(reply == "PONG")
    }
}
