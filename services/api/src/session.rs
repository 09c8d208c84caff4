//! Refresh token sessions in Redis
//!
//! A refresh token is an opaque random string. It is stored as
//! `refresh_token:{token}` with the user id as value and the token lifetime
//! as TTL. Refreshing consumes the token and issues a new one; logging out
//! deletes it.

use anyhow::Result;
use common::cache::RedisPool;
use rand::{Rng, distributions::Alphanumeric};
use tracing::{info, warn};

const TOKEN_LENGTH: usize = 64;

/// Session manager for refresh tokens
#[derive(Clone)]
pub struct SessionManager {
    redis_pool: RedisPool,
    /// Refresh token lifetime in seconds
    ttl: u64,
}

fn session_key(token: &str) -> String {
    format!("refresh_token:{}", token)
}

fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

impl SessionManager {
    pub fn new(redis_pool: RedisPool, ttl_days: u64) -> Self {
        Self {
            redis_pool,
            ttl: ttl_days * 24 * 60 * 60,
        }
    }

    /// Start a session for a user and return its refresh token
    pub async fn create_session(&self, user_id: i64) -> Result<String> {
        let token = generate_token();
        self.redis_pool
            .set(&session_key(&token), &user_id.to_string(), Some(self.ttl))
            .await?;

        info!("Created session for user: {}", user_id);
        Ok(token)
    }

    /// Consume a refresh token, returning its user
    ///
    /// The token is gone afterwards whether or not the caller issues a new one.
    pub async fn consume(&self, token: &str) -> Result<Option<i64>> {
        let value = self.redis_pool.take(&session_key(token)).await?;
        Ok(value.and_then(|v| match v.parse() {
            Ok(user_id) => Some(user_id),
            Err(_) => {
                warn!("Discarding malformed session entry");
                None
            }
        }))
    }

    /// Revoke a refresh token; returns whether it existed
    pub async fn revoke(&self, token: &str) -> Result<bool> {
        self.redis_pool.delete(&session_key(token)).await
    }

    pub async fn health_check(&self) -> Result<bool> {
        self.redis_pool.health_check().await
    }
}
