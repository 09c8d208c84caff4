//! Integration tests for the server-side infrastructure helpers
//!
//! Both tests need live services (`DATABASE_URL`, `REDIS_URL`) and are
//! ignored by default; run them with `cargo test -- --ignored`.

#![cfg(feature = "server")]

use common::{
    cache::{RedisConfig, RedisPool},
    database::{DatabaseConfig, health_check, init_pool},
};
use sqlx::Row;

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_database_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    assert!(health_check(&pool).await?, "Database health check failed");

    let row = sqlx::query("SELECT 1 as result").fetch_one(&pool).await?;
    let result: i32 = row.get("result");
    assert_eq!(result, 1);

    Ok(())
}

/// Refresh tokens are stored as keys with a TTL and consumed on rotation
#[tokio::test]
#[ignore = "requires Redis"]
async fn test_refresh_token_store_semantics() -> Result<(), Box<dyn std::error::Error>> {
    let redis_config = RedisConfig::from_env()?;
    let redis_pool = RedisPool::new(&redis_config).await?;

    assert!(redis_pool.health_check().await?, "Redis health check failed");

    let key = "refresh_token:integration-test";
    redis_pool.set(key, "7", Some(10)).await?;
    assert_eq!(redis_pool.get(key).await?, Some("7".to_string()));

    // Rotation consumes the token exactly once
    assert_eq!(redis_pool.take(key).await?, Some("7".to_string()));
    assert_eq!(redis_pool.take(key).await?, None);

    redis_pool.set(key, "7", Some(10)).await?;
    assert!(redis_pool.delete(key).await?);
    assert_eq!(redis_pool.get(key).await?, None);

    Ok(())
}
