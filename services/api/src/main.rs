use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod jwt;
mod middleware;
mod rate_limiter;
mod repositories;
mod response;
mod routes;
mod session;
mod state;
mod storage;

use common::{
    cache::{RedisConfig, RedisPool},
    database::{DatabaseConfig, init_pool, migrate},
};
use tokio::net::TcpListener;

use crate::{
    config::Settings,
    jwt::{JwtConfig, JwtService},
    rate_limiter::{RateLimiter, RateLimiterConfig},
    repositories::UserRepository,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting API service");

    let settings = Settings::from_env().context("Failed to load settings")?;
    if settings.is_production() && settings.secret_key == "change-me-in-production" {
        anyhow::bail!("SECRET_KEY must be set in production");
    }

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    migrate(&pool, &sqlx::migrate!("./migrations")).await?;

    let redis_config = RedisConfig::from_env()?;
    let redis_pool = RedisPool::new(&redis_config).await?;

    bootstrap_admin(&settings, &UserRepository::new(pool.clone())).await?;

    let jwt = JwtService::new(JwtConfig::from_settings(&settings));
    let rate_limiter = RateLimiter::new(RateLimiterConfig::default());
    let address = settings.bind_address();

    let app_state = AppState::new(settings, pool, redis_pool, jwt, rate_limiter);
    if !app_state.sessions.health_check().await.unwrap_or(false) {
        warn!("Redis is unreachable; sign-in will fail until it is available");
    }

    let app = routes::create_router(app_state);

    let listener = TcpListener::bind(&address).await?;
    info!("API service listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the configured admin account when no user exists yet
async fn bootstrap_admin(settings: &Settings, users: &UserRepository) -> Result<()> {
    let (Some(username), Some(email), Some(password)) = (
        settings.admin_username.as_deref(),
        settings.admin_email.as_deref(),
        settings.admin_password.as_deref(),
    ) else {
        return Ok(());
    };

    if users.count().await? > 0 {
        return Ok(());
    }

    users.create(username, email, password, true).await?;
    info!("Created initial admin user {}", username);
    Ok(())
}
