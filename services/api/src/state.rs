//! Application state shared across handlers

use std::sync::Arc;

use common::cache::RedisPool;
use sqlx::PgPool;

use crate::{
    config::Settings,
    jwt::JwtService,
    rate_limiter::RateLimiter,
    repositories::{
        CategoryRepository, HeroSlideRepository, ImageRepository, SocialMediaRepository,
        TestimonialRepository, UserRepository,
    },
    session::SessionManager,
    storage::ImageStorage,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub settings: Arc<Settings>,
    pub jwt: JwtService,
    pub sessions: SessionManager,
    pub rate_limiter: RateLimiter,
    pub storage: ImageStorage,
    pub users: UserRepository,
    pub images: ImageRepository,
    pub categories: CategoryRepository,
    pub testimonials: TestimonialRepository,
    pub hero_slides: HeroSlideRepository,
    pub social_media: SocialMediaRepository,
}

impl AppState {
    pub fn new(
        settings: Settings,
        db_pool: PgPool,
        redis_pool: RedisPool,
        jwt: JwtService,
        rate_limiter: RateLimiter,
    ) -> Self {
        Self {
            sessions: SessionManager::new(redis_pool, settings.refresh_token_expire_days),
            storage: ImageStorage::from_settings(&settings),
            users: UserRepository::new(db_pool.clone()),
            images: ImageRepository::new(db_pool.clone()),
            categories: CategoryRepository::new(db_pool.clone()),
            testimonials: TestimonialRepository::new(db_pool.clone()),
            hero_slides: HeroSlideRepository::new(db_pool.clone()),
            social_media: SocialMediaRepository::new(db_pool.clone()),
            settings: Arc::new(settings),
            jwt,
            rate_limiter,
            db_pool,
        }
    }
}
