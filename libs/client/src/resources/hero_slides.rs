//! Homepage hero slides

use common::models::{HeroSlide, ListQuery, NewHeroSlide, UpdateHeroSlide};

use super::Endpoint;
use crate::cache::{QueryCache, Resource};
use crate::error::ClientResult;
use crate::http::ApiClient;

#[derive(Clone)]
pub struct HeroSlides {
    endpoint: Endpoint,
}

impl HeroSlides {
    pub fn new(client: ApiClient, cache: QueryCache) -> Self {
        Self {
            endpoint: Endpoint::new(client, cache, Resource::HeroSlides, "/api/hero-slides/"),
        }
    }

    pub async fn list(&self, query: &ListQuery) -> ClientResult<Vec<HeroSlide>> {
        self.endpoint.list(query.pairs()).await
    }

    pub async fn get(&self, id: i64) -> ClientResult<HeroSlide> {
        self.endpoint.get(id).await
    }

    pub async fn create(&self, slide: &NewHeroSlide) -> ClientResult<HeroSlide> {
        self.endpoint.create(slide).await
    }

    pub async fn update(&self, id: i64, changes: &UpdateHeroSlide) -> ClientResult<HeroSlide> {
        self.endpoint.update(id, changes).await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.endpoint.delete(id).await
    }
}
