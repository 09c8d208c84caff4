//! Social media links shown in the footer

use common::models::{ListQuery, NewSocialMedia, SocialMedia, UpdateSocialMedia};

use super::Endpoint;
use crate::cache::{QueryCache, Resource};
use crate::error::ClientResult;
use crate::http::ApiClient;

#[derive(Clone)]
pub struct SocialLinks {
    endpoint: Endpoint,
}

impl SocialLinks {
    pub fn new(client: ApiClient, cache: QueryCache) -> Self {
        Self {
            endpoint: Endpoint::new(client, cache, Resource::SocialLinks, "/api/social-media/"),
        }
    }

    pub async fn list(&self, query: &ListQuery) -> ClientResult<Vec<SocialMedia>> {
        self.endpoint.list(query.pairs()).await
    }

    pub async fn get(&self, id: i64) -> ClientResult<SocialMedia> {
        self.endpoint.get(id).await
    }

    pub async fn create(&self, link: &NewSocialMedia) -> ClientResult<SocialMedia> {
        self.endpoint.create(link).await
    }

    pub async fn update(&self, id: i64, changes: &UpdateSocialMedia) -> ClientResult<SocialMedia> {
        self.endpoint.update(id, changes).await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.endpoint.delete(id).await
    }
}
