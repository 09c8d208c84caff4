//! Gallery categories

use common::models::{Category, ListQuery, NewCategory, UpdateCategory};

use super::Endpoint;
use crate::cache::{QueryCache, Resource};
use crate::error::ClientResult;
use crate::http::ApiClient;

#[derive(Clone)]
pub struct Categories {
    endpoint: Endpoint,
}

impl Categories {
    pub fn new(client: ApiClient, cache: QueryCache) -> Self {
        Self {
            endpoint: Endpoint::new(client, cache, Resource::Categories, "/api/categories/"),
        }
    }

    pub async fn list(&self, query: &ListQuery) -> ClientResult<Vec<Category>> {
        self.endpoint.list(query.pairs()).await
    }

    pub async fn get(&self, id: i64) -> ClientResult<Category> {
        self.endpoint.get(id).await
    }

    pub async fn create(&self, category: &NewCategory) -> ClientResult<Category> {
        self.endpoint.create(category).await
    }

    pub async fn update(&self, id: i64, changes: &UpdateCategory) -> ClientResult<Category> {
        self.endpoint.update(id, changes).await
    }

    /// Images keep their file but lose the category
    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.endpoint.delete(id).await
    }
}
