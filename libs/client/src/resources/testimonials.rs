//! Client testimonials

use common::models::{ListQuery, NewTestimonial, Testimonial, UpdateTestimonial};

use super::Endpoint;
use crate::cache::{QueryCache, Resource};
use crate::error::ClientResult;
use crate::http::ApiClient;
use crate::transport::ApiRequest;

#[derive(Clone)]
pub struct Testimonials {
    endpoint: Endpoint,
}

impl Testimonials {
    pub fn new(client: ApiClient, cache: QueryCache) -> Self {
        Self {
            endpoint: Endpoint::new(client, cache, Resource::Testimonials, "/api/testimonials/"),
        }
    }

    pub async fn list(&self, query: &ListQuery) -> ClientResult<Vec<Testimonial>> {
        self.endpoint.list(query.pairs()).await
    }

    /// Active featured testimonials, at most `limit`
    pub async fn featured(&self, limit: i64) -> ClientResult<Vec<Testimonial>> {
        let request =
            ApiRequest::get("/api/testimonials/featured").query([("limit", limit.to_string())]);
        self.endpoint
            .cached(format!("featured:{}", limit), request)
            .await
    }

    pub async fn get(&self, id: i64) -> ClientResult<Testimonial> {
        self.endpoint.get(id).await
    }

    pub async fn create(&self, testimonial: &NewTestimonial) -> ClientResult<Testimonial> {
        self.endpoint.create(testimonial).await
    }

    pub async fn update(&self, id: i64, changes: &UpdateTestimonial) -> ClientResult<Testimonial> {
        self.endpoint.update(id, changes).await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.endpoint.delete(id).await
    }
}
