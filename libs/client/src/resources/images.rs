//! Gallery images

use common::models::{Image, ImageQuery, UpdateImage};

use super::Endpoint;
use crate::cache::{QueryCache, Resource};
use crate::error::ClientResult;
use crate::http::ApiClient;
use crate::transport::ApiRequest;
use crate::upload::ImageUpload;

#[derive(Clone)]
pub struct Images {
    endpoint: Endpoint,
}

impl Images {
    pub fn new(client: ApiClient, cache: QueryCache) -> Self {
        Self {
            endpoint: Endpoint::new(client, cache, Resource::Images, "/api/images/"),
        }
    }

    /// Public images, optionally filtered by category name or featured flag
    pub async fn list(&self, query: &ImageQuery) -> ClientResult<Vec<Image>> {
        self.endpoint.list(query.pairs()).await
    }

    /// Every image owned by the signed-in user, public or not
    pub async fn my_images(&self, query: &ImageQuery) -> ClientResult<Vec<Image>> {
        let request = ApiRequest::get("/api/images/my-images").query(query.pairs());
        self.endpoint
            .cached(format!("mine:{:?}", query), request)
            .await
    }

    pub async fn get(&self, id: i64) -> ClientResult<Image> {
        self.endpoint.get(id).await
    }

    /// Validate and upload a new image
    ///
    /// Nothing is sent when validation fails.
    pub async fn upload(&self, upload: ImageUpload) -> ClientResult<Image> {
        let request = upload.into_request()?;
        self.endpoint.mutate(request).await
    }

    pub async fn update(&self, id: i64, changes: &UpdateImage) -> ClientResult<Image> {
        self.endpoint.update(id, changes).await
    }

    /// Deleting an id that no longer exists fails with `NotFound`
    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.endpoint.delete(id).await
    }
}
