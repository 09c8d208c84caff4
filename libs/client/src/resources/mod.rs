//! Per-resource data fetchers
//!
//! Reads go through the [`QueryCache`]; successful mutations invalidate the
//! resource so the next read goes back to the API.

pub mod categories;
pub mod hero_slides;
pub mod images;
pub mod social_links;
pub mod testimonials;

pub use categories::Categories;
pub use hero_slides::HeroSlides;
pub use images::Images;
pub use social_links::SocialLinks;
pub use testimonials::Testimonials;

use common::validation::check;
use serde::Serialize;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::cache::{QueryCache, QueryKey, Resource};
use crate::error::{ClientError, ClientResult};
use crate::http::ApiClient;
use crate::transport::ApiRequest;

/// Client, cache and collection path shared by the fetchers
#[derive(Clone)]
pub(crate) struct Endpoint {
    client: ApiClient,
    cache: QueryCache,
    resource: Resource,
    /// Collection path with its trailing slash, e.g. `/api/categories/`
    collection: &'static str,
}

impl Endpoint {
    pub(crate) fn new(
        client: ApiClient,
        cache: QueryCache,
        resource: Resource,
        collection: &'static str,
    ) -> Self {
        Self {
            client,
            cache,
            resource,
            collection,
        }
    }

    pub(crate) fn item_path(&self, id: i64) -> String {
        format!("{}{}", self.collection, id)
    }

    pub(crate) async fn cached<T>(&self, scope: String, request: ApiRequest) -> ClientResult<T>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        let key = QueryKey::new(self.resource, scope);
        self.cache
            .get_or_fetch(key, || self.client.fetch(request))
            .await
    }

    pub(crate) async fn list<T>(&self, query: Vec<(&'static str, String)>) -> ClientResult<Vec<T>>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        let scope = format!("list:{:?}", query);
        let request = ApiRequest::get(self.collection).query(query);
        self.cached(scope, request).await
    }

    pub(crate) async fn get<T>(&self, id: i64) -> ClientResult<T>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        self.cached(format!("id:{}", id), ApiRequest::get(self.item_path(id)))
            .await
    }

    pub(crate) async fn create<P, T>(&self, payload: &P) -> ClientResult<T>
    where
        P: Serialize + Validate,
        T: DeserializeOwned,
    {
        check(payload).map_err(ClientError::Validation)?;
        let request = ApiRequest::post(self.collection).json(payload)?;
        self.mutate(request).await
    }

    pub(crate) async fn update<P, T>(&self, id: i64, payload: &P) -> ClientResult<T>
    where
        P: Serialize + Validate,
        T: DeserializeOwned,
    {
        check(payload).map_err(ClientError::Validation)?;
        let request = ApiRequest::put(self.item_path(id)).json(payload)?;
        self.mutate(request).await
    }

    pub(crate) async fn delete(&self, id: i64) -> ClientResult<()> {
        self.client
            .fetch_message(ApiRequest::delete(self.item_path(id)))
            .await?;
        self.invalidate();
        Ok(())
    }

    pub(crate) async fn mutate<T: DeserializeOwned>(&self, request: ApiRequest) -> ClientResult<T> {
        let value = self.client.fetch(request).await?;
        self.invalidate();
        Ok(value)
    }

    pub(crate) fn invalidate(&self) {
        self.cache.invalidate(self.resource);
    }
}
