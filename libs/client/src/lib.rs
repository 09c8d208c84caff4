//! API client for the Cheriyan Studio showcase
//!
//! [`StudioClient`] bundles the pieces a front end needs:
//!
//! - [`ApiClient`]: bearer injection and single-flight token refresh
//! - [`Session`]: login, logout and the current user
//! - [`QueryCache`]: typed cache invalidated by mutations and emptied when
//!   the signed-in user changes
//! - resource fetchers for images, categories, testimonials, hero slides and
//!   social links
//!
//! Everything talks to the network through the [`Transport`] trait, so tests
//! can substitute a scripted transport.

pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod resources;
pub mod session;
pub mod tokens;
pub mod transport;
pub mod upload;

pub use cache::{QueryCache, QueryKey, Resource};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::ApiClient;
pub use resources::{Categories, HeroSlides, Images, SocialLinks, Testimonials};
pub use session::{Session, SessionStatus};
pub use tokens::{FileTokenStore, MemoryTokenStore, StoreError, TokenPair, TokenStore};
pub use transport::{ApiRequest, ApiResponse, Body, FilePart, HttpTransport, Transport, TransportError};
pub use upload::ImageUpload;

use std::sync::Arc;
use std::time::Duration;

/// One explicit client object, built once and passed to whoever needs it
#[derive(Clone)]
pub struct StudioClient {
    api: ApiClient,
    session: Session,
    cache: QueryCache,
    images: Images,
    categories: Categories,
    testimonials: Testimonials,
    hero_slides: HeroSlides,
    social_links: SocialLinks,
}

impl StudioClient {
    /// Client over the reqwest transport described by `config`
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let api = ApiClient::from_config(config)?;
        Ok(Self::with_api(api, config.cache_ttl))
    }

    /// Client over any transport and token store
    pub fn new(
        transport: Arc<dyn Transport>,
        store: Arc<dyn TokenStore>,
        cache_ttl: Duration,
    ) -> Self {
        Self::with_api(ApiClient::new(transport, store), cache_ttl)
    }

    fn with_api(api: ApiClient, cache_ttl: Duration) -> Self {
        let cache = QueryCache::new(cache_ttl);
        let on_sign_out = cache.clone();
        api.on_identity_change(move || on_sign_out.clear());

        Self {
            session: Session::new(api.clone()),
            images: Images::new(api.clone(), cache.clone()),
            categories: Categories::new(api.clone(), cache.clone()),
            testimonials: Testimonials::new(api.clone(), cache.clone()),
            hero_slides: HeroSlides::new(api.clone(), cache.clone()),
            social_links: SocialLinks::new(api.clone(), cache.clone()),
            api,
            cache,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn images(&self) -> &Images {
        &self.images
    }

    pub fn categories(&self) -> &Categories {
        &self.categories
    }

    pub fn testimonials(&self) -> &Testimonials {
        &self.testimonials
    }

    pub fn hero_slides(&self) -> &HeroSlides {
        &self.hero_slides
    }

    pub fn social_links(&self) -> &SocialLinks {
        &self.social_links
    }

    /// Sign out; the cache is emptied along with the tokens
    pub async fn logout(&self) {
        self.session.logout().await;
    }
}
