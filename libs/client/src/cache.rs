//! Query cache with typed keys
//!
//! Fetched lists and records are kept per [`QueryKey`] until they go stale or
//! a mutation invalidates their [`Resource`]. Invalidation also drops the
//! resources that embed the mutated one.

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::error::ClientResult;

/// Cached resource families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Images,
    Categories,
    Testimonials,
    HeroSlides,
    SocialLinks,
}

impl Resource {
    /// Resources whose cached entries embed this one
    fn dependents(self) -> &'static [Resource] {
        match self {
            // Slides reference images
            Resource::Images => &[Resource::HeroSlides],
            // Images carry their category name
            Resource::Categories => &[Resource::Images, Resource::HeroSlides],
            _ => &[],
        }
    }
}

/// Resource plus the query variant, e.g. a filter or an id
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub resource: Resource,
    pub scope: String,
}

impl QueryKey {
    pub fn new(resource: Resource, scope: impl Into<String>) -> Self {
        Self {
            resource,
            scope: scope.into(),
        }
    }
}

struct Entry {
    value: Arc<dyn Any + Send + Sync>,
    stored_at: Instant,
}

#[derive(Default)]
struct Entries {
    map: HashMap<QueryKey, Entry>,
    /// Bumped on every invalidation so in-flight fetches don't store stale data
    epoch: u64,
}

/// Shared cache; clones see the same entries
#[derive(Clone)]
pub struct QueryCache {
    ttl: Duration,
    entries: Arc<Mutex<Entries>>,
}

impl QueryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(Mutex::new(Entries::default())),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fresh cached value for `key`, if any
    pub fn get<T: Clone + Send + Sync + 'static>(&self, key: &QueryKey) -> Option<T> {
        let entries = self.lock();
        let entry = entries.map.get(key)?;
        if entry.stored_at.elapsed() >= self.ttl {
            return None;
        }
        entry.value.downcast_ref::<T>().cloned()
    }

    pub fn insert<T: Send + Sync + 'static>(&self, key: QueryKey, value: T) {
        self.lock().map.insert(
            key,
            Entry {
                value: Arc::new(value),
                stored_at: Instant::now(),
            },
        );
    }

    /// Cached value, or the result of `fetch` which is then cached
    ///
    /// Errors are not cached. A value fetched across an invalidation is
    /// returned but not stored.
    pub async fn get_or_fetch<T, F, Fut>(&self, key: QueryKey, fetch: F) -> ClientResult<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        if let Some(value) = self.get::<T>(&key) {
            debug!("Cache hit for {:?}", key);
            return Ok(value);
        }

        let epoch = self.lock().epoch;
        let value = fetch().await?;

        let mut entries = self.lock();
        if entries.epoch == epoch {
            entries.map.insert(
                key,
                Entry {
                    value: Arc::new(value.clone()),
                    stored_at: Instant::now(),
                },
            );
        }
        Ok(value)
    }

    /// Drop every entry of `resource` and of the resources embedding it
    pub fn invalidate(&self, resource: Resource) {
        let mut entries = self.lock();
        entries.epoch += 1;
        entries.map.retain(|key, _| {
            key.resource != resource && !resource.dependents().contains(&key.resource)
        });
        debug!("Invalidated cached {:?}", resource);
    }

    pub fn invalidate_key(&self, key: &QueryKey) {
        let mut entries = self.lock();
        entries.epoch += 1;
        entries.map.remove(key);
    }

    pub fn clear(&self) {
        let mut entries = self.lock();
        entries.epoch += 1;
        entries.map.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
