//! Client configuration

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Production origin of the studio API
pub const DEFAULT_BASE_URL: &str = "https://www.cheriyanphotography.com";

/// Settings for [`crate::StudioClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API origin; endpoint paths carry their own `/api` prefix
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Where tokens are persisted; in-memory when unset
    pub token_file: Option<PathBuf>,
    /// How long cached query results stay fresh
    pub cache_ttl: Duration,
}

impl ClientConfig {
    /// Configuration for the given origin with default timeouts
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            timeout: Duration::from_secs(30),
            token_file: None,
            cache_ttl: Duration::from_secs(300),
        }
    }

    /// Create a new ClientConfig from environment variables
    ///
    /// # Environment Variables
    /// - `STUDIO_API_URL`: API origin (default: the production site)
    /// - `STUDIO_API_TIMEOUT_SECS`: Request timeout in seconds (default: 30)
    /// - `STUDIO_TOKEN_FILE`: Token file path (default: tokens kept in memory)
    /// - `STUDIO_CACHE_TTL_SECS`: Query cache freshness in seconds (default: 300)
    pub fn from_env() -> Self {
        let base_url = env::var("STUDIO_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout = env::var("STUDIO_API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        let cache_ttl = env::var("STUDIO_CACHE_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(300);

        let token_file = env::var("STUDIO_TOKEN_FILE")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        Self {
            base_url: normalize_base_url(&base_url),
            timeout: Duration::from_secs(timeout),
            token_file,
            cache_ttl: Duration::from_secs(cache_ttl),
        }
    }

    pub fn with_token_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_file = Some(path.into());
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }
}

/// Strip trailing slashes and a trailing `/api` segment
///
/// Every request path already starts with `/api`, so a base URL that ends in
/// it would double the segment.
pub fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    match trimmed.strip_suffix("/api") {
        Some(origin) => {
            warn!(
                "Base URL {} ends with /api; request paths already include it, using {}",
                trimmed, origin
            );
            origin.trim_end_matches('/').to_string()
        }
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_normalize_strips_api_suffix() {
        assert_eq!(
            normalize_base_url("https://studio.test/api/"),
            "https://studio.test"
        );
        assert_eq!(normalize_base_url("http://localhost:8000/"), "http://localhost:8000");
        assert_eq!(
            normalize_base_url("https://studio.test/apiary"),
            "https://studio.test/apiary"
        );
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        // SAFETY: serialised with the other tests touching the environment
        unsafe {
            env::remove_var("STUDIO_API_URL");
            env::remove_var("STUDIO_API_TIMEOUT_SECS");
            env::remove_var("STUDIO_TOKEN_FILE");
            env::remove_var("STUDIO_CACHE_TTL_SECS");
        }

        let config = ClientConfig::from_env();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert!(config.token_file.is_none());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        // SAFETY: serialised with the other tests touching the environment
        unsafe {
            env::set_var("STUDIO_API_URL", "http://localhost:8000/api");
            env::set_var("STUDIO_API_TIMEOUT_SECS", "5");
            env::set_var("STUDIO_TOKEN_FILE", "/tmp/studio-tokens.json");
        }

        let config = ClientConfig::from_env();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(
            config.token_file,
            Some(PathBuf::from("/tmp/studio-tokens.json"))
        );

        unsafe {
            env::remove_var("STUDIO_API_URL");
            env::remove_var("STUDIO_API_TIMEOUT_SECS");
            env::remove_var("STUDIO_TOKEN_FILE");
        }
    }
}
