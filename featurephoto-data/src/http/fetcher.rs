//! `reqwest`-based JSON fetcher with a response cache.

use std::time::Duration;

use async_trait::async_trait;
use featurephoto_core::{FetchError, JsonFetcher};
use log::debug;
use reqwest::Client;
use serde_json::Value;

use super::cache::ResponseCache;

/// Error type for [`HttpJsonFetcher`] construction failures.
#[derive(Debug)]
pub enum FetcherBuildError {
    /// Failed to build the HTTP client.
    HttpClient(reqwest::Error),
}

impl std::fmt::Display for FetcherBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HttpClient(err) => write!(f, "failed to build HTTP client: {err}"),
        }
    }
}

impl std::error::Error for FetcherBuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::HttpClient(err) => Some(err),
        }
    }
}

/// Default user agent for provider requests.
pub const DEFAULT_USER_AGENT: &str = "featurephoto/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default lifetime of cached responses in seconds.
const DEFAULT_CACHE_TTL_SECS: u64 = 600;

/// Configuration for [`HttpJsonFetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpJsonFetcherConfig {
    /// Connect and request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Lifetime of cached responses. Zero disables caching.
    pub cache_ttl: Duration,
}

impl Default for HttpJsonFetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

impl HttpJsonFetcherConfig {
    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the cache lifetime.
    #[must_use]
    pub fn with_cache_ttl(mut self, cache_ttl: Duration) -> Self {
        self.cache_ttl = cache_ttl;
        self
    }
}

/// HTTP JSON fetcher caching successful responses per URL.
///
/// Only successfully decoded bodies are cached; errors always reach the
/// caller and leave the cache untouched.
#[derive(Debug)]
pub struct HttpJsonFetcher {
    client: Client,
    config: HttpJsonFetcherConfig,
    cache: ResponseCache,
}

impl HttpJsonFetcher {
    /// Create a fetcher with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new() -> Result<Self, FetcherBuildError> {
        Self::with_config(HttpJsonFetcherConfig::default())
    }

    /// Create a fetcher with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_config(config: HttpJsonFetcherConfig) -> Result<Self, FetcherBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(FetcherBuildError::HttpClient)?;
        let cache = ResponseCache::new(config.cache_ttl);
        Ok(Self {
            client,
            config,
            cache,
        })
    }

    /// Access the response cache.
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    async fn fetch_uncached(&self, url: &str) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, url))?;

        response.json().await.map_err(|err| FetchError::Parse {
            url: url.to_owned(),
            message: err.to_string(),
        })
    }

    /// Convert a reqwest error to a `FetchError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> FetchError {
        if error.is_timeout() {
            return FetchError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return FetchError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        FetchError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

#[async_trait]
impl JsonFetcher for HttpJsonFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        if let Some(body) = self.cache.get(url) {
            debug!("serving {url} from cache");
            return Ok(body);
        }
        let body = self.fetch_uncached(url).await?;
        self.cache.insert(url, body.clone());
        Ok(body)
    }

    fn remove_fetch_cache(&self, url: &str) {
        if self.cache.remove(url) {
            debug!("evicted cached response for {url}");
        }
    }
}
