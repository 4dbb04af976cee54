//! JSON fetch trait shared by every photo source.

use async_trait::async_trait;
use serde_json::Value;

use super::error::FetchError;

/// Fetch parsed JSON bodies by URL.
///
/// Implementations are shared between the resolver and background lookups,
/// so they must be `Send + Sync`.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use featurephoto_core::{FetchError, JsonFetcher};
/// use serde_json::{Value, json};
///
/// struct EmptyCollection;
///
/// #[async_trait]
/// impl JsonFetcher for EmptyCollection {
///     async fn fetch_json(&self, _url: &str) -> Result<Value, FetchError> {
///         Ok(json!({ "type": "FeatureCollection", "features": [] }))
///     }
///
///     fn remove_fetch_cache(&self, _url: &str) {}
/// }
/// ```
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    /// Fetch `url` and return its parsed JSON body.
    async fn fetch_json(&self, url: &str) -> Result<Value, FetchError>;

    /// Evict any cached response for exactly `url`.
    ///
    /// Eviction is best effort and never fails the caller.
    fn remove_fetch_cache(&self, url: &str);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn error_reports_its_url() {
        let err = FetchError::Timeout {
            url: "https://example.org/api".to_owned(),
            timeout_secs: 30,
        };
        assert_eq!(err.url(), "https://example.org/api");
        assert_eq!(
            err.to_string(),
            "request to https://example.org/api timed out after 30s"
        );
    }
}
