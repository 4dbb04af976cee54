//! HTTP-backed [`JsonFetcher`](featurephoto_core::JsonFetcher).
//!
//! [`HttpJsonFetcher`] issues `GET` requests with `reqwest` and keeps
//! successful JSON bodies in a per-URL [`ResponseCache`]. Providers that
//! sometimes answer with an empty result set can have their entry evicted
//! so the next identical request reaches the network again.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use featurephoto_core::JsonFetcher;
//! use featurephoto_data::http::{HttpJsonFetcher, HttpJsonFetcherConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HttpJsonFetcherConfig::default()
//!     .with_timeout(Duration::from_secs(10))
//!     .with_cache_ttl(Duration::from_secs(60));
//! let fetcher = HttpJsonFetcher::with_config(config)?;
//! let body = fetcher
//!     .fetch_json("https://osm.fit.vutbr.cz/fody/api/close?lat=50.1&lon=14.4&limit=1&distance=50")
//!     .await?;
//! println!("{body}");
//! # Ok(())
//! # }
//! ```

mod cache;
mod fetcher;

pub use cache::ResponseCache;
pub use fetcher::{DEFAULT_USER_AGENT, FetcherBuildError, HttpJsonFetcher, HttpJsonFetcherConfig};
