//! Provider access for the feature photo service.
//!
//! Responsibilities:
//! - Fetch and cache JSON documents over HTTP.
//! - Query each photo provider and normalise its reply into a
//!   [`PhotoRecord`](featurephoto_core::PhotoRecord).
//!
//! Boundaries:
//! - Do not decide source priority (lives in `featurephoto-resolver`).
//! - Keep blocking I/O off async executors; every call is async.
//!
//! Invariants:
//! - Adapters report a soft miss as `Ok(None)`, never as an error.
//! - No global mutable state; caches are owned by fetcher instances.

pub mod http;
pub mod sources;

#[doc(hidden)]
pub mod test_support;

pub use http::{DEFAULT_USER_AGENT, FetcherBuildError, HttpJsonFetcher, HttpJsonFetcherConfig};
pub use sources::{
    FodyConfig, FodySource, MapillaryConfig, MapillarySource, SourceError, WikiSource,
};
