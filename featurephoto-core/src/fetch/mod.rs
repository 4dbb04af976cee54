//! Fetch JSON documents from photo providers.
//!
//! The `JsonFetcher` trait abstracts the HTTP primitive the source adapters
//! call. Implementations may cache responses per URL; adapters evict an
//! entry when a provider answer should not be pinned for the cache lifetime.
//!
//! Errors describe transport failures only. Whether a failure aborts the
//! resolution chain is decided by the caller.

mod error;
mod fetcher;

pub use error::FetchError;
pub use fetcher::JsonFetcher;
