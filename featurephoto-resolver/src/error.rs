//! Errors surfaced by the resolver.

use std::time::Duration;

use featurephoto_data::SourceError;
use thiserror::Error;

/// Failure of one of the essential sources.
///
/// Fody problems never appear here; they are soft misses.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The Mapillary lookup failed.
    #[error("Mapillary lookup failed: {0}")]
    Mapillary(#[source] SourceError),
    /// A wiki lookup failed.
    #[error("wiki lookup failed: {0}")]
    Wiki(#[source] SourceError),
    /// A source did not answer within the configured bound.
    #[error("{source_name} lookup timed out after {timeout:?}")]
    Timeout {
        /// Source that timed out.
        source_name: &'static str,
        /// Bound that was exceeded.
        timeout: Duration,
    },
    /// The speculative Mapillary task panicked or was cancelled.
    #[error("background Mapillary lookup did not complete: {message}")]
    Background {
        /// Description of the join failure.
        message: String,
    },
}
