//! Photo source adapters.
//!
//! Each adapter issues one provider query through a shared
//! [`JsonFetcher`](featurephoto_core::JsonFetcher) and normalises the reply
//! into a [`PhotoRecord`](featurephoto_core::PhotoRecord). An empty or
//! imageless reply is a soft miss (`Ok(None)`).
//!
//! Failure policy differs per source: Mapillary and the wiki chain surface
//! [`SourceError`] to the caller, while Fody recovers locally and never
//! fails.

mod fody;
mod mapillary;
mod wiki;
mod wire;

use featurephoto_core::FetchError;
use thiserror::Error;

pub use fody::{FodyConfig, FodySource};
pub use mapillary::{MapillaryConfig, MapillarySource};
pub use wiki::WikiSource;

/// Errors surfaced by the propagating source adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The provider could not be reached or answered with an error.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// The provider answered with JSON of an unexpected shape.
    #[error("unexpected {provider} response from {url}: {message}")]
    UnexpectedShape {
        /// Provider name.
        provider: &'static str,
        /// Request URL.
        url: String,
        /// Deserialisation error description.
        message: String,
    },
}

impl SourceError {
    fn shape(provider: &'static str, url: &str, err: &serde_json::Error) -> Self {
        Self::UnexpectedShape {
            provider,
            url: url.to_owned(),
            message: err.to_string(),
        }
    }
}
