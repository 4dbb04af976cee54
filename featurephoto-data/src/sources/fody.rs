//! Fody community photo database.
//!
//! The least essential source: every failure is logged and treated as a
//! soft miss so it can never abort the resolution chain.

use std::sync::Arc;

use featurephoto_core::{JsonFetcher, PhotoRecord};
use geo::Coord;
use log::warn;

use super::SourceError;
use super::wire::{FeatureCollection, FodyPhoto};

const PROVIDER: &str = "Fody photodb";

/// Endpoint settings for [`FodySource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FodyConfig {
    /// Site root; the API, photo pages and thumbnails live below it.
    pub base_url: String,
    /// Search radius around the center.
    pub distance: u32,
    /// Maximum number of results requested.
    pub limit: u32,
}

impl Default for FodyConfig {
    fn default() -> Self {
        Self {
            base_url: "https://osm.fit.vutbr.cz/fody".to_owned(),
            distance: 50,
            limit: 1,
        }
    }
}

impl FodyConfig {
    /// Override the site root, e.g. to target the development instance.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

/// Finds the closest guidepost or landmark photo in the Fody database.
#[derive(Clone)]
pub struct FodySource {
    fetcher: Arc<dyn JsonFetcher>,
    config: FodyConfig,
}

impl std::fmt::Debug for FodySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FodySource")
            .field("fetcher", &"<dyn JsonFetcher>")
            .field("config", &self.config)
            .finish()
    }
}

impl FodySource {
    /// Create a source querying through `fetcher`.
    pub fn new(fetcher: Arc<dyn JsonFetcher>, config: FodyConfig) -> Self {
        Self { fetcher, config }
    }

    /// Build the proximity query for `center`.
    #[must_use]
    pub fn query_url(&self, center: Coord) -> String {
        format!(
            "{}/api/close?lat={}&lon={}&limit={}&distance={}",
            self.config.base(),
            center.y,
            center.x,
            self.config.limit,
            self.config.distance
        )
    }

    /// Look up the closest photo to `center`; never fails.
    pub async fn lookup(&self, center: Coord) -> Option<PhotoRecord> {
        match self.try_lookup(center).await {
            Ok(record) => record,
            Err(err) => {
                warn!("Fody lookup failed, skipping: {err}");
                None
            }
        }
    }

    async fn try_lookup(&self, center: Coord) -> Result<Option<PhotoRecord>, SourceError> {
        let url = self.query_url(center);
        let body = self.fetcher.fetch_json(&url).await?;
        let collection: FeatureCollection<FodyPhoto> =
            serde_json::from_value(body).map_err(|err| SourceError::shape(PROVIDER, &url, &err))?;
        Ok(collection.into_first().map(|photo| self.normalise(photo)))
    }

    // Fody only stores upright guidepost shots, hence the fixed orientation.
    fn normalise(&self, photo: FodyPhoto) -> PhotoRecord {
        let base = self.config.base();
        PhotoRecord::new(
            PROVIDER,
            format!("{base}/?id={}", photo.id),
            format!("{base}/files/250px/{}.jpg", photo.id),
        )
        .with_username(photo.author)
        .with_portrait(true)
        .with_timestamp(photo.created)
    }
}
