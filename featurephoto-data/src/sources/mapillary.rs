//! Mapillary proximity search.

use std::sync::Arc;

use featurephoto_core::{JsonFetcher, PhotoRecord, lonlat_fixed5};
use geo::Coord;
use log::debug;

use super::SourceError;
use super::wire::{FeatureCollection, MapillaryImage};

const PROVIDER: &str = "Mapillary";

/// Endpoint settings for [`MapillarySource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapillaryConfig {
    /// Image search endpoint of the v3 API.
    pub images_api: String,
    /// Application client id sent with every query.
    pub client_id: String,
    /// Web viewer root used for photo links.
    pub viewer_base: String,
    /// Image CDN root used for thumbnails.
    pub images_base: String,
}

impl Default for MapillaryConfig {
    fn default() -> Self {
        Self {
            images_api: "https://a.mapillary.com/v3/images".to_owned(),
            client_id: "TTdNZ2w5eTF6MEtCNUV3OWNhVER2dzpjMjdiZGE1MWJmYzljMmJi".to_owned(),
            viewer_base: "https://www.mapillary.com/app/".to_owned(),
            images_base: "https://images.mapillary.com".to_owned(),
        }
    }
}

impl MapillaryConfig {
    /// Override the client id.
    #[must_use]
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }
}

/// Finds the street-level image closest to and looking at a coordinate.
///
/// Cloning is cheap; clones share the fetcher.
#[derive(Clone)]
pub struct MapillarySource {
    fetcher: Arc<dyn JsonFetcher>,
    config: MapillaryConfig,
}

impl std::fmt::Debug for MapillarySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapillarySource")
            .field("fetcher", &"<dyn JsonFetcher>")
            .field("config", &self.config)
            .finish()
    }
}

impl MapillarySource {
    /// Create a source querying through `fetcher`.
    pub fn new(fetcher: Arc<dyn JsonFetcher>, config: MapillaryConfig) -> Self {
        Self { fetcher, config }
    }

    /// Build the proximity query for `center`.
    ///
    /// Both `lookat` and `closeto` carry the center rounded to five
    /// decimals, so repeated lookups for one feature hit the same URL.
    #[must_use]
    pub fn query_url(&self, center: Coord) -> String {
        let lonlat = lonlat_fixed5(center);
        format!(
            "{}?client_id={}&lookat={lonlat}&closeto={lonlat}",
            self.config.images_api, self.config.client_id
        )
    }

    /// Look up the closest image to `center`.
    ///
    /// An empty result set evicts the cached response for the query URL
    /// before returning `Ok(None)`: Mapillary can answer empty on a first
    /// attempt and with images on a retry.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the request fails or the reply is not a
    /// feature collection.
    pub async fn lookup(&self, center: Coord) -> Result<Option<PhotoRecord>, SourceError> {
        let url = self.query_url(center);
        let body = self.fetcher.fetch_json(&url).await?;
        let collection: FeatureCollection<MapillaryImage> =
            serde_json::from_value(body).map_err(|err| SourceError::shape(PROVIDER, &url, &err))?;

        let Some(image) = collection.into_first() else {
            debug!("no Mapillary image near {}, evicting {url}", lonlat_fixed5(center));
            self.fetcher.remove_fetch_cache(&url);
            return Ok(None);
        };
        Ok(Some(self.normalise(image)))
    }

    fn normalise(&self, image: MapillaryImage) -> PhotoRecord {
        let link = format!("{}?focus=photo&pKey={}", self.config.viewer_base, image.key);
        let thumb = format!(
            "{}/{}/thumb-640.jpg",
            self.config.images_base.trim_end_matches('/'),
            image.key
        );
        PhotoRecord::new(PROVIDER, link, thumb).with_username(image.username)
    }
}
