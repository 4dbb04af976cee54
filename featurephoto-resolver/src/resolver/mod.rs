//! `FeaturePhotoResolver` and its configuration.

mod pending;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use featurephoto_core::{
    Feature, FeatureOrigin, FeatureState, JsonFetcher, OsmMeta, PhotoRecord, Resolution, ShortId,
    Tags, WikiEndpoints,
};
use featurephoto_data::{FodyConfig, FodySource, MapillaryConfig, MapillarySource, WikiSource};
use geo::Coord;
use log::{debug, info, warn};

use self::pending::{LookupTask, PendingSlot};
use crate::ResolveError;

const MAPILLARY: &str = "Mapillary";
const WIKI: &str = "wiki";
const FODY: &str = "Fody";

/// Configuration for [`FeaturePhotoResolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Mapillary endpoint and client id.
    pub mapillary: MapillaryConfig,
    /// Wikidata, Commons and Wikipedia endpoints.
    pub wiki: WikiEndpoints,
    /// Fody site settings.
    pub fody: FodyConfig,
    /// Upper bound on each source lookup, including a wiki dereference.
    pub source_timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            mapillary: MapillaryConfig::default(),
            wiki: WikiEndpoints::default(),
            fody: FodyConfig::default(),
            source_timeout: Duration::from_secs(15),
        }
    }
}

impl ResolverConfig {
    /// Replace the Mapillary settings.
    #[must_use]
    pub fn with_mapillary(mut self, mapillary: MapillaryConfig) -> Self {
        self.mapillary = mapillary;
        self
    }

    /// Replace the wiki endpoints.
    #[must_use]
    pub fn with_wiki(mut self, wiki: WikiEndpoints) -> Self {
        self.wiki = wiki;
        self
    }

    /// Replace the Fody settings.
    #[must_use]
    pub fn with_fody(mut self, fody: FodyConfig) -> Self {
        self.fody = fody;
        self
    }

    /// Bound every source lookup by `timeout`.
    #[must_use]
    pub const fn with_source_timeout(mut self, timeout: Duration) -> Self {
        self.source_timeout = timeout;
        self
    }
}

/// Resolves one representative photo per feature.
///
/// Sources are tried strictly in order, each to completion: wiki, Fody,
/// then Mapillary. The resolver must be driven from within a Tokio runtime
/// because skeleton observations spawn their Mapillary lookup.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
///
/// use featurephoto_core::{ElementKind, Feature, OsmMeta, Resolution};
/// use featurephoto_data::HttpJsonFetcher;
/// use featurephoto_resolver::FeaturePhotoResolver;
/// use geo::Coord;
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let resolver = FeaturePhotoResolver::new(Arc::new(HttpJsonFetcher::new()?));
/// let meta = OsmMeta { kind: ElementKind::Node, id: 5_013_364_098 };
/// let center = Coord { x: 14.390_517, y: 50.100_268 };
///
/// let first = resolver.resolve(&Feature::skeleton(meta, center)).await?;
/// assert_eq!(first, Resolution::Loading);
///
/// let full = Feature::full(meta, center, Default::default());
/// if let Some(photo) = resolver.resolve(&full).await?.photo() {
///     println!("{} via {}", photo.thumb, photo.source);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FeaturePhotoResolver {
    mapillary: MapillarySource,
    wiki: WikiSource,
    fody: FodySource,
    source_timeout: Duration,
    pending: PendingSlot,
}

impl FeaturePhotoResolver {
    /// Construct a resolver with default endpoints.
    #[must_use]
    pub fn new(fetcher: Arc<dyn JsonFetcher>) -> Self {
        Self::with_config(fetcher, ResolverConfig::default())
    }

    /// Construct a resolver with explicit configuration.
    #[must_use]
    pub fn with_config(fetcher: Arc<dyn JsonFetcher>, config: ResolverConfig) -> Self {
        Self {
            mapillary: MapillarySource::new(Arc::clone(&fetcher), config.mapillary),
            wiki: WikiSource::new(Arc::clone(&fetcher), config.wiki),
            fody: FodySource::new(fetcher, config.fody),
            source_timeout: config.source_timeout,
            pending: PendingSlot::default(),
        }
    }

    /// Resolve a photo for `feature`.
    ///
    /// Skeleton observations return [`Resolution::Loading`] without waiting
    /// for any network I/O. Features without an OpenStreetMap origin get a
    /// single Mapillary lookup whose failures read as [`Resolution::Empty`].
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when a wiki or Mapillary lookup for a full
    /// observation fails or exceeds the source timeout.
    pub async fn resolve(&self, feature: &Feature) -> Result<Resolution, ResolveError> {
        match (&feature.origin, &feature.state) {
            (FeatureOrigin::NonOsm, _) => Ok(self.resolve_single_pass(feature.center).await),
            (FeatureOrigin::Osm(meta), FeatureState::Skeleton) => {
                self.start_speculative(meta.short_id(), feature.center);
                Ok(Resolution::Loading)
            }
            (FeatureOrigin::Osm(meta), FeatureState::Full { tags }) => {
                self.resolve_full(meta, feature.center, tags).await
            }
        }
    }

    async fn resolve_single_pass(&self, center: Coord) -> Resolution {
        match lookup_mapillary(&self.mapillary, center, self.source_timeout).await {
            Ok(record) => Resolution::from(record),
            Err(err) => {
                warn!("Mapillary lookup for a non-OSM feature failed: {err}");
                Resolution::Empty
            }
        }
    }

    fn start_speculative(&self, id: ShortId, center: Coord) {
        let source = self.mapillary.clone();
        let timeout = self.source_timeout;
        debug!("starting speculative Mapillary lookup for {id}");
        let task = tokio::spawn(async move { lookup_mapillary(&source, center, timeout).await });
        self.pending.replace(id, task);
    }

    async fn resolve_full(
        &self,
        meta: &OsmMeta,
        center: Coord,
        tags: &Tags,
    ) -> Result<Resolution, ResolveError> {
        let id = meta.short_id();
        let pending = self.pending.claim(&id);

        let wiki = bounded(self.source_timeout, WIKI, self.wiki.lookup(tags))
            .await?
            .map_err(ResolveError::Wiki)?;
        if let Some(record) = usable(wiki) {
            return Ok(found(&id, record));
        }

        if let Some(record) = usable(self.lookup_fody(center).await) {
            return Ok(found(&id, record));
        }

        let mapillary = match pending {
            Some(task) => join(task).await?,
            None => lookup_mapillary(&self.mapillary, center, self.source_timeout).await?,
        };
        Ok(usable(mapillary).map_or_else(
            || {
                debug!("no photo found for {id}");
                Resolution::Empty
            },
            |record| found(&id, record),
        ))
    }

    async fn lookup_fody(&self, center: Coord) -> Option<PhotoRecord> {
        bounded(self.source_timeout, FODY, self.fody.lookup(center))
            .await
            .unwrap_or_else(|err| {
                warn!("{err}, skipping Fody");
                None
            })
    }

    #[cfg(test)]
    fn pending_owner(&self) -> Option<ShortId> {
        self.pending.owner()
    }
}

async fn bounded<F: Future>(
    timeout: Duration,
    source_name: &'static str,
    lookup: F,
) -> Result<F::Output, ResolveError> {
    tokio::time::timeout(timeout, lookup)
        .await
        .map_err(|_elapsed| ResolveError::Timeout {
            source_name,
            timeout,
        })
}

async fn lookup_mapillary(
    source: &MapillarySource,
    center: Coord,
    timeout: Duration,
) -> Result<Option<PhotoRecord>, ResolveError> {
    bounded(timeout, MAPILLARY, source.lookup(center))
        .await?
        .map_err(ResolveError::Mapillary)
}

async fn join(task: LookupTask) -> Result<Option<PhotoRecord>, ResolveError> {
    match task.await {
        Ok(outcome) => outcome,
        Err(err) => Err(ResolveError::Background {
            message: err.to_string(),
        }),
    }
}

fn usable(record: Option<PhotoRecord>) -> Option<PhotoRecord> {
    record.filter(PhotoRecord::has_thumb)
}

fn found(id: &ShortId, record: PhotoRecord) -> Resolution {
    info!("photo for {id} from {}", record.source);
    Resolution::Photo(record)
}
