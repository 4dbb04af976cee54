//! Facade crate for the feature photo service.
//!
//! This crate re-exports the domain types, the provider plumbing and the
//! resolver so applications can depend on a single crate.

#![forbid(unsafe_code)]

pub use featurephoto_core::{
    ElementKind, Feature, FeatureOrigin, FeatureState, FetchError, JsonFetcher, OsmMeta,
    PhotoRecord, Resolution, ShortId, Tags, WikiEndpoints, WikiKind, WikiTarget,
};
pub use featurephoto_data::{
    FetcherBuildError, FodyConfig, HttpJsonFetcher, HttpJsonFetcherConfig, MapillaryConfig,
    SourceError,
};
pub use featurephoto_resolver::{FeaturePhotoResolver, ResolveError, ResolverConfig};
