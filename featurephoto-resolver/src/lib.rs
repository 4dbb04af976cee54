//! Photo resolution for map features.
//!
//! [`FeaturePhotoResolver`] turns a feature observation into a
//! [`Resolution`](featurephoto_core::Resolution) by trying the wiki sources
//! linked from its tags, then the Fody photo database, then Mapillary. The
//! first usable thumbnail wins.
//!
//! Features are usually observed twice. A skeleton observation starts a
//! speculative Mapillary lookup in the background and reports
//! [`Resolution::Loading`](featurephoto_core::Resolution::Loading); the full
//! observation of the same element joins that lookup if it gets as far as
//! the Mapillary fallback. Each resolver owns a single pending slot, so the
//! most recent skeleton observation wins and separate resolvers never see
//! each other's lookups.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod resolver;

pub use error::ResolveError;
pub use resolver::{FeaturePhotoResolver, ResolverConfig};
