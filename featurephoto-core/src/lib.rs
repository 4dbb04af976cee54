//! Core domain types for the feature photo service.
//!
//! A map feature is observed once or twice: first as a lightweight
//! skeleton carrying identity and coordinates, then as a full feature with
//! its tags. These models make that two-phase convention explicit so the
//! resolver's branching stays exhaustive.

use std::collections::BTreeMap;
use std::fmt;

use geo::Coord;
use serde::{Deserialize, Serialize};

pub mod fetch;
pub mod photo;
pub mod wiki;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use fetch::{FetchError, JsonFetcher};
pub use photo::{PhotoRecord, Resolution};
pub use wiki::{WikiEndpoints, WikiKind, WikiTarget, wiki_target};

/// OpenStreetMap-style tags, ordered by key.
pub type Tags = BTreeMap<String, String>;

/// Kind of OpenStreetMap element a feature originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// A single node.
    Node,
    /// A way (line or area).
    Way,
    /// A relation.
    Relation,
}

impl ElementKind {
    const fn initial(self) -> char {
        match self {
            Self::Node => 'n',
            Self::Way => 'w',
            Self::Relation => 'r',
        }
    }
}

/// Origin metadata of an OpenStreetMap-backed feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OsmMeta {
    /// Element kind.
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// Element identifier.
    pub id: i64,
}

impl OsmMeta {
    /// Derive the stable short identifier for this element.
    ///
    /// # Examples
    ///
    /// ```
    /// use featurephoto_core::{ElementKind, OsmMeta};
    ///
    /// let meta = OsmMeta { kind: ElementKind::Way, id: 42 };
    /// assert_eq!(meta.short_id().as_str(), "w42");
    /// ```
    #[must_use]
    pub fn short_id(&self) -> ShortId {
        ShortId(format!("{}{}", self.kind.initial(), self.id))
    }
}

/// Short identifier such as `n123`, used to key in-flight lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShortId(String);

impl ShortId {
    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a feature came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureOrigin {
    /// Backed by an OpenStreetMap element.
    Osm(OsmMeta),
    /// Not backed by OpenStreetMap (e.g. a clicked coordinate). Such
    /// features are observed only once.
    NonOsm,
}

/// Completeness of a feature observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum FeatureState {
    /// Identity and coordinates only; a full observation is expected later.
    Skeleton,
    /// Complete observation including tags.
    Full {
        /// Tags of the feature.
        #[serde(default)]
        tags: Tags,
    },
}

/// A single observation of a map feature.
///
/// `center.x` holds the longitude and `center.y` the latitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Identity of the feature.
    pub origin: FeatureOrigin,
    /// Center coordinate.
    pub center: Coord,
    /// Skeleton or full observation.
    pub state: FeatureState,
}

impl Feature {
    /// Construct a skeleton observation of an OpenStreetMap element.
    #[must_use]
    pub const fn skeleton(meta: OsmMeta, center: Coord) -> Self {
        Self {
            origin: FeatureOrigin::Osm(meta),
            center,
            state: FeatureState::Skeleton,
        }
    }

    /// Construct a full observation of an OpenStreetMap element.
    #[must_use]
    pub const fn full(meta: OsmMeta, center: Coord, tags: Tags) -> Self {
        Self {
            origin: FeatureOrigin::Osm(meta),
            center,
            state: FeatureState::Full { tags },
        }
    }

    /// Construct a feature that has no OpenStreetMap origin.
    #[must_use]
    pub const fn non_osm(center: Coord) -> Self {
        Self {
            origin: FeatureOrigin::NonOsm,
            center,
            state: FeatureState::Full { tags: Tags::new() },
        }
    }

    /// Short identifier of the originating element, if any.
    #[must_use]
    pub fn short_id(&self) -> Option<ShortId> {
        match &self.origin {
            FeatureOrigin::Osm(meta) => Some(meta.short_id()),
            FeatureOrigin::NonOsm => None,
        }
    }
}

/// Format a center as the `lon,lat` pair rounded to five decimals.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use featurephoto_core::lonlat_fixed5;
///
/// let center = Coord { x: 14.390517, y: 50.100268 };
/// assert_eq!(lonlat_fixed5(center), "14.39052,50.10027");
/// ```
#[must_use]
pub fn lonlat_fixed5(center: Coord) -> String {
    format!("{:.5},{:.5}", center.x, center.y)
}
