//! Feature builders shared by tests across the workspace.

use geo::Coord;

use crate::{ElementKind, Feature, OsmMeta, Tags};

/// Center of the Eiffel Tower.
pub const TOWER_CENTER: Coord = Coord {
    x: 2.294_5,
    y: 48.858_4,
};

/// Build a node identity.
#[must_use]
pub const fn node(id: i64) -> OsmMeta {
    OsmMeta {
        kind: ElementKind::Node,
        id,
    }
}

/// Build a tag map from key/value pairs.
#[must_use]
pub fn tags(pairs: &[(&str, &str)]) -> Tags {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect()
}

/// Skeleton and full observations of the same node.
#[must_use]
pub fn observed_twice(id: i64, center: Coord, pairs: &[(&str, &str)]) -> (Feature, Feature) {
    (
        Feature::skeleton(node(id), center),
        Feature::full(node(id), center, tags(pairs)),
    )
}
